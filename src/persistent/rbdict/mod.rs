//! Persistent (immutable) dictionary based on a Red-Black Tree.
//!
//! This module provides [`RedBlackDict`], an immutable ordered map that uses
//! structural sharing for efficient operations.
//!
//! # Overview
//!
//! - O(log N) `find` / `is_key` / `fetch`
//! - O(log N) `store` / `append` / `update*`
//! - O(log N) `erase`, with full double-black rebalancing
//! - O(N) `size`, `to_list`, `fold`, `map`, `filter`
//!
//! All operations return new dictionaries without modifying the original.
//!
//! # Examples
//!
//! ```rust
//! use rbdict::persistent::RedBlackDict;
//!
//! let dict = RedBlackDict::new()
//!     .store(5, "a")
//!     .store(3, "b")
//!     .store(8, "c")
//!     .store(1, "d");
//!
//! assert_eq!(dict.to_list(), vec![(1, "d"), (3, "b"), (5, "a"), (8, "c")]);
//!
//! let smaller = dict.erase(&3);
//! assert_eq!(smaller.to_list(), vec![(1, "d"), (5, "a"), (8, "c")]);
//! assert!(smaller.verify().is_ok());
//! assert_eq!(dict.size(), 4); // Original unchanged
//! ```
//!
//! # Internal Structure
//!
//! The Red-Black Tree maintains the following invariants:
//! 1. Every node is either red or black
//! 2. The root is black
//! 3. All leaves (NIL) are black
//! 4. Red nodes have only black children
//! 5. Every path from root to leaf has the same number of black nodes
//!
//! These invariants ensure the tree height is O(log N).

mod cursor;
mod erase;
mod insert;
mod node;
mod traverse;
mod verify;

pub use cursor::{Cursor, Flow, FlowWith, Resume, ResumeWith};

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use super::error::DictError;
use node::Link;

// =============================================================================
// RedBlackDict Definition
// =============================================================================

/// A persistent (immutable) ordered dictionary based on a Red-Black Tree.
///
/// Keys must implement `Ord`. Entries are kept in ascending key order.
/// Cloning is O(1): the clone shares the whole tree.
///
/// # Time Complexity
///
/// | Operation            | Complexity |
/// |----------------------|------------|
/// | `new`                | O(1)       |
/// | `find` / `is_key`    | O(log N)   |
/// | `store` / `update*`  | O(log N)   |
/// | `erase`              | O(log N)   |
/// | `size`               | O(N)       |
/// | `is_empty`           | O(1)       |
///
/// # Examples
///
/// ```rust
/// use rbdict::persistent::RedBlackDict;
///
/// let dict = RedBlackDict::new().store("key", 1);
/// assert_eq!(dict.find("key"), Some(&1));
/// assert!(!dict.is_key("other"));
/// ```
pub struct RedBlackDict<K, V> {
    root: Link<K, V>,
}

impl<K, V> RedBlackDict<K, V> {
    /// Creates a new empty dictionary.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::RedBlackDict;
    ///
    /// let dict: RedBlackDict<i32, String> = RedBlackDict::new();
    /// assert!(dict.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None }
    }

    const fn from_root(root: Link<K, V>) -> Self {
        Self { root }
    }

    /// Returns `true` if the dictionary contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of entries in the dictionary.
    ///
    /// The size is not cached; it is counted by walking the tree.
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::RedBlackDict;
    ///
    /// let dict = RedBlackDict::new().store(1, "one").store(2, "two");
    /// assert_eq!(dict.size(), 2);
    /// ```
    #[must_use]
    pub fn size(&self) -> usize {
        Self::count_nodes(&self.root)
    }

    fn count_nodes(link: &Link<K, V>) -> usize {
        link.as_ref().map_or(0, |node| {
            Self::count_nodes(&node.left) + 1 + Self::count_nodes(&node.right)
        })
    }
}

impl<K: Ord, V> RedBlackDict<K, V> {
    /// Returns a reference to the value corresponding to the key, or `None`
    /// if the key is absent.
    ///
    /// The key may be any borrowed form of the dictionary's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::RedBlackDict;
    ///
    /// let dict = RedBlackDict::new().store("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(dict.find("hello"), Some(&42));
    /// assert_eq!(dict.find("world"), None);
    /// ```
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_ref();
        while let Some(node) = current {
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left.as_ref(),
                Ordering::Greater => node.right.as_ref(),
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }

    /// Returns `true` if the dictionary contains the key.
    #[must_use]
    pub fn is_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns the value for a key that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`DictError::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::{DictError, RedBlackDict};
    ///
    /// let dict = RedBlackDict::new().store(1, "one");
    /// assert_eq!(dict.fetch(&1), Ok(&"one"));
    /// assert_eq!(dict.fetch(&2), Err(DictError::KeyNotFound));
    /// ```
    pub fn fetch<Q>(&self, key: &Q) -> Result<&V, DictError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).ok_or(DictError::KeyNotFound)
    }
}

impl<K: Clone + Ord, V: Clone> RedBlackDict<K, V> {
    /// Builds a dictionary by storing each pair in turn.
    ///
    /// Later pairs overwrite earlier ones with the same key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::RedBlackDict;
    ///
    /// let dict = RedBlackDict::from_list(vec![(2, "b"), (1, "a"), (2, "B")]);
    /// assert_eq!(dict.to_list(), vec![(1, "a"), (2, "B")]);
    /// ```
    #[must_use]
    pub fn from_list<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        entries
            .into_iter()
            .fold(Self::new(), |dict, (key, value)| dict.store(key, value))
    }

    /// Returns all entries in ascending key order.
    #[must_use]
    pub fn to_list(&self) -> Vec<(K, V)> {
        self.entries()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Returns all keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::RedBlackDict;
    ///
    /// let dict = RedBlackDict::new().store(3, ()).store(1, ()).store(2, ());
    /// assert_eq!(dict.fetch_keys(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn fetch_keys(&self) -> Vec<K> {
        self.keys().cloned().collect()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Clone for RedBlackDict<K, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self::from_root(self.root.clone())
    }
}

impl<K, V> Default for RedBlackDict<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Ord, V: Clone> FromIterator<(K, V)> for RedBlackDict<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_list(iter)
    }
}

impl<'a, K, V> IntoIterator for &'a RedBlackDict<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Cursor<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RedBlackDict<K, V> {
    fn eq(&self, other: &Self) -> bool {
        // Shapes may differ for equal contents, so compare in key order.
        self.entries().eq(other.entries())
    }
}

impl<K: Eq, V: Eq> Eq for RedBlackDict<K, V> {}

/// Hashes the entries in key order, so equal dictionaries hash equally
/// whatever their insertion history.
impl<K: Hash, V: Hash> Hash for RedBlackDict<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RedBlackDict<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.entries()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for RedBlackDict<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(RedBlackDict<i32, String>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(RedBlackDict<i32, String>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for RedBlackDict<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.entries())
    }
}

#[cfg(feature = "serde")]
struct RedBlackDictVisitor<K, V> {
    marker: std::marker::PhantomData<(K, V)>,
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for RedBlackDictVisitor<K, V>
where
    K: serde::Deserialize<'de> + Clone + Ord,
    V: serde::Deserialize<'de> + Clone,
{
    type Value = RedBlackDict<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut dict = RedBlackDict::new();
        while let Some((key, value)) = access.next_entry()? {
            dict = dict.store(key, value);
        }
        Ok(dict)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for RedBlackDict<K, V>
where
    K: serde::Deserialize<'de> + Clone + Ord,
    V: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(RedBlackDictVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
