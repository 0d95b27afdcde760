//! Insertion-family operations and the shared rebalancing primitives.
//!
//! Every operation here descends by key comparison and rebuilds the path on
//! the way back up. New keys enter as red leaves; [`balance_left`] and
//! [`balance_right`] repair a red-red pair below a black node, and the root
//! is forced black at the end.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::ops::Add;

use super::super::error::DictError;
use super::RedBlackDict;
use super::node::{Color, Link, Node, force_black};

/// Rebuilds a node whose left subtree may have gained a red-red pair.
///
/// A black node with a red left child that itself has a red child on either
/// arm becomes a red node with two black children. Any other shape is
/// rebuilt unchanged.
pub(super) fn balance_left<K: Clone, V: Clone>(
    color: Color,
    left: Link<K, V>,
    key: K,
    value: V,
    right: Link<K, V>,
) -> Link<K, V> {
    if color == Color::Black
        && let Some(child) = &left
        && child.is_red()
    {
        if let Some(grandchild) = &child.left
            && grandchild.is_red()
        {
            return Node::link(
                Color::Red,
                grandchild.recolored(Color::Black),
                child.key.clone(),
                child.value.clone(),
                Node::link(Color::Black, child.right.clone(), key, value, right),
            );
        }
        if let Some(grandchild) = &child.right
            && grandchild.is_red()
        {
            return Node::link(
                Color::Red,
                Node::link(
                    Color::Black,
                    child.left.clone(),
                    child.key.clone(),
                    child.value.clone(),
                    grandchild.left.clone(),
                ),
                grandchild.key.clone(),
                grandchild.value.clone(),
                Node::link(Color::Black, grandchild.right.clone(), key, value, right),
            );
        }
    }
    Node::link(color, left, key, value, right)
}

/// Mirror image of [`balance_left`].
pub(super) fn balance_right<K: Clone, V: Clone>(
    color: Color,
    left: Link<K, V>,
    key: K,
    value: V,
    right: Link<K, V>,
) -> Link<K, V> {
    if color == Color::Black
        && let Some(child) = &right
        && child.is_red()
    {
        if let Some(grandchild) = &child.right
            && grandchild.is_red()
        {
            return Node::link(
                Color::Red,
                Node::link(Color::Black, left, key, value, child.left.clone()),
                child.key.clone(),
                child.value.clone(),
                grandchild.recolored(Color::Black),
            );
        }
        if let Some(grandchild) = &child.left
            && grandchild.is_red()
        {
            return Node::link(
                Color::Red,
                Node::link(Color::Black, left, key, value, grandchild.left.clone()),
                grandchild.key.clone(),
                grandchild.value.clone(),
                Node::link(
                    Color::Black,
                    grandchild.right.clone(),
                    child.key.clone(),
                    child.value.clone(),
                    child.right.clone(),
                ),
            );
        }
    }
    Node::link(color, left, key, value, right)
}

impl<K: Clone + Ord, V: Clone> RedBlackDict<K, V> {
    /// Inserts a key-value pair, replacing the value if the key exists.
    ///
    /// Replacing keeps the node's color and children; a new key is added as
    /// a red leaf and the path is rebalanced.
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
    /// let dict1 = RedBlackDict::new().store(1, "one");
    /// let dict2 = dict1.store(1, "ONE");
    ///
    /// assert_eq!(dict1.find(&1), Some(&"one")); // Original unchanged
    /// assert_eq!(dict2.find(&1), Some(&"ONE")); // New version
    /// ```
    #[must_use]
    pub fn store(&self, key: K, value: V) -> Self {
        self.upsert(key, move |_| value)
    }

    /// Applies `update` to the value of `key`, or inserts `init` if the key
    /// is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::RedBlackDict;
    ///
    /// let dict = RedBlackDict::new().store("a", 1);
    /// let dict = dict
    ///     .update_with_default("a", |count| count * 10, 0)
    ///     .update_with_default("b", |count| count * 10, 7);
    /// assert_eq!(dict.to_list(), vec![("a", 10), ("b", 7)]);
    /// ```
    #[must_use]
    pub fn update_with_default<F>(&self, key: K, update: F, init: V) -> Self
    where
        F: FnOnce(&V) -> V,
    {
        self.upsert(key, move |existing| existing.map_or(init, update))
    }

    /// Replaces the value of a key that must be present.
    ///
    /// The tree shape is untouched; only the path to the key is copied.
    ///
    /// # Errors
    ///
    /// Returns [`DictError::KeyNotFound`] if the key is absent. Nothing is
    /// inserted in that case.
    pub fn update_val<Q>(&self, key: &Q, value: V) -> Result<Self, DictError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.update(key, move |_| value)
    }

    /// Replaces the value of a key that must be present with
    /// `update(old_value)`.
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
    /// let dict = RedBlackDict::new().store(1, "one".to_string());
    /// let shouted = dict.update(&1, |value| value.to_uppercase()).unwrap();
    /// assert_eq!(shouted.find(&1), Some(&"ONE".to_string()));
    /// assert_eq!(dict.update(&2, |value| value.clone()).err(), Some(DictError::KeyNotFound));
    /// ```
    pub fn update<Q, F>(&self, key: &Q, update: F) -> Result<Self, DictError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        F: FnOnce(&V) -> V,
    {
        Self::replace_existing(&self.root, key, update).map(Self::from_root)
    }

    /// Adds `delta` to the numeric value of a key that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`DictError::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::RedBlackDict;
    ///
    /// let dict = RedBlackDict::new().store("hits", 1);
    /// let dict = dict.update_counter("hits", 41).unwrap();
    /// assert_eq!(dict.find("hits"), Some(&42));
    /// ```
    pub fn update_counter<Q>(&self, key: &Q, delta: V) -> Result<Self, DictError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Add<Output = V>,
    {
        self.update(key, move |count| count.clone() + delta)
    }

    /// Inserts or replaces the value of `key` with `resolve(existing)`.
    fn upsert<F>(&self, key: K, resolve: F) -> Self
    where
        F: FnOnce(Option<&V>) -> V,
    {
        Self::from_root(force_black(Self::insert_into_node(&self.root, key, resolve)))
    }

    /// Recursive helper for the insertion family.
    fn insert_into_node<F>(link: &Link<K, V>, key: K, resolve: F) -> Link<K, V>
    where
        F: FnOnce(Option<&V>) -> V,
    {
        let Some(node) = link else {
            return Node::link(Color::Red, None, key, resolve(None), None);
        };
        match key.cmp(&node.key) {
            Ordering::Less => balance_left(
                node.color,
                Self::insert_into_node(&node.left, key, resolve),
                node.key.clone(),
                node.value.clone(),
                node.right.clone(),
            ),
            Ordering::Greater => balance_right(
                node.color,
                node.left.clone(),
                node.key.clone(),
                node.value.clone(),
                Self::insert_into_node(&node.right, key, resolve),
            ),
            Ordering::Equal => Node::link(
                node.color,
                node.left.clone(),
                key,
                resolve(Some(&node.value)),
                node.right.clone(),
            ),
        }
    }

    /// Copies the path to an existing key, replacing its value.
    fn replace_existing<Q, F>(
        link: &Link<K, V>,
        key: &Q,
        update: F,
    ) -> Result<Link<K, V>, DictError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        F: FnOnce(&V) -> V,
    {
        let node = link.as_ref().ok_or(DictError::KeyNotFound)?;
        Ok(match key.cmp(node.key.borrow()) {
            Ordering::Less => Node::link(
                node.color,
                Self::replace_existing(&node.left, key, update)?,
                node.key.clone(),
                node.value.clone(),
                node.right.clone(),
            ),
            Ordering::Greater => Node::link(
                node.color,
                node.left.clone(),
                node.key.clone(),
                node.value.clone(),
                Self::replace_existing(&node.right, key, update)?,
            ),
            Ordering::Equal => node.with_value(update(&node.value)),
        })
    }
}

impl<K: Clone + Ord, T: Clone> RedBlackDict<K, Vec<T>> {
    /// Appends `item` to the sequence stored under `key`, inserting `[item]`
    /// if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::RedBlackDict;
    ///
    /// let dict = RedBlackDict::new().append("xs", 1).append("xs", 2);
    /// assert_eq!(dict.find("xs"), Some(&vec![1, 2]));
    /// ```
    #[must_use]
    pub fn append(&self, key: K, item: T) -> Self {
        self.append_list(key, [item])
    }

    /// Appends every item to the sequence stored under `key`, inserting the
    /// items as a new sequence if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::RedBlackDict;
    ///
    /// let dict = RedBlackDict::new()
    ///     .append_list("xs", vec![1, 2])
    ///     .append_list("xs", vec![3]);
    /// assert_eq!(dict.find("xs"), Some(&vec![1, 2, 3]));
    /// ```
    #[must_use]
    pub fn append_list<I>(&self, key: K, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        self.upsert(key, move |existing| {
            let mut sequence = existing.cloned().unwrap_or_default();
            sequence.extend(items);
            sequence
        })
    }
}
