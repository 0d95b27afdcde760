//! Suspendable in-order traversal.
//!
//! A [`Cursor`] is an explicit, cloneable position in an in-order walk: a
//! stack of the nodes whose key has not been visited yet, each with its
//! right subtree still pending. [`Cursor::step`] yields one entry together
//! with the cursor for the rest, so a traversal can be suspended between any
//! two entries and resumed, or abandoned, at will.
//!
//! [`RedBlackDict::iter`] and [`RedBlackDict::itera`] wrap a cursor in a
//! continuation-passing protocol: the visitor receives each entry together
//! with a [`Resume`] (or [`ResumeWith`]) handle and returns a [`Flow`] (or
//! [`FlowWith`]) saying whether to continue. Resuming only builds that
//! token; a loop inside `iter` / `itera` drives the next visit, so the stack
//! does not grow with the number of entries visited.

use std::fmt;
use std::iter::FusedIterator;

use smallvec::SmallVec;
use tracing::trace;

use super::RedBlackDict;
use super::node::Node;

/// Inline capacity of the cursor stack. A red-black tree of height 32 holds
/// far more than 2^16 entries, so the stack rarely spills to the heap.
const CURSOR_INLINE_DEPTH: usize = 32;

// =============================================================================
// Cursor
// =============================================================================

/// A suspended in-order traversal of a [`RedBlackDict`].
///
/// `Cursor` is also an [`Iterator`] over `(&K, &V)` in ascending key order.
/// Cloning a cursor forks the traversal: both copies continue independently
/// from the same position.
///
/// # Examples
///
/// ```rust
/// use rbdict::persistent::RedBlackDict;
///
/// let dict = RedBlackDict::new().store(2, "b").store(1, "a").store(3, "c");
///
/// let (key, value, rest) = dict.entries().step().unwrap();
/// assert_eq!((key, value), (&1, &"a"));
///
/// let fork = rest.clone();
/// assert_eq!(rest.map(|(key, _)| *key).collect::<Vec<_>>(), vec![2, 3]);
/// assert_eq!(fork.count(), 2);
/// ```
pub struct Cursor<'a, K, V> {
    pending: SmallVec<[&'a Node<K, V>; CURSOR_INLINE_DEPTH]>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    fn new(root: Option<&'a Node<K, V>>) -> Self {
        let mut cursor = Self {
            pending: SmallVec::new(),
        };
        cursor.descend_left(root);
        cursor
    }

    fn descend_left(&mut self, mut current: Option<&'a Node<K, V>>) {
        while let Some(node) = current {
            self.pending.push(node);
            current = node.left.as_deref();
        }
    }

    fn advance(&mut self) -> Option<(&'a K, &'a V)> {
        let node = self.pending.pop()?;
        self.descend_left(node.right.as_deref());
        Some((&node.key, &node.value))
    }

    /// Yields the next entry and the cursor for the remaining entries, or
    /// `None` when the traversal is complete.
    #[must_use]
    pub fn step(mut self) -> Option<(&'a K, &'a V, Self)> {
        let (key, value) = self.advance()?;
        Some((key, value, self))
    }

    /// Returns `true` if no entries remain.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            pending: self.pending.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Cursor<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

impl<K, V> FusedIterator for Cursor<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Cursor")
            .field("next", &self.pending.last().map(|node| &node.key))
            .finish()
    }
}

// =============================================================================
// Continuation Handles
// =============================================================================

/// The rest of an [`iter`](RedBlackDict::iter) traversal.
///
/// A visitor continues by returning [`resume`](Self::resume)'s token and
/// stops by returning [`Flow::done`]. Dropping the handle cancels the
/// traversal.
pub struct Resume<'a, K, V> {
    cursor: Cursor<'a, K, V>,
}

impl<'a, K, V> Resume<'a, K, V> {
    /// Asks for the next entry to be visited with the same visitor, or for
    /// the traversal's default value if no entries remain.
    #[must_use]
    pub fn resume<R>(self) -> Flow<'a, K, V, R> {
        Flow {
            step: Step::Next(self.cursor),
        }
    }

    /// Returns `true` if resuming would yield the default value without
    /// visiting another entry.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor.is_finished()
    }
}

/// The rest of an [`itera`](RedBlackDict::itera) traversal.
///
/// A visitor continues by returning [`resume`](Self::resume)'s token with
/// the updated accumulator, and stops by returning [`FlowWith::done`].
pub struct ResumeWith<'a, K, V> {
    cursor: Cursor<'a, K, V>,
}

impl<'a, K, V> ResumeWith<'a, K, V> {
    /// Asks for the next entry to be visited with `accumulator` as the
    /// running value, or for `accumulator` to be the result if no entries
    /// remain.
    #[must_use]
    pub fn resume<A>(self, accumulator: A) -> FlowWith<'a, K, V, A> {
        FlowWith {
            step: Step::Next((self.cursor, accumulator)),
        }
    }

    /// Returns `true` if resuming would return the accumulator without
    /// visiting another entry.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor.is_finished()
    }
}

/// A visitor's answer: finish with `T`, or continue from `C`.
enum Step<C, T> {
    Done(T),
    Next(C),
}

/// What an [`iter`](RedBlackDict::iter) visitor asks for after one entry:
/// stop with a result, or continue through [`Resume::resume`].
#[must_use = "a visitor must return its flow for the traversal to act on it"]
pub struct Flow<'a, K, V, R> {
    step: Step<Cursor<'a, K, V>, R>,
}

impl<K, V, R> Flow<'_, K, V, R> {
    /// Stops the traversal; `iter` returns `result`.
    pub const fn done(result: R) -> Self {
        Self {
            step: Step::Done(result),
        }
    }
}

/// What an [`itera`](RedBlackDict::itera) visitor asks for after one entry:
/// stop with a final accumulator, or continue through
/// [`ResumeWith::resume`].
#[must_use = "a visitor must return its flow for the traversal to act on it"]
pub struct FlowWith<'a, K, V, A> {
    step: Step<(Cursor<'a, K, V>, A), A>,
}

impl<K, V, A> FlowWith<'_, K, V, A> {
    /// Stops the traversal; `itera` returns `accumulator`.
    pub const fn done(accumulator: A) -> Self {
        Self {
            step: Step::Done(accumulator),
        }
    }
}

// =============================================================================
// RedBlackDict Traversal Entry Points
// =============================================================================

impl<K, V> RedBlackDict<K, V> {
    /// Returns a cursor over the entries in ascending key order.
    ///
    /// Every call starts a fresh traversal from the smallest key.
    #[must_use]
    pub fn entries(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.root.as_deref())
    }

    /// Returns an iterator over keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries().map(|(key, _)| key)
    }

    /// Returns an iterator over values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries().map(|(_, value)| value)
    }

    /// Starts a suspendable traversal.
    ///
    /// `visitor` is called with the smallest entry and a [`Resume`] handle.
    /// Returning `rest.resume()` calls `visitor` again with the next entry;
    /// when no entries remain, `iter` returns `default`. Returning
    /// [`Flow::done`] stops the traversal with that result. On an empty
    /// dictionary `default` is returned without calling `visitor`.
    ///
    /// The stack depth stays constant however many entries are visited.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::{Flow, RedBlackDict};
    ///
    /// let dict: RedBlackDict<i32, i32> = (1..=10).map(|key| (key, key * key)).collect();
    ///
    /// // First key whose value exceeds 20
    /// let found = dict.iter(None, |key, value, rest| {
    ///     if *value > 20 { Flow::done(Some(*key)) } else { rest.resume() }
    /// });
    /// assert_eq!(found, Some(5));
    /// ```
    pub fn iter<'a, R, F>(&'a self, default: R, mut visitor: F) -> R
    where
        F: FnMut(&'a K, &'a V, Resume<'a, K, V>) -> Flow<'a, K, V, R>,
    {
        let mut cursor = self.entries();
        loop {
            let Some((key, value)) = cursor.advance() else {
                trace!("iter traversal exhausted");
                return default;
            };
            match visitor(key, value, Resume { cursor }).step {
                Step::Next(rest) => cursor = rest,
                Step::Done(result) => return result,
            }
        }
    }

    /// Starts a suspendable traversal that threads an accumulator.
    ///
    /// `visitor` receives each entry, the running accumulator, and a
    /// [`ResumeWith`] handle; returning `rest.resume(next)` visits the next
    /// entry with `next`. The accumulator passed to the last resume is the
    /// result, and [`FlowWith::done`] stops early with its argument.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::{FlowWith, RedBlackDict};
    ///
    /// let dict = RedBlackDict::new().store("b", 2).store("a", 1).store("c", 3);
    ///
    /// let joined = dict.itera(String::new(), |key, value, mut text, rest| {
    ///     text.push_str(&format!("{key}{value}"));
    ///     rest.resume(text)
    /// });
    /// assert_eq!(joined, "a1b2c3");
    ///
    /// // Sum values until one exceeds 1
    /// let sum = dict.itera(0, |_, value, sum, rest| {
    ///     if *value > 1 { FlowWith::done(sum) } else { rest.resume(sum + value) }
    /// });
    /// assert_eq!(sum, 1);
    /// ```
    pub fn itera<'a, A, F>(&'a self, accumulator: A, mut visitor: F) -> A
    where
        F: FnMut(&'a K, &'a V, A, ResumeWith<'a, K, V>) -> FlowWith<'a, K, V, A>,
    {
        let mut cursor = self.entries();
        let mut accumulator = accumulator;
        loop {
            let Some((key, value)) = cursor.advance() else {
                trace!("itera traversal exhausted");
                return accumulator;
            };
            match visitor(key, value, accumulator, ResumeWith { cursor }).step {
                Step::Next((rest, next)) => {
                    cursor = rest;
                    accumulator = next;
                }
                Step::Done(result) => return result,
            }
        }
    }
}
