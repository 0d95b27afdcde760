//! Deletion with double-black rebalancing.
//!
//! Every recursive step returns the rebuilt subtree together with a
//! `decreased` flag: `true` means the subtree's black height is one less
//! than before, and the parent must absorb the deficit with
//! [`unbalance_left`] or [`unbalance_right`].

use std::borrow::Borrow;
use std::cmp::Ordering;

use tracing::trace;

use super::super::ReferenceCounter;
use super::RedBlackDict;
use super::insert::{balance_left, balance_right};
use super::node::{Color, Link, Node, blackify, force_black};

/// A rebuilt subtree and whether its black height decreased.
type Shrunk<K, V> = (Link<K, V>, bool);

/// Repairs a node whose left subtree lost one black level.
///
/// The sibling (`right`) decides the case:
///
/// - red sibling: rotate it above the parent, then repair the parent (now
///   red) against the sibling's black inner child. Always absorbed.
/// - black sibling: recolor it red and rebalance. If that exposes a red
///   grandchild, the rotation absorbs the deficit and the new root takes the
///   parent's color. Otherwise the parent turns black, which absorbs the
///   deficit only if it was red.
fn unbalance_left<K: Clone, V: Clone>(
    color: Color,
    left: Link<K, V>,
    key: K,
    value: V,
    right: Link<K, V>,
) -> Shrunk<K, V> {
    let Some(sibling) = right else {
        // A balanced tree never has an empty sibling opposite a shrunk subtree.
        return (Node::link(color, left, key, value, None), true);
    };
    if sibling.is_red() {
        let (inner, _) = unbalance_left(Color::Red, left, key, value, sibling.left.clone());
        let rotated = Node::link(
            Color::Black,
            inner,
            sibling.key.clone(),
            sibling.value.clone(),
            sibling.right.clone(),
        );
        return (rotated, false);
    }
    absorb(
        balance_right(Color::Black, left, key, value, sibling.recolored(Color::Red)),
        color,
    )
}

/// Mirror image of [`unbalance_left`]: the right subtree lost one black
/// level and `left` is the sibling.
fn unbalance_right<K: Clone, V: Clone>(
    color: Color,
    left: Link<K, V>,
    key: K,
    value: V,
    right: Link<K, V>,
) -> Shrunk<K, V> {
    let Some(sibling) = left else {
        // A balanced tree never has an empty sibling opposite a shrunk subtree.
        return (Node::link(color, None, key, value, right), true);
    };
    if sibling.is_red() {
        let (inner, _) = unbalance_right(Color::Red, sibling.right.clone(), key, value, right);
        let rotated = Node::link(
            Color::Black,
            sibling.left.clone(),
            sibling.key.clone(),
            sibling.value.clone(),
            inner,
        );
        return (rotated, false);
    }
    absorb(
        balance_left(Color::Black, sibling.recolored(Color::Red), key, value, right),
        color,
    )
}

/// Finishes a black-sibling repair built under a black parent.
///
/// A red result means a rotation happened and the deficit is gone; the
/// result takes the original parent's color. A black result still lacks a
/// level unless the original parent was red.
fn absorb<K: Clone, V: Clone>(balanced: Link<K, V>, color: Color) -> Shrunk<K, V> {
    match balanced {
        Some(node) if node.is_red() => {
            let rooted = if color == Color::Red {
                Some(node)
            } else {
                node.recolored(Color::Black)
            };
            (rooted, false)
        }
        other => (other, color == Color::Black),
    }
}

/// Rebuilds a node after its left subtree was replaced.
fn rejoin_left<K: Clone, V: Clone>(
    color: Color,
    (left, decreased): Shrunk<K, V>,
    key: K,
    value: V,
    right: Link<K, V>,
) -> Shrunk<K, V> {
    if decreased {
        unbalance_left(color, left, key, value, right)
    } else {
        (Node::link(color, left, key, value, right), false)
    }
}

/// Rebuilds a node after its right subtree was replaced.
fn rejoin_right<K: Clone, V: Clone>(
    color: Color,
    left: Link<K, V>,
    key: K,
    value: V,
    (right, decreased): Shrunk<K, V>,
) -> Shrunk<K, V> {
    if decreased {
        unbalance_right(color, left, key, value, right)
    } else {
        (Node::link(color, left, key, value, right), false)
    }
}

/// Removes a node with one empty side; `survivor` is its other subtree.
fn splice_out<K: Clone, V: Clone>(node: &Node<K, V>, survivor: Link<K, V>) -> Shrunk<K, V> {
    if node.is_red() {
        // A red node with an empty side is a leaf: removing it keeps the
        // black height.
        (survivor, false)
    } else {
        blackify(survivor)
    }
}

/// Removes the minimum entry of a non-empty subtree.
///
/// Returns the residual subtree, the removed key and value, and whether the
/// black height decreased.
fn erase_min<K: Clone, V: Clone>(
    node: &ReferenceCounter<Node<K, V>>,
) -> (Link<K, V>, K, V, bool) {
    match &node.left {
        None => {
            let (rest, decreased) = splice_out(node, node.right.clone());
            (rest, node.key.clone(), node.value.clone(), decreased)
        }
        Some(left) => {
            let (rest, min_key, min_value, decreased) = erase_min(left);
            let (rebuilt, decreased) = rejoin_left(
                node.color,
                (rest, decreased),
                node.key.clone(),
                node.value.clone(),
                node.right.clone(),
            );
            (rebuilt, min_key, min_value, decreased)
        }
    }
}

impl<K: Clone + Ord, V: Clone> RedBlackDict<K, V> {
    /// Removes a key from the dictionary.
    ///
    /// Returns a new dictionary without the key. If the key doesn't exist,
    /// returns a clone sharing the original tree.
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
    /// let dict = RedBlackDict::new()
    ///     .store(1, "one")
    ///     .store(2, "two");
    /// let erased = dict.erase(&1);
    ///
    /// assert_eq!(dict.size(), 2);   // Original unchanged
    /// assert_eq!(erased.size(), 1); // New version
    /// assert_eq!(erased.find(&1), None);
    /// ```
    #[must_use]
    pub fn erase<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some((root, decreased)) = Self::erase_from_node(&self.root, key) else {
            return self.clone();
        };
        if decreased {
            trace!("erase reduced the black height of the tree");
        }
        Self::from_root(force_black(root))
    }

    /// Removes a key and returns its value with the new dictionary, or
    /// `None` if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::RedBlackDict;
    ///
    /// let dict = RedBlackDict::new().store(1, "one").store(2, "two");
    /// let (value, rest) = dict.take(&1).unwrap();
    /// assert_eq!(value, "one");
    /// assert_eq!(rest.fetch_keys(), vec![2]);
    /// assert!(dict.take(&3).is_none());
    /// ```
    #[must_use]
    pub fn take<Q>(&self, key: &Q) -> Option<(V, Self)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let value = self.find(key)?.clone();
        Some((value, self.erase(key)))
    }

    /// Recursive helper for erase. Returns `None` when the key is absent, so
    /// a miss copies no nodes.
    fn erase_from_node<Q>(link: &Link<K, V>, key: &Q) -> Option<Shrunk<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = link.as_ref()?;
        Some(match key.cmp(node.key.borrow()) {
            Ordering::Less => rejoin_left(
                node.color,
                Self::erase_from_node(&node.left, key)?,
                node.key.clone(),
                node.value.clone(),
                node.right.clone(),
            ),
            Ordering::Greater => rejoin_right(
                node.color,
                node.left.clone(),
                node.key.clone(),
                node.value.clone(),
                Self::erase_from_node(&node.right, key)?,
            ),
            Ordering::Equal => match &node.right {
                None => splice_out(node, node.left.clone()),
                Some(right) => {
                    let (rest, successor_key, successor_value, decreased) = erase_min(right);
                    rejoin_right(
                        node.color,
                        node.left.clone(),
                        successor_key,
                        successor_value,
                        (rest, decreased),
                    )
                }
            },
        })
    }
}
