//! Node representation shared by every layer of the dictionary.

use super::super::ReferenceCounter;

// =============================================================================
// Color Definition
// =============================================================================

/// The color of a Red-Black Tree node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(super) enum Color {
    Red,
    Black,
}

// =============================================================================
// Node Definition
// =============================================================================

/// A subtree: `None` is the empty leaf, `Some` a shared colored node.
pub(super) type Link<K, V> = Option<ReferenceCounter<Node<K, V>>>;

/// Internal node structure for the Red-Black Tree.
///
/// Nodes are never mutated once they are reachable from a dictionary; every
/// change builds new nodes along the affected path.
pub(super) struct Node<K, V> {
    pub(super) color: Color,
    pub(super) left: Link<K, V>,
    pub(super) key: K,
    pub(super) value: V,
    pub(super) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    /// Wraps the five node components into a shared link.
    pub(super) fn link(
        color: Color,
        left: Link<K, V>,
        key: K,
        value: V,
        right: Link<K, V>,
    ) -> Link<K, V> {
        Some(ReferenceCounter::new(Self {
            color,
            left,
            key,
            value,
            right,
        }))
    }

    /// Checks if this node is red.
    pub(super) fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

impl<K: Clone, V: Clone> Node<K, V> {
    /// Creates a copy of this node with a new color.
    pub(super) fn recolored(&self, color: Color) -> Link<K, V> {
        Self::link(
            color,
            self.left.clone(),
            self.key.clone(),
            self.value.clone(),
            self.right.clone(),
        )
    }

    /// Creates a copy of this node carrying a new value.
    pub(super) fn with_value(&self, value: V) -> Link<K, V> {
        Self::link(
            self.color,
            self.left.clone(),
            self.key.clone(),
            value,
            self.right.clone(),
        )
    }
}

/// Helper function to check if an optional node is red.
pub(super) fn is_red<K, V>(link: &Link<K, V>) -> bool {
    link.as_ref().is_some_and(|node| node.is_red())
}

/// Returns the subtree with a black root, sharing it when already black.
pub(super) fn force_black<K: Clone, V: Clone>(link: Link<K, V>) -> Link<K, V> {
    match link {
        Some(node) if node.is_red() => node.recolored(Color::Black),
        other => other,
    }
}

/// Blackens a subtree that replaces a removed black node.
///
/// Returns the new subtree and whether its black height is one less than
/// the removed node's: a red root absorbs the loss, anything else passes it
/// up to the parent.
pub(super) fn blackify<K: Clone, V: Clone>(link: Link<K, V>) -> (Link<K, V>, bool) {
    match link {
        Some(node) if node.is_red() => (node.recolored(Color::Black), false),
        other => (other, true),
    }
}
