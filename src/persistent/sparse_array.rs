//! Persistent sparse array indexed by non-negative integers.
//!
//! This module provides [`SparseArray`], a radix trie with a fixed fanout of
//! 16 per interior level over 16-slot leaf buckets. Only the buckets that
//! hold a value are allocated, so far-apart indices stay cheap.
//!
//! # Examples
//!
//! ```rust
//! use rbdict::persistent::SparseArray;
//!
//! let array = SparseArray::new().set(3, "three").unwrap();
//! let grown = array.set(4096, "far").unwrap();
//!
//! assert_eq!(grown.get(3), Some(&"three"));
//! assert_eq!(grown.get(4096), Some(&"far"));
//! assert_eq!(array.get(4096), None); // Original unchanged
//! ```

use std::fmt;

use tracing::trace;

use super::ReferenceCounter;
use super::error::SparseArrayError;

// =============================================================================
// Constants
// =============================================================================

/// Children per branch and slots per leaf (2^4 = 16)
const FANOUT: usize = 16;

/// Bits per level in the trie
const BITS_PER_LEVEL: u32 = 4;

/// Bit mask for extracting the slot within a node
const MASK: usize = FANOUT - 1;

// =============================================================================
// Node Definition
// =============================================================================

enum Node<T> {
    Branch([Option<ReferenceCounter<Self>>; FANOUT]),
    Leaf([Option<T>; FANOUT]),
}

impl<T> Node<T> {
    /// Returns `(occupied, allocated)` leaf slot counts below this node.
    fn tally(&self) -> (usize, usize) {
        match self {
            Self::Leaf(slots) => (slots.iter().flatten().count(), FANOUT),
            Self::Branch(children) => children
                .iter()
                .flatten()
                .map(|child| child.tally())
                .fold((0, 0), |(occupied, allocated), (more, room)| {
                    (occupied + more, allocated + room)
                }),
        }
    }
}

// =============================================================================
// SparseArray Definition
// =============================================================================

/// A persistent array over the non-negative `i64` indices.
///
/// Unset indices read as `None`. Each `set` copies only the path from the
/// root to one leaf; everything else is shared with the previous version.
///
/// # Time Complexity
///
/// | Operation  | Complexity     |
/// |------------|----------------|
/// | `new`      | O(1)           |
/// | `get`      | O(log16 index) |
/// | `set`      | O(log16 index) |
/// | `fullness` | O(allocated)   |
pub struct SparseArray<T> {
    root: Option<ReferenceCounter<Node<T>>>,
    /// Bit offset of the root's slot selector; zero when the root is a leaf.
    shift: u32,
}

impl<T> SparseArray<T> {
    /// Creates an empty array.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            shift: 0,
        }
    }

    /// Returns `true` if `index` lies beyond what a root at `shift` covers.
    fn exceeds(index: usize, shift: u32) -> bool {
        index
            .checked_shr(shift + BITS_PER_LEVEL)
            .is_some_and(|rest| rest != 0)
    }

    /// Returns the value at `index`, or `None` if it was never set.
    ///
    /// Negative indices are never set, so they also read as `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::SparseArray;
    ///
    /// let array = SparseArray::new().set(17, 1.5).unwrap();
    /// assert_eq!(array.get(17), Some(&1.5));
    /// assert_eq!(array.get(16), None);
    /// assert_eq!(array.get(-17), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: i64) -> Option<&T> {
        let index = usize::try_from(index).ok()?;
        if Self::exceeds(index, self.shift) {
            return None;
        }
        let mut node = self.root.as_deref()?;
        let mut shift = self.shift;
        loop {
            let slot = (index >> shift) & MASK;
            match node {
                Node::Branch(children) if shift > 0 => {
                    node = children[slot].as_deref()?;
                    shift -= BITS_PER_LEVEL;
                }
                Node::Leaf(slots) if shift == 0 => return slots[slot].as_ref(),
                _ => return None,
            }
        }
    }

    /// Returns the share of allocated leaf slots that hold a value.
    ///
    /// The result is in `[0, 1]`, and `0.0` when nothing is allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::SparseArray;
    ///
    /// let array = SparseArray::new().set(0, 'a').unwrap().set(1, 'b').unwrap();
    /// assert!((array.fullness() - 2.0 / 16.0).abs() < f64::EPSILON);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fullness(&self) -> f64 {
        match self.root.as_deref().map(Node::tally) {
            Some((occupied, allocated)) if allocated > 0 => occupied as f64 / allocated as f64,
            _ => 0.0,
        }
    }
}

impl<T: Clone> SparseArray<T> {
    /// Returns a new array with `value` stored at `index`.
    ///
    /// The trie grows by new root levels as needed; the previous root becomes
    /// the first child of each new level.
    ///
    /// # Errors
    ///
    /// Returns [`SparseArrayError::InvalidArgument`] if `index` is negative,
    /// and [`SparseArrayError::IndexOutOfRange`] if it does not fit in
    /// `usize` (only possible on targets narrower than 64 bits).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::{SparseArray, SparseArrayError};
    ///
    /// let array = SparseArray::new().set(5, "five").unwrap();
    /// assert_eq!(array.get(5), Some(&"five"));
    /// assert_eq!(
    ///     array.set(-5, "oops").err(),
    ///     Some(SparseArrayError::InvalidArgument { index: -5 })
    /// );
    /// ```
    pub fn set(&self, index: i64, value: T) -> Result<Self, SparseArrayError> {
        if index < 0 {
            return Err(SparseArrayError::InvalidArgument { index });
        }
        let position =
            usize::try_from(index).map_err(|_| SparseArrayError::IndexOutOfRange { index })?;

        let mut root = self.root.clone();
        let mut shift = self.shift;
        while Self::exceeds(position, shift) {
            if let Some(old_root) = root {
                let mut children: [Option<ReferenceCounter<Node<T>>>; FANOUT] =
                    std::array::from_fn(|_| None);
                children[0] = Some(old_root);
                root = Some(ReferenceCounter::new(Node::Branch(children)));
            }
            shift += BITS_PER_LEVEL;
        }
        if shift != self.shift {
            trace!(index, from = self.shift, to = shift, "sparse array grew");
        }

        let new_root = Self::set_in(root.as_deref(), shift, position, value);
        Ok(Self {
            root: Some(ReferenceCounter::new(new_root)),
            shift,
        })
    }

    fn set_in(node: Option<&Node<T>>, shift: u32, index: usize, value: T) -> Node<T> {
        let slot = (index >> shift) & MASK;
        if shift == 0 {
            let mut slots = match node {
                Some(Node::Leaf(slots)) => slots.clone(),
                _ => std::array::from_fn(|_| None),
            };
            slots[slot] = Some(value);
            Node::Leaf(slots)
        } else {
            let mut children = match node {
                Some(Node::Branch(children)) => children.clone(),
                _ => std::array::from_fn(|_| None),
            };
            let child = Self::set_in(
                children[slot].as_deref(),
                shift - BITS_PER_LEVEL,
                index,
                value,
            );
            children[slot] = Some(ReferenceCounter::new(child));
            Node::Branch(children)
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for SparseArray<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            shift: self.shift,
        }
    }
}

impl<T> Default for SparseArray<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SparseArray<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SparseArray")
            .field("levels", &(self.shift / BITS_PER_LEVEL + 1))
            .field("fullness", &self.fullness())
            .finish()
    }
}
