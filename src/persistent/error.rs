//! Error types for the persistent structures.
//!
//! Lookups of absent keys (`find`, `is_key`, `erase`) are ordinary outcomes
//! and never produce an error. Errors are reserved for partial operations
//! whose contract requires the key to be present, for invalid sparse-array
//! indices, and for structural checks.

use std::fmt;

/// The red-black invariant a tree failed to satisfy.
///
/// Returned inside [`DictError::InvariantViolation`] by
/// [`RedBlackDict::verify`](super::RedBlackDict::verify).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The root node is red.
    RedRoot,
    /// A red node has a red child.
    RedRed,
    /// The two subtrees of a node have different black heights.
    BlackHeight {
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// A key is not strictly between the keys of its ancestors.
    Order,
}

impl fmt::Display for Violation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => write!(formatter, "root is red"),
            Self::RedRed => write!(formatter, "red node has a red child"),
            Self::BlackHeight { left, right } => write!(
                formatter,
                "black height mismatch (left {left}, right {right})"
            ),
            Self::Order => write!(formatter, "key out of search order"),
        }
    }
}

/// Errors reported by [`RedBlackDict`](super::RedBlackDict).
///
/// # Examples
///
/// ```rust
/// use rbdict::persistent::{DictError, RedBlackDict};
///
/// let dict: RedBlackDict<i32, i32> = RedBlackDict::new();
/// assert_eq!(dict.fetch(&1), Err(DictError::KeyNotFound));
/// assert_eq!(format!("{}", DictError::KeyNotFound), "key not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictError {
    /// A partial operation (`fetch`, `update_val`, `update`,
    /// `update_counter`) was applied to a key that is not in the dictionary.
    KeyNotFound,
    /// The tree does not satisfy the red-black invariants.
    InvariantViolation {
        /// Which invariant failed.
        violation: Violation,
        /// `Debug` rendering of the key at the root of the offending subtree.
        subtree: String,
    },
}

impl fmt::Display for DictError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound => write!(formatter, "key not found"),
            Self::InvariantViolation { violation, subtree } => write!(
                formatter,
                "red-black invariant violated at subtree {subtree}: {violation}"
            ),
        }
    }
}

impl std::error::Error for DictError {}

/// Errors reported by [`SparseArray`](super::SparseArray).
///
/// # Examples
///
/// ```rust
/// use rbdict::persistent::{SparseArray, SparseArrayError};
///
/// let result = SparseArray::new().set(-3, "x");
/// assert_eq!(result.err(), Some(SparseArrayError::InvalidArgument { index: -3 }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparseArrayError {
    /// The index was negative.
    InvalidArgument {
        /// The rejected index.
        index: i64,
    },
    /// The index is non-negative but does not fit in `usize` on this target.
    IndexOutOfRange {
        /// The rejected index.
        index: i64,
    },
}

impl fmt::Display for SparseArrayError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { index } => {
                write!(formatter, "invalid argument: index {index} is negative")
            }
            Self::IndexOutOfRange { index } => {
                write!(formatter, "index {index} exceeds the addressable range")
            }
        }
    }
}

impl std::error::Error for SparseArrayError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_key_not_found_display() {
        assert_eq!(format!("{}", DictError::KeyNotFound), "key not found");
    }

    #[rstest]
    #[case(Violation::RedRoot, "red-black invariant violated at subtree 7: root is red")]
    #[case(
        Violation::RedRed,
        "red-black invariant violated at subtree 7: red node has a red child"
    )]
    #[case(
        Violation::BlackHeight { left: 2, right: 1 },
        "red-black invariant violated at subtree 7: black height mismatch (left 2, right 1)"
    )]
    #[case(
        Violation::Order,
        "red-black invariant violated at subtree 7: key out of search order"
    )]
    fn test_invariant_violation_display(#[case] violation: Violation, #[case] expected: &str) {
        let error = DictError::InvariantViolation {
            violation,
            subtree: "7".to_string(),
        };
        assert_eq!(format!("{error}"), expected);
    }

    #[rstest]
    fn test_invalid_argument_display() {
        let error = SparseArrayError::InvalidArgument { index: -5 };
        assert_eq!(
            format!("{error}"),
            "invalid argument: index -5 is negative"
        );
    }

    #[rstest]
    fn test_index_out_of_range_display() {
        let error = SparseArrayError::IndexOutOfRange { index: 1 << 40 };
        assert_eq!(
            format!("{error}"),
            "index 1099511627776 exceeds the addressable range"
        );
    }

    #[rstest]
    fn test_errors_are_std_errors() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&DictError::KeyNotFound);
        assert_error(&SparseArrayError::InvalidArgument { index: -1 });
    }
}
