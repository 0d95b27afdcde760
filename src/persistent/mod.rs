//! Persistent (immutable) data structures.
//!
//! - [`RedBlackDict`]: persistent ordered dictionary (red-black tree)
//! - [`SparseArray`]: persistent sparse array indexed by non-negative integers
//!
//! # Structural Sharing
//!
//! Both structures share every node an update does not touch, so a new
//! version costs only the path from the root to the changed entry.
//!
//! # Examples
//!
//! ## `RedBlackDict`
//!
//! ```rust
//! use rbdict::persistent::RedBlackDict;
//!
//! let dict = RedBlackDict::new()
//!     .store(3, "three")
//!     .store(1, "one")
//!     .store(2, "two");
//!
//! // Entries are always in sorted order
//! assert_eq!(dict.fetch_keys(), vec![1, 2, 3]);
//!
//! // Structural sharing: the original dict is preserved
//! let updated = dict.store(1, "ONE");
//! assert_eq!(dict.find(&1), Some(&"one"));
//! assert_eq!(updated.find(&1), Some(&"ONE"));
//! ```
//!
//! ## `SparseArray`
//!
//! ```rust
//! use rbdict::persistent::SparseArray;
//!
//! let array = SparseArray::new().set(1000, 'x').unwrap();
//! assert_eq!(array.get(1000), Some(&'x'));
//! assert_eq!(array.get(999), None);
//! assert!(array.set(-1, 'y').is_err());
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod error;
mod rbdict;
mod sparse_array;

pub use error::DictError;
pub use error::SparseArrayError;
pub use error::Violation;
pub use rbdict::Cursor;
pub use rbdict::Flow;
pub use rbdict::FlowWith;
pub use rbdict::RedBlackDict;
pub use rbdict::Resume;
pub use rbdict::ResumeWith;
pub use sparse_array::SparseArray;

// =============================================================================
// Tests
// =============================================================================
