//! # rbdict
//!
//! A persistent (immutable, structure-sharing) ordered dictionary built on a
//! red-black tree.
//!
//! ## Overview
//!
//! - **`RedBlackDict`**: ordered key-value map with full insertion and
//!   deletion rebalancing, bulk operators (fold, map, filter, merge) and a
//!   suspendable traversal protocol (`iter` / `itera`).
//! - **`SparseArray`**: a small persistent radix array indexed by
//!   non-negative integers.
//!
//! Every mutation returns a new value. Earlier snapshots stay valid and share
//! every subtree the mutation did not touch.
//!
//! ## Feature Flags
//!
//! - `arc`: share nodes through `Arc` instead of `Rc`, making snapshots
//!   `Send + Sync`
//! - `serde`: `Serialize` / `Deserialize` for `RedBlackDict`
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use rbdict::prelude::*;
//!
//! let dict = RedBlackDict::new()
//!     .store(5, "a")
//!     .store(3, "b")
//!     .store(8, "c");
//!
//! let smaller = dict.erase(&3);
//! assert_eq!(dict.size(), 3);
//! assert_eq!(smaller.fetch_keys(), vec![5, 8]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use rbdict::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
}

pub mod persistent;
