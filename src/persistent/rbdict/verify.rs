//! Structural self-check.

use std::fmt::Debug;

use tracing::error;

use super::RedBlackDict;
use super::node::{Link, Node, is_red};
use crate::persistent::error::{DictError, Violation};

type Checked<'a, K, V> = Result<usize, (Violation, &'a Node<K, V>)>;

impl<K: Ord + Debug, V> RedBlackDict<K, V> {
    /// Checks every red-black and search-order invariant of the tree.
    ///
    /// Every public operation preserves the invariants, so this only fails
    /// for a bug in the dictionary itself. The check walks the whole tree and
    /// is never run implicitly.
    ///
    /// # Errors
    ///
    /// Returns [`DictError::InvariantViolation`] naming the first violated
    /// invariant and the key at the root of the subtree where it was found.
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
    /// let dict: RedBlackDict<i32, ()> = (0..100).map(|key| (key, ())).collect();
    /// assert!(dict.verify().is_ok());
    /// assert!(dict.erase(&50).verify().is_ok());
    /// ```
    pub fn verify(&self) -> Result<(), DictError> {
        let result = match &self.root {
            Some(root) if root.is_red() => Err((Violation::RedRoot, &**root)),
            root => Self::check(root, None, None).map(|_| ()),
        };
        result.map_err(|(violation, node)| {
            let subtree = format!("{:?}", node.key);
            error!(%violation, %subtree, "red-black invariant violated");
            DictError::InvariantViolation { violation, subtree }
        })
    }

    /// Returns the black height of `link`, counting the empty leaf as one.
    fn check<'a>(
        link: &'a Link<K, V>,
        lower: Option<&K>,
        upper: Option<&K>,
    ) -> Checked<'a, K, V> {
        let Some(node) = link.as_deref() else {
            return Ok(1);
        };
        let above_lower = lower.is_none_or(|bound| *bound < node.key);
        let below_upper = upper.is_none_or(|bound| node.key < *bound);
        if !(above_lower && below_upper) {
            return Err((Violation::Order, node));
        }
        if node.is_red() && (is_red(&node.left) || is_red(&node.right)) {
            return Err((Violation::RedRed, node));
        }
        let left = Self::check(&node.left, lower, Some(&node.key))?;
        let right = Self::check(&node.right, Some(&node.key), upper)?;
        if left != right {
            return Err((Violation::BlackHeight { left, right }, node));
        }
        Ok(left + usize::from(!node.is_red()))
    }
}
