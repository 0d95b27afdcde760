//! Whole-tree traversal and aggregate operators.

use super::RedBlackDict;
use super::node::{Link, Node};

impl<K, V> RedBlackDict<K, V> {
    /// Folds every entry into an accumulator, from the largest key to the
    /// smallest.
    ///
    /// The right subtree is folded first, then the node, then the left
    /// subtree, so a stateful `function` sees keys in descending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::RedBlackDict;
    ///
    /// let dict = RedBlackDict::new().store(1, 'a').store(2, 'b').store(3, 'c');
    ///
    /// // Prepending while folding from the right rebuilds ascending order
    /// let keys = dict.fold(Vec::new(), |key, _, mut keys| {
    ///     keys.insert(0, *key);
    ///     keys
    /// });
    /// assert_eq!(keys, vec![1, 2, 3]);
    /// ```
    pub fn fold<A, F>(&self, init: A, mut function: F) -> A
    where
        F: FnMut(&K, &V, A) -> A,
    {
        Self::fold_node(&self.root, init, &mut function)
    }

    fn fold_node<A, F>(link: &Link<K, V>, accumulator: A, function: &mut F) -> A
    where
        F: FnMut(&K, &V, A) -> A,
    {
        match link {
            None => accumulator,
            Some(node) => {
                let accumulator = Self::fold_node(&node.right, accumulator, function);
                let accumulator = function(&node.key, &node.value, accumulator);
                Self::fold_node(&node.left, accumulator, function)
            }
        }
    }

    /// Calls `function` on every entry in ascending key order.
    pub fn foreach<F>(&self, mut function: F)
    where
        F: FnMut(&K, &V),
    {
        Self::foreach_node(&self.root, &mut function);
    }

    fn foreach_node<F>(link: &Link<K, V>, function: &mut F)
    where
        F: FnMut(&K, &V),
    {
        if let Some(node) = link {
            Self::foreach_node(&node.left, function);
            function(&node.key, &node.value);
            Self::foreach_node(&node.right, function);
        }
    }

    /// Returns `true` if `predicate` holds for every entry.
    ///
    /// Entries are tested in ascending key order and the walk stops at the
    /// first failure. An empty dictionary satisfies any predicate.
    pub fn all<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&K, &V) -> bool,
    {
        Self::all_node(&self.root, &mut predicate)
    }

    fn all_node<F>(link: &Link<K, V>, predicate: &mut F) -> bool
    where
        F: FnMut(&K, &V) -> bool,
    {
        link.as_ref().is_none_or(|node| {
            Self::all_node(&node.left, predicate)
                && predicate(&node.key, &node.value)
                && Self::all_node(&node.right, predicate)
        })
    }

    /// Returns `true` if `predicate` holds for some entry.
    ///
    /// Entries are tested in ascending key order and the walk stops at the
    /// first success. An empty dictionary has no such entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::RedBlackDict;
    ///
    /// let dict = RedBlackDict::new().store(1, 10).store(2, 20);
    /// assert!(dict.any(|_, value| *value > 15));
    /// assert!(!dict.all(|_, value| *value > 15));
    /// ```
    pub fn any<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&K, &V) -> bool,
    {
        Self::any_node(&self.root, &mut predicate)
    }

    fn any_node<F>(link: &Link<K, V>, predicate: &mut F) -> bool
    where
        F: FnMut(&K, &V) -> bool,
    {
        link.as_ref().is_some_and(|node| {
            Self::any_node(&node.left, predicate)
                || predicate(&node.key, &node.value)
                || Self::any_node(&node.right, predicate)
        })
    }
}

impl<K: Clone, V> RedBlackDict<K, V> {
    /// Applies `function` to every entry, keeping keys and tree shape.
    ///
    /// The result has exactly the same colors and structure as `self`, so
    /// no rebalancing happens.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::RedBlackDict;
    ///
    /// let dict = RedBlackDict::new().store(1, 10).store(2, 20);
    /// let labelled = dict.map(|key, value| format!("{key}:{value}"));
    /// assert_eq!(labelled.find(&2), Some(&"2:20".to_string()));
    /// ```
    #[must_use]
    pub fn map<W, F>(&self, mut function: F) -> RedBlackDict<K, W>
    where
        F: FnMut(&K, &V) -> W,
    {
        RedBlackDict::from_root(Self::map_node(&self.root, &mut function))
    }

    fn map_node<W, F>(link: &Link<K, V>, function: &mut F) -> Link<K, W>
    where
        F: FnMut(&K, &V) -> W,
    {
        let node = link.as_ref()?;
        let left = Self::map_node(&node.left, function);
        let value = function(&node.key, &node.value);
        let right = Self::map_node(&node.right, function);
        Node::link(node.color, left, node.key.clone(), value, right)
    }
}

impl<K: Clone + Ord, V: Clone> RedBlackDict<K, V> {
    /// Builds a new dictionary holding the entries for which `predicate`
    /// holds.
    ///
    /// The result is built by storing the surviving entries one by one, so
    /// it is balanced on its own rather than a pruned copy of `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::RedBlackDict;
    ///
    /// let dict: RedBlackDict<i32, i32> = (1..=6).map(|key| (key, key * 10)).collect();
    /// let even = dict.filter(|key, _| key % 2 == 0);
    /// assert_eq!(even.fetch_keys(), vec![2, 4, 6]);
    /// ```
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut kept = Self::new();
        self.foreach(|key, value| {
            if predicate(key, value) {
                kept = kept.store(key.clone(), value.clone());
            }
        });
        kept
    }

    /// Merges `other` into `self`.
    ///
    /// Folds over `other` starting from `self`: a key present in both is
    /// combined with `resolve(key, self_value, other_value)`, a key only in
    /// `other` is inserted as is, and keys only in `self` are kept.
    ///
    /// # Complexity
    ///
    /// O(m log(n + m)) where n is the size of self and m is the size of other
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rbdict::persistent::RedBlackDict;
    ///
    /// let left = RedBlackDict::new()
    ///     .store(1, "x".to_string())
    ///     .store(2, "y".to_string());
    /// let right = RedBlackDict::new()
    ///     .store(2, "z".to_string())
    ///     .store(3, "w".to_string());
    ///
    /// let merged = left.merge(&right, |_, a, b| format!("{a}{b}"));
    /// assert_eq!(
    ///     merged.to_list(),
    ///     vec![(1, "x".to_string()), (2, "yz".to_string()), (3, "w".to_string())]
    /// );
    /// ```
    #[must_use]
    pub fn merge<F>(&self, other: &Self, mut resolve: F) -> Self
    where
        F: FnMut(&K, &V, &V) -> V,
    {
        other.fold(self.clone(), |key, value, merged| {
            merged.update_with_default(
                key.clone(),
                |existing| resolve(key, existing, value),
                value.clone(),
            )
        })
    }
}
