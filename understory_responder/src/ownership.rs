// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exclusive gesture ownership, one owner per interaction scope.
//!
//! Responders that need an exclusive gesture (a drag competing with a scroll
//! container, a swipe competing with a press) claim the scope of their target.
//! Claims are plain `bool` results; a refused claim is not an error.
//!
//! ```
//! use understory_responder::ownership::OwnershipTable;
//!
//! let mut table: OwnershipTable<&str, u32> = OwnershipTable::new();
//! assert!(table.request("doc", 1));
//! assert!(table.request("doc", 1)); // idempotent for the owner
//! assert!(!table.request("doc", 2));
//! assert!(!table.release("doc", 2));
//! assert!(table.release("doc", 1));
//! assert!(table.request("doc", 2));
//! ```

use core::hash::Hash;

use hashbrown::HashMap;

/// Map from interaction scope to the node holding exclusive ownership of it.
///
/// Nodes are compared by identity; hosts that double-buffer their trees should
/// pass canonical node keys so both copies of an instance are one owner.
#[derive(Clone, Debug)]
pub struct OwnershipTable<S, K> {
    owners: HashMap<S, K>,
}

impl<S, K> Default for OwnershipTable<S, K> {
    fn default() -> Self {
        Self {
            owners: HashMap::new(),
        }
    }
}

impl<S: Copy + Eq + Hash, K: Copy + Eq> OwnershipTable<S, K> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `scope` for `node`.
    ///
    /// Returns `false` without side effects if another node owns the scope.
    pub fn request(&mut self, scope: S, node: K) -> bool {
        match self.owners.get(&scope) {
            Some(owner) if *owner != node => false,
            Some(_) => true,
            None => {
                self.owners.insert(scope, node);
                true
            }
        }
    }

    /// Release `scope` if `node` owns it.
    pub fn release(&mut self, scope: S, node: K) -> bool {
        if self.owners.get(&scope) == Some(&node) {
            self.owners.remove(&scope);
            true
        } else {
            false
        }
    }

    /// The current owner of `scope`.
    pub fn owner(&self, scope: S) -> Option<K> {
        self.owners.get(&scope).copied()
    }

    /// Returns `true` if any node owns `scope`.
    pub fn is_owned(&self, scope: S) -> bool {
        self.owners.contains_key(&scope)
    }

    /// Drop every claim held by `node`, returning `true` if any existed.
    pub fn release_all(&mut self, node: K) -> bool {
        let before = self.owners.len();
        self.owners.retain(|_, owner| *owner != node);
        before != self.owners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scopes_are_independent() {
        let mut t: OwnershipTable<u8, u32> = OwnershipTable::new();
        assert!(t.request(0, 1));
        assert!(t.request(1, 2));
        assert_eq!(t.owner(0), Some(1));
        assert_eq!(t.owner(1), Some(2));
        assert!(!t.is_owned(2));
    }

    #[test]
    fn release_by_non_owner_is_refused() {
        let mut t: OwnershipTable<u8, u32> = OwnershipTable::new();
        assert!(!t.release(0, 1));
        assert!(t.request(0, 1));
        assert!(!t.release(0, 2));
        assert_eq!(t.owner(0), Some(1));
    }

    #[test]
    fn release_all_clears_every_scope_of_node() {
        let mut t: OwnershipTable<u8, u32> = OwnershipTable::new();
        t.request(0, 1);
        t.request(1, 1);
        t.request(2, 3);
        assert!(t.release_all(1));
        assert!(!t.release_all(1));
        assert!(!t.is_owned(0));
        assert!(!t.is_owned(1));
        assert_eq!(t.owner(2), Some(3));
    }

    #[derive(Copy, Clone, Debug)]
    enum Op {
        Request(u32),
        Release(u32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0_u32..4).prop_map(Op::Request),
            (0_u32..4).prop_map(Op::Release),
        ]
    }

    proptest! {
        #[test]
        fn at_most_one_owner_and_claims_are_exclusive(ops in proptest::collection::vec(op(), 0..64)) {
            let mut t: OwnershipTable<u8, u32> = OwnershipTable::new();
            let mut model: Option<u32> = None;
            for op in ops {
                match op {
                    Op::Request(n) => {
                        let ok = t.request(0, n);
                        let expected = model.is_none_or(|o| o == n);
                        prop_assert_eq!(ok, expected);
                        if ok {
                            model = Some(n);
                        }
                    }
                    Op::Release(n) => {
                        let ok = t.release(0, n);
                        prop_assert_eq!(ok, model == Some(n));
                        if ok {
                            model = None;
                        }
                    }
                }
                prop_assert_eq!(t.owner(0), model);
            }
        }
    }
}
