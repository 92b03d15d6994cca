mod error;

pub mod collections;
pub mod prelude;
pub mod query;
pub mod testing;
pub mod values;

#[doc(hidden)]
/// This is a hidden module to make the macros defined on this crate available for the users.
pub mod __dependencies {
    pub use itertools;
    pub use paste;
    pub use proptest;
    pub use test_strategy;
    pub use thiserror::Error;
}

/// Generates the property suite every [`KAvlTree`](crate::collections::KAvlTree) must pass
/// for a given `k`.
#[macro_export]
macro_rules! test_kavl_properties {
    ($k:literal) => {
        $crate::__dependencies::paste::paste! {
            mod [<test_kavl_k_ $k>] {
                use $crate::__dependencies::{
                    itertools::Itertools,
                    proptest::prelude::*,
                    test_strategy,
                };
                use $crate::{prelude::*, testing::*};

                const K: u32 = $k;

                #[cfg_attr(coverage_nightly, coverage(off))]
                #[test_strategy::proptest(fork = false)]
                fn test_invariants_hold_after_any_operations(
                    #[strategy(operations(0..128))] operations: Vec<Operation>,
                ) {
                    let mut tree = KAvlTree::with_k(K);

                    for operation in operations {
                        operation.apply(&mut tree);
                        prop_assert_eq!(tree.validate(), Ok(()), "after {:?}", operation);
                    }
                }

                #[cfg_attr(coverage_nightly, coverage(off))]
                #[test_strategy::proptest(fork = false)]
                fn test_in_order_is_sorted(#[strategy(trees(K, 0..128))] tree: KAvlTree) {
                    prop_assert!(tree.in_order().tuple_windows().all(|(a, b)| a < b));
                }

                #[cfg_attr(coverage_nightly, coverage(off))]
                #[test_strategy::proptest(fork = false)]
                fn test_insert_is_idempotent(
                    #[strategy(trees(K, 0..64))] mut tree: KAvlTree,
                    #[strategy(small_keys())] key: Key,
                ) {
                    let _ = tree.insert(key);

                    $crate::prop_assert_does_not_change!(tree.insert(key), tree);
                    prop_assert_eq!(tree.insert(key), Insertion::AlreadyPresent);
                }

                #[cfg_attr(coverage_nightly, coverage(off))]
                #[test_strategy::proptest(fork = false)]
                fn test_insert_then_delete_restores_contents(
                    #[strategy(trees(K, 0..64))] mut tree: KAvlTree,
                    #[strategy(small_keys())] key: Key,
                ) {
                    prop_assume!(!tree.contains(&key));
                    let before = tree.in_order().copied().collect_vec();

                    prop_assert_eq!(tree.insert(key), Insertion::Inserted);
                    prop_assert_eq!(tree.delete(&key), Removal::Deleted);

                    prop_assert_eq!(tree.in_order().copied().collect_vec(), before);
                    prop_assert_eq!(tree.validate(), Ok(()));
                }

                #[cfg_attr(coverage_nightly, coverage(off))]
                #[test_strategy::proptest(fork = false)]
                fn test_size_matches_successful_operations(
                    #[strategy(operations(0..128))] operations: Vec<Operation>,
                ) {
                    let mut tree = KAvlTree::with_k(K);
                    let mut expected = 0usize;

                    for operation in operations {
                        match (operation, operation.apply(&mut tree)) {
                            (Operation::Insert(_), true) => expected += 1,
                            (Operation::Delete(_), true) => expected -= 1,
                            (_, false) => {}
                        }
                    }

                    prop_assert_eq!(tree.in_order().count(), expected);
                    prop_assert_eq!(tree.len(), expected);
                }

                #[cfg_attr(coverage_nightly, coverage(off))]
                #[test_strategy::proptest(fork = false)]
                fn test_insertion_order_does_not_change_contents(
                    #[strategy(shuffled_keys(0..64))] keys: (Vec<Key>, Vec<Key>),
                ) {
                    let (keys, shuffled) = keys;

                    let mut tree = KAvlTree::with_k(K);
                    for key in shuffled {
                        prop_assert_eq!(tree.insert(key), Insertion::Inserted);
                    }

                    prop_assert_eq!(tree.in_order().copied().collect_vec(), keys);
                    prop_assert_eq!(tree.validate(), Ok(()));
                }

                #[cfg_attr(coverage_nightly, coverage(off))]
                #[test_strategy::proptest(fork = false)]
                fn test_deleting_everything_empties_the_tree(
                    #[strategy(trees(K, 0..64))] mut tree: KAvlTree,
                ) {
                    let keys = tree.pre_order().copied().collect_vec();

                    for key in keys {
                        prop_assert_eq!(tree.delete(&key), Removal::Deleted);
                        prop_assert_eq!(tree.validate(), Ok(()));
                    }

                    prop_assert!(tree.is_empty());
                    prop_assert_eq!(tree.height(), -1);
                }
            }
        }
    };
}

#[macro_export]
macro_rules! prop_assert_changes {
    ($action: expr, $value: expr) => {
        let old_value = $value.clone();

        prop_assert_eq!(&$value, &old_value);

        let _ = $action;

        prop_assert_ne!(&$value, &old_value);
    };
}

#[macro_export]
macro_rules! prop_assert_does_not_change {
    ($action: expr, $value: expr) => {
        let old_value = $value.clone();

        let _ = $action;

        prop_assert_eq!(&$value, &old_value);
    };
}
