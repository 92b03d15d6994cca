use itertools::Itertools;
use proptest::{
    collection::{hash_set, vec},
    prelude::*,
    sample::SizeRange,
    strategy::ValueTree,
    test_runner::{Config as TestConfig, TestRunner},
};

use crate::prelude::*;

/// A single mutation applied to a tree under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert(Key),
    Delete(Key),
}

impl Operation {
    /// Applies the operation, returning whether it changed the tree.
    pub fn apply(&self, tree: &mut KAvlTree) -> bool {
        match self {
            Operation::Insert(key) => tree.insert(*key) == Insertion::Inserted,
            Operation::Delete(key) => tree.delete(key) == Removal::Deleted,
        }
    }
}

impl Arbitrary for Operation {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            3 => small_keys().prop_map(Operation::Insert),
            2 => small_keys().prop_map(Operation::Delete),
        ]
        .boxed()
    }
}

/// Keys drawn from a narrow range, so that repeated inserts and hits on delete are common.
pub fn small_keys() -> impl Strategy<Value = Key> {
    (0i64..24, 0i64..3).prop_map(|(whole, fraction)| Key::new(whole, fraction))
}

/// Generates a sorted collection of distinct keys.
pub fn distinct_keys(size: impl Into<SizeRange>) -> impl Strategy<Value = Vec<Key>> {
    hash_set(any::<Key>(), size).prop_map(|keys| keys.into_iter().sorted().collect_vec())
}

pub fn operations(size: impl Into<SizeRange>) -> impl Strategy<Value = Vec<Operation>> {
    vec(any::<Operation>(), size)
}

/// A tree with tolerance parameter `k`, built from a random sequence of operations.
pub fn trees(k: u32, size: impl Into<SizeRange>) -> impl Strategy<Value = KAvlTree> {
    operations(size).prop_map(move |operations| {
        operations
            .into_iter()
            .fold(KAvlTree::with_k(k), |mut tree, operation| {
                operation.apply(&mut tree);
                tree
            })
    })
}

/// Keys spanning the whole `i64` range in both fields, including negatives and the bounds.
pub fn wide_keys() -> impl Strategy<Value = Key> {
    prop_oneof![
        (any::<i64>(), any::<i64>()),
        (
            prop_oneof![Just(i64::MIN), Just(i64::MAX), Just(0), -3i64..3],
            prop_oneof![Just(i64::MIN), Just(i64::MAX), Just(0), -3i64..3],
        ),
    ]
    .prop_map(Key::from)
}

/// Sorted distinct keys paired with the same keys in a random order.
pub fn shuffled_keys(size: impl Into<SizeRange>) -> impl Strategy<Value = (Vec<Key>, Vec<Key>)> {
    distinct_keys(size).prop_flat_map(|keys| (Just(keys.clone()), Just(keys).prop_shuffle()))
}

pub fn unwrap_strategy<T: Clone>(strategy: impl Strategy<Value = T>) -> T {
    let mut test_runner = TestRunner::new(TestConfig::default());

    strategy
        .new_tree(&mut test_runner)
        .expect("Failed to get new value from strategy")
        .current()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trees_strategy_builds_valid_trees() {
        for k in 0..4 {
            let tree = unwrap_strategy(trees(k, 0..64));

            assert_eq!(tree.k(), k);
            assert_eq!(tree.validate(), Ok(()));
        }
    }

    #[test]
    fn test_distinct_keys_are_sorted_and_unique() {
        let keys = unwrap_strategy(distinct_keys(0..32));

        assert!(keys.iter().tuple_windows().all(|(a, b)| a < b));
    }

    #[test]
    fn test_shuffled_keys_are_a_permutation() {
        let (keys, shuffled) = unwrap_strategy(shuffled_keys(0..32));

        assert_eq!(shuffled.into_iter().sorted().collect_vec(), keys);
    }

    #[test]
    fn test_operation_reports_whether_it_changed_the_tree() {
        let mut tree = KAvlTree::default();
        let key = Key::new(1, 0);

        assert!(Operation::Insert(key).apply(&mut tree));
        assert!(!Operation::Insert(key).apply(&mut tree));
        assert!(Operation::Delete(key).apply(&mut tree));
        assert!(!Operation::Delete(key).apply(&mut tree));
    }
}
