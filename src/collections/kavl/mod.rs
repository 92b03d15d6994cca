mod balance;
mod iter;
mod node;

use std::{cmp::Ordering, collections::VecDeque};

use itertools::Itertools;
use proptest::{collection::vec, prelude::*};
use tracing::debug;

use crate::prelude::*;

use self::{
    balance::restore,
    node::{max_key, Subtree},
};

pub use {
    iter::{InOrder, PreOrder},
    node::Node,
};

/// Nodes kept by approximate search while descending.
const APPROX_WINDOW: usize = 2;

/// A binary search tree that tolerates a height difference of up to `k` between the two
/// subtrees of any node.
///
/// With `k = 1` this is a classical AVL tree. Larger values of `k` trade a taller tree for
/// fewer rotations.
///
/// `k = 0` is the one exception to "height difference at most `k`". Perfect balance is out of
/// reach for most sizes (two keys already differ by one), so a tree built with `k = 0` is
/// rebalanced with a tolerance of 1 and behaves exactly like `k = 1`. [`KAvlTree::k`] still
/// reports 0; [`KAvlTree::tolerance`] reports the bound actually enforced.
///
/// Every mutation descends recursively, and each level hands the possibly new root of its
/// subtree back to the caller, which re-attaches it. Heights are refreshed and rotations
/// applied on the way back up, so the following holds whenever a public method returns:
///
/// * in-order traversal yields strictly increasing keys;
/// * no node has children whose heights differ by more than [`KAvlTree::tolerance`];
/// * every stored height matches the height derived from the children.
///
/// Use [`KAvlTree::validate`] to check all of this on a live tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KAvlTree {
    root: Subtree,
    k: u32,
    len: usize,
}

/// Result of [`KAvlTree::insert`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted,
    AlreadyPresent,
}

/// Result of [`KAvlTree::delete`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Deleted,
    NotFound,
}

/// Result of [`KAvlTree::search`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search<'a> {
    Found(&'a Node),
    NotFound,
}

impl Search<'_> {
    pub fn is_found(&self) -> bool {
        matches!(self, Search::Found(_))
    }
}

impl Default for KAvlTree {
    fn default() -> Self {
        Self::with_k(1)
    }
}

impl KAvlTree {
    /// Creates an empty tree, rejecting a negative `k` or one that does not fit in 32 bits.
    pub fn new(k: i64) -> Result<Self> {
        let k = u32::try_from(k).map_err(|_| Error::InvalidConfiguration { k })?;
        Ok(Self::with_k(k))
    }

    pub fn with_k(k: u32) -> Self {
        Self {
            root: None,
            k,
            len: 0,
        }
    }

    /// The configured `k`, which may be 0. See [`KAvlTree::tolerance`] for the enforced bound.
    pub fn k(&self) -> u32 {
        self.k
    }

    /// The height difference actually allowed between siblings: `k`, but never less than 1,
    /// so `k = 0` allows siblings one level apart.
    pub fn tolerance(&self) -> u32 {
        self.k.max(1)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the root, or `-1` for an empty tree.
    pub fn height(&self) -> i32 {
        node::height(&self.root)
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Inserts `key` unless an equal key is already present, in which case nothing changes.
    pub fn insert(&mut self, key: Key) -> Insertion {
        let (root, outcome) = Self::insert_into(self.root.take(), key, self.tolerance());
        self.root = Some(root);

        if outcome == Insertion::Inserted {
            self.len += 1;
        }

        debug!(%key, ?outcome, height = self.height(), "insert");
        outcome
    }

    fn insert_into(subtree: Subtree, key: Key, tolerance: u32) -> (Box<Node>, Insertion) {
        let Some(mut node) = subtree else {
            return (Node::leaf(key), Insertion::Inserted);
        };

        match key.cmp(&node.key) {
            Ordering::Equal => (node, Insertion::AlreadyPresent),
            Ordering::Less => {
                let (left, outcome) = Self::insert_into(node.left.take(), key, tolerance);
                node.left = Some(left);
                Self::settle(node, outcome, tolerance)
            }
            Ordering::Greater => {
                let (right, outcome) = Self::insert_into(node.right.take(), key, tolerance);
                node.right = Some(right);
                Self::settle(node, outcome, tolerance)
            }
        }
    }

    fn settle(node: Box<Node>, outcome: Insertion, tolerance: u32) -> (Box<Node>, Insertion) {
        match outcome {
            Insertion::Inserted => (restore(node, tolerance), outcome),
            Insertion::AlreadyPresent => (node, outcome),
        }
    }

    /// Removes `key` if present.
    ///
    /// A node with two children takes over the key of its in-order predecessor, and the
    /// predecessor is removed from the left subtree instead.
    pub fn delete(&mut self, key: &Key) -> Removal {
        let (root, outcome) = Self::remove_from(self.root.take(), key, self.tolerance());
        self.root = root;

        if outcome == Removal::Deleted {
            self.len -= 1;
        }

        debug!(%key, ?outcome, height = self.height(), "delete");
        outcome
    }

    fn remove_from(subtree: Subtree, key: &Key, tolerance: u32) -> (Subtree, Removal) {
        let Some(mut node) = subtree else {
            return (None, Removal::NotFound);
        };

        let outcome = match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, outcome) = Self::remove_from(node.left.take(), key, tolerance);
                node.left = left;
                outcome
            }
            Ordering::Greater => {
                let (right, outcome) = Self::remove_from(node.right.take(), key, tolerance);
                node.right = right;
                outcome
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, None) => return (None, Removal::Deleted),
                (Some(child), None) | (None, Some(child)) => {
                    return (Some(child), Removal::Deleted)
                }
                (Some(left), Some(right)) => {
                    let predecessor = max_key(&left);
                    node.key = predecessor;
                    node.right = Some(right);

                    let (left, outcome) = Self::remove_from(Some(left), &predecessor, tolerance);
                    node.left = left;
                    outcome
                }
            },
        };

        match outcome {
            Removal::Deleted => (Some(restore(node, tolerance)), outcome),
            Removal::NotFound => (Some(node), outcome),
        }
    }

    pub fn search(&self, key: &Key) -> Search<'_> {
        let mut current = self.root();

        while let Some(node) = current {
            current = match key.cmp(node.key()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Search::Found(node),
            };
        }

        Search::NotFound
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.search(key).is_found()
    }

    /// Returns `key` itself when present, otherwise the closer of the last two keys visited
    /// while searching for it. `None` only for an empty tree.
    ///
    /// Closeness is the componentwise [`Key::distance`]. Equally close candidates resolve to
    /// the smaller key.
    pub fn approx_search(&self, key: &Key) -> Option<Key> {
        let mut window = VecDeque::with_capacity(APPROX_WINDOW);
        let mut current = self.root();

        while let Some(node) = current {
            let next = match key.cmp(node.key()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(*node.key()),
            };

            if window.len() == APPROX_WINDOW {
                window.pop_front();
            }
            window.push_back(*node.key());

            current = next;
        }

        window
            .into_iter()
            .min_by_key(|candidate: &Key| (candidate.distance(key), *candidate))
    }

    pub fn in_order(&self) -> InOrder<'_> {
        InOrder::new(self.root())
    }

    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder::new(self.root())
    }

    /// Walks the whole tree and reports the first broken invariant, if any, as
    /// [`Error::Tree`].
    pub fn validate(&self) -> Result<()> {
        Ok(self.check_invariants()?)
    }

    fn check_invariants(&self) -> Result<(), TreeError> {
        if let Some((before, after)) = self
            .in_order()
            .tuple_windows()
            .find(|(before, after)| before >= after)
        {
            return Err(TreeError::Unordered {
                before: *before,
                after: *after,
            });
        }

        if let Some(root) = self.root() {
            Self::validate_node(root, self.tolerance())?;
        }

        let counted = self.in_order().count();
        if counted != self.len {
            return Err(TreeError::LengthMismatch {
                counted,
                tracked: self.len,
            });
        }

        Ok(())
    }

    fn validate_node(node: &Node, tolerance: u32) -> Result<(), TreeError> {
        for child in [node.left(), node.right()].into_iter().flatten() {
            Self::validate_node(child, tolerance)?;
        }

        if node.height() != node.computed_height() {
            return Err(TreeError::StaleHeight {
                key: *node.key(),
                stored: node.height(),
                computed: node.computed_height(),
            });
        }

        if node.is_imbalanced(tolerance) {
            return Err(TreeError::Imbalanced {
                key: *node.key(),
                left: node.left_height(),
                right: node.right_height(),
                tolerance,
            });
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a KAvlTree {
    type Item = &'a Key;
    type IntoIter = InOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.in_order()
    }
}

impl Arbitrary for KAvlTree {
    type Parameters = Option<u32>;
    type Strategy = BoxedStrategy<Self>;

    /// Builds a tree by inserting arbitrary keys one by one. `None` picks a small random `k`.
    fn arbitrary_with(k: Self::Parameters) -> Self::Strategy {
        let k = match k {
            Some(k) => Just(k).boxed(),
            None => (0u32..4).boxed(),
        };

        (k, vec(any::<Key>(), 0..64))
            .prop_map(|(k, keys)| {
                keys.into_iter().fold(Self::with_k(k), |mut tree, key| {
                    let _ = tree.insert(key);
                    tree
                })
            })
            .boxed()
    }
}
