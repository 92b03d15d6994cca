use crate::values::Key;

/// An exclusively owned child slot. `None` is an absent subtree of height `-1`.
pub(crate) type Subtree = Option<Box<Node>>;

/// A single vertex of a [`KAvlTree`](super::KAvlTree).
///
/// Nodes are only handed out by shared reference, so the tree shape can be inspected but
/// never rewired from the outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(super) key: Key,

    /// Longest downward path to a leaf; a leaf has height 0.
    pub(super) height: i32,

    pub(super) left: Subtree,
    pub(super) right: Subtree,
}

impl Node {
    pub(super) fn leaf(key: Key) -> Box<Self> {
        Box::new(Self {
            key,
            height: 0,
            left: None,
            right: None,
        })
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    pub fn left_height(&self) -> i32 {
        height(&self.left)
    }

    pub fn right_height(&self) -> i32 {
        height(&self.right)
    }

    /// Height as derived from the children, regardless of what is stored.
    pub fn computed_height(&self) -> i32 {
        1 + self.left_height().max(self.right_height())
    }

    pub(super) fn update_height(&mut self) {
        self.height = self.computed_height();
    }

    pub fn is_imbalanced(&self, tolerance: u32) -> bool {
        self.left_height().abs_diff(self.right_height()) > tolerance
    }
}

pub(crate) fn height(subtree: &Subtree) -> i32 {
    subtree.as_ref().map_or(-1, |node| node.height)
}

/// Largest key of a non-empty subtree: follow right children until there are none.
pub(super) fn max_key(node: &Node) -> Key {
    let mut current = node;

    while let Some(right) = current.right() {
        current = right;
    }

    current.key
}
