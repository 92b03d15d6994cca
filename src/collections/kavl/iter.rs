use std::iter::FusedIterator;

use super::node::Node;
use crate::values::Key;

/// Lazy in-order traversal: left subtree, node, right subtree.
///
/// Keys come out in ascending order. The iterator only borrows the tree, so a new traversal
/// can be started at any time with [`KAvlTree::in_order`](super::KAvlTree::in_order).
#[derive(Debug, Clone)]
pub struct InOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> InOrder<'a> {
    pub(super) fn new(root: Option<&'a Node>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.descend_left(root);
        iter
    }

    fn descend_left(&mut self, mut node: Option<&'a Node>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left();
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a Key;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend_left(node.right());
        Some(node.key())
    }
}

impl FusedIterator for InOrder<'_> {}

/// Lazy pre-order traversal: node, left subtree, right subtree.
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> PreOrder<'a> {
    pub(super) fn new(root: Option<&'a Node>) -> Self {
        Self {
            stack: root.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Key;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Right goes first so that the left subtree is popped next.
        self.stack.extend(node.right());
        self.stack.extend(node.left());

        Some(node.key())
    }
}

impl FusedIterator for PreOrder<'_> {}
