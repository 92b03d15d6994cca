use tracing::trace;

use super::node::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// The side holding the taller child of `node`, or `tie` when both are equally tall.
fn taller_side(node: &Node, tie: Side) -> Side {
    match node.left_height().cmp(&node.right_height()) {
        std::cmp::Ordering::Greater => Side::Left,
        std::cmp::Ordering::Less => Side::Right,
        std::cmp::Ordering::Equal => tie,
    }
}

/// Rotates `node` clockwise, lifting its left child into its place.
///
/// Heights are recomputed bottom-up: the demoted node first, then the new subtree root.
pub(super) fn rotate_clockwise(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };

    trace!(node = %node.key, pivot = %pivot.key, "rotating clockwise");

    node.left = pivot.right.take();
    node.update_height();

    pivot.right = Some(node);
    pivot.update_height();

    pivot
}

/// Rotates `node` counter-clockwise, lifting its right child into its place.
pub(super) fn rotate_counter_clockwise(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };

    trace!(node = %node.key, pivot = %pivot.key, "rotating counter-clockwise");

    node.right = pivot.left.take();
    node.update_height();

    pivot.left = Some(node);
    pivot.update_height();

    pivot
}

/// Restores the local balance of an imbalanced node `z`, returning the new subtree root.
///
/// `y` is the taller child of `z` and `x` the taller child of `y`. When the children of `y`
/// are equally tall, `x` is taken on the same side as `y`, which always resolves to a single
/// rotation. A double rotation in that situation can leave the demoted `y` out of balance.
pub(super) fn rebalance(mut z: Box<Node>) -> Box<Node> {
    let y_side = taller_side(&z, Side::Left);
    let y = match y_side {
        Side::Left => z.left(),
        Side::Right => z.right(),
    };

    let Some(y) = y else {
        return z;
    };

    match (y_side, taller_side(y, y_side)) {
        (Side::Left, Side::Left) => rotate_clockwise(z),
        (Side::Right, Side::Right) => rotate_counter_clockwise(z),
        (Side::Left, Side::Right) => {
            z.left = z.left.take().map(rotate_counter_clockwise);
            rotate_clockwise(z)
        }
        (Side::Right, Side::Left) => {
            z.right = z.right.take().map(rotate_clockwise);
            rotate_counter_clockwise(z)
        }
    }
}

/// Recomputes the height of `node` and rebalances it when its children differ by more than
/// `tolerance`.
pub(super) fn restore(mut node: Box<Node>, tolerance: u32) -> Box<Node> {
    node.update_height();

    if node.is_imbalanced(tolerance) {
        rebalance(node)
    } else {
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Key;

    fn node(whole: i64, left: Option<Box<Node>>, right: Option<Box<Node>>) -> Box<Node> {
        let mut node = Node::leaf(Key::new(whole, 0));
        node.left = left;
        node.right = right;
        node.update_height();
        node
    }

    fn leaf(whole: i64) -> Option<Box<Node>> {
        Some(node(whole, None, None))
    }

    fn shape(node: &Node) -> String {
        let child = |n: Option<&Node>| n.map_or("_".to_string(), shape);
        if node.left().is_none() && node.right().is_none() {
            return node.key().whole().to_string();
        }
        format!(
            "({} {} {})",
            child(node.left()),
            node.key().whole(),
            child(node.right())
        )
    }

    #[test]
    fn test_clockwise_rotation_relinks_inner_subtree() {
        let root = node(5, Some(node(3, leaf(1), leaf(4))), leaf(8));
        let rotated = rotate_clockwise(root);

        assert_eq!(shape(&rotated), "(1 3 (4 5 8))");
        assert_eq!(rotated.height(), 2);
        assert_eq!(rotated.right().map(Node::height), Some(1));
    }

    #[test]
    fn test_counter_clockwise_rotation_relinks_inner_subtree() {
        let root = node(3, leaf(1), Some(node(5, leaf(4), leaf(8))));
        let rotated = rotate_counter_clockwise(root);

        assert_eq!(shape(&rotated), "((1 3 4) 5 8)");
        assert_eq!(rotated.height(), 2);
    }

    #[test]
    fn test_rotation_without_pivot_is_a_no_op() {
        let root = node(1, None, None);
        assert_eq!(shape(&rotate_clockwise(root.clone())), "1");
        assert_eq!(shape(&rotate_counter_clockwise(root)), "1");
    }

    #[test]
    fn test_rebalance_left_left() {
        let z = node(3, Some(node(2, leaf(1), None)), None);
        assert_eq!(shape(&rebalance(z)), "(1 2 3)");
    }

    #[test]
    fn test_rebalance_right_right() {
        let z = node(1, None, Some(node(2, None, leaf(3))));
        assert_eq!(shape(&rebalance(z)), "(1 2 3)");
    }

    #[test]
    fn test_rebalance_left_right() {
        let z = node(3, Some(node(1, None, leaf(2))), None);
        assert_eq!(shape(&rebalance(z)), "(1 2 3)");
    }

    #[test]
    fn test_rebalance_right_left() {
        let z = node(1, None, Some(node(3, leaf(2), None)));
        assert_eq!(shape(&rebalance(z)), "(1 2 3)");
    }

    #[test]
    fn test_rebalance_prefers_single_rotation_on_tied_grandchildren() {
        // What is left of a node after its only left child was deleted.
        let z = node(1, None, Some(node(3, leaf(2), leaf(4))));
        let rebalanced = rebalance(z);

        assert_eq!(shape(&rebalanced), "((_ 1 2) 3 4)");
        assert_eq!(rebalanced.height(), 2);
        assert!(!rebalanced.is_imbalanced(1));
    }

    #[test]
    fn test_restore_leaves_balanced_nodes_in_place() {
        let root = node(2, leaf(1), None);
        let restored = restore(root, 1);
        assert_eq!(shape(&restored), "(1 2 _)");
    }
}
