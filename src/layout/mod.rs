//! Tidy tree layout in two passes: a bottom-up size pass that reserves a
//! footprint for every subtree, then a top-down breadth-first pass that hands
//! out absolute coordinates.

mod position;
mod size;

use crate::config::LayoutParams;
use crate::error::{LayoutError, Result};
use crate::ir::{Node, Tree};

/// A fully laid out node collection plus the canvas it needs.
#[derive(Debug, Clone)]
pub struct Layout {
    pub tree: Tree,
    pub width: i64,
    pub height: i64,
}

impl Layout {
    pub fn nodes(&self) -> &[Node] {
        self.tree.nodes()
    }
}

/// Validates the collection, sizes it, positions it and measures the canvas.
pub fn compute_layout(nodes: Vec<Node>, params: &LayoutParams) -> Result<Layout> {
    let mut tree = Tree::new(nodes)?;
    size::prepare_all(&mut tree, params)?;
    position::assign_positions(&mut tree, params)?;
    let (width, height) = canvas_size(&tree, params)?;
    tracing::debug!(nodes = tree.len(), width, height, "layout computed");
    Ok(Layout {
        tree,
        width,
        height,
    })
}

/// Furthest right/bottom extent of any node footprint, plus padding on both
/// sides.
pub fn canvas_size(tree: &Tree, params: &LayoutParams) -> Result<(i64, i64)> {
    let mut right = 0i64;
    let mut bottom = 0i64;
    for node in tree.nodes() {
        let overflow = || LayoutError::Overflow {
            id: node.id.clone(),
        };
        right = right.max(node.x.checked_add(node.width).ok_or_else(overflow)?);
        bottom = bottom.max(node.y.checked_add(node.height).ok_or_else(overflow)?);
    }
    let margin = 2 * params.pad;
    let width = right.checked_add(margin);
    let height = bottom.checked_add(margin);
    match (width, height) {
        (Some(width), Some(height)) => Ok((width, height)),
        _ => Err(LayoutError::InvalidConfig {
            message: "canvas size exceeds the coordinate range".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Node> {
        vec![
            Node::new(1),
            Node::new(2).with_parent(1).with_stack_children(true),
            Node::new(3).with_parent(2),
            Node::new(4).with_parent(2),
            Node::new(5).with_parent(1),
            Node::new(6).with_parent(5).with_level_offset(1),
            Node::new(7),
        ]
    }

    #[test]
    fn two_node_scenario() {
        let layout = compute_layout(
            vec![Node::new(1), Node::new(2).with_parent(1)],
            &LayoutParams::default(),
        )
        .unwrap();
        let root = layout.tree.get(&1.into()).unwrap();
        let child = layout.tree.get(&2.into()).unwrap();
        assert_eq!((root.width, root.height), (120, 60));
        assert_eq!((child.width, child.height), (120, 60));
        assert_eq!(root.stack_children, Some(false));
        assert_eq!(child.y, 10 + 50 + 20);
        assert_eq!(child.x, root.x);
        assert_eq!(layout.width, root.x + 120 + 20);
        assert_eq!(layout.height, 80 + 60 + 20);
    }

    #[test]
    fn layout_is_deterministic() {
        let params = LayoutParams::default();
        let first = compute_layout(sample(), &params).unwrap();
        let second = compute_layout(sample(), &params).unwrap();
        assert_eq!(first.nodes(), second.nodes());
        assert_eq!((first.width, first.height), (second.width, second.height));
    }

    #[test]
    fn canvas_covers_every_footprint_exactly() {
        let params = LayoutParams {
            node_width: 70,
            node_height: 30,
            pad: 7,
            level_pad: 11,
            stack_pad: 3,
        };
        let layout = compute_layout(sample(), &params).unwrap();
        let right = layout.nodes().iter().map(|n| n.x + n.width).max().unwrap();
        let bottom = layout.nodes().iter().map(|n| n.y + n.height).max().unwrap();
        assert_eq!(layout.width, right + 14);
        assert_eq!(layout.height, bottom + 14);
    }

    #[test]
    fn children_are_placed_relative_to_final_parent_position() {
        let params = LayoutParams::default();
        let layout = compute_layout(sample(), &params).unwrap();
        for (idx, node) in layout.nodes().iter().enumerate() {
            let Some(parent) = layout.tree.parent(idx) else {
                continue;
            };
            let expected_y =
                parent.y + params.level_step() + node.level_offset * params.level_step();
            if parent.stack_children == Some(true) {
                assert_eq!(node.x, parent.x + params.stack_indent());
                assert!(node.y >= expected_y);
            } else {
                assert!(node.x >= parent.x);
                assert_eq!(node.y, expected_y);
            }
        }
    }

    #[test]
    fn rejects_empty_and_dangling_input() {
        let params = LayoutParams::default();
        assert!(matches!(
            compute_layout(Vec::new(), &params),
            Err(LayoutError::EmptyInput)
        ));
        assert!(matches!(
            compute_layout(vec![Node::new(1).with_parent(2)], &params),
            Err(LayoutError::UnknownParent { .. })
        ));
    }

    #[test]
    fn deep_chain_lays_out_end_to_end() {
        let depth = 50_000i64;
        let nodes = (0..depth)
            .map(|i| match i {
                0 => Node::new(0),
                _ => Node::new(i).with_parent(i - 1),
            })
            .collect();
        let layout = compute_layout(nodes, &LayoutParams::default()).unwrap();
        let leaf = layout.tree.get(&(depth - 1).into()).unwrap();
        assert_eq!((leaf.x, leaf.y), (20, 10 + 70 * (depth - 1)));
        assert_eq!(layout.height, leaf.y + 60 + 20);
    }
}
