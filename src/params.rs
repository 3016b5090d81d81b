use serde_json::{Map, Value};

use crate::config::{Config, LayoutParams};
use crate::ir::{Node, Tree};

/// Geometry fields derived from a laid out node, in template naming.
/// All halving floors, matching integer pixel output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeCoordinates {
    pub left: i64,
    pub left_plus_stack_pad: i64,
    pub right: i64,
    pub right_minus_stack_pad: i64,
    pub center: i64,
    pub top: i64,
    pub bottom: i64,
    pub middle: i64,
}

impl NodeCoordinates {
    pub fn of(node: &Node, params: &LayoutParams) -> Self {
        let center = node.x + node.width / 2;
        let half_width = params.node_width / 2;
        let left = center - half_width;
        Self {
            left,
            left_plus_stack_pad: left + params.stack_pad,
            right: center + half_width,
            // measured from the left edge, not the right one
            right_minus_stack_pad: left - params.stack_pad,
            center,
            top: node.y,
            bottom: node.y + params.node_height,
            middle: node.y + params.node_height / 2,
        }
    }

    pub fn insert_into(&self, params: &mut Map<String, Value>, prefix: &str) {
        let fields = [
            ("Left", self.left),
            ("LeftPlusStackPad", self.left_plus_stack_pad),
            ("Right", self.right),
            ("RightMinusStackPad", self.right_minus_stack_pad),
            ("Center", self.center),
            ("Top", self.top),
            ("Bottom", self.bottom),
            ("Middle", self.middle),
        ];
        for (name, value) in fields {
            params.insert(format!("{prefix}{name}"), Value::from(value));
        }
    }
}

/// Every parameter a node or line template may reference: configuration
/// entries, the node's own fields, its coordinates and, below a root, its
/// parent's coordinates under a `Parent` prefix. Later groups win on clashes.
pub fn node_params(config: &Config, tree: &Tree, idx: usize) -> Map<String, Value> {
    let node = tree.node(idx);
    let mut params = config.entries().clone();
    params.extend(node.fields());

    NodeCoordinates::of(node, &config.layout).insert_into(&mut params, "");
    if let Some(parent) = tree.parent(idx) {
        NodeCoordinates::of(parent, &config.layout).insert_into(&mut params, "Parent");
    }
    params
}
