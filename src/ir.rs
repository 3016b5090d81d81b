use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{LayoutError, Result};

pub const DEFAULT_NODE_TEMPLATE: &str = "NodeTemplate";
pub const DEFAULT_LINE_TEMPLATE: &str = "LineTemplate";
pub const DEFAULT_STACK_LINE_TEMPLATE: &str = "StackLineTemplate";

/// Node identity as written in the input data. `1` and `"1"` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum NodeId {
    Number(i64),
    Text(String),
}

impl NodeId {
    pub fn from_value(field: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => as_integer(value).map(Self::Number).ok_or_else(|| {
                invalid_field(field, format!("expected an integer id, got {n}"))
            }),
            Value::String(s) => Ok(Self::Text(s.clone())),
            other => Err(invalid_field(
                field,
                format!("expected an integer or string id, got {other}"),
            )),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::from(*n),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for NodeId {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    /// Vertical nudge in whole levels, independent of structural depth.
    pub level_offset: i64,
    /// `None` until the size pass resolves it from the parent.
    pub stack_children: Option<bool>,
    pub node_template: String,
    pub line_template: String,
    pub stack_line_template: String,
    /// Any other input field, handed to the templates untouched.
    pub extra: Map<String, Value>,
    pub width: i64,
    pub height: i64,
    pub x: i64,
    pub y: i64,
}

impl Node {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            level_offset: 0,
            stack_children: None,
            node_template: DEFAULT_NODE_TEMPLATE.to_string(),
            line_template: DEFAULT_LINE_TEMPLATE.to_string(),
            stack_line_template: DEFAULT_STACK_LINE_TEMPLATE.to_string(),
            extra: Map::new(),
            width: 0,
            height: 0,
            x: 0,
            y: 0,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<NodeId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    pub fn with_stack_children(mut self, stack: bool) -> Self {
        self.stack_children = Some(stack);
        self
    }

    pub fn with_level_offset(mut self, offset: i64) -> Self {
        self.level_offset = offset;
        self
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// Builds a node from one input record. Defaults come first, then every
    /// key of the record; unknown keys land in [`Node::extra`].
    pub fn from_record(record: Map<String, Value>) -> Result<Self> {
        let id = record
            .get("Id")
            .ok_or_else(|| invalid_field("Id", "missing node id".to_string()))?;
        let mut node = Self::new(NodeId::from_value("Id", id)?);

        for (key, value) in record {
            match key.as_str() {
                "Id" => {}
                "ParentId" => {
                    node.parent_id = match value {
                        Value::Null => None,
                        other => Some(NodeId::from_value(&key, &other)?),
                    };
                }
                "LevelOffset" => {
                    node.level_offset = as_integer(&value).ok_or_else(|| {
                        invalid_field(&key, format!("expected an integer, got {value}"))
                    })?;
                }
                "StackChildren" => {
                    node.stack_children = match value {
                        Value::Null => None,
                        Value::Bool(flag) => Some(flag),
                        other => {
                            return Err(invalid_field(
                                &key,
                                format!("expected true, false or null, got {other}"),
                            ));
                        }
                    };
                }
                "NodeTemplate" => node.node_template = template_name(&key, value)?,
                "LineTemplate" => node.line_template = template_name(&key, value)?,
                "StackLineTemplate" => node.stack_line_template = template_name(&key, value)?,
                // computed by the layout passes
                "Width" | "Height" | "x" | "y" => {}
                _ => {
                    node.extra.insert(key, value);
                }
            }
        }

        Ok(node)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// The node's own fields as template parameters, extension fields last.
    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("Id".to_string(), self.id.to_value());
        fields.insert(
            "ParentId".to_string(),
            self.parent_id.as_ref().map_or(Value::Null, NodeId::to_value),
        );
        fields.insert("LevelOffset".to_string(), Value::from(self.level_offset));
        fields.insert(
            "StackChildren".to_string(),
            self.stack_children.map_or(Value::Null, Value::Bool),
        );
        fields.insert(
            "NodeTemplate".to_string(),
            Value::String(self.node_template.clone()),
        );
        fields.insert(
            "LineTemplate".to_string(),
            Value::String(self.line_template.clone()),
        );
        fields.insert(
            "StackLineTemplate".to_string(),
            Value::String(self.stack_line_template.clone()),
        );
        fields.insert("Width".to_string(), Value::from(self.width));
        fields.insert("Height".to_string(), Value::from(self.height));
        fields.insert("x".to_string(), Value::from(self.x));
        fields.insert("y".to_string(), Value::from(self.y));
        for (key, value) in &self.extra {
            fields.insert(key.clone(), value.clone());
        }
        fields
    }
}

/// Integral JSON numbers, including `2.0` as JSON5 readers may produce it.
pub(crate) fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn template_name(field: &str, value: Value) -> Result<String> {
    match value {
        Value::String(name) => Ok(name),
        other => Err(invalid_field(
            field,
            format!("expected a template name, got {other}"),
        )),
    }
}

fn invalid_field(field: &str, message: String) -> LayoutError {
    LayoutError::InvalidField {
        field: field.to_string(),
        message,
    }
}

/// The node collection in input order, with parent/child links resolved to
/// indices. Construction validates the structure, so every node is reachable
/// from exactly one root.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(LayoutError::EmptyInput);
        }

        let mut index = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), idx).is_some() {
                return Err(LayoutError::DuplicateId {
                    id: node.id.clone(),
                });
            }
        }

        let mut parents = Vec::with_capacity(nodes.len());
        let mut children = vec![Vec::new(); nodes.len()];
        let mut roots = Vec::new();
        for (idx, node) in nodes.iter().enumerate() {
            match &node.parent_id {
                None => {
                    roots.push(idx);
                    parents.push(None);
                }
                Some(parent) => {
                    let parent_idx =
                        *index
                            .get(parent)
                            .ok_or_else(|| LayoutError::UnknownParent {
                                id: node.id.clone(),
                                parent: parent.clone(),
                            })?;
                    children[parent_idx].push(idx);
                    parents.push(Some(parent_idx));
                }
            }
        }

        let tree = Self {
            nodes,
            index,
            parents,
            children,
            roots,
        };
        tree.check_reachable()?;
        Ok(tree)
    }

    fn check_reachable(&self) -> Result<()> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = self.roots.clone();
        while let Some(idx) = stack.pop() {
            seen[idx] = true;
            stack.extend_from_slice(&self.children[idx]);
        }
        match seen.iter().position(|reached| !reached) {
            Some(idx) => Err(LayoutError::Unreachable {
                id: self.nodes[idx].id.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub(crate) fn node_mut(&mut self, idx: usize) -> &mut Node {
        &mut self.nodes[idx]
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Root indices in input order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Child indices of `idx` in input order.
    pub fn children(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    /// Children of a frontier entry; `None` stands for the synthetic parent
    /// of all roots.
    pub fn children_of(&self, parent: Option<usize>) -> &[usize] {
        match parent {
            None => &self.roots,
            Some(idx) => &self.children[idx],
        }
    }

    pub fn parent(&self, idx: usize) -> Option<&Node> {
        self.parents[idx].map(|p| &self.nodes[p])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test records are objects"),
        }
    }

    #[test]
    fn record_overrides_defaults_and_keeps_extra_fields() {
        let node = Node::from_record(record(json!({
            "Id": 7,
            "ParentId": "boss",
            "LevelOffset": 2,
            "StackChildren": true,
            "NodeTemplate": "Fancy",
            "Name": "Ada",
            "Role": {"title": "CTO"}
        })))
        .unwrap();
        assert_eq!(node.id, NodeId::Number(7));
        assert_eq!(node.parent_id, Some(NodeId::from("boss")));
        assert_eq!(node.level_offset, 2);
        assert_eq!(node.stack_children, Some(true));
        assert_eq!(node.node_template, "Fancy");
        assert_eq!(node.line_template, DEFAULT_LINE_TEMPLATE);
        assert_eq!(node.extra.get("Name"), Some(&json!("Ada")));
        assert_eq!(node.extra.len(), 2);
    }

    #[test]
    fn null_parent_and_stack_flag_mean_unset() {
        let node = Node::from_record(record(json!({
            "Id": "a",
            "ParentId": null,
            "StackChildren": null
        })))
        .unwrap();
        assert!(node.is_root());
        assert_eq!(node.stack_children, None);
    }

    #[test]
    fn record_rejects_bad_field_types() {
        let err = Node::from_record(record(json!({"Id": 1, "LevelOffset": "x"}))).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidField { ref field, .. } if field == "LevelOffset"));
        let err = Node::from_record(record(json!({"Id": 1.5}))).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidField { .. }));
        let err = Node::from_record(record(json!({"Name": "nobody"}))).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidField { ref field, .. } if field == "Id"));
    }

    #[test]
    fn numeric_and_text_ids_are_distinct() {
        let tree = Tree::new(vec![Node::new(1), Node::new("1")]).unwrap();
        assert_eq!(tree.roots(), &[0, 1]);
    }

    #[test]
    fn tree_links_children_in_input_order() {
        let tree = Tree::new(vec![
            Node::new(3).with_parent(1),
            Node::new(1),
            Node::new(2).with_parent(1),
        ])
        .unwrap();
        assert_eq!(tree.roots(), &[1]);
        assert_eq!(tree.children(1), &[0, 2]);
        assert_eq!(tree.parent(0).map(|n| &n.id), Some(&NodeId::Number(1)));
        assert_eq!(tree.children_of(None), &[1]);
    }

    #[test]
    fn tree_rejects_invalid_structure() {
        assert!(matches!(Tree::new(Vec::new()), Err(LayoutError::EmptyInput)));
        assert!(matches!(
            Tree::new(vec![Node::new(1), Node::new(1)]),
            Err(LayoutError::DuplicateId { .. })
        ));
        assert!(matches!(
            Tree::new(vec![Node::new(1), Node::new(2).with_parent(9)]),
            Err(LayoutError::UnknownParent { .. })
        ));
        let err = Tree::new(vec![
            Node::new(1),
            Node::new(2).with_parent(3),
            Node::new(3).with_parent(2),
        ])
        .unwrap_err();
        assert!(matches!(err, LayoutError::Unreachable { id } if id == NodeId::Number(2)));
    }

    #[test]
    fn fields_expose_core_and_extension_values() {
        let node = Node::new(2).with_parent(1).with_field("Name", "Bob");
        let fields = node.fields();
        assert_eq!(fields["Id"], json!(2));
        assert_eq!(fields["ParentId"], json!(1));
        assert_eq!(fields["StackChildren"], Value::Null);
        assert_eq!(fields["Name"], json!("Bob"));
    }
}
