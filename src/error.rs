use crate::ir::NodeId;

pub type Result<T> = std::result::Result<T, LayoutError>;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("no nodes to lay out")]
    EmptyInput,

    #[error("duplicate node id {id}")]
    DuplicateId { id: NodeId },

    #[error("node {id} references unknown parent {parent}")]
    UnknownParent { id: NodeId, parent: NodeId },

    #[error("node {id} is not reachable from any root (parent cycle)")]
    Unreachable { id: NodeId },

    #[error("layout of node {id} exceeds the coordinate range")]
    Overflow { id: NodeId },

    #[error("invalid value for field `{field}`: {message}")]
    InvalidField { field: String, message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("template `{name}` is not defined in the configuration")]
    MissingTemplate { name: String },

    #[error("template parameter `{name}` is not defined")]
    MissingParameter { name: String },

    #[error("malformed template: {message}")]
    Template { message: String },

    #[error("could not parse {source_name} in line {line} at column {column}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        column: usize,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
