use serde_json::Value;
use std::path::Path;

use crate::config::Config;
use crate::error::{LayoutError, Result};
use crate::ir::Node;

/// Parses strict JSON, falling back to JSON5 so hand-written files may carry
/// comments and trailing commas. Position info comes from the strict parse.
pub fn parse_json(input: &str, source_name: &str) -> Result<Value> {
    match serde_json::from_str::<Value>(input) {
        Ok(value) => Ok(value),
        Err(strict_err) => {
            if let Ok(value) = json5::from_str::<Value>(input) {
                return Ok(value);
            }
            let message = strict_err.to_string();
            let message = message
                .split(" at line ")
                .next()
                .unwrap_or_default()
                .to_string();
            Err(LayoutError::Parse {
                source_name: format!("'{source_name}'"),
                line: strict_err.line(),
                column: strict_err.column(),
                message,
            })
        }
    }
}

pub fn parse_config(input: &str, source_name: &str) -> Result<Config> {
    Config::from_value(parse_json(input, source_name)?)
}

/// Parses node data: a top-level array of objects, one node per object.
pub fn parse_nodes(input: &str, source_name: &str) -> Result<Vec<Node>> {
    let Value::Array(records) = parse_json(input, source_name)? else {
        return Err(LayoutError::InvalidField {
            field: source_name.to_string(),
            message: "expected an array of node records".to_string(),
        });
    };

    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| match record {
            Value::Object(map) => Node::from_record(map),
            other => Err(LayoutError::InvalidField {
                field: format!("{source_name}[{idx}]"),
                message: format!("expected an object, got {other}"),
            }),
        })
        .collect()
}

pub fn load_nodes(path: &Path) -> Result<Vec<Node>> {
    let contents = std::fs::read_to_string(path)?;
    parse_nodes(&contents, &path.display().to_string())
}
