use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{LayoutError, Result};
use crate::ir::as_integer;
use crate::parser::parse_config;

pub const SVG_TEMPLATE: &str = "SvgTemplate";

/// Upper bound for each layout parameter, in pixels.
pub const MAX_LAYOUT_PARAM: i64 = 1_000_000;

const DEFAULT_SVG_TEMPLATE: &str = concat!(
    "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{TotalWidth}\" height=\"{TotalHeight}\" ",
    "viewBox=\"0 0 {TotalWidth} {TotalHeight}\">",
    "<style>.box {{ fill: #ECECFF; stroke: #9370DB; stroke-width: 1.4 }} ",
    ".line {{ fill: none; stroke: #333333; stroke-width: 1.4 }} ",
    ".label {{ font-family: sans-serif; font-size: 13px; fill: #333333 }}</style>",
);

const DEFAULT_NODE_TEMPLATE: &str = concat!(
    "<rect class=\"box\" x=\"{Left}\" y=\"{Top}\" width=\"{NodeWidth}\" height=\"{NodeHeight}\" rx=\"6\" ry=\"6\"/>",
    "<text class=\"label\" x=\"{Center}\" y=\"{Middle}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{Id}</text>",
);

const DEFAULT_LINE_TEMPLATE: &str =
    "<path class=\"line\" d=\"M {ParentCenter} {ParentBottom} L {Center} {Top}\"/>";

const DEFAULT_STACK_LINE_TEMPLATE: &str =
    "<path class=\"line\" d=\"M {ParentLeftPlusStackPad} {ParentBottom} V {Middle} H {Left}\"/>";

/// The numeric layout parameters. All geometry is integral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    pub node_width: i64,
    pub node_height: i64,
    pub pad: i64,
    pub level_pad: i64,
    pub stack_pad: i64,
}

impl LayoutParams {
    /// Vertical distance of one structural level.
    pub fn level_step(&self) -> i64 {
        self.node_height + self.level_pad
    }

    /// Horizontal indent of stacked children.
    pub fn stack_indent(&self) -> i64 {
        4 * self.stack_pad
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            node_width: 100,
            node_height: 50,
            pad: 10,
            level_pad: 20,
            stack_pad: 5,
        }
    }
}

/// Layout parameters plus every configuration entry (templates and any extra
/// keys), in file order. Entries are passed to every template.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub layout: LayoutParams,
    entries: Map<String, Value>,
}

impl Config {
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(entries) = value else {
            return Err(invalid_config("expected a JSON object at top level"));
        };
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Map<String, Value>) -> Result<Self> {
        let layout = LayoutParams {
            node_width: required_param(&entries, "NodeWidth")?,
            node_height: required_param(&entries, "NodeHeight")?,
            pad: required_param(&entries, "Pad")?,
            level_pad: required_param(&entries, "LevelPad")?,
            stack_pad: required_param(&entries, "StackPad")?,
        };
        Ok(Self { layout, entries })
    }

    pub fn entries(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Adds or replaces an entry. Layout parameters are re-read so both
    /// views stay in sync.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), value.into());
        *self = Self::from_entries(entries)?;
        Ok(())
    }

    pub fn template(&self, name: &str) -> Result<&str> {
        self.entries
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| LayoutError::MissingTemplate {
                name: name.to_string(),
            })
    }
}

impl Default for Config {
    fn default() -> Self {
        let layout = LayoutParams::default();
        let mut entries = Map::new();
        entries.insert("NodeWidth".to_string(), Value::from(layout.node_width));
        entries.insert("NodeHeight".to_string(), Value::from(layout.node_height));
        entries.insert("Pad".to_string(), Value::from(layout.pad));
        entries.insert("LevelPad".to_string(), Value::from(layout.level_pad));
        entries.insert("StackPad".to_string(), Value::from(layout.stack_pad));
        entries.insert(SVG_TEMPLATE.to_string(), Value::from(DEFAULT_SVG_TEMPLATE));
        entries.insert(
            crate::ir::DEFAULT_NODE_TEMPLATE.to_string(),
            Value::from(DEFAULT_NODE_TEMPLATE),
        );
        entries.insert(
            crate::ir::DEFAULT_LINE_TEMPLATE.to_string(),
            Value::from(DEFAULT_LINE_TEMPLATE),
        );
        entries.insert(
            crate::ir::DEFAULT_STACK_LINE_TEMPLATE.to_string(),
            Value::from(DEFAULT_STACK_LINE_TEMPLATE),
        );
        Self { layout, entries }
    }
}

fn required_param(entries: &Map<String, Value>, key: &str) -> Result<i64> {
    let value = entries
        .get(key)
        .ok_or_else(|| invalid_config(&format!("missing layout parameter `{key}`")))?;
    match as_integer(value) {
        Some(n) if (0..=MAX_LAYOUT_PARAM).contains(&n) => Ok(n),
        _ => Err(invalid_config(&format!(
            "layout parameter `{key}` must be an integer between 0 and {MAX_LAYOUT_PARAM}, got {value}"
        ))),
    }
}

fn invalid_config(message: &str) -> LayoutError {
    LayoutError::InvalidConfig {
        message: message.to_string(),
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents, &path.display().to_string())
}
