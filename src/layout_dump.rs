use crate::ir::NodeId;
use crate::layout::Layout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: i64,
    pub height: i64,
    pub nodes: Vec<NodeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    pub stack_children: bool,
    pub level_offset: i64,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .nodes()
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                parent_id: node.parent_id.clone(),
                stack_children: node.stack_children.unwrap_or(false),
                level_offset: node.level_offset,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            nodes,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
