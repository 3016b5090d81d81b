use crate::config::{Config, SVG_TEMPLATE};
use crate::error::Result;
use crate::layout::Layout;
use crate::params::node_params;
use crate::template::format_template;
use std::path::Path;

const SVG_FOOTER: &str = "</svg>";

/// Renders the whole document: header, every connecting line, every box,
/// footer. Lines go first so boxes are painted over them.
pub fn render_svg(layout: &Layout, config: &Config) -> Result<String> {
    let tree = &layout.tree;
    let mut body = String::new();

    for idx in 0..tree.len() {
        let Some(parent) = tree.parent(idx) else {
            continue;
        };
        let node = tree.node(idx);
        let template_name = if parent.stack_children == Some(true) {
            &node.stack_line_template
        } else {
            &node.line_template
        };
        let params = node_params(config, tree, idx);
        body.push_str(&format_template(config.template(template_name)?, &params)?);
    }

    for idx in 0..tree.len() {
        let node = tree.node(idx);
        let params = node_params(config, tree, idx);
        body.push_str(&format_template(
            config.template(&node.node_template)?,
            &params,
        )?);
    }

    let mut svg = render_header(layout, config)?;
    svg.push_str(&body);
    svg.push_str(SVG_FOOTER);
    tracing::debug!(nodes = tree.len(), bytes = svg.len(), "rendered svg");
    Ok(svg)
}

fn render_header(layout: &Layout, config: &Config) -> Result<String> {
    let mut params = config.entries().clone();
    params.insert("TotalWidth".to_string(), layout.width.into());
    params.insert("TotalHeight".to_string(), layout.height.into());
    format_template(config.template(SVG_TEMPLATE)?, &params)
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path) -> anyhow::Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "sans-serif".to_string();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}
