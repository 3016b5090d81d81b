#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod params;
pub mod parser;
pub mod render;
pub mod template;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutParams, load_config};
pub use error::{LayoutError, Result};
pub use ir::{Node, NodeId, Tree};
pub use layout::{Layout, compute_layout};
pub use parser::{load_nodes, parse_config, parse_nodes};
pub use render::render_svg;
