//! Command-line interface.

mod commands;
mod handlers;

pub use commands::{Cli, Commands, parse_input};
pub use handlers::{describe_tool, format_catalog, load_image, mime_for_path, run};
