//! Argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toolsmith_core::{LogFormat, RemoteMode};

/// Catalog of AI and local utility tools.
#[derive(Parser, Debug)]
#[command(name = "toolsmith")]
#[command(about = "Run AI generation and local utility tools from the terminal")]
#[command(version)]
pub struct Cli {
    /// Extra configuration file, applied over the standard locations
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log output format (pretty or json)
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available tools
    List {
        /// Only show one category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show a tool's fields
    Describe {
        /// Tool id, e.g. `hex-to-rgb`
        tool: String,
    },

    /// Run a tool from the catalog
    Run {
        /// Tool id, e.g. `blog-post-writer`
        tool: String,

        /// Input as key=value; repeat for each field
        #[arg(short, long = "input", value_parser = parse_input)]
        inputs: Vec<(String, String)>,

        /// Image file to attach
        #[arg(long)]
        image: Option<PathBuf>,

        /// Account to charge
        #[arg(long, default_value = "local")]
        account: String,
    },

    /// Send a raw prompt; `__LOCAL__:TAG;;;a;;;b` runs a local transform
    Prompt {
        /// Prompt text
        prompt: String,

        /// Remote mode (text or image)
        #[arg(long, default_value = "text")]
        mode: RemoteMode,
    },

    /// Run a local transform directly
    Transform {
        /// Command tag, e.g. `HEX_RGB`
        tag: String,

        /// Positional parameters
        params: Vec<String>,
    },
}

/// Parses `key=value`.
pub fn parse_input(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in `{}`", raw));
    }
    Ok((key.to_string(), value.to_string()))
}
