//! Command dispatch.

use crate::format::{TransformResult, error_markdown};
use crate::{LocalCommand, color, data, math, random, text};
use std::str::FromStr;
use tracing::{debug, instrument};

/// Runs one command against already-parsed arguments.
pub fn run(command: LocalCommand, params: &[String]) -> TransformResult {
    match command {
        LocalCommand::Password => random::password(params),
        LocalCommand::Uuid => random::uuid(params),
        LocalCommand::Base64 => text::base64(params),
        LocalCommand::HexRgb => color::hex_to_rgb(params),
        LocalCommand::RgbHex => color::rgb_to_hex(params),
        LocalCommand::PercentCalc => math::percent(params),
        LocalCommand::CsvJson => data::csv_json(params),
        LocalCommand::JsonFormat => data::json_format(params),
        LocalCommand::WordCount => text::word_count(params),
        LocalCommand::CaseConvert => text::case_convert(params),
        LocalCommand::Slugify => text::slugify(params),
    }
}

/// Executes a command tag and renders the result as markdown.
///
/// Never fails: bad input and unknown tags produce an error message in the
/// returned markdown.
///
/// # Examples
///
/// ```
/// use toolsmith_transform::execute;
///
/// let out = execute("HEX_RGB", &["FF0000".to_string()]);
/// assert!(out.contains("RGB: rgb(255, 0, 0)"));
/// ```
#[instrument(skip(params), fields(param_count = params.len()))]
pub fn execute(command_tag: &str, params: &[String]) -> String {
    let Ok(command) = LocalCommand::from_str(command_tag.trim()) else {
        debug!(command_tag, "Unknown local command");
        return error_markdown(&format!(
            "Unknown command `{}`. This tool is not available right now.",
            command_tag.trim()
        ));
    };

    match run(command, params) {
        Ok(markdown) => markdown,
        Err(e) => {
            debug!(%command, error = %e, "Local command rejected input");
            error_markdown(&e.to_string())
        }
    }
}
