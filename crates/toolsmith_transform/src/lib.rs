//! Local transforms for the Toolsmith tool catalog.
//!
//! Each command is a pure function of its parameters (password and UUID
//! generation excepted) that renders markdown. Invalid input never escapes as
//! an error: it is turned into a markdown message the user can read.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod color;
mod command;
mod data;
mod engine;
mod format;
mod math;
mod random;
mod text;

pub use color::{parse_hex, rgb_to_hsl};
pub use command::LocalCommand;
pub use data::csv_to_values;
pub use engine::{execute, run};
pub use format::{TransformError, TransformResult, format_number};
pub use random::{Charsets, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, generate_password};
pub use text::{convert_case, slug};
