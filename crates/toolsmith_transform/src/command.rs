//! Command tags understood by the engine.

/// Local transform commands.
///
/// Tags are matched case-insensitively in their `SCREAMING_SNAKE_CASE` form.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum LocalCommand {
    /// Random password from selected character sets.
    Password,
    /// Random v4 UUIDs.
    Uuid,
    /// Base64 encode or decode.
    #[strum(serialize = "BASE64")]
    Base64,
    /// Hex color to RGB and HSL.
    HexRgb,
    /// RGB components to hex color.
    RgbHex,
    /// Percentage arithmetic.
    PercentCalc,
    /// CSV with a header row to a JSON array.
    CsvJson,
    /// Pretty-print JSON.
    JsonFormat,
    /// Word, character and sentence statistics.
    WordCount,
    /// Change letter case or identifier style.
    CaseConvert,
    /// URL slug.
    Slugify,
}

impl LocalCommand {
    /// False for commands that draw from the system RNG.
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, LocalCommand::Password | LocalCommand::Uuid)
    }
}
