//! Password and UUID generation.

use crate::format::{TransformError, TransformResult, fenced, param, parse_flag};
use rand::Rng;
use rand::seq::SliceRandom;

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:,.<>?";

/// Shortest password the generator produces.
pub const MIN_PASSWORD_LENGTH: usize = 4;
/// Longest password the generator produces.
pub const MAX_PASSWORD_LENGTH: usize = 128;
/// Most UUIDs produced by one invocation.
pub const MAX_UUIDS: usize = 50;

/// Character sets enabled for a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charsets {
    /// A-Z
    pub uppercase: bool,
    /// a-z
    pub lowercase: bool,
    /// 0-9
    pub digits: bool,
    /// Punctuation
    pub symbols: bool,
}

impl Default for Charsets {
    fn default() -> Self {
        Self {
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: false,
        }
    }
}

impl Charsets {
    fn enabled(&self) -> Vec<&'static str> {
        [
            (self.uppercase, UPPERCASE),
            (self.lowercase, LOWERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter_map(|(on, set)| on.then_some(set))
        .collect()
    }

    /// Every character a password may contain.
    pub fn alphabet(&self) -> String {
        self.enabled().concat()
    }

    fn describe(&self) -> String {
        let mut names = Vec::new();
        if self.uppercase {
            names.push("uppercase");
        }
        if self.lowercase {
            names.push("lowercase");
        }
        if self.digits {
            names.push("digits");
        }
        if self.symbols {
            names.push("symbols");
        }
        names.join(", ")
    }
}

/// Generates a password of exactly `length` characters.
///
/// Each enabled set contributes at least one character.
///
/// # Errors
///
/// Fails when the length is out of range or no set is enabled.
pub fn generate_password(length: usize, charsets: Charsets) -> Result<String, TransformError> {
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        return Err(TransformError::new(format!(
            "Password length must be between {} and {}",
            MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
        )));
    }
    let sets = charsets.enabled();
    if sets.is_empty() {
        return Err(TransformError::new(
            "Select at least one character set",
        ));
    }

    let mut rng = rand::thread_rng();
    let alphabet: Vec<char> = charsets.alphabet().chars().collect();
    let mut chars: Vec<char> = sets
        .iter()
        .map(|set| {
            let set: Vec<char> = set.chars().collect();
            set[rng.gen_range(0..set.len())]
        })
        .collect();
    while chars.len() < length {
        chars.push(alphabet[rng.gen_range(0..alphabet.len())]);
    }
    chars.shuffle(&mut rng);
    Ok(chars.into_iter().collect())
}

/// `PASSWORD length;;;uppercase;;;lowercase;;;digits;;;symbols`
pub fn password(params: &[String]) -> TransformResult {
    let length = match param(params, 0) {
        "" => 16,
        raw => raw
            .parse::<usize>()
            .map_err(|_| {
                TransformError::new(format!("Length must be a whole number, got `{}`", raw))
            })?,
    };
    let defaults = Charsets::default();
    let charsets = Charsets {
        uppercase: parse_flag(param(params, 1), defaults.uppercase),
        lowercase: parse_flag(param(params, 2), defaults.lowercase),
        digits: parse_flag(param(params, 3), defaults.digits),
        symbols: parse_flag(param(params, 4), defaults.symbols),
    };
    let generated = generate_password(length, charsets)?;
    Ok(format!(
        "## Generated Password\n\n{}\n\n- Length: {}\n- Character sets: {}",
        fenced("", &generated),
        length,
        charsets.describe()
    ))
}

/// `UUID count`
pub fn uuid(params: &[String]) -> TransformResult {
    let count = match param(params, 0) {
        "" => 1,
        raw => raw
            .parse::<usize>()
            .map_err(|_| {
                TransformError::new(format!("Count must be a whole number, got `{}`", raw))
            })?,
    };
    if !(1..=MAX_UUIDS).contains(&count) {
        return Err(TransformError::new(format!(
            "Count must be between 1 and {}",
            MAX_UUIDS
        )));
    }
    let ids: Vec<String> = (0..count)
        .map(|_| uuid::Uuid::new_v4().to_string())
        .collect();
    let heading = if count == 1 { "UUID" } else { "UUIDs" };
    Ok(format!(
        "## Generated {}\n\n{}",
        heading,
        fenced("", &ids.join("\n"))
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_enabled_set_is_used() {
        let charsets = Charsets {
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
        };
        for _ in 0..50 {
            let pw = generate_password(4, charsets).unwrap();
            assert_eq!(pw.chars().count(), 4);
            assert!(pw.chars().any(|c| c.is_ascii_uppercase()));
            assert!(pw.chars().any(|c| c.is_ascii_lowercase()));
            assert!(pw.chars().any(|c| c.is_ascii_digit()));
            assert!(pw.chars().any(|c| SYMBOLS.contains(c)));
        }
    }

    #[test]
    fn test_rejects_empty_charset_and_bad_length() {
        let none = Charsets {
            uppercase: false,
            lowercase: false,
            digits: false,
            symbols: false,
        };
        assert!(generate_password(12, none).is_err());
        assert!(generate_password(3, Charsets::default()).is_err());
        assert!(generate_password(129, Charsets::default()).is_err());
    }
}
