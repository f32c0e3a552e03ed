//! Text statistics, case conversion, slugs and base64.

use crate::format::{TransformError, TransformResult, fenced, param, raw_param};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToTitleCase};
use regex::Regex;
use std::sync::LazyLock;

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph regex"));
static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Average adult reading speed used for the reading-time estimate.
const WORDS_PER_MINUTE: usize = 200;

/// `WORD_COUNT text`
pub fn word_count(params: &[String]) -> TransformResult {
    let text = raw_param(params, 0);
    if text.trim().is_empty() {
        return Err(TransformError::new("Enter some text to analyze"));
    }

    let words = text.split_whitespace().count();
    let characters = text.chars().count();
    let non_space = text.chars().filter(|c| !c.is_whitespace()).count();
    let sentences = SENTENCE_END
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count();
    let paragraphs = PARAGRAPH_BREAK
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);

    Ok(format!(
        "## Text Statistics\n\n| Metric | Value |\n|---|---|\n| Words | {} |\n\
         | Characters | {} |\n| Characters (no spaces) | {} |\n| Sentences | {} |\n\
         | Paragraphs | {} |\n| Reading time | {} min |",
        words, characters, non_space, sentences, paragraphs, minutes
    ))
}

/// Converts `text` according to `mode`.
///
/// # Errors
///
/// Fails on an unknown mode.
pub fn convert_case(mode: &str, text: &str) -> Result<String, TransformError> {
    let converted = match mode.to_ascii_lowercase().as_str() {
        "upper" => text.to_uppercase(),
        "lower" => text.to_lowercase(),
        "title" => text.to_title_case(),
        "snake" => text.to_snake_case(),
        "kebab" => text.to_kebab_case(),
        "camel" => text.to_lower_camel_case(),
        other => {
            return Err(TransformError::new(format!(
                "Unknown case `{}`; choose upper, lower, title, snake, kebab or camel",
                other
            )));
        }
    };
    Ok(converted)
}

/// `CASE_CONVERT mode;;;text`
pub fn case_convert(params: &[String]) -> TransformResult {
    let text = raw_param(params, 1);
    if text.trim().is_empty() {
        return Err(TransformError::new("Enter some text to convert"));
    }
    let converted = convert_case(param(params, 0), text)?;
    Ok(format!("## Converted Text\n\n{}", fenced("", &converted)))
}

/// Lowercase, hyphen-separated ASCII slug.
pub fn slug(text: &str) -> String {
    NON_SLUG
        .replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// `SLUGIFY text`
pub fn slugify(params: &[String]) -> TransformResult {
    let result = slug(raw_param(params, 0));
    if result.is_empty() {
        return Err(TransformError::new(
            "Text must contain at least one letter or digit",
        ));
    }
    Ok(format!("## URL Slug\n\n{}", fenced("", &result)))
}

/// `BASE64 mode;;;text` where mode is `encode` or `decode`.
pub fn base64(params: &[String]) -> TransformResult {
    let text = raw_param(params, 1);
    match param(params, 0).to_ascii_lowercase().as_str() {
        "encode" | "" => Ok(format!(
            "## Base64 Encoded\n\n{}",
            fenced("", &STANDARD.encode(text.as_bytes()))
        )),
        "decode" => {
            let bytes = STANDARD
                .decode(text.trim())
                .map_err(|e| TransformError::new(format!("Invalid Base64 input: {}", e)))?;
            let decoded = String::from_utf8(bytes)
                .map_err(|_| TransformError::new("Decoded data is not valid UTF-8 text"))?;
            Ok(format!("## Base64 Decoded\n\n{}", fenced("", &decoded)))
        }
        other => Err(TransformError::new(format!(
            "Unknown mode `{}`; choose encode or decode",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_modes() {
        assert_eq!(convert_case("snake", "Hello World").unwrap(), "hello_world");
        assert_eq!(convert_case("kebab", "someValue here").unwrap(), "some-value-here");
        assert_eq!(convert_case("camel", "make it so").unwrap(), "makeItSo");
        assert_eq!(convert_case("title", "the quick fox").unwrap(), "The Quick Fox");
        assert_eq!(convert_case("UPPER", "abc").unwrap(), "ABC");
        assert_eq!(convert_case("snake", "HTTPServer").unwrap(), "http_server");
        assert_eq!(convert_case("kebab", "parseHTTPResponse").unwrap(), "parse-http-response");
        assert_eq!(convert_case("camel", "XML http request").unwrap(), "xmlHttpRequest");
        assert!(convert_case("sarcastic", "abc").is_err());
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("  Hello, World! 2024 "), "hello-world-2024");
        assert_eq!(slug("---"), "");
    }
}
