//! Routing decisions produced by tool templates.

use crate::ImagePayload;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use toolsmith_error::TemplateError;

/// Prefix marking a legacy prompt that should run locally.
pub const LOCAL_SENTINEL: &str = "__LOCAL__:";
/// Prefix marking a legacy prompt that carries a template error.
pub const ERROR_SENTINEL: &str = "__ERROR__:";
/// Separator between the command tag and its parameters in legacy prompts.
pub const PARAM_DELIMITER: &str = ";;;";

/// Remote operation to invoke.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RemoteMode {
    /// Text in, text out.
    #[default]
    Text,
    /// Text in, image out.
    Image,
    /// Text plus an image in, text out.
    AnalyzeImage,
}

/// Where a submission runs, decided by the tool template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Dispatch {
    /// Run a local transform.
    Local {
        /// Command tag, e.g. `HEX_RGB`
        command: String,
        /// Positional parameters
        params: Vec<String>,
    },
    /// Call the remote generation API.
    Remote {
        /// Prompt text
        prompt: String,
        /// Operation to call
        mode: RemoteMode,
    },
}

impl Dispatch {
    /// Local dispatch from anything string-like.
    pub fn local<I, S>(command: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Dispatch::Local {
            command: command.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Remote dispatch.
    pub fn remote(prompt: impl Into<String>, mode: RemoteMode) -> Self {
        Dispatch::Remote {
            prompt: prompt.into(),
            mode,
        }
    }

    /// Interprets a prompt that may carry the legacy routing prefixes.
    ///
    /// `__LOCAL__:TAG;;;a;;;b` becomes a local dispatch, `__ERROR__:msg`
    /// becomes a template error, anything else is sent remotely with `mode`.
    ///
    /// # Examples
    ///
    /// ```
    /// use toolsmith_core::{Dispatch, RemoteMode};
    ///
    /// let dispatch =
    ///     Dispatch::from_sentinel_prompt("__LOCAL__:PERCENT_CALC;;;20;;;50", RemoteMode::Text)
    ///         .unwrap();
    /// assert_eq!(dispatch, Dispatch::local("PERCENT_CALC", ["20", "50"]));
    /// ```
    pub fn from_sentinel_prompt(prompt: &str, mode: RemoteMode) -> Result<Self, TemplateError> {
        if let Some(message) = prompt.strip_prefix(ERROR_SENTINEL) {
            return Err(TemplateError::new(message.trim()));
        }
        if let Some(body) = prompt.strip_prefix(LOCAL_SENTINEL) {
            let mut parts = body.split(PARAM_DELIMITER);
            let command = parts.next().unwrap_or_default().trim().to_string();
            return Ok(Dispatch::Local {
                command,
                params: parts.map(str::to_string).collect(),
            });
        }
        Ok(Dispatch::remote(prompt, mode))
    }

    /// True for local dispatches.
    pub fn is_local(&self) -> bool {
        matches!(self, Dispatch::Local { .. })
    }
}

/// A fully prepared remote invocation handed to a driver.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct RemoteCall {
    /// Prompt text
    prompt: String,
    /// Operation to call
    mode: RemoteMode,
    /// Inline image for [`RemoteMode::AnalyzeImage`]
    image: Option<ImagePayload>,
}

impl RemoteCall {
    /// Creates a remote call.
    pub fn new(prompt: impl Into<String>, mode: RemoteMode, image: Option<ImagePayload>) -> Self {
        Self {
            prompt: prompt.into(),
            mode,
            image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_sentinel_is_template_error() {
        let err = Dispatch::from_sentinel_prompt(
            "__ERROR__: Please upload an image or ask a question",
            RemoteMode::AnalyzeImage,
        )
        .unwrap_err();
        assert_eq!(err.message, "Please upload an image or ask a question");
    }

    #[test]
    fn test_plain_prompt_is_remote() {
        let dispatch = Dispatch::from_sentinel_prompt("Write a haiku", RemoteMode::Text).unwrap();
        assert_eq!(dispatch, Dispatch::remote("Write a haiku", RemoteMode::Text));
        assert!(!dispatch.is_local());
    }

    #[test]
    fn test_local_sentinel_without_params() {
        let dispatch = Dispatch::from_sentinel_prompt("__LOCAL__:UUID", RemoteMode::Text).unwrap();
        assert_eq!(dispatch, Dispatch::local("UUID", Vec::<String>::new()));
    }

    #[test]
    fn test_serializes_as_tagged_variant() {
        let json = serde_json::to_value(Dispatch::local("BASE64", ["encode", "hi"])).unwrap();
        assert_eq!(json["kind"], "local");
        assert_eq!(json["command"], "BASE64");
    }
}
