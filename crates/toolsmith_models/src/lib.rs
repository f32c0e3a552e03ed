//! Remote generation drivers for Toolsmith.
//!
//! Drivers implement [`toolsmith_interface::GenerationDriver`] and classify
//! provider failures into [`toolsmith_error::RemoteErrorKind`] so the retry
//! policy can tell transient errors from permanent ones.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod gemini;

pub use gemini::{
    Candidate, Content, GeminiConfig, GeminiDriver, GenerateContentRequest,
    GenerateContentRequestBuilder, GenerateContentResponse, GenerationConfig, InlineData, Part,
    PromptFeedback,
};
