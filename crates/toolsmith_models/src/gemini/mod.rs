//! Google Gemini REST integration.

mod client;
mod dto;
mod errors;

pub use client::{GeminiConfig, GeminiDriver};
pub use dto::{
    Candidate, Content, GenerateContentRequest, GenerateContentRequestBuilder,
    GenerateContentResponse, GenerationConfig, InlineData, Part, PromptFeedback,
};
