//! Core data types for the Toolsmith generation pipeline.
//!
//! This crate provides the request, routing and outcome types shared by the
//! transform engine, the pipeline and the remote drivers.

mod dispatch;
mod inputs;
mod observability;
mod outcome;
mod request;

pub use dispatch::{
    Dispatch, ERROR_SENTINEL, LOCAL_SENTINEL, PARAM_DELIMITER, RemoteCall, RemoteMode,
};
pub use inputs::{InputValue, ToolInputs};
pub use observability::{LogFormat, init_tracing};
pub use outcome::{FailureReason, GenerationOutcome};
pub use request::{
    GenerationRequest, GenerationRequestBuilder, ImagePayload, MAX_IMAGE_BYTES, OutputKind,
};
