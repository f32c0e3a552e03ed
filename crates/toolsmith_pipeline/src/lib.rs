//! Generation request pipeline for Toolsmith.
//!
//! Holds the tool catalog and runs submissions through validation, prompt
//! building, credit reservation and local or remote execution.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use toolsmith_core::{GenerationRequest, ToolInputs};
//! use toolsmith_interface::GenerationDriver;
//! use toolsmith_pipeline::{GenerationPipeline, Session};
//!
//! # async fn example(driver: Arc<dyn GenerationDriver>) {
//! let pipeline = GenerationPipeline::builder().driver(driver).build();
//! let session = Session::new("session-1", "guest");
//! let request = GenerationRequest::new(
//!     "hex-to-rgb",
//!     ToolInputs::new().with("hex", "#FF0000"),
//! );
//! let submission = pipeline.submit(&session, request).await;
//! println!("{}", submission.outcome().display_text());
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod catalog;
mod memory;
mod pipeline;
mod postprocess;
mod sequence;
mod session;
mod tool;
mod usage;
mod validate;

pub use catalog::ToolCatalog;
pub use memory::{InMemoryCreditLedger, InMemoryStore};
pub use pipeline::{
    GenerationPipeline, GenerationPipelineBuilder, PipelineConfig, PipelineStage, Submission,
};
pub use postprocess::{finish_payload, strip_wrapping_fence};
pub use sequence::{LatestResult, SubmissionTracker};
pub use session::{DayClock, FixedClock, LocalClock, QuotaSlot, Session, SessionState};
pub use tool::{
    FieldCheck, FieldKind, FieldSpec, ImageRequirement, MAX_CREDIT_COST, OutputFormat, Template,
    ToolSpec,
};
pub use usage::UsageRecorder;
pub use validate::validate_request;
