//! Toolsmith: a catalog of AI generation and local utility tools.
//!
//! This crate ties the workspace together. It loads layered configuration,
//! persists session state to disk, picks a remote driver and exposes the
//! generation pipeline through [`Toolsmith`] and the `toolsmith` binary.
//!
//! # Example
//!
//! ```no_run
//! use toolsmith::{Toolsmith, ToolsmithConfig};
//! use toolsmith_core::ToolInputs;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ToolsmithConfig::load(None)?;
//! let app = Toolsmith::from_config(&config, "local").await?;
//! let submission = app
//!     .run_tool("slug-generator", ToolInputs::new().with("text", "Hello World"), None)
//!     .await;
//! println!("{}", submission.outcome().display_text());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
pub mod cli;
mod config;
mod driver;
mod store;

pub use app::Toolsmith;
pub use self::config::{
    CreditsConfig, DEFAULT_CONFIG, ENV_PREFIX, LocalConfig, QuotaConfig, ToolsmithConfig,
};
pub use driver::{OfflineDriver, remote_driver};
pub use store::JsonFileStore;

pub use toolsmith_core::{
    Dispatch, FailureReason, GenerationOutcome, GenerationRequest, ImagePayload, OutputKind,
    RemoteMode, ToolInputs,
};
pub use toolsmith_error::{ToolsmithError, ToolsmithErrorKind, ToolsmithResult};
pub use toolsmith_pipeline::{GenerationPipeline, PipelineStage, Submission, ToolCatalog};
