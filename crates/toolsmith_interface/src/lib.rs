//! Trait definitions for the collaborators of the Toolsmith pipeline.
//!
//! The pipeline depends only on these traits; concrete drivers, ledgers and
//! stores are supplied by the application.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod credits;
mod driver;
mod store;

pub use credits::CreditLedger;
pub use driver::GenerationDriver;
pub use store::KeyValueStore;
