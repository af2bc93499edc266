//! External decoder invocation
//!
//! Builds and runs the Dolby Reference Player pipelines.

pub mod command;
pub mod runner;

pub use command::{ChannelSelection, DecodeCommand, DecoderSettings};
pub use runner::{run_concurrent, run_sequential, DecodeJob, JobOutcome};
