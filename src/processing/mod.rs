//! Decode Run Pipeline

pub mod orchestrator;
pub mod planner;

pub use orchestrator::{AtmosDecoder, DecodeReport, DecodeStage};
pub use planner::{channel_output_path, multichannel_output_path, DecodePlan};
