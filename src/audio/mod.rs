//! Audio Stream Metadata
//!
//! Channel layout table, elementary stream format detection and
//! inspection of the WAV files produced by the decoder.

pub mod format;
pub mod layout;
pub mod wav;

pub use format::StreamFormat;
pub use layout::{ChannelLayout, DEFAULT_LAYOUT, LAYOUTS};
pub use wav::{AudioFormat, WavInfo};
