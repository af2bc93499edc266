//! atmos-decode - Dolby Atmos to WAV decoding front-end
//!
//! Detects E-AC3/JOC and TrueHD streams (raw or inside media containers) and
//! drives the Dolby Reference Player decoder to produce per-channel or
//! multi-channel WAV files.

pub mod audio;
pub mod config;
pub mod decoder;
pub mod error;
pub mod extraction;
pub mod processing;

pub use config::{Args, Config};
pub use error::{AtmosDecodeError, Result};
pub use processing::{AtmosDecoder, DecodeReport};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// `debug` when verbose, `info` otherwise; `RUST_LOG` takes precedence.
pub fn init_logging(verbose: bool) {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init()
        .ok();
}

pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl std::fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{} - {}", self.name, self.version, self.description)
    }
}
