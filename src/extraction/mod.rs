//! Container Track Extraction
//!
//! Finds the Atmos-capable audio track in a media container and demuxes it
//! to an elementary stream file that the decoder can read.

pub mod extract;
pub mod probe;
pub mod select;
pub mod temp;

use std::path::{Path, PathBuf};

pub use probe::AudioStream;
pub use select::{select_track, TrackSelection};
pub use temp::TempFiles;

use crate::audio::StreamFormat;
use crate::config::ToolsConfig;
use crate::error::{AtmosDecodeError, Result};

/// External media toolkit used for probing and demuxing.
pub trait MediaTools {
    fn probe_audio_streams(&self, path: &Path) -> Result<Vec<AudioStream>>;

    fn extract_stream(&self, input: &Path, stream_index: u32, dest: &Path) -> Result<()>;
}

/// ffprobe + ffmpeg
#[derive(Debug, Clone)]
pub struct FfmpegTools {
    pub ffprobe: String,
    pub ffmpeg: String,
}

impl FfmpegTools {
    pub fn from_config(tools: &ToolsConfig) -> Self {
        Self { ffprobe: tools.ffprobe.clone(), ffmpeg: tools.ffmpeg.clone() }
    }
}

impl MediaTools for FfmpegTools {
    fn probe_audio_streams(&self, path: &Path) -> Result<Vec<AudioStream>> {
        probe::probe_audio_streams(&self.ffprobe, path)
    }

    fn extract_stream(&self, input: &Path, stream_index: u32, dest: &Path) -> Result<()> {
        extract::extract_stream(&self.ffmpeg, input, stream_index, dest)
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedTrack {
    pub path: PathBuf,
    pub selection: TrackSelection,
}

/// Whether `path` should be treated as a container rather than a raw stream.
pub fn is_container(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext)))
}

/// Temp file name for a track extracted from `input`.
pub fn temp_path_for(input: &Path, format: StreamFormat, temp_dir: &Path) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    temp_dir.join(format!("extracted_atmos_{}.{}", stem, format.extension()))
}

/// Probe `input`, pick its Atmos track and demux it into `temp_dir`.
///
/// The extracted file is registered in `temps` before ffmpeg runs so a
/// partially written file is cleaned up too.
pub fn extract_atmos_track<T: MediaTools + ?Sized>(
    tools: &T,
    input: &Path,
    temp_dir: &Path,
    temps: &mut TempFiles,
) -> Result<ExtractedTrack> {
    println!("Analyzing {} for Dolby Atmos audio tracks...", input.display());

    let input = std::path::absolute(input)?;
    let streams = tools.probe_audio_streams(&input)?;

    let selection = select_track(&streams).ok_or_else(|| AtmosDecodeError::NoSupportedTrack(input.clone()))?;
    if selection.fallback {
        log::warn!(
            "No stream is marked as Atmos; using {} stream {} which may not contain Atmos content",
            selection.format,
            selection.stream_index
        );
    }

    let dest = temp_path_for(&input, selection.format, temp_dir);
    temps.register(&dest);

    println!("Extracting audio track {} to {}...", selection.stream_index, dest.display());
    tools.extract_stream(&input, selection.stream_index, &dest)?;
    log::info!("Extracted {} track to {}", selection.format, dest.display());

    Ok(ExtractedTrack { path: dest, selection })
}
