//! WAV output inspection

use std::fmt;
use std::path::{Path, PathBuf};
use hound::{SampleFormat, WavReader};
use crate::error::{AtmosDecodeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Int,
    Float,
}

impl AudioFormat {
    pub fn name(&self) -> &'static str {
        match self {
            AudioFormat::Int => "int",
            AudioFormat::Float => "float",
        }
    }

    fn from_sample_format(format: SampleFormat) -> Self {
        match format {
            SampleFormat::Int => AudioFormat::Int,
            SampleFormat::Float => AudioFormat::Float,
        }
    }
}

/// Header summary of a decoded WAV file
#[derive(Debug, Clone)]
pub struct WavInfo {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub format: AudioFormat,
    pub total_frames: u32,
    pub duration: f64,
}

impl WavInfo {
    pub fn from_file(path: &Path) -> Result<Self> {
        let reader = WavReader::open(path).map_err(|e| map_hound_error(path, e))?;
        let spec = reader.spec();
        let total_frames = reader.duration();
        let duration = if spec.sample_rate > 0 {
            total_frames as f64 / spec.sample_rate as f64
        } else {
            0.0
        };

        Ok(Self {
            path: path.to_path_buf(),
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            format: AudioFormat::from_sample_format(spec.sample_format),
            total_frames,
            duration,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.total_frames == 0
    }
}

impl fmt::Display for WavInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.2}s, {}Hz, {}ch, {}-bit {}",
            self.path.display(),
            self.duration,
            self.sample_rate,
            self.channels,
            self.bits_per_sample,
            self.format.name()
        )
    }
}

fn map_hound_error(path: &Path, err: hound::Error) -> AtmosDecodeError {
    match err {
        hound::Error::IoError(io) => AtmosDecodeError::Io(io),
        other => AtmosDecodeError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{}: {}", path.display(), other),
        )),
    }
}
