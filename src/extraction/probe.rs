//! Audio stream probing using ffprobe's JSON output.

use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use serde::Deserialize;

use crate::error::{AtmosDecodeError, Result};

/// One audio stream as reported by `ffprobe -show_streams`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AudioStream {
    pub index: u32,
    pub codec_name: String,
    pub codec_long_name: String,
    pub channels: Option<u32>,
    pub tags: HashMap<String, String>,
}

impl AudioStream {
    /// Tag lookup ignoring key case (Matroska tags are often upper case).
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<AudioStream>,
}

/// Parse ffprobe JSON into the list of audio streams.
pub fn parse_probe_json(json: &[u8]) -> serde_json::Result<Vec<AudioStream>> {
    let output: ProbeOutput = serde_json::from_slice(json)?;
    Ok(output.streams)
}

/// Run ffprobe against `path`, restricted to audio streams.
pub fn probe_audio_streams(ffprobe: &str, path: &Path) -> Result<Vec<AudioStream>> {
    log::debug!("Probing file: {}", path.display());

    let output = Command::new(ffprobe)
        .args(["-v", "quiet", "-print_format", "json", "-show_streams", "-select_streams", "a"])
        .arg(path)
        .output()
        .map_err(|e| AtmosDecodeError::probe(ffprobe, path, format!("failed to run: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AtmosDecodeError::probe(
            ffprobe,
            path,
            format!("exit code {}: {}", output.status.code().unwrap_or(-1), stderr.trim()),
        ));
    }

    let streams = parse_probe_json(&output.stdout)
        .map_err(|e| AtmosDecodeError::probe(ffprobe, path, format!("invalid JSON output: {}", e)))?;

    log::debug!("Found {} audio stream(s)", streams.len());
    Ok(streams)
}
