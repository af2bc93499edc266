//! Stream copy of a single audio track with ffmpeg.

use std::path::Path;
use std::process::Command;

use crate::error::{AtmosDecodeError, Result};

/// Demux stream `stream_index` of `input` into `dest` without re-encoding.
pub fn extract_stream(ffmpeg: &str, input: &Path, stream_index: u32, dest: &Path) -> Result<()> {
    log::debug!("Extracting stream {} from {} to {}", stream_index, input.display(), dest.display());

    let output = Command::new(ffmpeg)
        .arg("-y")
        .arg("-i")
        .arg(input)
        .arg("-map")
        .arg(format!("0:{}", stream_index))
        .args(["-c:a", "copy"])
        .arg(dest)
        .output()
        .map_err(|e| AtmosDecodeError::extract(ffmpeg, stream_index, format!("failed to run: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let last_line = stderr.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("");
        return Err(AtmosDecodeError::extract(
            ffmpeg,
            stream_index,
            format!("exit code {}: {}", output.status.code().unwrap_or(-1), last_line.trim()),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_extract_tool() {
        let err = extract_stream(
            "atmos-decode-no-such-ffmpeg",
            Path::new("in.mkv"),
            1,
            Path::new("out.thd"),
        )
        .unwrap_err();

        match err {
            AtmosDecodeError::ExtractFailed { stream_index, .. } => assert_eq!(stream_index, 1),
            other => panic!("unexpected error: {}", other),
        }
    }
}
