//! Audio track selection

use super::probe::AudioStream;
use crate::audio::StreamFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSelection {
    pub stream_index: u32,
    pub format: StreamFormat,
    /// True when no stream carried an Atmos marker and a plain
    /// E-AC3/TrueHD stream was chosen instead.
    pub fallback: bool,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn is_atmos_flagged(stream: &AudioStream) -> bool {
    contains_ci(&stream.codec_long_name, "atmos")
        || stream.tag("title").is_some_and(|t| contains_ci(t, "atmos"))
        || stream.tag("handler_name").is_some_and(|t| contains_ci(t, "atmos"))
}

fn is_truehd_codec(codec: &str) -> bool {
    codec == "truehd" || codec.contains("mlp")
}

/// Pick the stream to decode.
///
/// Atmos-marked E-AC3 (or E-AC3/JOC) and TrueHD streams win. Otherwise the
/// first plain E-AC3 or TrueHD stream is used, which may not carry Atmos.
pub fn select_track(streams: &[AudioStream]) -> Option<TrackSelection> {
    let flagged = streams.iter().find_map(|stream| {
        let codec = stream.codec_name.to_lowercase();
        let atmos = is_atmos_flagged(stream);

        let format = match codec.as_str() {
            "eac3" | "ac3" if atmos || contains_ci(&stream.codec_long_name, "joc") => StreamFormat::Eac3,
            c if atmos && is_truehd_codec(c) => StreamFormat::TrueHd,
            _ => return None,
        };

        Some(TrackSelection { stream_index: stream.index, format, fallback: false })
    });

    flagged.or_else(|| {
        streams.iter().find_map(|stream| {
            let codec = stream.codec_name.to_lowercase();
            let format = if codec == "eac3" {
                StreamFormat::Eac3
            } else if is_truehd_codec(&codec) {
                StreamFormat::TrueHd
            } else {
                return None;
            };
            Some(TrackSelection { stream_index: stream.index, format, fallback: true })
        })
    })
}
