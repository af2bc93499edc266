//! Output naming and decode job planning

use std::path::{Path, PathBuf};

use crate::audio::{ChannelLayout, StreamFormat};
use crate::config::DecodeConfig;
use crate::decoder::{ChannelSelection, DecodeCommand, DecodeJob, DecoderSettings};

/// Replace the last extension of `base` with `suffix` (which includes the dot).
/// A base without extension gets `suffix` appended.
pub fn replace_extension(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.with_extension("").into_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// `<base>.<NN>_<Name>.wav`, or `<base>.<Name>.wav` without numbers
pub fn channel_output_path(base: &Path, index: usize, name: &str, no_numbers: bool) -> PathBuf {
    let suffix = if no_numbers {
        format!(".{}.wav", name)
    } else {
        format!(".{:02}_{}.wav", index + 1, name)
    };
    replace_extension(base, &suffix)
}

/// Explicit output is used verbatim, otherwise `<input>.wav`.
pub fn multichannel_output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => replace_extension(input, ".wav"),
    }
}

#[derive(Debug, Clone)]
pub struct DecodePlan {
    pub source: PathBuf,
    pub format: StreamFormat,
    pub layout: &'static ChannelLayout,
    pub jobs: Vec<DecodeJob>,
    pub sequential: bool,
}

impl DecodePlan {
    /// Plan the decoder runs for `source`.
    ///
    /// `input` and `output` are the user-facing paths; output names derive
    /// from them even when `source` is an extracted temp stream.
    pub fn build(
        settings: &DecoderSettings,
        options: &DecodeConfig,
        layout: &'static ChannelLayout,
        source: &Path,
        format: StreamFormat,
        input: &Path,
        output: Option<&Path>,
    ) -> Self {
        let job = |out: PathBuf, channel: ChannelSelection| DecodeJob {
            command: DecodeCommand::build(settings, source, &out, format, channel, layout.config_id),
            output: out,
            channel,
        };

        let jobs = if options.multi_channel {
            vec![job(multichannel_output_path(input, output), ChannelSelection::All)]
        } else {
            let base = output.unwrap_or(input);
            layout
                .channel_names
                .iter()
                .enumerate()
                .map(|(index, name)| {
                    job(
                        channel_output_path(base, index, name, options.no_numbers),
                        ChannelSelection::Channel(index),
                    )
                })
                .collect()
        };

        Self {
            source: source.to_path_buf(),
            format,
            layout,
            jobs,
            sequential: options.single || options.multi_channel,
        }
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.jobs.iter().map(|job| job.output.as_path())
    }
}
