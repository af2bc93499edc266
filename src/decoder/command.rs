//! Decoder pipeline command construction
//!
//! The Dolby Reference Player ships a Windows `gst-launch-1.0.exe` with its
//! own `dlb*` GStreamer elements. A run is a linear pipeline:
//! `filesrc ! <parse> ! dlbaudiodecbin ! [deinterleave] ! wavenc ! filesink`.

use std::fmt;
use std::path::Path;
use std::process::Command;

use crate::audio::StreamFormat;
use crate::config::ToolsConfig;

/// Which decoded channels end up in the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSelection {
    All,
    Channel(usize),
}

/// Static decoder settings shared by every command of a run
#[derive(Debug, Clone)]
pub struct DecoderSettings {
    /// Compatibility layer hosting the decoder, e.g. `wine`. Empty runs the
    /// decoder directly with native paths.
    pub compat_layer: String,
    pub gst_launch: String,
    pub gst_plugin_path: String,
    pub truehd_presentation: u32,
}

impl DecoderSettings {
    pub fn from_config(tools: &ToolsConfig, truehd_presentation: u32) -> Self {
        Self {
            compat_layer: tools.compat_layer.clone(),
            gst_launch: tools.gst_launch.clone(),
            gst_plugin_path: tools.gst_plugin_path.clone(),
            truehd_presentation,
        }
    }

    fn uses_compat_layer(&self) -> bool {
        !self.compat_layer.trim().is_empty()
    }

    /// Render a local path the way the decoder process expects it.
    pub fn decoder_path(&self, path: &Path) -> String {
        let abs = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        if self.uses_compat_layer() {
            wine_path(&abs.to_string_lossy())
        } else {
            abs.to_string_lossy().into_owned()
        }
    }
}

/// Map a Unix path onto Wine's `z:` drive, with backslashes escaped for
/// gst-launch's property parser.
pub fn wine_path(abs_path: &str) -> String {
    format!("z:{}", abs_path.replace('/', "\\")).replace('\\', "\\\\")
}

/// A fully specified external process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl DecodeCommand {
    pub fn build(
        settings: &DecoderSettings,
        input: &Path,
        output: &Path,
        format: StreamFormat,
        channel: ChannelSelection,
        out_ch_config: u32,
    ) -> Self {
        let mut args = Vec::with_capacity(24);

        let program = if settings.uses_compat_layer() {
            args.push(settings.gst_launch.clone());
            settings.compat_layer.clone()
        } else {
            settings.gst_launch.clone()
        };

        args.push("--gst-plugin-path".to_string());
        args.push(settings.gst_plugin_path.clone());

        args.push("filesrc".to_string());
        args.push(format!("location={}", settings.decoder_path(input)));
        args.push("!".to_string());

        match format {
            StreamFormat::Eac3 => {
                args.push("dlbac3parse".to_string());
                args.push("!".to_string());
                args.push("dlbaudiodecbin".to_string());
            }
            StreamFormat::TrueHd => {
                args.push("dlbtruehdparse".to_string());
                args.push("align-major-sync=false".to_string());
                args.push("!".to_string());
                args.push("dlbaudiodecbin".to_string());
                args.push(format!("truehddec-presentation={}", settings.truehd_presentation));
            }
        }
        args.push(format!("out-ch-config={}", out_ch_config));
        args.push("!".to_string());

        if let ChannelSelection::Channel(index) = channel {
            args.push("deinterleave".to_string());
            args.push("name=d".to_string());
            args.push(format!("d.src_{}", index));
            args.push("!".to_string());
        }

        args.push("wavenc".to_string());
        args.push("!".to_string());
        args.push("filesink".to_string());
        args.push(format!("location={}", settings.decoder_path(output)));

        Self { program, args }
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for DecodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.contains(|c: char| c.is_whitespace() || c == '"') {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}
