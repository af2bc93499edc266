//! Configuration management for decode runs

use crate::audio::layout::{self, ChannelLayout, DEFAULT_LAYOUT};
use crate::error::{AtmosDecodeError, Result};
use clap::builder::PossibleValuesParser;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_GST_LAUNCH: &str = r"C:\Program Files\Dolby\Dolby Reference Player\gst-launch-1.0.exe";
pub const DEFAULT_GST_PLUGIN_PATH: &str = r"C:\Program Files\Dolby\Dolby Reference Player\gst-plugins";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub tools: ToolsConfig,
    pub decode: DecodeConfig,
    pub extraction: ExtractionConfig,
}

/// External programs. An empty `compat_layer` runs `gst_launch` directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub compat_layer: String,
    pub gst_launch: String,
    pub gst_plugin_path: String,
    pub ffprobe: String,
    pub ffmpeg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    pub channels: String,
    pub truehd_presentation: u32,
    pub no_numbers: bool,
    pub single: bool,
    pub multi_channel: bool,
    pub keep_temp: bool,
    pub fail_on_decode_error: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub container_extensions: Vec<String>,
    pub temp_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::new(),
            output_path: None,
            tools: ToolsConfig::default(),
            decode: DecodeConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            compat_layer: "wine".to_string(),
            gst_launch: DEFAULT_GST_LAUNCH.to_string(),
            gst_plugin_path: DEFAULT_GST_PLUGIN_PATH.to_string(),
            ffprobe: "ffprobe".to_string(),
            ffmpeg: "ffmpeg".to_string(),
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            channels: DEFAULT_LAYOUT.to_string(),
            truehd_presentation: 16,
            no_numbers: false,
            single: false,
            multi_channel: false,
            keep_temp: false,
            fail_on_decode_error: true,
            dry_run: false,
            verbose: false,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            container_extensions: ["mp4", "mkv", "mov", "m4v", "ts", "mts"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            temp_dir: None,
        }
    }
}

impl Config {
    /// Selected output layout. Only valid after `validate`.
    pub fn layout(&self) -> Result<&'static ChannelLayout> {
        ChannelLayout::find(&self.decode.channels).ok_or_else(|| {
            AtmosDecodeError::config(format!(
                "Unknown channel layout '{}' (expected one of: {})",
                self.decode.channels,
                layout::labels().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    /// Directory for extracted elementary streams
    pub fn temp_dir(&self) -> PathBuf {
        self.extraction.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn verbose(&self) -> bool {
        self.decode.verbose
    }
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "atmos-decode",
    about = "Decode Dolby Atmos audio to WAV via the Dolby Reference Player",
    version,
    author,
    args_override_self = true
)]
pub struct Args {
    #[arg(
        short = 'i',
        long = "input",
        required_unless_present = "list_layouts",
        help = "Path to source file (video container or raw Dolby audio)"
    )]
    pub input: Option<PathBuf>,

    #[arg(short = 'o', long = "output", help = "Path to output base file")]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'c',
        long = "channels",
        value_parser = PossibleValuesParser::new(layout::labels()),
        help = "Output channel configuration [default: 9.1.6]"
    )]
    pub channels: Option<String>,

    #[arg(
        short = 'n',
        long = "no_numbers",
        visible_alias = "no-numbers",
        alias = "nn",
        help = "Do not use numbers in output channel names"
    )]
    pub no_numbers: bool,

    #[arg(short = 's', long = "single", help = "Decode one channel at a time")]
    pub single: bool,

    #[arg(
        short = 'm',
        long = "multi_channel",
        visible_alias = "multi-channel",
        help = "Generate a single multi-channel WAV file instead of separate mono files"
    )]
    pub multi_channel: bool,

    #[arg(
        short = 'k',
        long = "keep_temp",
        visible_alias = "keep-temp",
        help = "Keep temporary extracted audio files"
    )]
    pub keep_temp: bool,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,

    #[arg(long = "dry-run", help = "Print decoder commands without running them")]
    pub dry_run: bool,

    #[arg(long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(long = "list-layouts", help = "List supported channel layouts and exit")]
    pub list_layouts: bool,
}

impl Config {
    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        config.input_path = args
            .input
            .ok_or_else(|| AtmosDecodeError::config("Input file is required"))?;
        if args.output.is_some() {
            config.output_path = args.output;
        }
        if let Some(channels) = args.channels {
            config.decode.channels = channels;
        }
        config.decode.no_numbers |= args.no_numbers;
        config.decode.single |= args.single;
        config.decode.multi_channel |= args.multi_channel;
        config.decode.keep_temp |= args.keep_temp;
        config.decode.verbose |= args.verbose;
        config.decode.dry_run |= args.dry_run;

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AtmosDecodeError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| AtmosDecodeError::config(format!("Failed to parse config file: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        self.layout()?;

        if self.tools.gst_launch.trim().is_empty() {
            return Err(AtmosDecodeError::config("gst_launch path must not be empty"));
        }
        if self.tools.ffprobe.trim().is_empty() || self.tools.ffmpeg.trim().is_empty() {
            return Err(AtmosDecodeError::config("ffprobe and ffmpeg commands must not be empty"));
        }
        if self.extraction.container_extensions.is_empty() {
            return Err(AtmosDecodeError::config("At least one container extension is required"));
        }
        if self.decode.single && self.decode.multi_channel {
            log::warn!("--single has no effect together with --multi_channel");
        }

        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AtmosDecodeError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| AtmosDecodeError::config(format!("Failed to write config file: {}", e)))
    }
}
