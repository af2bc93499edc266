//! Decode run orchestration
//!
//! extract (containers only) -> sniff -> plan -> execute -> clean up

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::audio::{StreamFormat, WavInfo};
use crate::config::Config;
use crate::decoder::{self, DecoderSettings, JobOutcome};
use crate::error::{AtmosDecodeError, Result};
use crate::extraction::{self, FfmpegTools, MediaTools, TempFiles};
use super::planner::DecodePlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    Idle,
    Extracting,
    Sniffing,
    BuildingCommands,
    Executing,
    CleaningUp,
    Done,
    Failed,
}

#[derive(Debug)]
pub struct DecodeReport {
    pub input: PathBuf,
    pub format: StreamFormat,
    pub layout: &'static str,
    pub outputs: Vec<PathBuf>,
    pub failed: Vec<JobOutcome>,
    pub wav_info: Vec<WavInfo>,
    pub dry_run: bool,
    pub processing_time_secs: f64,
}

impl DecodeReport {
    pub fn succeeded(&self) -> usize {
        self.outputs.len() - self.failed.len()
    }
}

pub struct AtmosDecoder<T: MediaTools = FfmpegTools> {
    config: Config,
    tools: T,
    settings: DecoderSettings,
}

impl AtmosDecoder<FfmpegTools> {
    pub fn new(config: Config) -> Self {
        let tools = FfmpegTools::from_config(&config.tools);
        Self::with_tools(config, tools)
    }
}

impl<T: MediaTools> AtmosDecoder<T> {
    pub fn with_tools(config: Config, tools: T) -> Self {
        let settings = DecoderSettings::from_config(&config.tools, config.decode.truehd_presentation);
        Self { config, tools, settings }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn enter(&self, stage: DecodeStage) {
        log::debug!("Stage: {:?}", stage);
    }

    /// Decode the configured input. Temp files are released on every path.
    pub fn decode(&self) -> Result<DecodeReport> {
        self.enter(DecodeStage::Idle);
        let input = self.config.input_path.as_path();

        if !input.is_file() {
            self.enter(DecodeStage::Failed);
            let shown = std::path::absolute(input).unwrap_or_else(|_| input.to_path_buf());
            return Err(AtmosDecodeError::InputNotFound(shown));
        }

        let mut temps = TempFiles::new(self.config.decode.keep_temp);
        let result = self.run(input, &mut temps);

        self.enter(DecodeStage::CleaningUp);
        temps.release();

        self.enter(if result.is_ok() { DecodeStage::Done } else { DecodeStage::Failed });
        result
    }

    fn run(&self, input: &Path, temps: &mut TempFiles) -> Result<DecodeReport> {
        let start_time = Instant::now();

        let source = if extraction::is_container(input, &self.config.extraction.container_extensions) {
            self.enter(DecodeStage::Extracting);
            extraction::extract_atmos_track(&self.tools, input, &self.config.temp_dir(), temps)?.path
        } else {
            input.to_path_buf()
        };

        self.enter(DecodeStage::Sniffing);
        let format = StreamFormat::sniff_file(&source)?;
        log::info!("Detected {} stream in {}", format, source.display());

        self.enter(DecodeStage::BuildingCommands);
        let layout = self.config.layout()?;
        let plan = DecodePlan::build(
            &self.settings,
            &self.config.decode,
            layout,
            &source,
            format,
            input,
            self.config.output_path.as_deref(),
        );
        log::info!("Output layout {}, {} decoder run(s)", layout, plan.jobs.len());

        let mut report = DecodeReport {
            input: input.to_path_buf(),
            format,
            layout: layout.label,
            outputs: plan.outputs().map(Path::to_path_buf).collect(),
            failed: Vec::new(),
            wav_info: Vec::new(),
            dry_run: self.config.decode.dry_run,
            processing_time_secs: 0.0,
        };

        if self.config.decode.dry_run {
            for job in &plan.jobs {
                println!("{}", job.command);
            }
            report.processing_time_secs = start_time.elapsed().as_secs_f64();
            return Ok(report);
        }

        for output in plan.outputs() {
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            if output != source.as_path() && output != input {
                remove_stale_output(output)?;
            }
        }

        self.enter(DecodeStage::Executing);
        let outcomes = if plan.sequential {
            decoder::run_sequential(&plan.jobs)?
        } else {
            decoder::run_concurrent(&plan.jobs)?
        };

        for outcome in outcomes {
            if !outcome.success {
                report.failed.push(outcome);
                continue;
            }
            if !outcome.output.exists() {
                log::warn!("Decoder reported success but {} was not written", outcome.output.display());
                report.failed.push(outcome);
                continue;
            }
            match WavInfo::from_file(&outcome.output) {
                Ok(info) => {
                    if info.is_empty() {
                        log::warn!("{} contains no audio frames", info.path.display());
                    }
                    log::debug!("{}", info);
                    report.wav_info.push(info);
                }
                Err(e) => {
                    log::warn!("Could not read WAV header of {}: {}", outcome.output.display(), e);
                    report.failed.push(outcome);
                }
            }
        }

        report.processing_time_secs = start_time.elapsed().as_secs_f64();

        if !report.failed.is_empty() {
            if self.config.decode.fail_on_decode_error {
                return Err(AtmosDecodeError::DecodeFailed {
                    failed: report.failed.len(),
                    total: report.outputs.len(),
                });
            }
            log::warn!("{} of {} decoder runs failed", report.failed.len(), report.outputs.len());
        }

        Ok(report)
    }
}

/// Outputs left by an earlier run would hide a decoder that writes nothing.
fn remove_stale_output(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            log::debug!("Removed existing output {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::AudioStream;
    use std::cell::Cell;
    use tempfile::TempDir;

    struct FakeTools {
        streams: Vec<AudioStream>,
        payload: Vec<u8>,
        extract_calls: Cell<usize>,
    }

    impl FakeTools {
        fn new(streams: Vec<AudioStream>, payload: &[u8]) -> Self {
            Self { streams, payload: payload.to_vec(), extract_calls: Cell::new(0) }
        }
    }

    impl MediaTools for FakeTools {
        fn probe_audio_streams(&self, _path: &Path) -> Result<Vec<AudioStream>> {
            Ok(self.streams.clone())
        }

        fn extract_stream(&self, _input: &Path, _stream_index: u32, dest: &Path) -> Result<()> {
            self.extract_calls.set(self.extract_calls.get() + 1);
            std::fs::write(dest, &self.payload)?;
            Ok(())
        }
    }

    fn eac3_stream() -> AudioStream {
        AudioStream {
            index: 1,
            codec_name: "eac3".to_string(),
            codec_long_name: "E-AC-3 (JOC)".to_string(),
            ..Default::default()
        }
    }

    fn config_in(dir: &TempDir, input: &str) -> Config {
        let mut config = Config::default();
        config.input_path = dir.path().join(input);
        config.extraction.temp_dir = Some(dir.path().join("tmp"));
        std::fs::create_dir_all(dir.path().join("tmp")).unwrap();
        config
    }

    fn temp_files(dir: &TempDir) -> Vec<PathBuf> {
        std::fs::read_dir(dir.path().join("tmp"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "missing.ec3");
        let decoder = AtmosDecoder::with_tools(config, FakeTools::new(vec![], &[]));

        let err = decoder.decode().unwrap_err();
        assert!(matches!(err, AtmosDecodeError::InputNotFound(_)));

        let err = AtmosDecoder::with_tools(config_in(&dir, "tmp"), FakeTools::new(vec![], &[]))
            .decode()
            .unwrap_err();
        assert!(matches!(err, AtmosDecodeError::InputNotFound(_)));
    }

    #[test]
    fn test_unrecognized_raw_stream() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("audio.bin"), b"RIFF0000WAVE").unwrap();
        let decoder = AtmosDecoder::with_tools(config_in(&dir, "audio.bin"), FakeTools::new(vec![], &[]));

        let err = decoder.decode().unwrap_err();
        assert!(matches!(err, AtmosDecodeError::UnrecognizedFormat(_)));
    }

    #[test]
    fn test_container_without_tracks() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("movie.mkv"), b"\x1A\x45\xDF\xA3").unwrap();
        let tools = FakeTools::new(vec![], &[]);
        let decoder = AtmosDecoder::with_tools(config_in(&dir, "movie.mkv"), tools);

        let err = decoder.decode().unwrap_err();
        assert!(matches!(err, AtmosDecodeError::NoSupportedTrack(_)));
        assert_eq!(decoder.tools.extract_calls.get(), 0);
    }

    #[test]
    fn test_dry_run_raw_eac3() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("film.ec3"), [0x0B, 0x77, 0, 0, 0, 0]).unwrap();
        let mut config = config_in(&dir, "film.ec3");
        config.decode.channels = "5.1".to_string();
        config.decode.dry_run = true;

        let report = AtmosDecoder::with_tools(config, FakeTools::new(vec![], &[])).decode().unwrap();

        assert!(report.dry_run);
        assert_eq!(report.format, StreamFormat::Eac3);
        assert_eq!(report.layout, "5.1");
        assert_eq!(report.outputs.len(), 6);
        assert_eq!(report.outputs[0], dir.path().join("film.01_L.wav"));
        assert!(!report.outputs[0].exists());
    }

    #[test]
    fn test_container_temp_removed_after_run() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("movie.mp4"), b"....ftyp").unwrap();
        let mut config = config_in(&dir, "movie.mp4");
        config.decode.multi_channel = true;
        config.decode.dry_run = true;

        let decoder = AtmosDecoder::with_tools(config, FakeTools::new(vec![eac3_stream()], &[0x0B, 0x77, 1, 2]));
        let report = decoder.decode().unwrap();

        assert_eq!(decoder.tools.extract_calls.get(), 1);
        assert_eq!(report.outputs, vec![dir.path().join("movie.wav")]);
        assert!(temp_files(&dir).is_empty());
    }

    #[test]
    fn test_container_temp_kept_on_request() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("movie.mp4"), b"....ftyp").unwrap();
        let mut config = config_in(&dir, "movie.mp4");
        config.decode.dry_run = true;
        config.decode.keep_temp = true;

        let decoder = AtmosDecoder::with_tools(config, FakeTools::new(vec![eac3_stream()], &[0x0B, 0x77]));
        decoder.decode().unwrap();

        assert_eq!(temp_files(&dir), vec![dir.path().join("tmp").join("extracted_atmos_movie.ec3")]);
    }

    #[test]
    fn test_temp_removed_when_sniffing_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("movie.mkv"), b"....").unwrap();
        let decoder = AtmosDecoder::with_tools(
            config_in(&dir, "movie.mkv"),
            FakeTools::new(vec![eac3_stream()], b"garbage data"),
        );

        let err = decoder.decode().unwrap_err();
        assert!(matches!(err, AtmosDecodeError::UnrecognizedFormat(_)));
        assert!(temp_files(&dir).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_outputs_count_as_failures() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("film.thd"), [0, 0xF8, 0x72, 0x6F, 0xBA]).unwrap();
        let mut config = config_in(&dir, "film.thd");
        config.decode.channels = "3.1".to_string();
        // `true` accepts any arguments and writes nothing
        config.tools.compat_layer = String::new();
        config.tools.gst_launch = "true".to_string();

        let err = AtmosDecoder::with_tools(config.clone(), FakeTools::new(vec![], &[])).decode().unwrap_err();
        match err {
            AtmosDecodeError::DecodeFailed { failed, total } => {
                assert_eq!(failed, 4);
                assert_eq!(total, 4);
            }
            other => panic!("unexpected error: {}", other),
        }

        config.decode.fail_on_decode_error = false;
        config.decode.single = true;
        let report = AtmosDecoder::with_tools(config, FakeTools::new(vec![], &[])).decode().unwrap();
        assert_eq!(report.failed.len(), 4);
        assert_eq!(report.succeeded(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_outputs_do_not_hide_silent_decoder() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("film.ec3"), [0x0B, 0x77, 0x01]).unwrap();
        let left = dir.path().join("film.01_L.wav");
        let right = dir.path().join("film.02_R.wav");
        std::fs::write(&left, "old run").unwrap();
        std::fs::write(&right, "old run").unwrap();

        let mut config = config_in(&dir, "film.ec3");
        config.decode.channels = "2.0".to_string();
        config.tools.compat_layer = String::new();
        config.tools.gst_launch = "true".to_string();

        let err = AtmosDecoder::with_tools(config, FakeTools::new(vec![], &[])).decode().unwrap_err();
        match err {
            AtmosDecodeError::DecodeFailed { failed, total } => {
                assert_eq!(failed, 2);
                assert_eq!(total, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(!left.exists());
        assert!(!right.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_wav_counts_as_failure() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("film.ec3"), [0x0B, 0x77, 0x01]).unwrap();
        // writes text instead of a WAV to the filesink location
        let script = dir.path().join("fake-gst.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\nfor a; do last=$a; done\nprintf 'not a wav' > \"${last#location=}\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut config = config_in(&dir, "film.ec3");
        config.decode.channels = "2.0".to_string();
        config.decode.multi_channel = true;
        config.decode.fail_on_decode_error = false;
        config.tools.compat_layer = String::new();
        config.tools.gst_launch = script.to_string_lossy().into_owned();

        let report = AtmosDecoder::with_tools(config, FakeTools::new(vec![], &[])).decode().unwrap();

        assert!(dir.path().join("film.wav").exists());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.succeeded(), 0);
        assert!(report.wav_info.is_empty());
    }
}
