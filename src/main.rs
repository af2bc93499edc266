//! atmos-decode - Dolby Atmos to WAV decoder

use anyhow::Context;
use atmos_decode::audio::LAYOUTS;
use atmos_decode::{init_logging, AtmosDecoder, Args, Config};
use clap::Parser;
use std::process;

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.verbose {
        println!("{}", atmos_decode::get_library_info());
        println!();
    }

    if args.list_layouts {
        list_layouts();
        return Ok(());
    }

    let config = Config::from_args_and_config(args).context("Invalid configuration")?;
    let layout = config.layout()?;

    println!("=== Dolby Atmos Decoder ===");
    println!("Input: {}", config.input_path.display());
    if let Some(output) = &config.output_path {
        println!("Output: {}", output.display());
    }
    println!(
        "Mode: {} ({})",
        if config.decode.multi_channel {
            "Multi-channel"
        } else if config.decode.single {
            "Per-channel, sequential"
        } else {
            "Per-channel, parallel"
        },
        layout
    );
    println!("===========================\n");

    let decoder = AtmosDecoder::new(config);
    let report = decoder
        .decode()
        .with_context(|| format!("Failed to decode {}", decoder.config().input_path.display()))?;

    if report.dry_run {
        return Ok(());
    }

    println!("=== Decoding Complete ===");
    println!("Format: {}", report.format);
    println!("Time: {:.2}s", report.processing_time_secs);
    println!("Files: {}/{}", report.succeeded(), report.outputs.len());
    for outcome in &report.failed {
        println!("Failed: {}", outcome.output.display());
    }
    if decoder.config().verbose() {
        for info in &report.wav_info {
            println!("  {}", info);
        }
    }

    Ok(())
}

fn list_layouts() {
    for layout in LAYOUTS.iter() {
        println!("{:<6} id={:<3} {}", layout.label, layout.config_id, layout.channel_names.join(" "));
    }
}
