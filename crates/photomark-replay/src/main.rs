//! Command-line entry point.

use clap::Parser;
use photomark_replay::{ReplayOptions, run};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "photomark-replay", about = "Replay an event script through the photo annotation engine")]
struct Cli {
    /// JSON event script.
    script: PathBuf,

    /// Engine config (JSON). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font used to rasterize textbox glyphs in the PNG layer.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Write the rendered annotation layer here.
    #[arg(long)]
    out_png: Option<PathBuf>,

    /// Write the annotation objects as JSON here.
    #[arg(long)]
    out_json: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let options = ReplayOptions {
        script: cli.script,
        config: cli.config,
        font: cli.font,
        out_png: cli.out_png,
        out_json: cli.out_json,
    };
    match run(&options) {
        Ok(report) => {
            println!(
                "{} events, {} objects, {} history entries",
                report.events, report.objects, report.history_len
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Replay failed: {err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
