mod args;

use anyhow::Context;
use clap::Parser;
use clapsync_application::{SyncJob, SyncPipeline, TrimMode};
use clapsync_media::{Ffmpeg, FfmpegExtractor, FfmpegTrimmer};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::args::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,clapsync=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Malformed flags exit with status 2 inside `parse`.
    let cli = Cli::parse();

    let job = match cli.validate() {
        Ok(job) => job,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    match run(&cli, &job) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "sync_failed");
            // Stage errors already carry their cause in the message.
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, job: &SyncJob) -> anyhow::Result<()> {
    let ffmpeg = Ffmpeg::new(cli.ffmpeg.clone());
    let mode = if cli.reencode {
        TrimMode::Reencode
    } else {
        TrimMode::StreamCopy
    };

    let pipeline = SyncPipeline::new(
        FfmpegExtractor::new(ffmpeg.clone()),
        FfmpegTrimmer::new(ffmpeg, mode),
        cli.options(),
    );

    let report = pipeline.run(job)?;

    if cli.json {
        println!("{}", report.to_json().context("failed to encode report")?);
    } else {
        println!("{report}");
    }
    Ok(())
}
