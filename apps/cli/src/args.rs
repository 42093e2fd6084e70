//! Command-line surface and its validation.

use clap::Parser;
use clapsync_application::{
    is_video_extension, AlignConfig, SyncJob, SyncOptions, DEFAULT_HALF_WIDTH,
    DEFAULT_MIN_CORRELATION, DEFAULT_SUBSEQUENCE_LEN,
};
use clapsync_media::Ffmpeg;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(
    name = "clapsync",
    version,
    about = "Trim two camera clips so they start at the same instant, using a shared clap or other impulse"
)]
pub struct Cli {
    /// Video recorded by the left camera.
    #[arg(long, value_name = "VIDEO")]
    pub left: PathBuf,

    /// Video recorded by the right camera.
    #[arg(long, value_name = "VIDEO")]
    pub right: PathBuf,

    /// Directory that receives left_trimmed.<ext> and right_trimmed.<ext>.
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,

    /// Samples analysed on each side of the impulse.
    #[arg(long, default_value_t = DEFAULT_HALF_WIDTH)]
    pub half_width: usize,

    /// Length of the waveform pattern matched between the clips, in samples.
    #[arg(long, default_value_t = DEFAULT_SUBSEQUENCE_LEN)]
    pub subsequence_len: usize,

    /// Worker threads for the pattern search (0 = all cores).
    #[arg(long, default_value_t = 0)]
    pub workers: usize,

    /// Abort the pattern search after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Matches correlating below this are reported as low confidence.
    #[arg(long, default_value_t = DEFAULT_MIN_CORRELATION)]
    pub min_correlation: f64,

    /// Re-encode the outputs for frame-accurate cuts instead of copying streams.
    #[arg(long)]
    pub reencode: bool,

    /// ffmpeg executable to use.
    #[arg(long, env = "CLAPSYNC_FFMPEG", default_value = Ffmpeg::DEFAULT_PROGRAM)]
    pub ffmpeg: PathBuf,

    /// Report the offsets without writing trimmed clips.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Error)]
pub enum ArgsError {
    #[error("'{path}' is not an acceptable path for --{flag}, which should point to a file")]
    NotAFile { flag: &'static str, path: PathBuf },

    #[error("'{path}' is not an acceptable path for --out, which should point to a directory")]
    NotADirectory { path: PathBuf },

    #[error("'{path}' given for --{flag} is not a recognized video file ({expected})")]
    UnsupportedExtension {
        flag: &'static str,
        path: PathBuf,
        expected: String,
    },

    #[error("--left and --right must share a video format, got '.{left}' and '.{right}'")]
    ExtensionMismatch { left: String, right: String },
}

impl Cli {
    /// Check the paths and turn them into a job. Touches the filesystem only
    /// to inspect the given paths.
    pub fn validate(&self) -> Result<SyncJob, ArgsError> {
        check_file("left", &self.left)?;
        check_file("right", &self.right)?;
        if !self.out.is_dir() {
            return Err(ArgsError::NotADirectory {
                path: self.out.clone(),
            });
        }

        let left_ext = video_extension("left", &self.left)?;
        let right_ext = video_extension("right", &self.right)?;
        if !left_ext.eq_ignore_ascii_case(&right_ext) {
            return Err(ArgsError::ExtensionMismatch {
                left: left_ext,
                right: right_ext,
            });
        }

        Ok(SyncJob::new(&self.left, &self.right, &self.out))
    }

    pub fn options(&self) -> SyncOptions {
        SyncOptions {
            align: AlignConfig {
                half_width: self.half_width,
                subsequence_len: self.subsequence_len,
                workers: self.workers,
                timeout: self.timeout_secs.map(Duration::from_secs),
                min_correlation: self.min_correlation,
            },
            dry_run: self.dry_run,
        }
    }
}

fn check_file(flag: &'static str, path: &Path) -> Result<(), ArgsError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ArgsError::NotAFile {
            flag,
            path: path.to_path_buf(),
        })
    }
}

fn video_extension(flag: &'static str, path: &Path) -> Result<String, ArgsError> {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .filter(|ext| is_video_extension(ext))
        .ok_or_else(|| ArgsError::UnsupportedExtension {
            flag,
            path: path.to_path_buf(),
            expected: clapsync_application::VIDEO_EXTENSIONS.join(", "),
        })
}
