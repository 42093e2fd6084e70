//! Video I/O around the alignment engine: pulling the audio track out of a
//! clip and writing trimmed copies, both through an `ffmpeg` subprocess.

mod extractor;
mod ffmpeg;
mod scratch;
mod trim;

use std::path::PathBuf;

pub use extractor::{AudioExtractor, FfmpegExtractor};
pub use ffmpeg::Ffmpeg;
pub use scratch::ScratchDir;
pub use trim::{FfmpegTrimmer, TrimMode, TrimWriter};

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("failed to extract audio from '{path}': {message}")]
    ExtractionFailure { path: PathBuf, message: String },

    #[error("failed to write '{path}': {message}")]
    WriteFailure { path: PathBuf, message: String },

    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl MediaError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }
}

pub type Result<T> = std::result::Result<T, MediaError>;
