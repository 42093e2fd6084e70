//! Impulse-anchored audio alignment.
//!
//! Finds the loudest transient in each recording, cuts a window around it and
//! searches both windows for the pair of subsequences with the smallest
//! z-normalized distance.

mod config;
mod dot;
mod impulse;
mod motif;
mod offset;
mod stats;
mod window;

use std::time::Duration;

pub use config::{
    AlignConfig, DEFAULT_HALF_WIDTH, DEFAULT_MIN_CORRELATION, DEFAULT_SUBSEQUENCE_LEN, ROW_BLOCK,
};
pub use impulse::locate_impulse;
pub use motif::{find_motif, MotifMatch};
pub use offset::{translate_offset, ClipOffset};
pub use window::{extract_window, AnalysisWindow};

#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    #[error("signal is empty")]
    EmptySignal,
    #[error(
        "impulse at sample {impulse} leaves a {available}-sample window, \
         more than {required} samples are needed"
    )]
    InsufficientWindow {
        impulse: usize,
        available: usize,
        required: usize,
    },
    #[error("subsequence length {subsequence_len} exceeds window length {window_len}")]
    SubsequenceTooLong {
        subsequence_len: usize,
        window_len: usize,
    },
    #[error("invalid alignment config: {0}")]
    InvalidConfig(String),
    #[error("motif search did not finish within {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, AlignError>;
