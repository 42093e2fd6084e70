mod alignment;
mod constants;
mod error;
mod pipeline;
mod report;

pub use alignment::{Alignment, ClipAlignment};
pub use constants::*;
pub use error::{Side, StageError, SyncError, SyncStage};
pub use pipeline::{SyncJob, SyncOptions, SyncPipeline};
pub use report::{ClipReport, SyncReport};

pub use clapsync_align::{
    AlignConfig, DEFAULT_HALF_WIDTH, DEFAULT_MIN_CORRELATION, DEFAULT_SUBSEQUENCE_LEN,
};
pub use clapsync_media::TrimMode;
