use clapsync_align::AlignError;
use clapsync_audio::AudioError;
use clapsync_media::MediaError;
use std::fmt;

/// Which of the two clips a stage was working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Configure,
    Scratch,
    Extract,
    Normalize,
    Impulse,
    Window,
    Motif,
    Offset,
    Trim,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStage::Configure => "configuration",
            SyncStage::Scratch => "scratch directory",
            SyncStage::Extract => "audio extraction",
            SyncStage::Normalize => "channel selection",
            SyncStage::Impulse => "impulse detection",
            SyncStage::Window => "window extraction",
            SyncStage::Motif => "motif search",
            SyncStage::Offset => "offset translation",
            SyncStage::Trim => "trimming",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error(transparent)]
    Align(#[from] AlignError),
    #[error(transparent)]
    Media(#[from] MediaError),
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("{stage} failed for the {side} clip: {source}")]
    Clip {
        stage: SyncStage,
        side: Side,
        #[source]
        source: StageError,
    },
    #[error("{stage} failed: {source}")]
    Run {
        stage: SyncStage,
        #[source]
        source: StageError,
    },
}

impl SyncError {
    pub(crate) fn clip(stage: SyncStage, side: Side, source: impl Into<StageError>) -> Self {
        Self::Clip {
            stage,
            side,
            source: source.into(),
        }
    }

    pub(crate) fn run(stage: SyncStage, source: impl Into<StageError>) -> Self {
        Self::Run {
            stage,
            source: source.into(),
        }
    }

    pub fn stage(&self) -> SyncStage {
        match self {
            SyncError::Clip { stage, .. } | SyncError::Run { stage, .. } => *stage,
        }
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            SyncError::Clip { side, .. } => Some(*side),
            SyncError::Run { .. } => None,
        }
    }
}
