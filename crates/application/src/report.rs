use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::alignment::{Alignment, ClipAlignment};
use crate::pipeline::SyncJob;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipReport {
    pub input: PathBuf,
    /// `None` when nothing was written (dry run).
    pub output: Option<PathBuf>,
    pub sample_rate: u32,
    pub impulse_index: usize,
    pub window_start: usize,
    pub match_index: usize,
    pub offset_samples: usize,
    pub offset_secs: f64,
}

impl ClipReport {
    fn new(input: &Path, output: Option<&PathBuf>, clip: &ClipAlignment) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.cloned(),
            sample_rate: clip.sample_rate,
            impulse_index: clip.impulse_index,
            window_start: clip.window_start,
            match_index: clip.match_index,
            offset_samples: clip.offset.sample_index,
            offset_secs: clip.offset.seconds,
        }
    }
}

/// Summary of one sync run, printed by the CLI as text or JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub left: ClipReport,
    pub right: ClipReport,
    pub distance: f64,
    pub correlation: f64,
    pub low_confidence: bool,
    pub relative_offset_secs: f64,
    pub trimmed: bool,
}

impl SyncReport {
    pub(crate) fn new(job: &SyncJob, alignment: &Alignment, trimmed: bool) -> Self {
        let left_output = trimmed.then_some(&job.left_output);
        let right_output = trimmed.then_some(&job.right_output);
        Self {
            left: ClipReport::new(&job.left, left_output, &alignment.left),
            right: ClipReport::new(&job.right, right_output, &alignment.right),
            distance: alignment.motif.distance,
            correlation: alignment.motif.correlation(),
            low_confidence: alignment.low_confidence,
            relative_offset_secs: alignment.relative_offset_secs(),
            trimmed,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, clip) in [("left", &self.left), ("right", &self.right)] {
            write!(
                f,
                "{label:<5} {} starts at {:.6}s (sample {} @ {} Hz)",
                clip.input.display(),
                clip.offset_secs,
                clip.offset_samples,
                clip.sample_rate
            )?;
            if let Some(output) = &clip.output {
                write!(f, " -> {}", output.display())?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "offset {:+.6}s, correlation {:.3}",
            self.relative_offset_secs, self.correlation
        )?;
        if self.low_confidence {
            write!(f, " (low confidence)")?;
        }
        Ok(())
    }
}
