use clapsync_align::AlignConfig;
use clapsync_media::{AudioExtractor, MediaError, ScratchDir, TrimWriter};
use std::path::{Path, PathBuf};
use tempfile::{PathPersistError, TempPath};

use crate::alignment::Alignment;
use crate::constants::{LEFT_OUTPUT_STEM, RIGHT_OUTPUT_STEM};
use crate::error::{Side, SyncError, SyncStage};
use crate::report::SyncReport;

/// Inputs and outputs of one synchronization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncJob {
    pub left: PathBuf,
    pub right: PathBuf,
    pub left_output: PathBuf,
    pub right_output: PathBuf,
}

impl SyncJob {
    /// Outputs are `left_trimmed.<ext>` and `right_trimmed.<ext>` in
    /// `out_dir`, keeping each input's extension.
    pub fn new(left: impl Into<PathBuf>, right: impl Into<PathBuf>, out_dir: &Path) -> Self {
        let left = left.into();
        let right = right.into();
        let left_output = out_dir.join(output_name(LEFT_OUTPUT_STEM, &left));
        let right_output = out_dir.join(output_name(RIGHT_OUTPUT_STEM, &right));
        Self {
            left,
            right,
            left_output,
            right_output,
        }
    }
}

fn output_name(stem: &str, input: &Path) -> String {
    match input.extension() {
        Some(ext) => format!("{stem}.{}", ext.to_string_lossy()),
        None => stem.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub align: AlignConfig,
    /// Compute the offsets without writing trimmed clips.
    pub dry_run: bool,
}

/// Extract, align and trim, strictly in that order.
pub struct SyncPipeline<E, W> {
    extractor: E,
    writer: W,
    options: SyncOptions,
}

impl<E: AudioExtractor, W: TrimWriter> SyncPipeline<E, W> {
    pub fn new(extractor: E, writer: W, options: SyncOptions) -> Self {
        Self {
            extractor,
            writer,
            options,
        }
    }

    pub fn run(&self, job: &SyncJob) -> Result<SyncReport, SyncError> {
        tracing::info!(
            left = %job.left.display(),
            right = %job.right.display(),
            dry_run = self.options.dry_run,
            "sync_starting"
        );

        self.options
            .align
            .validate()
            .map_err(|e| SyncError::run(SyncStage::Configure, e))?;

        let (left, right) = {
            let scratch = ScratchDir::new().map_err(|e| SyncError::run(SyncStage::Scratch, e))?;
            let left = self
                .extractor
                .extract(&job.left, scratch.path())
                .map_err(|e| SyncError::clip(SyncStage::Extract, Side::Left, e))?;
            let right = self
                .extractor
                .extract(&job.right, scratch.path())
                .map_err(|e| SyncError::clip(SyncStage::Extract, Side::Right, e))?;
            if let Err(e) = scratch.close() {
                tracing::warn!(error = %e, "scratch_cleanup_failed");
            }
            (left, right)
        };

        let alignment = Alignment::compute(left, right, &self.options.align)?;

        tracing::info!(
            left_offset_secs = alignment.left.offset.seconds,
            right_offset_secs = alignment.right.offset.seconds,
            relative_offset_secs = alignment.relative_offset_secs(),
            correlation = alignment.motif.correlation(),
            "sync_aligned"
        );

        if !self.options.dry_run {
            // Both clips are trimmed before either output appears.
            let left = self.stage_trim(
                Side::Left,
                &job.left,
                alignment.left.offset.seconds,
                &job.left_output,
            )?;
            let right = self.stage_trim(
                Side::Right,
                &job.right,
                alignment.right.offset.seconds,
                &job.right_output,
            )?;
            publish(left, &job.left_output, right, &job.right_output)?;
        }

        Ok(SyncReport::new(job, &alignment, !self.options.dry_run))
    }

    /// Trim into a hidden sibling of `output`, deleted on drop unless published.
    fn stage_trim(
        &self,
        side: Side,
        video: &Path,
        start_secs: f64,
        output: &Path,
    ) -> Result<TempPath, SyncError> {
        let fail = |e: MediaError| SyncError::clip(SyncStage::Trim, side, e);

        let parent = match output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let suffix = output
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let staged = tempfile::Builder::new()
            .prefix(STAGED_PREFIX)
            .suffix(&suffix)
            .tempfile_in(parent)
            .map_err(|source| {
                fail(MediaError::Io {
                    context: "staging trimmed output",
                    source,
                })
            })?
            .into_temp_path();

        self.writer.trim(video, start_secs, &staged).map_err(fail)?;
        Ok(staged)
    }
}

const STAGED_PREFIX: &str = ".clapsync-staged-";

/// Move both staged trims into place. If the second move fails the first
/// output is removed again, so the output set is all or nothing.
fn publish(
    left: TempPath,
    left_output: &Path,
    right: TempPath,
    right_output: &Path,
) -> Result<(), SyncError> {
    left.persist(left_output)
        .map_err(|e| persist_failure(Side::Left, left_output, e))?;

    if let Err(e) = right.persist(right_output) {
        if let Err(cleanup) = std::fs::remove_file(left_output) {
            tracing::warn!(
                path = %left_output.display(),
                error = %cleanup,
                "output_rollback_failed"
            );
        }
        return Err(persist_failure(Side::Right, right_output, e));
    }

    tracing::info!(
        left = %left_output.display(),
        right = %right_output.display(),
        "outputs_published"
    );
    Ok(())
}

fn persist_failure(side: Side, output: &Path, e: PathPersistError) -> SyncError {
    SyncError::clip(
        SyncStage::Trim,
        side,
        MediaError::WriteFailure {
            path: output.to_path_buf(),
            message: e.error.to_string(),
        },
    )
}
