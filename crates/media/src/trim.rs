use std::ffi::OsString;
use std::path::Path;

use crate::ffmpeg::{Ffmpeg, FfmpegFailure};
use crate::{MediaError, Result};

/// How the trimmed copy is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrimMode {
    /// Copy streams without re-encoding. The cut snaps to the nearest
    /// preceding keyframe.
    #[default]
    StreamCopy,
    /// Re-encode so the cut lands on the exact frame.
    Reencode,
}

/// Writes a copy of a clip that starts at a given offset and runs to its end.
pub trait TrimWriter: Send + Sync {
    fn trim(&self, video: &Path, start_secs: f64, output: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct FfmpegTrimmer {
    ffmpeg: Ffmpeg,
    mode: TrimMode,
}

impl FfmpegTrimmer {
    pub fn new(ffmpeg: Ffmpeg, mode: TrimMode) -> Self {
        Self { ffmpeg, mode }
    }

    fn args(&self, video: &Path, start: &str, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into()];
        match self.mode {
            TrimMode::StreamCopy => {
                args.push("-ss".into());
                args.push(start.into());
                args.push("-i".into());
                args.push(video.as_os_str().to_owned());
            }
            TrimMode::Reencode => {
                // Seeking after -i decodes up to the offset, which is exact.
                args.push("-i".into());
                args.push(video.as_os_str().to_owned());
                args.push("-ss".into());
                args.push(start.into());
            }
        }
        args.extend(
            ["-map", "0:v", "-map", "0:a?", "-map_metadata", "0"]
                .into_iter()
                .map(OsString::from),
        );
        if self.mode == TrimMode::StreamCopy {
            args.extend(
                ["-c", "copy", "-avoid_negative_ts", "make_zero"]
                    .into_iter()
                    .map(OsString::from),
            );
        }
        args.push(output.as_os_str().to_owned());
        args
    }
}

impl TrimWriter for FfmpegTrimmer {
    fn trim(&self, video: &Path, start_secs: f64, output: &Path) -> Result<()> {
        let failure = |message: String| MediaError::WriteFailure {
            path: output.to_path_buf(),
            message,
        };

        if !start_secs.is_finite() || start_secs < 0.0 {
            return Err(failure(format!("invalid start offset {start_secs}")));
        }

        let parent = match output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let extension = output
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        // ffmpeg writes next to the destination and the file is renamed into
        // place only on success; otherwise the partial file is removed on drop.
        let partial = tempfile::Builder::new()
            .prefix(".clapsync-partial-")
            .suffix(&extension)
            .tempfile_in(parent)
            .map_err(|e| MediaError::io("creating partial output", e))?;

        let start = format!("{start_secs:.6}");
        let args = self.args(video, &start, partial.path());

        self.ffmpeg.run(&args).map_err(|e| match e {
            FfmpegFailure::Spawn(source) => MediaError::Spawn {
                program: self.ffmpeg.program().to_path_buf(),
                source,
            },
            other => failure(other.to_string()),
        })?;

        partial
            .persist(output)
            .map_err(|e| failure(e.error.to_string()))?;

        tracing::info!(
            video = %video.display(),
            output = %output.display(),
            start_secs,
            mode = ?self.mode,
            "clip_trimmed"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(args: &[OsString]) -> String {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_stream_copy_seeks_before_input() {
        let trimmer = FfmpegTrimmer::default();
        let args = joined(&trimmer.args(Path::new("in.mp4"), "1.500000", Path::new("out.mp4")));
        assert_eq!(
            args,
            "-y -ss 1.500000 -i in.mp4 -map 0:v -map 0:a? -map_metadata 0 \
             -c copy -avoid_negative_ts make_zero out.mp4"
        );
    }

    #[test]
    fn test_reencode_seeks_after_input() {
        let trimmer = FfmpegTrimmer::new(Ffmpeg::default(), TrimMode::Reencode);
        let args = joined(&trimmer.args(Path::new("in.mp4"), "0.250000", Path::new("out.mp4")));
        assert_eq!(
            args,
            "-y -i in.mp4 -ss 0.250000 -map 0:v -map 0:a? -map_metadata 0 out.mp4"
        );
    }

    #[test]
    fn test_negative_start_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp4");
        let result = FfmpegTrimmer::default().trim(Path::new("in.mp4"), -0.5, &output);
        assert!(matches!(result, Err(MediaError::WriteFailure { .. })));
        assert!(!output.exists());
    }
}
