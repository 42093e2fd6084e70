use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::Instant;

/// Bytes of ffmpeg's stderr kept for error messages.
const STDERR_TAIL_BYTES: usize = 2048;

/// Handle on an ffmpeg executable.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum FfmpegFailure {
    #[error("could not start ffmpeg: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("ffmpeg exited with {status}: {stderr}")]
    Exit { status: ExitStatus, stderr: String },
}

impl Ffmpeg {
    pub const DEFAULT_PROGRAM: &'static str = "ffmpeg";

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run ffmpeg non-interactively with `args`, capturing stderr.
    pub(crate) fn run(&self, args: &[OsString]) -> Result<(), FfmpegFailure> {
        let start = Instant::now();
        tracing::debug!(program = %self.program.display(), ?args, "ffmpeg_starting");

        let output = Command::new(&self.program)
            .arg("-nostdin")
            .arg("-hide_banner")
            .args(["-loglevel", "error"])
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(FfmpegFailure::Spawn)?;

        let duration_ms = start.elapsed().as_millis() as u64;

        if !output.status.success() {
            let stderr = tail(&String::from_utf8_lossy(&output.stderr), STDERR_TAIL_BYTES);
            tracing::warn!(status = %output.status, duration_ms, "ffmpeg_failed");
            return Err(FfmpegFailure::Exit {
                status: output.status,
                stderr,
            });
        }

        tracing::debug!(duration_ms, "ffmpeg_finished");
        Ok(())
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM)
    }
}

fn tail(text: &str, max_bytes: usize) -> String {
    let text = text.trim();
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut cut = text.len() - max_bytes;
    while !text.is_char_boundary(cut) {
        cut += 1;
    }
    format!("...{}", &text[cut..])
}
