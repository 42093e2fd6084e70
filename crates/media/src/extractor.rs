use clapsync_audio::{read_wav, SampleBuffer, STEREO_CHANNELS};
use std::ffi::OsString;
use std::path::Path;

use crate::ffmpeg::{Ffmpeg, FfmpegFailure};
use crate::{MediaError, Result};

/// Decodes a clip's audio track into interleaved 16-bit PCM.
pub trait AudioExtractor: Send + Sync {
    /// `scratch` is a directory the extractor may use for intermediate files.
    fn extract(&self, video: &Path, scratch: &Path) -> Result<SampleBuffer>;
}

/// Extracts audio by having ffmpeg write a stereo WAV into the scratch
/// directory and reading it back.
#[derive(Debug, Clone, Default)]
pub struct FfmpegExtractor {
    ffmpeg: Ffmpeg,
}

impl FfmpegExtractor {
    pub fn new(ffmpeg: Ffmpeg) -> Self {
        Self { ffmpeg }
    }
}

impl AudioExtractor for FfmpegExtractor {
    fn extract(&self, video: &Path, scratch: &Path) -> Result<SampleBuffer> {
        let failure = |message: String| MediaError::ExtractionFailure {
            path: video.to_path_buf(),
            message,
        };

        // Removed when dropped, whether or not decoding succeeds.
        let wav = tempfile::Builder::new()
            .prefix("audio-")
            .suffix(".wav")
            .tempfile_in(scratch)
            .map_err(|e| MediaError::io("creating scratch wav", e))?;

        let channels = STEREO_CHANNELS.to_string();
        let args: Vec<OsString> = vec![
            "-y".into(),
            "-i".into(),
            video.as_os_str().to_owned(),
            "-vn".into(),
            "-ac".into(),
            channels.into(),
            "-acodec".into(),
            "pcm_s16le".into(),
            "-f".into(),
            "wav".into(),
            wav.path().as_os_str().to_owned(),
        ];

        self.ffmpeg.run(&args).map_err(|e| match e {
            FfmpegFailure::Spawn(source) => MediaError::Spawn {
                program: self.ffmpeg.program().to_path_buf(),
                source,
            },
            other => failure(other.to_string()),
        })?;

        let buffer = read_wav(wav.path()).map_err(|e| failure(e.to_string()))?;

        tracing::info!(
            video = %video.display(),
            sample_rate = buffer.sample_rate(),
            channels = buffer.channels(),
            duration_secs = buffer.duration_secs(),
            "audio_extracted"
        );

        Ok(buffer)
    }
}
