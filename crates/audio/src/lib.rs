mod buffer;
mod channel;

pub use buffer::{read_wav, SampleBuffer};
pub use channel::{select_channel, Channel, ChannelParity, LEFT_INPUT_PARITY, RIGHT_INPUT_PARITY};

/// Channel count every buffer handed to the channel normalizer must have.
pub const STEREO_CHANNELS: u16 = 2;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("malformed audio: {0}")]
    MalformedAudio(String),
    #[error("unsupported wav format: {0}")]
    UnsupportedFormat(String),
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, AudioError>;
