//! Reduced-size copies of uploaded media files.

mod reduce;
mod transcoder;

use thiserror::Error;

use crate::config::AudioFormat;

pub use reduce::ReducedCopies;
pub use transcoder::{FfmpegTranscoder, TranscodeJob, Transcoder};

#[cfg(test)]
pub use transcoder::MockTranscoder;

#[derive(Debug, Error)]
pub enum MediaError {
    /// The transcoder runs but cannot produce this format. Not fatal: callers
    /// fall back to another format.
    #[error("transcoder cannot encode {0}")]
    TranscodeUnavailable(AudioFormat),

    #[error("transcoder failed: {0}")]
    Transcoder(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
