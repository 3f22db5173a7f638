//! External transcoder invocation.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::MediaError;
use crate::config::AudioFormat;

/// What to produce from an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeJob {
    /// Re-encode audio to a lossy format
    Audio(AudioFormat),
    /// Scale an image down to at most `max_width` pixels wide
    Image { max_width: u32 },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Write the derivative of `input` to `output`.
    ///
    /// Returns `MediaError::TranscodeUnavailable` when the requested audio
    /// encoder is not available.
    async fn transcode(&self, input: &Path, output: &Path, job: TranscodeJob)
        -> Result<(), MediaError>;
}

/// Drives an ffmpeg-compatible command-line binary.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    command: String,
}

impl FfmpegTranscoder {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Whether the binary lists `encoder` among its encoders.
    pub async fn supports_encoder(&self, encoder: &str) -> Result<bool, MediaError> {
        let output = Command::new(&self.command)
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .output()
            .await?;

        let listing = String::from_utf8_lossy(&output.stdout);
        Ok(listing
            .lines()
            .any(|line| line.split_whitespace().nth(1) == Some(encoder)))
    }

    fn arguments(input: &Path, output: &Path, job: TranscodeJob) -> Vec<String> {
        let mut args = vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            input.display().to_string(),
        ];

        match job {
            TranscodeJob::Audio(format) => {
                args.extend(["-vn", "-c:a", format.encoder(), "-q:a", "4"].map(String::from));
            }
            TranscodeJob::Image { max_width } => {
                // never upscale; -1 keeps the aspect ratio
                args.push("-vf".to_string());
                args.push(format!("scale='min({},iw)':-1", max_width));
            }
        }

        args.push(output.display().to_string());
        args
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        job: TranscodeJob,
    ) -> Result<(), MediaError> {
        if let TranscodeJob::Audio(format) = job {
            if !self.supports_encoder(format.encoder()).await? {
                return Err(MediaError::TranscodeUnavailable(format));
            }
        }

        let args = Self::arguments(input, output, job);
        tracing::debug!(command = %self.command, ?args, "Running transcoder");

        let result = Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !result.status.success() {
            return Err(MediaError::Transcoder(format!(
                "{} exited with {}: {}",
                self.command,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }
        Ok(())
    }
}
