//! Reduced-size derivative creation.

use std::path::{Path, PathBuf};

use super::{MediaError, TranscodeJob, Transcoder};
use crate::config::{
    AudioFormat, Config, LOSSLESS_AUDIO_EXTENSIONS, REDUCED_FILES_DIR, REDUCIBLE_IMAGE_EXTENSIONS,
};

/// Creates lossy/smaller copies of uploaded files in `files/reduced_files`.
///
/// Derivatives are best-effort: transcoder problems are logged and reported
/// as `Ok(None)`, never as an upload failure.
pub struct ReducedCopies<T> {
    transcoder: T,
    enabled: bool,
    audio_format: AudioFormat,
    image_width: u32,
    output_dir: PathBuf,
}

impl<T: Transcoder> ReducedCopies<T> {
    pub fn new(config: &Config, transcoder: T) -> Self {
        Self {
            transcoder,
            enabled: config.create_reduced_size_file_copies,
            audio_format: config.preferred_lossy_audio_format,
            image_width: config.reduced_image_width,
            output_dir: config.storage_root.join(REDUCED_FILES_DIR),
        }
    }

    /// Create the reduced copy of `input`, returning its path.
    ///
    /// `None` means no derivative: the feature is off, the file type has no
    /// reduced form, or the transcoder could not produce one.
    pub async fn create(&self, input: &Path) -> Result<Option<PathBuf>, MediaError> {
        if !self.enabled {
            return Ok(None);
        }
        if !tokio::fs::try_exists(input).await? {
            return Err(MediaError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", input.display()),
            )));
        }

        let Some(extension) = lowercase_extension(input) else {
            return Ok(None);
        };

        if LOSSLESS_AUDIO_EXTENSIONS.contains(&extension.as_str()) {
            self.reduce_audio(input).await
        } else if REDUCIBLE_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            let output = self.output_path(input, &extension);
            let job = TranscodeJob::Image {
                max_width: self.image_width,
            };
            self.run(input, output, job).await
        } else {
            tracing::debug!(path = %input.display(), "No reduced form for this file type");
            Ok(None)
        }
    }

    async fn reduce_audio(&self, input: &Path) -> Result<Option<PathBuf>, MediaError> {
        let format = self.audio_format;
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let output = self.output_path(input, format.extension());

        match self
            .transcoder
            .transcode(input, &output, TranscodeJob::Audio(format))
            .await
        {
            Ok(()) => Ok(Some(output)),
            Err(MediaError::TranscodeUnavailable(unavailable)) if unavailable != AudioFormat::Ogg => {
                tracing::warn!(
                    requested = %unavailable,
                    "Transcoder cannot encode preferred format, falling back to ogg"
                );
                let output = self.output_path(input, AudioFormat::Ogg.extension());
                self.run(input, output, TranscodeJob::Audio(AudioFormat::Ogg))
                    .await
            }
            Err(e) => {
                tracing::warn!(path = %input.display(), error = %e, "Reduced copy not created");
                Ok(None)
            }
        }
    }

    async fn run(
        &self,
        input: &Path,
        output: PathBuf,
        job: TranscodeJob,
    ) -> Result<Option<PathBuf>, MediaError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        match self.transcoder.transcode(input, &output, job).await {
            Ok(()) => Ok(Some(output)),
            Err(e) => {
                tracing::warn!(path = %input.display(), error = %e, "Reduced copy not created");
                Ok(None)
            }
        }
    }

    fn output_path(&self, input: &Path, extension: &str) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        self.output_dir.join(format!("{}.{}", stem, extension))
    }
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}
