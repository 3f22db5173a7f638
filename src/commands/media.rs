//! Media command - Reduced-size copies on demand.

use crate::cli::args::{MediaAction, MediaArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::media::{FfmpegTranscoder, ReducedCopies};

/// Execute the media command
pub async fn execute(args: MediaArgs, config: &Config) -> AppResult<()> {
    match args.action {
        MediaAction::Reduce { path } => {
            let reducer =
                ReducedCopies::new(config, FfmpegTranscoder::new(&config.transcoder_command));

            match reducer
                .create(&path)
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?
            {
                Some(output) => println!("Created: {}", output.display()),
                None => println!("No reduced copy created for {}", path.display()),
            }
        }
    }

    Ok(())
}
