use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use crate::config::ExtractConfig;

/// Cuts `[start, start + duration)` out of a source video.
///
/// `start_seconds` may be negative when a highlight sits closer to the start
/// of the video than the configured offset; implementations decide whether
/// to clamp or fail.
#[async_trait]
pub trait ClipExtractor: Send + Sync {
    async fn extract(
        &self,
        source: &Path,
        start_seconds: f64,
        duration_seconds: f64,
        destination: &Path,
    ) -> Result<()>;
}

/// Clip extractor using ffmpeg stream copy
#[derive(Debug, Clone)]
pub struct FfmpegClipExtractor {
    program: PathBuf,
}

impl FfmpegClipExtractor {
    pub fn new(config: &ExtractConfig) -> Self {
        Self {
            program: config.program.clone(),
        }
    }

    fn command(
        &self,
        source: &Path,
        start_seconds: f64,
        duration_seconds: f64,
        destination: &Path,
    ) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["-hide_banner", "-loglevel", "error", "-y"])
            .arg("-ss")
            .arg(format!("{start_seconds:.2}"))
            .arg("-i")
            .arg(source)
            .arg("-t")
            .arg(format!("{duration_seconds:.2}"))
            .args(["-map", "0:v:0", "-map", "0:a?", "-c:v", "copy", "-c:a", "copy"])
            .arg(destination)
            .kill_on_drop(true);
        command
    }
}

impl Default for FfmpegClipExtractor {
    fn default() -> Self {
        Self::new(&ExtractConfig::default())
    }
}

#[async_trait]
impl ClipExtractor for FfmpegClipExtractor {
    async fn extract(
        &self,
        source: &Path,
        start_seconds: f64,
        duration_seconds: f64,
        destination: &Path,
    ) -> Result<()> {
        debug!(
            "✂️ {} [{:.2}s +{:.2}s] -> {}",
            source.display(),
            start_seconds,
            duration_seconds,
            destination.display()
        );

        let output = self
            .command(source, start_seconds, duration_seconds, destination)
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.program.display()))?;

        if !output.status.success() {
            return Err(anyhow!(
                "Clip extraction failed for {}: {}",
                destination.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        Ok(())
    }
}
