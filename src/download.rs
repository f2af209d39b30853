use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::DownloadConfig;

/// Result of one download attempt.
///
/// Failures are logged by the downloader and never raised; callers learn
/// about them by the file still being absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Completed,
    Failed,
}

/// Fetches a full game video into a directory
#[async_trait]
pub trait VideoDownloader: Send + Sync {
    async fn download(&self, url: &str, file_name: &str, output_dir: &Path) -> DownloadOutcome;
}

/// Downloader backed by the `yt-dlp` command line tool
#[derive(Debug, Clone)]
pub struct YtDlpDownloader {
    program: PathBuf,
    format: String,
    extra_args: Vec<String>,
}

impl YtDlpDownloader {
    pub fn new(config: &DownloadConfig) -> Self {
        Self {
            program: config.program.clone(),
            format: config.format.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    fn command(&self, url: &str, file_name: &str, output_dir: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("--format")
            .arg(&self.format)
            .arg("--paths")
            .arg(output_dir)
            .arg("--output")
            .arg(file_name)
            .args(&self.extra_args)
            .arg(url)
            .kill_on_drop(true);
        command
    }
}

impl Default for YtDlpDownloader {
    fn default() -> Self {
        Self::new(&DownloadConfig::default())
    }
}

#[async_trait]
impl VideoDownloader for YtDlpDownloader {
    async fn download(&self, url: &str, file_name: &str, output_dir: &Path) -> DownloadOutcome {
        let full_path = output_dir.join(file_name);
        info!("⬇️ Beginning download of {}, this may take a while...", full_path.display());
        debug!("Fetching {} with {}", url, self.program.display());

        match self.command(url, file_name, output_dir).status().await {
            Ok(status) if status.success() => {
                info!("✅ {} successfully downloaded", full_path.display());
                DownloadOutcome::Completed
            }
            Ok(status) => {
                warn!(
                    "❌ Error downloading {} ({}). This game will be skipped when clipping highlights.",
                    full_path.display(),
                    status
                );
                DownloadOutcome::Failed
            }
            Err(e) => {
                warn!(
                    "❌ Could not run {} for {}: {}. This game will be skipped when clipping highlights.",
                    self.program.display(),
                    full_path.display(),
                    e
                );
                DownloadOutcome::Failed
            }
        }
    }
}
