//! Stage-driven traversal of a highlight document.
//!
//! Every stage walks tournaments and games in document order and maps each
//! game onto its [`GameLayout`]. What happens per game is decided by the
//! stage's step table; the only state carried across games is the set of
//! downloads still in flight, which are all joined before a pass returns.

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::clip::{ClipExtractor, FfmpegClipExtractor};
use crate::config::Config;
use crate::document::{Game, HighlightDocument};
use crate::download::{DownloadOutcome, VideoDownloader, YtDlpDownloader};
use crate::layout::GameLayout;

/// One pass over the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    CreateDirs,
    DownloadFullGames,
    ClipHighlights,
    DeleteFullGames,
    /// Every step for one game before moving on to the next, so at most one
    /// full video is on disk at a time
    SaveStorage,
}

/// Action applied to a single game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreateDir,
    Download,
    Clip,
    Delete,
}

impl Stage {
    /// Steps applied to each game, in order
    pub fn steps(self) -> &'static [Step] {
        match self {
            Stage::CreateDirs => &[Step::CreateDir],
            Stage::DownloadFullGames => &[Step::Download],
            Stage::ClipHighlights => &[Step::Clip],
            Stage::DeleteFullGames => &[Step::Delete],
            Stage::SaveStorage => &[Step::CreateDir, Step::Download, Step::Clip, Step::Delete],
        }
    }

    /// Whether downloads in this stage must run one at a time
    pub fn forces_sequential(self) -> bool {
        matches!(self, Stage::SaveStorage)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::CreateDirs => "create directories",
            Stage::DownloadFullGames => "download full games",
            Stage::ClipHighlights => "clip highlights",
            Stage::DeleteFullGames => "delete full games",
            Stage::SaveStorage => "save storage",
        };
        f.write_str(name)
    }
}

/// How downloads are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalMode {
    /// Downloads run on a bounded worker pool
    #[default]
    Concurrent,
    /// Every download is awaited before the next game is visited
    Sequential,
}

/// What a single pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalReport {
    pub directories_created: usize,
    pub downloads_completed: usize,
    pub downloads_failed: usize,
    pub downloads_skipped: usize,
    pub clips_written: usize,
    pub clips_skipped: usize,
    pub clips_failed: usize,
    /// Games whose full video was absent when clipping
    pub videos_missing: usize,
    pub videos_deleted: usize,
}

impl TraversalReport {
    /// Number of downloader invocations
    pub fn downloads_attempted(&self) -> usize {
        self.downloads_completed + self.downloads_failed
    }

    fn record_download(&mut self, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::Completed => self.downloads_completed += 1,
            DownloadOutcome::Failed => self.downloads_failed += 1,
        }
    }
}

/// Walks a [`HighlightDocument`] and applies one [`Stage`] per call
pub struct HighlightTraverser {
    document: Arc<HighlightDocument>,
    downloader: Arc<dyn VideoDownloader>,
    extractor: Arc<dyn ClipExtractor>,
    output_root: PathBuf,
    worker_semaphore: Arc<Semaphore>,
    max_workers: usize,
}

impl HighlightTraverser {
    pub fn new(
        document: Arc<HighlightDocument>,
        downloader: Arc<dyn VideoDownloader>,
        extractor: Arc<dyn ClipExtractor>,
    ) -> Self {
        let max_workers = num_cpus::get().min(8);
        Self {
            document,
            downloader,
            extractor,
            output_root: PathBuf::from("."),
            worker_semaphore: Arc::new(Semaphore::new(max_workers)),
            max_workers,
        }
    }

    /// Traverser using yt-dlp and ffmpeg as configured
    pub fn from_config(document: Arc<HighlightDocument>, config: &Config) -> Self {
        Self::new(
            document,
            Arc::new(YtDlpDownloader::new(&config.download)),
            Arc::new(FfmpegClipExtractor::new(&config.extract)),
        )
        .with_output_root(config.output.root.clone())
        .with_max_workers(config.download.max_workers)
    }

    pub fn with_output_root(mut self, output_root: PathBuf) -> Self {
        self.output_root = output_root;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self.worker_semaphore = Arc::new(Semaphore::new(self.max_workers));
        self
    }

    pub fn document(&self) -> &HighlightDocument {
        &self.document
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Apply `stage` to every game of the document.
    ///
    /// Returns only after every download started by this pass has finished.
    pub async fn traverse(&self, stage: Stage, mode: TraversalMode) -> Result<TraversalReport> {
        let concurrent = mode == TraversalMode::Concurrent && !stage.forces_sequential();
        let mut report = TraversalReport::default();
        let mut downloads: Vec<JoinHandle<DownloadOutcome>> = Vec::new();

        info!(
            "🚀 Starting {} for {} games (downloads {})",
            stage,
            self.document.game_count(),
            if concurrent { "concurrent" } else { "sequential" }
        );

        let root_label = self.document.root_label();
        for tournament in self.document.tournaments() {
            debug!("🏆 Tournament: {}", tournament.name);

            for game in &tournament.games {
                let layout = GameLayout::new(
                    &self.output_root,
                    root_label,
                    &tournament.name,
                    &game.display_name,
                );

                for step in stage.steps() {
                    match step {
                        Step::CreateDir => self.create_game_dir(&layout, &mut report).await?,
                        Step::Download => {
                            if layout.full_video_path.exists() {
                                info!(
                                    "{} already exists, skipping download",
                                    layout.full_video_path.display()
                                );
                                report.downloads_skipped += 1;
                            } else if concurrent {
                                downloads.push(self.spawn_download(game, &layout));
                            } else {
                                let outcome = self
                                    .downloader
                                    .download(
                                        &game.source_url,
                                        &layout.full_video_name,
                                        &layout.game_dir,
                                    )
                                    .await;
                                report.record_download(outcome);
                            }
                        }
                        Step::Clip => self.clip_game(game, &layout, &mut report).await,
                        Step::Delete => self.delete_full_video(&layout, &mut report).await?,
                    }
                }
            }
        }

        if !downloads.is_empty() {
            info!("⏳ Waiting for {} downloads to finish", downloads.len());
        }
        for joined in futures::future::join_all(downloads).await {
            match joined {
                Ok(outcome) => report.record_download(outcome),
                Err(e) => {
                    error!("Download task failed: {}", e);
                    report.downloads_failed += 1;
                }
            }
        }

        info!("🎉 Finished {}: {:?}", stage, report);
        Ok(report)
    }

    fn spawn_download(&self, game: &Game, layout: &GameLayout) -> JoinHandle<DownloadOutcome> {
        let downloader = Arc::clone(&self.downloader);
        let semaphore = Arc::clone(&self.worker_semaphore);
        let url = game.source_url.clone();
        let file_name = layout.full_video_name.clone();
        let output_dir = layout.game_dir.clone();

        tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!("Download pool closed before {} could start: {}", file_name, e);
                    return DownloadOutcome::Failed;
                }
            };
            downloader.download(&url, &file_name, &output_dir).await
        })
    }

    async fn create_game_dir(
        &self,
        layout: &GameLayout,
        report: &mut TraversalReport,
    ) -> Result<()> {
        if layout.game_dir.exists() {
            return Ok(());
        }

        info!("📁 Creating {} directory", layout.game_dir.display());
        tokio::fs::create_dir_all(&layout.game_dir)
            .await
            .with_context(|| format!("Failed to create {}", layout.game_dir.display()))?;
        report.directories_created += 1;
        Ok(())
    }

    async fn clip_game(&self, game: &Game, layout: &GameLayout, report: &mut TraversalReport) {
        if !layout.full_video_path.exists() {
            info!(
                "{} not found, skipping clipping highlights...",
                layout.full_video_path.display()
            );
            report.videos_missing += 1;
            return;
        }

        info!("🎬 Clipping highlights from {}:", layout.full_video_path.display());
        let config = self.document.config();

        for highlight in &game.highlights {
            let clip_path = layout.clip_path(&highlight.description, config.words_in_clip_name);

            if clip_path.exists() {
                info!("Skipping {} because it already exists", clip_path.display());
                report.clips_skipped += 1;
                continue;
            }

            let start_seconds = i64::from(highlight.offset_seconds) - config.clip_offset_seconds;
            info!("✂️ Writing {}", clip_path.display());

            match self
                .extractor
                .extract(
                    &layout.full_video_path,
                    start_seconds as f64,
                    f64::from(config.clip_length_seconds),
                    &clip_path,
                )
                .await
            {
                Ok(()) => report.clips_written += 1,
                Err(e) => {
                    warn!("⚠️ Could not clip {:?}: {:#}", highlight.line, e);
                    report.clips_failed += 1;
                }
            }
        }
    }

    async fn delete_full_video(
        &self,
        layout: &GameLayout,
        report: &mut TraversalReport,
    ) -> Result<()> {
        if !layout.full_video_path.exists() {
            return Ok(());
        }

        info!("🗑️ Deleting {}", layout.full_video_path.display());
        tokio::fs::remove_file(&layout.full_video_path)
            .await
            .with_context(|| format!("Failed to delete {}", layout.full_video_path.display()))?;
        report.videos_deleted += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_steps() {
        assert_eq!(Stage::CreateDirs.steps(), &[Step::CreateDir]);
        assert_eq!(Stage::DownloadFullGames.steps(), &[Step::Download]);
        assert_eq!(Stage::ClipHighlights.steps(), &[Step::Clip]);
        assert_eq!(Stage::DeleteFullGames.steps(), &[Step::Delete]);
        assert_eq!(
            Stage::SaveStorage.steps(),
            &[Step::CreateDir, Step::Download, Step::Clip, Step::Delete]
        );
    }

    #[test]
    fn test_only_save_storage_forces_sequential() {
        assert!(Stage::SaveStorage.forces_sequential());
        assert!(!Stage::DownloadFullGames.forces_sequential());
    }

    #[test]
    fn test_report_counts_attempts() {
        let mut report = TraversalReport::default();
        report.record_download(DownloadOutcome::Completed);
        report.record_download(DownloadOutcome::Failed);
        report.downloads_skipped += 1;
        assert_eq!(report.downloads_attempted(), 2);
    }
}
