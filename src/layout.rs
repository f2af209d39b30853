//! Deterministic on-disk layout of the highlight tree

use std::path::{Path, PathBuf};

use crate::sanitize::sanitize_filename;

pub const VIDEO_EXTENSION: &str = "mp4";

/// Paths belonging to one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLayout {
    pub game_dir: PathBuf,
    pub full_video_name: String,
    pub full_video_path: PathBuf,
}

impl GameLayout {
    /// `<root>/<season>/<tournament>/<game>/<game>.mp4`
    pub fn new(root: &Path, root_label: &str, tournament: &str, display_name: &str) -> Self {
        let game_name = sanitize_filename(display_name);
        let game_dir = root
            .join(sanitize_filename(root_label))
            .join(sanitize_filename(tournament))
            .join(&game_name);
        let full_video_name = format!("{game_name}.{VIDEO_EXTENSION}");
        let full_video_path = game_dir.join(&full_video_name);

        Self {
            game_dir,
            full_video_name,
            full_video_path,
        }
    }

    /// Clip file named after the first `words` words of the description
    pub fn clip_path(&self, description: &str, words: usize) -> PathBuf {
        self.game_dir.join(clip_file_name(description, words))
    }
}

/// Words are split on single spaces, so repeated spaces count as empty words
pub fn clip_file_name(description: &str, words: usize) -> String {
    let first_words = description.split(' ').take(words).collect::<Vec<_>>().join(" ");
    format!("{}.{VIDEO_EXTENSION}", sanitize_filename(&first_words))
}
