//! clip-for-me
//!
//! Turns a Markdown list of highlight timestamps into a directory tree of
//! downloaded full game videos and short highlight clips.

pub mod clip;
pub mod config;
pub mod convert;
pub mod document;
pub mod download;
pub mod error;
pub mod layout;
pub mod link;
pub mod sanitize;
pub mod timestamp;
pub mod traversal;

// Re-export main types for easy access
pub use crate::clip::{ClipExtractor, FfmpegClipExtractor};
pub use crate::config::{ClipConfig, Config, ConfigBuilder};
pub use crate::convert::{convert_file, convert_markdown};
pub use crate::document::{Game, Highlight, HighlightDocument, Tournament};
pub use crate::download::{DownloadOutcome, VideoDownloader, YtDlpDownloader};
pub use crate::error::{DocumentFormatError, FormatCause, LinkFormatError, TimestampFormatError};
pub use crate::layout::GameLayout;
pub use crate::link::{parse_link, ParsedLink};
pub use crate::sanitize::sanitize_filename;
pub use crate::timestamp::{parse_highlight, ParsedHighlight};
pub use crate::traversal::{HighlightTraverser, Stage, TraversalMode, TraversalReport};
