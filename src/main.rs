use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clip_for_me::{Config, HighlightDocument, HighlightTraverser, Stage, TraversalMode};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clip-for-me", version)]
#[command(about = "Download videos and clip timestamps from them by writing Markdown")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./clip-for-me.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory the highlight tree is created under
    #[arg(long, global = true)]
    output_root: Option<PathBuf>,

    /// Maximum number of concurrent downloads
    #[arg(short, long, global = true)]
    workers: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert Markdown file to JSON
    Convert {
        /// Path to Markdown file to convert
        file: PathBuf,

        /// Name of JSON file to store highlights in (default highlights_<M>-<D>-<Y>.json)
        #[arg(short, long)]
        output_file: Option<PathBuf>,
    },
    /// Make directory structure representing JSON
    Makedirs {
        /// Path to JSON file
        file: PathBuf,

        #[command(flatten)]
        delimiter: DelimiterArgs,
    },
    /// Download videos from JSON and put them in appropriate directories
    Download {
        /// Path to JSON file
        file: PathBuf,

        /// Download videos one at a time instead of concurrently
        #[arg(short = 't', long)]
        no_threading: bool,

        #[command(flatten)]
        delimiter: DelimiterArgs,
    },
    /// Clip highlights from already-downloaded videos in the directory tree
    Clip {
        /// Path to JSON file
        file: PathBuf,

        #[command(flatten)]
        clip: ClipArgs,
    },
    /// Make directories, download videos, and clip highlights from JSON file
    All {
        /// Path to JSON file
        file: PathBuf,

        /// Download videos one at a time instead of concurrently
        #[arg(short = 't', long)]
        no_threading: bool,

        /// Handle one game at a time, deleting each full video after clipping it.
        /// Implies --no-threading
        #[arg(short, long)]
        save_storage: bool,

        #[command(flatten)]
        clip: ClipArgs,
    },
    /// Delete full game video files listed in JSON
    Delete {
        /// Path to JSON file
        file: PathBuf,

        #[command(flatten)]
        delimiter: DelimiterArgs,
    },
}

#[derive(Args)]
struct DelimiterArgs {
    /// Delimiter between timestamp and description of each highlight (default "- ")
    #[arg(short, long)]
    delimiter: Option<String>,
}

#[derive(Args)]
struct ClipArgs {
    #[command(flatten)]
    delimiter: DelimiterArgs,

    /// Number of words from the start of each description used to name its clip (default 4)
    #[arg(short = 'n', long)]
    clip_num_words: Option<usize>,

    /// Length of each highlight clip in seconds (default 10)
    #[arg(short = 'l', long)]
    clip_length: Option<u32>,

    /// Seconds before the marked timestamp each clip starts (default 2)
    #[arg(short = 'o', long, allow_negative_numbers = true)]
    clip_offset: Option<i64>,
}

impl DelimiterArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(delimiter) = &self.delimiter {
            config.clip.delimiter = delimiter.clone();
        }
    }
}

impl ClipArgs {
    fn apply(&self, config: &mut Config) {
        self.delimiter.apply(config);
        if let Some(words) = self.clip_num_words {
            config.clip.words_in_clip_name = words;
        }
        if let Some(length) = self.clip_length {
            config.clip.clip_length_seconds = length;
        }
        if let Some(offset) = self.clip_offset {
            config.clip.clip_offset_seconds = offset;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "clip_for_me=debug" } else { "clip_for_me=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::from_file(path)?;
            config.apply_env();
            config
        }
        None => Config::load()?,
    };
    if let Some(root) = &cli.output_root {
        config.output.root = root.clone();
    }
    if let Some(workers) = cli.workers {
        config.download.max_workers = workers;
    }

    match cli.command {
        Commands::Convert { file, output_file } => {
            clip_for_me::convert_file(&file, output_file).await?;
        }
        Commands::Makedirs { file, delimiter } => {
            delimiter.apply(&mut config);
            let traverser = load_traverser(&file, &config)?;
            traverser.traverse(Stage::CreateDirs, TraversalMode::Sequential).await?;
        }
        Commands::Download { file, no_threading, delimiter } => {
            delimiter.apply(&mut config);
            let traverser = load_traverser(&file, &config)?;
            traverser.traverse(Stage::CreateDirs, TraversalMode::Sequential).await?;
            traverser.traverse(Stage::DownloadFullGames, mode(no_threading)).await?;
        }
        Commands::Clip { file, clip } => {
            clip.apply(&mut config);
            let traverser = load_traverser(&file, &config)?;
            traverser.traverse(Stage::ClipHighlights, TraversalMode::Sequential).await?;
        }
        Commands::All { file, no_threading, save_storage, clip } => {
            clip.apply(&mut config);
            let traverser = load_traverser(&file, &config)?;
            if save_storage {
                traverser.traverse(Stage::SaveStorage, TraversalMode::Sequential).await?;
            } else {
                traverser.traverse(Stage::CreateDirs, TraversalMode::Sequential).await?;
                traverser.traverse(Stage::DownloadFullGames, mode(no_threading)).await?;
                traverser.traverse(Stage::ClipHighlights, TraversalMode::Sequential).await?;
            }
        }
        Commands::Delete { file, delimiter } => {
            delimiter.apply(&mut config);
            let traverser = load_traverser(&file, &config)?;
            traverser.traverse(Stage::DeleteFullGames, TraversalMode::Sequential).await?;
        }
    }

    info!("✅ Done");
    Ok(())
}

fn mode(no_threading: bool) -> TraversalMode {
    if no_threading {
        TraversalMode::Sequential
    } else {
        TraversalMode::Concurrent
    }
}

fn load_traverser(file: &Path, config: &Config) -> Result<HighlightTraverser> {
    config.validate()?;
    debug!("{}", config.summary());

    let document = HighlightDocument::load(file, config.clip.clone())?;
    Ok(HighlightTraverser::from_config(Arc::new(document), config))
}
