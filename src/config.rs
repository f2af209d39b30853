use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Delimiter between timestamp and description in each highlight line
pub const DEFAULT_DELIMITER: &str = "- ";
/// Words of the description used to name a clip file
pub const DEFAULT_WORDS_IN_CLIP_NAME: usize = 4;
/// Length of each highlight clip in seconds
pub const DEFAULT_CLIP_LENGTH_SECONDS: u32 = 10;
/// Seconds before the marked timestamp at which a clip starts
pub const DEFAULT_CLIP_OFFSET_SECONDS: i64 = 2;

/// Configuration for the clip-for-me pipeline
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// How highlight lines are parsed and clipped
    pub clip: ClipConfig,

    /// Full video download settings
    pub download: DownloadConfig,

    /// Clip extraction settings
    pub extract: ExtractConfig,

    /// Output location settings
    pub output: OutputConfig,
}

/// Clip parameters a highlight document is validated and clipped with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfig {
    /// Separator between timestamp and description
    pub delimiter: String,

    /// Number of description words in each clip filename
    pub words_in_clip_name: usize,

    /// Clip duration in seconds
    pub clip_length_seconds: u32,

    /// Seconds subtracted from the timestamp to get the clip start
    pub clip_offset_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Maximum number of concurrent downloads
    pub max_workers: usize,

    /// yt-dlp executable
    pub program: PathBuf,

    /// Format selector passed to yt-dlp
    pub format: String,

    /// Extra arguments appended before the URL
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// ffmpeg executable
    pub program: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the highlight tree is created under
    pub root: PathBuf,
}

impl ClipConfig {
    /// Validate clip parameters
    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_empty() {
            return Err(anyhow!("delimiter must not be empty"));
        }
        Ok(())
    }
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            words_in_clip_name: DEFAULT_WORDS_IN_CLIP_NAME,
            clip_length_seconds: DEFAULT_CLIP_LENGTH_SECONDS,
            clip_offset_seconds: DEFAULT_CLIP_OFFSET_SECONDS,
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_workers: num_cpus::get().min(8), // Use available cores, max 8
            program: PathBuf::from("yt-dlp"),
            format: "mp4".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found, then apply
    /// environment overrides. Falls back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let mut candidates = vec![
            PathBuf::from("clip-for-me.toml"),
            PathBuf::from("config/clip-for-me.toml"),
        ];
        if let Ok(home) = std::env::var("HOME") {
            candidates.push(Path::new(&home).join(".config/clip-for-me/config.toml"));
        }

        let mut config = None;
        for path in &candidates {
            if path.exists() {
                config = Some(Self::from_file(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_default();
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Override settings with environment variables
    pub fn apply_env(&mut self) {
        if let Ok(workers) = std::env::var("CLIP_FOR_ME_WORKERS") {
            match workers.parse() {
                Ok(workers) => self.download.max_workers = workers,
                Err(_) => tracing::warn!("Ignoring invalid CLIP_FOR_ME_WORKERS={}", workers),
            }
        }

        if let Ok(root) = std::env::var("CLIP_FOR_ME_OUTPUT_ROOT") {
            self.output.root = PathBuf::from(root);
        }

        if let Ok(program) = std::env::var("CLIP_FOR_ME_YT_DLP") {
            self.download.program = PathBuf::from(program);
        }

        if let Ok(program) = std::env::var("CLIP_FOR_ME_FFMPEG") {
            self.extract.program = PathBuf::from(program);
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.clip.validate()?;

        if self.download.max_workers == 0 {
            return Err(anyhow!("max_workers must be greater than 0"));
        }

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "clip-for-me configuration:\n\
            - Delimiter: {:?}\n\
            - Words in clip name: {}\n\
            - Clip length: {}s\n\
            - Clip offset: {}s\n\
            - Download workers: {}\n\
            - Output root: {}",
            self.clip.delimiter,
            self.clip.words_in_clip_name,
            self.clip.clip_length_seconds,
            self.clip.clip_offset_seconds,
            self.download.max_workers,
            self.output.root.display(),
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.config.clip.delimiter = delimiter.into();
        self
    }

    pub fn with_words_in_clip_name(mut self, words: usize) -> Self {
        self.config.clip.words_in_clip_name = words;
        self
    }

    pub fn with_clip_length(mut self, seconds: u32) -> Self {
        self.config.clip.clip_length_seconds = seconds;
        self
    }

    pub fn with_clip_offset(mut self, seconds: i64) -> Self {
        self.config.clip.clip_offset_seconds = seconds;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.download.max_workers = workers;
        self
    }

    pub fn with_output_root(mut self, root: PathBuf) -> Self {
        self.config.output.root = root;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
