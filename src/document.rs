//! Validated in-memory form of a highlights JSON document

use anyhow::{Context, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::OnceLock;

use crate::config::ClipConfig;
use crate::error::DocumentFormatError;
use crate::link::parse_link;
use crate::timestamp::parse_highlight;

const LINK_FORMAT: &str = "\"[Game name](https://video.url)\"";

/// One timestamped moment of a game, destined to become a clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub line: String,
    pub offset_seconds: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    /// Key exactly as written in the document
    pub link: String,
    pub display_name: String,
    pub source_url: String,
    pub highlights: Vec<Highlight>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tournament {
    pub name: String,
    pub games: Vec<Game>,
}

/// Highlights of one season (the single root key), already validated.
///
/// Construction fails on the first malformed element, so a document that
/// exists can always be traversed without further checks.
#[derive(Debug, Clone)]
pub struct HighlightDocument {
    root_label: String,
    tournaments: Vec<Tournament>,
    config: ClipConfig,
}

fn game_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\[.+?\]\(.+?\)(:)?$").expect("valid game key regex"))
}

impl HighlightDocument {
    /// Validate a parsed JSON value and build the document
    pub fn from_value(value: &Value, config: ClipConfig) -> Result<Self, DocumentFormatError> {
        if config.delimiter.is_empty() {
            return Err(DocumentFormatError::new("the highlight delimiter must not be empty"));
        }

        let root = as_object(value, || {
            "the document must be a JSON object with a single key (e.g. the season name)".to_string()
        })?;

        if root.len() != 1 {
            return Err(DocumentFormatError::new(format!(
                "the document must have exactly one top-level key (e.g. the season name), found {}",
                root.len()
            )));
        }

        let (root_label, tournaments_value) = root
            .iter()
            .next()
            .ok_or_else(|| DocumentFormatError::new("the document has no top-level key"))?;

        let tournaments_map = as_object(tournaments_value, || {
            format!("{root_label:?} must map tournament names to their games")
        })?;

        let tournaments = tournaments_map
            .iter()
            .map(|(name, games)| parse_tournament(name, games, &config.delimiter))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            root_label: root_label.clone(),
            tournaments,
            config,
        })
    }

    /// Parse JSON text and validate it
    pub fn from_json_str(json: &str, config: ClipConfig) -> Result<Self> {
        let value: Value = serde_json::from_str(json).context("highlights are not valid JSON")?;
        Ok(Self::from_value(&value, config)?)
    }

    /// Read and validate a highlights JSON file
    pub fn load(path: &Path, config: ClipConfig) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;
        let document = Self::from_value(&value, config)
            .with_context(|| format!("{} is not a valid highlights document", path.display()))?;

        tracing::info!(
            "📋 Loaded {}: {} tournaments, {} games, {} highlights",
            path.display(),
            document.tournaments.len(),
            document.game_count(),
            document.highlight_count()
        );
        Ok(document)
    }

    pub fn root_label(&self) -> &str {
        &self.root_label
    }

    pub fn tournaments(&self) -> &[Tournament] {
        &self.tournaments
    }

    pub fn config(&self) -> &ClipConfig {
        &self.config
    }

    pub fn game_count(&self) -> usize {
        self.tournaments.iter().map(|t| t.games.len()).sum()
    }

    pub fn highlight_count(&self) -> usize {
        self.tournaments
            .iter()
            .flat_map(|t| &t.games)
            .map(|g| g.highlights.len())
            .sum()
    }
}

fn as_object<'a>(
    value: &'a Value,
    message: impl FnOnce() -> String,
) -> Result<&'a Map<String, Value>, DocumentFormatError> {
    value
        .as_object()
        .ok_or_else(|| DocumentFormatError::new(message()))
}

fn parse_tournament(
    name: &str,
    games: &Value,
    delimiter: &str,
) -> Result<Tournament, DocumentFormatError> {
    let games_map = as_object(games, || {
        format!("tournament {name:?} must map game links like {LINK_FORMAT} to lists of highlights")
    })?;

    let games = games_map
        .iter()
        .map(|(key, lines)| parse_game(name, key, lines, delimiter))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Tournament {
        name: name.to_string(),
        games,
    })
}

fn parse_game(
    tournament: &str,
    key: &str,
    lines: &Value,
    delimiter: &str,
) -> Result<Game, DocumentFormatError> {
    let bad_key = || {
        format!(
            "game {key:?} in tournament {tournament:?} is not a Markdown link, expected {LINK_FORMAT}"
        )
    };

    if !game_key_pattern().is_match(key) {
        return Err(DocumentFormatError::new(bad_key()));
    }
    let link = parse_link(key).map_err(|e| DocumentFormatError::with_cause(bad_key(), e))?;

    let lines = lines.as_array().ok_or_else(|| {
        DocumentFormatError::new(format!(
            "game {key:?} in tournament {tournament:?} must have a list of highlight lines"
        ))
    })?;

    let mut highlights = Vec::with_capacity(lines.len());
    for line in lines {
        let line = line.as_str().ok_or_else(|| {
            DocumentFormatError::new(format!(
                "highlight {line} of game {key:?} in tournament {tournament:?} must be a string"
            ))
        })?;

        let parsed = parse_highlight(line, delimiter).map_err(|e| {
            DocumentFormatError::with_cause(
                format!(
                    "highlight {line:?} of game {key:?} in tournament {tournament:?} must look like \
                     \"MM:SS{delimiter}description\" or \"HH:MM:SS{delimiter}description\""
                ),
                e,
            )
        })?;

        highlights.push(Highlight {
            line: line.to_string(),
            offset_seconds: parsed.offset_seconds,
            description: parsed.description,
        });
    }

    Ok(Game {
        link: key.to_string(),
        display_name: link.display_name,
        source_url: link.source_url,
        highlights,
    })
}
