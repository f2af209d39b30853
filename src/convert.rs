//! Markdown to highlights JSON conversion
//!
//! ```markdown
//! # Spring 2023
//! ## Regionals
//! ### [vs Tufts](https://youtu.be/abc)
//! - 1:30- huck to Sam for the score
//! - 12:04- layout D on the goal line
//! ```
//!
//! The level-1 heading is the root label, level-2 headings are tournaments,
//! level-3 headings are game links and list items are highlight lines.

use anyhow::{anyhow, bail, Context, Result};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Default)]
struct Outline {
    root_label: Option<String>,
    tournaments: Vec<(String, Vec<(String, Vec<String>)>)>,
}

impl Outline {
    fn set_root(&mut self, label: String) -> Result<()> {
        if let Some(existing) = &self.root_label {
            bail!(
                "found a second level-1 heading {label:?} after {existing:?}, only one season is allowed"
            );
        }
        self.root_label = Some(label);
        Ok(())
    }

    fn add_tournament(&mut self, name: String) -> Result<()> {
        if self.root_label.is_none() {
            bail!("tournament {name:?} appears before the level-1 season heading");
        }
        if self.tournaments.iter().any(|(existing, _)| *existing == name) {
            bail!("tournament {name:?} is listed twice");
        }
        self.tournaments.push((name, Vec::new()));
        Ok(())
    }

    fn add_game(&mut self, link: String) -> Result<()> {
        let (tournament, games) = self
            .tournaments
            .last_mut()
            .ok_or_else(|| anyhow!("game {link:?} appears before any level-2 tournament heading"))?;
        if games.iter().any(|(existing, _)| *existing == link) {
            bail!("game {link:?} is listed twice in tournament {tournament:?}");
        }
        games.push((link, Vec::new()));
        Ok(())
    }

    fn add_highlight(&mut self, line: String) -> Result<()> {
        let (_, highlights) = self
            .tournaments
            .last_mut()
            .and_then(|(_, games)| games.last_mut())
            .ok_or_else(|| anyhow!("highlight {line:?} appears before any level-3 game heading"))?;
        highlights.push(line);
        Ok(())
    }

    fn into_value(self) -> Result<Value> {
        let root_label = self
            .root_label
            .ok_or_else(|| anyhow!("no level-1 heading found to name the season"))?;

        let mut tournaments = Map::new();
        for (name, games) in self.tournaments {
            let games: Map<String, Value> = games
                .into_iter()
                .map(|(link, lines)| (link, Value::from(lines)))
                .collect();
            tournaments.insert(name, Value::Object(games));
        }

        let mut root = Map::new();
        root.insert(root_label, Value::Object(tournaments));
        Ok(Value::Object(root))
    }
}

/// Convert highlights Markdown into the canonical JSON structure
pub fn convert_markdown(markdown: &str) -> Result<Value> {
    let mut outline = Outline::default();
    // One buffer per open heading or list item; inline text goes to the innermost
    let mut buffers: Vec<String> = Vec::new();
    let mut link_targets: Vec<String> = Vec::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading(..)) | Event::Start(Tag::Item) => buffers.push(String::new()),
            Event::End(Tag::Heading(level, ..)) => {
                let text = buffers.pop().unwrap_or_default().trim().to_string();
                match level {
                    HeadingLevel::H1 => outline.set_root(text)?,
                    HeadingLevel::H2 => outline.add_tournament(text)?,
                    HeadingLevel::H3 => outline.add_game(text)?,
                    other => bail!("unsupported heading level {other:?} for {text:?}"),
                }
            }
            Event::End(Tag::Item) => {
                let text = buffers.pop().unwrap_or_default().trim().to_string();
                if !text.is_empty() {
                    outline.add_highlight(text)?;
                }
            }
            Event::Start(Tag::Link(_, url, _)) => {
                push_text(&mut buffers, "[");
                link_targets.push(url.to_string());
            }
            Event::End(Tag::Link(..)) => {
                let url = link_targets.pop().unwrap_or_default();
                push_text(&mut buffers, &format!("]({url})"));
            }
            Event::Text(text) | Event::Code(text) => push_text(&mut buffers, &text),
            Event::SoftBreak | Event::HardBreak => push_text(&mut buffers, " "),
            _ => {}
        }
    }

    outline.into_value()
}

fn push_text(buffers: &mut [String], text: &str) {
    if let Some(buffer) = buffers.last_mut() {
        buffer.push_str(text);
    }
}

/// `highlights_<M>-<D>-<Y>.json` for today's local date
pub fn default_output_path() -> PathBuf {
    let date = chrono::Local::now().format("%-m-%-d-%Y");
    PathBuf::from(format!("highlights_{date}.json"))
}

/// Convert a Markdown file and write the JSON next to the working directory.
///
/// Returns the path written.
pub async fn convert_file(input: &Path, output: Option<PathBuf>) -> Result<PathBuf> {
    let markdown = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let value = convert_markdown(&markdown)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    let output = output.unwrap_or_else(default_output_path);
    let mut json = serde_json::to_string_pretty(&value)?;
    json.push('\n');
    tokio::fs::write(&output, json)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("💾 {} created", output.display());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
# Spring 2023

## Regionals

### [vs Tufts](https://youtu.be/abc)

- 1:30- huck to Sam for the score
- 12:04- layout D on the `goal` line

### [vs BU (pool play)](https://youtu.be/def)

- 01:02:03- hammer over the cup

## Nationals
";

    #[test]
    fn test_convert_sample() {
        let value = convert_markdown(SAMPLE).unwrap();
        assert_eq!(
            value,
            json!({
                "Spring 2023": {
                    "Regionals": {
                        "[vs Tufts](https://youtu.be/abc)": [
                            "1:30- huck to Sam for the score",
                            "12:04- layout D on the goal line"
                        ],
                        "[vs BU (pool play)](https://youtu.be/def)": ["01:02:03- hammer over the cup"]
                    },
                    "Nationals": {}
                }
            })
        );
    }

    #[test]
    fn test_output_keeps_document_order() {
        let value = convert_markdown("# S\n## Zeta\n## Alpha\n").unwrap();
        let keys: Vec<_> = value["S"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["Zeta", "Alpha"]);
    }

    #[test]
    fn test_misplaced_elements_are_rejected() {
        assert!(convert_markdown("## Regionals\n").is_err());
        assert!(convert_markdown("# S\n### [G](u)\n").is_err());
        assert!(convert_markdown("# S\n## T\n- 1:00- x\n").is_err());
        assert!(convert_markdown("# S\n# Other\n").is_err());
        assert!(convert_markdown("# S\n## T\n## T\n").is_err());
        assert!(convert_markdown("no headings at all\n").is_err());
    }

    #[test]
    fn test_default_output_name() {
        let name = default_output_path().to_string_lossy().to_string();
        assert!(name.starts_with("highlights_"));
        assert!(name.ends_with(".json"));
        assert!(!name.contains("-0"));
    }

    #[tokio::test]
    async fn test_convert_file_writes_json() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("highlights.md");
        let output = temp_dir.path().join("highlights.json");
        tokio::fs::write(&input, SAMPLE).await.unwrap();

        let written = convert_file(&input, Some(output.clone())).await.unwrap();
        assert_eq!(written, output);

        let content = tokio::fs::read_to_string(&output).await.unwrap();
        assert!(content.starts_with("{\n  \"Spring 2023\""));
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value, convert_markdown(SAMPLE).unwrap());
    }
}
