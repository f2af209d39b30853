use clip_for_me::{convert_file, ClipConfig, FormatCause, HighlightDocument};
use std::error::Error;
use tempfile::TempDir;
use tokio::fs;

const MARKDOWN: &str = "\
# Fall Season 2022
## Sectionals
### [vs Northeastern](https://youtu.be/neu):
- 4:12- hammer to the break side
- 1:05:40- callahan!!
## Regionals
### [vs UMass](https://youtu.be/umass)
- 0:30- zone D point block
";

#[tokio::test]
async fn test_converted_markdown_loads_as_document() {
    let temp_dir = TempDir::new().unwrap();
    let markdown = temp_dir.path().join("highlights.md");
    let json = temp_dir.path().join("highlights.json");
    fs::write(&markdown, MARKDOWN).await.unwrap();

    convert_file(&markdown, Some(json.clone())).await.unwrap();
    let document = HighlightDocument::load(&json, ClipConfig::default()).unwrap();

    assert_eq!(document.root_label(), "Fall Season 2022");
    assert_eq!(document.tournaments().len(), 2);
    let game = &document.tournaments()[0].games[0];
    assert_eq!(game.link, "[vs Northeastern](https://youtu.be/neu):");
    assert_eq!(game.display_name, "vs Northeastern");
    assert_eq!(game.highlights[1].offset_seconds, 3940);
    assert_eq!(game.highlights[1].description, "callahan!!");
    assert_eq!(document.highlight_count(), 3);
}

#[tokio::test]
async fn test_load_reports_file_and_offending_line() {
    let temp_dir = TempDir::new().unwrap();
    let json = temp_dir.path().join("broken.json");
    fs::write(
        &json,
        r#"{"Season": {"Sectionals": {"[vs UVM](https://youtu.be/uvm)": ["4:12 - no dash-space"]}}}"#,
    )
    .await
    .unwrap();

    let err = HighlightDocument::load(&json, ClipConfig::default()).unwrap_err();
    let rendered = format!("{err:#}");
    assert!(rendered.contains("broken.json"));
    assert!(rendered.contains("\"4:12 - no dash-space\""));
    assert!(rendered.contains("Sectionals"));
}

#[tokio::test]
async fn test_load_rejects_invalid_json() {
    let temp_dir = TempDir::new().unwrap();
    let json = temp_dir.path().join("truncated.json");
    fs::write(&json, r#"{"Season": {"#).await.unwrap();

    let err = HighlightDocument::load(&json, ClipConfig::default()).unwrap_err();
    assert!(err.to_string().contains("not valid JSON"));
}

#[test]
fn test_format_error_sources() {
    let err = HighlightDocument::from_value(
        &serde_json::json!({"S": {"T": {"not a link": []}}}),
        ClipConfig::default(),
    )
    .unwrap_err();

    assert!(err.to_string().contains("\"not a link\""));
    // Rejected by shape before the link parser runs
    assert!(err.source().is_none());

    let err = HighlightDocument::from_value(
        &serde_json::json!({"S": {"T": {"[G](u)": ["9:99- x"]}}}),
        ClipConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err.cause(), Some(FormatCause::Timestamp(_))));
    assert!(err.source().is_some());
}
