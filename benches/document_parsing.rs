use clip_for_me::{parse_highlight, ClipConfig, HighlightDocument};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Map, Value};

/// Build a season with `games` games of 20 highlights each
fn season(games: usize) -> Value {
    let games: Map<String, Value> = (0..games)
        .map(|i| {
            let lines: Vec<Value> = (0..20)
                .map(|s| json!(format!("{}:{:02}- highlight number {} of game {}", s, s, s, i)))
                .collect();
            (format!("[Game {i}](https://youtu.be/{i})"), Value::Array(lines))
        })
        .collect();
    json!({ "Season": { "Tournament": games } })
}

/// Benchmark highlight line parsing
fn bench_parse_highlight(c: &mut Criterion) {
    c.bench_function("parse_highlight_mm_ss", |b| {
        b.iter(|| parse_highlight(black_box("12:34- huck to the endzone"), black_box("- ")))
    });
    c.bench_function("parse_highlight_hh_mm_ss", |b| {
        b.iter(|| parse_highlight(black_box("01:12:34- huck to the endzone"), black_box("- ")))
    });
}

/// Benchmark full document validation
fn bench_document_validation(c: &mut Criterion) {
    let value = season(50);
    c.bench_function("validate_50_games", |b| {
        b.iter(|| HighlightDocument::from_value(black_box(&value), ClipConfig::default()))
    });
}

criterion_group!(benches, bench_parse_highlight, bench_document_validation);
criterion_main!(benches);
