//! Highlight line parsing: `<timestamp><delimiter><description>`

use regex::Regex;
use std::sync::OnceLock;

use crate::error::TimestampFormatError;

/// Offset into the full video and free-text description of one highlight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHighlight {
    pub offset_seconds: u32,
    pub description: String,
}

const MAX_HOURS: u32 = 23;
const MAX_MINUTES: u32 = 59;
// strptime accepts 60 and 61 for leap seconds
const MAX_SECONDS: u32 = 61;

fn minutes_seconds() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{1,2}):(\d{1,2})$").expect("valid MM:SS regex"))
}

fn hours_minutes_seconds() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{1,2}):(\d{1,2}):(\d{1,2})$").expect("valid HH:MM:SS regex")
    })
}

/// Parse a highlight line, splitting at the first occurrence of `delimiter`.
///
/// The timestamp is tried as `MM:SS` first and as `HH:MM:SS` second.
pub fn parse_highlight(
    line: &str,
    delimiter: &str,
) -> Result<ParsedHighlight, TimestampFormatError> {
    let (timestamp, description) = match line.split_once(delimiter) {
        Some(parts) if !delimiter.is_empty() => parts,
        _ => {
            return Err(TimestampFormatError::MissingDelimiter {
                line: line.to_string(),
                delimiter: delimiter.to_string(),
            })
        }
    };

    let offset_seconds = parse_minutes_seconds(timestamp)
        .or_else(|| parse_hours_minutes_seconds(timestamp))
        .ok_or_else(|| TimestampFormatError::InvalidTime {
            line: line.to_string(),
            timestamp: timestamp.to_string(),
        })?;

    Ok(ParsedHighlight {
        offset_seconds,
        description: description.to_string(),
    })
}

fn parse_minutes_seconds(timestamp: &str) -> Option<u32> {
    let caps = minutes_seconds().captures(timestamp)?;
    let minutes = field(&caps, 1, MAX_MINUTES)?;
    let seconds = field(&caps, 2, MAX_SECONDS)?;
    Some(minutes * 60 + seconds)
}

fn parse_hours_minutes_seconds(timestamp: &str) -> Option<u32> {
    let caps = hours_minutes_seconds().captures(timestamp)?;
    let hours = field(&caps, 1, MAX_HOURS)?;
    let minutes = field(&caps, 2, MAX_MINUTES)?;
    let seconds = field(&caps, 3, MAX_SECONDS)?;
    Some(hours * 3600 + minutes * 60 + seconds)
}

fn field(caps: &regex::Captures<'_>, index: usize, max: u32) -> Option<u32> {
    caps.get(index)?
        .as_str()
        .parse::<u32>()
        .ok()
        .filter(|value| *value <= max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_seconds() {
        let parsed = parse_highlight("1:30- foo", "- ").unwrap();
        assert_eq!(parsed.offset_seconds, 90);
        assert_eq!(parsed.description, "foo");
    }

    #[test]
    fn test_hours_minutes_seconds() {
        let parsed = parse_highlight("01:02:03- bar", "- ").unwrap();
        assert_eq!(parsed.offset_seconds, 3723);
        assert_eq!(parsed.description, "bar");
    }

    #[test]
    fn test_splits_on_first_delimiter_only() {
        let parsed = parse_highlight("12:05- give-and-go - layup", "- ").unwrap();
        assert_eq!(parsed.offset_seconds, 725);
        assert_eq!(parsed.description, "give-and-go - layup");
    }

    #[test]
    fn test_custom_delimiter() {
        let parsed = parse_highlight("0:07 | huck to the endzone", " | ").unwrap();
        assert_eq!(parsed.offset_seconds, 7);
        assert_eq!(parsed.description, "huck to the endzone");
    }

    #[test]
    fn test_missing_delimiter() {
        let err = parse_highlight("1:30 foo", "- ").unwrap_err();
        assert!(matches!(
            err,
            TimestampFormatError::MissingDelimiter { ref line, .. } if line == "1:30 foo"
        ));
    }

    #[test]
    fn test_invalid_time() {
        for line in ["1:3:0:0- x", "75:00- x", "24:00:00- x", "ab:cd- x", " 1:30- x"] {
            let err = parse_highlight(line, "- ").unwrap_err();
            assert!(
                matches!(err, TimestampFormatError::InvalidTime { .. }),
                "{line} should be rejected"
            );
        }
    }

    #[test]
    fn test_leap_seconds_accepted() {
        assert_eq!(parse_highlight("0:61- x", "- ").unwrap().offset_seconds, 61);
        assert!(parse_highlight("0:62- x", "- ").is_err());
    }
}
