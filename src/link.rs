//! Markdown link parsing for game keys

use regex::Regex;
use std::sync::OnceLock;

use crate::error::LinkFormatError;

/// Display name and source URL of a game, taken from `[name](url)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    pub display_name: String,
    pub source_url: String,
}

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[(.+?)\]").expect("valid title regex"))
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\((.+?)\)").expect("valid url regex"))
}

/// Extract `(display name, URL)` from a Markdown link.
///
/// The URL is only searched for after the title's closing bracket, so
/// parentheses inside the title (or before it) are never mistaken for it.
pub fn parse_link(input: &str) -> Result<ParsedLink, LinkFormatError> {
    let err = || LinkFormatError {
        input: input.to_string(),
    };

    let title = title_pattern().captures(input).ok_or_else(err)?;
    let title_end = title.get(0).map(|m| m.end()).ok_or_else(err)?;
    let url = url_pattern().captures(&input[title_end..]).ok_or_else(err)?;

    Ok(ParsedLink {
        display_name: title[1].to_string(),
        source_url: url[1].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_link() {
        let link = parse_link("[Grand Final](http://x/y)").unwrap();
        assert_eq!(link.display_name, "Grand Final");
        assert_eq!(link.source_url, "http://x/y");
    }

    #[test]
    fn test_trailing_colon_is_ignored() {
        let link = parse_link("[Semis](https://youtu.be/abc):").unwrap();
        assert_eq!(link.display_name, "Semis");
        assert_eq!(link.source_url, "https://youtu.be/abc");
    }

    #[test]
    fn test_parentheses_in_title_are_not_the_url() {
        let link = parse_link("[Pool (A) game](https://youtu.be/xyz)").unwrap();
        assert_eq!(link.display_name, "Pool (A) game");
        assert_eq!(link.source_url, "https://youtu.be/xyz");
    }

    #[test]
    fn test_parentheses_before_title_are_ignored() {
        let link = parse_link("(old) [Final](https://youtu.be/f)").unwrap();
        assert_eq!(link.source_url, "https://youtu.be/f");
    }

    #[test]
    fn test_missing_brackets_fails() {
        let err = parse_link("Grand Final http://x/y").unwrap_err();
        assert_eq!(err.input, "Grand Final http://x/y");
    }

    #[test]
    fn test_missing_url_fails() {
        assert!(parse_link("[Grand Final]").is_err());
        assert!(parse_link("(http://x/y) [Grand Final]").is_err());
        assert!(parse_link("[Grand Final]()").is_err());
    }

    #[test]
    fn test_empty_title_fails() {
        let err = parse_link("[](http://x/y)").unwrap_err();
        assert_eq!(err.input, "[](http://x/y)");
    }
}
