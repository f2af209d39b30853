//! Filename sanitization

/// Convert arbitrary text into a filesystem-safe token.
///
/// Spaces become underscores, ASCII letters, digits and hyphens are kept and
/// everything else is dropped. Returns `"_"` when nothing survives.
pub fn sanitize_filename(text: &str) -> String {
    let sanitized: String = text
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_ascii_alphanumeric() || c == '-' => Some(c),
            _ => None,
        })
        .collect();

    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_and_punctuation() {
        assert_eq!(sanitize_filename("Team A (Finals)!"), "Team_A_Finals");
        assert_eq!(sanitize_filename("semi-final 2"), "semi-final_2");
    }

    #[test]
    fn test_all_punctuation_becomes_underscore() {
        assert_eq!(sanitize_filename("?!.,()"), "_");
        assert_eq!(sanitize_filename(""), "_");
    }

    #[test]
    fn test_drops_non_ascii_and_underscores() {
        assert_eq!(sanitize_filename("Café_Olé"), "CafOl");
    }
}
