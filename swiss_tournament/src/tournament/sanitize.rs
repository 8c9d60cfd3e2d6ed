//! Player name sanitization.
//!
//! Names are free text shown back to users, so any markup is escaped before
//! storage. Escaping keeps the visible text intact (`<b>Ann</b>` is stored as
//! `&lt;b&gt;Ann&lt;/b&gt;`) while making sure nothing in the name can be
//! interpreted as HTML or script by a consumer of the standings.

use super::errors::{TournamentError, TournamentResult};

/// Maximum name length in characters, measured before escaping
pub const MAX_NAME_LENGTH: usize = 100;

/// Validate and escape a player name
///
/// # Arguments
///
/// * `raw` - Name as entered by the caller
///
/// # Returns
///
/// * `TournamentResult<String>` - Name safe for storage and display
///
/// # Errors
///
/// * `TournamentError::Sanitization` - Name is blank, too long, or contains
///   control characters
pub fn sanitize_name(raw: &str) -> TournamentResult<String> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(TournamentError::Sanitization(
            "Name must not be empty".to_string(),
        ));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(TournamentError::Sanitization(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }

    if name.chars().any(char::is_control) {
        return Err(TournamentError::Sanitization(
            "Name must not contain control characters".to_string(),
        ));
    }

    Ok(escape_markup(name))
}

fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_unchanged() {
        assert_eq!(sanitize_name("Twilight Sparkle").unwrap(), "Twilight Sparkle");
        assert_eq!(sanitize_name("Chandra Nalaar").unwrap(), "Chandra Nalaar");
    }

    #[test]
    fn test_apostrophes_and_unicode_preserved() {
        assert_eq!(sanitize_name("Bruno O'Brien").unwrap(), "Bruno O'Brien");
        assert_eq!(sanitize_name("Zoë Åström").unwrap(), "Zoë Åström");
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert_eq!(sanitize_name("  Melpomene Murray \n").unwrap(), "Melpomene Murray");
    }

    #[test]
    fn test_script_tags_escaped() {
        let name = sanitize_name("<script>alert('x')</script>Eve").unwrap();
        assert_eq!(name, "&lt;script&gt;alert('x')&lt;/script&gt;Eve");
        assert!(!name.contains('<'));
        assert!(!name.contains('>'));
    }

    #[test]
    fn test_ampersand_escaped() {
        assert_eq!(sanitize_name("Tom & Jerry").unwrap(), "Tom &amp; Jerry");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            sanitize_name(""),
            Err(TournamentError::Sanitization(_))
        ));
        assert!(matches!(
            sanitize_name("   \t "),
            Err(TournamentError::Sanitization(_))
        ));
    }

    #[test]
    fn test_control_characters_rejected() {
        assert!(matches!(
            sanitize_name("Bad\u{0}Name"),
            Err(TournamentError::Sanitization(_))
        ));
        assert!(matches!(
            sanitize_name("Two\nLines"),
            Err(TournamentError::Sanitization(_))
        ));
    }

    #[test]
    fn test_length_limit() {
        let longest = "a".repeat(MAX_NAME_LENGTH);
        assert_eq!(sanitize_name(&longest).unwrap(), longest);

        let too_long = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(
            sanitize_name(&too_long),
            Err(TournamentError::Sanitization(_))
        ));
    }
}
