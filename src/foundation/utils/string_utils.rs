use crate::foundation::utils::InputError;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static SEARCH_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z]{2,20})[^a-z]*([a-z]{0,20})").unwrap());

/// Reduces free-form user input to a search term of at most two words.
///
/// The input is trimmed, stripped of accents and lowercased, then the first word of two to twenty
/// letters is taken together with an optional following word. Anything that
/// does not contain such a word is rejected.
///
/// # Arguments
///
/// * `kind` - What the term names ("artist", "album", "track"), used in the error.
/// * `input` - The raw value as received from the caller.
///
/// # Examples
///
/// ```
/// use mucat::foundation::utils::normalize_search_term;
///
/// assert_eq!(normalize_search_term("artist", "  John   MAYER ").unwrap(), "john mayer");
/// assert_eq!(normalize_search_term("artist", "Adele").unwrap(), "adele");
/// assert!(normalize_search_term("artist", "42").is_err());
/// ```
pub fn normalize_search_term(kind: &'static str, input: &str) -> Result<String, InputError> {
    let lowered = normalize_unicode(input.trim());

    let captures = SEARCH_TERM
        .captures(&lowered)
        .ok_or_else(|| InputError::InvalidName {
            kind,
            value: input.to_string(),
        })?;

    let words: Vec<&str> = captures
        .iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str())
        .filter(|w| !w.is_empty())
        .collect();

    Ok(words.join(" "))
}

/// Normalizes Unicode characters and converts text to lowercase.
///
/// The text is decomposed (NFD), combining marks are dropped and the rest is
/// lowercased, so differently encoded spellings of a name compare equal.
///
/// # Examples
///
/// ```
/// use mucat::foundation::utils::normalize_unicode;
///
/// assert_eq!(normalize_unicode("Café"), "cafe");
/// ```
pub fn normalize_unicode(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Turns an artist name into the file-name-safe part of a cache key.
///
/// ```
/// use mucat::foundation::utils::cache_slug;
///
/// assert_eq!(cache_slug("John  Mayer"), "john-mayer");
/// ```
pub fn cache_slug(artist_name: &str) -> String {
    normalize_unicode(artist_name)
        .split_whitespace()
        .map(|word| word.replace(['/', '\\'], "_"))
        .collect::<Vec<_>>()
        .join("-")
}
