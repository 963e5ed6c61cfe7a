//! URL slugs for projects.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const MAX_SLUG_LEN: usize = 50;
pub const MIN_SLUG_LEN: usize = 3;

/// Why a slug was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlugProblem {
    Empty,
    TooShort,
    InvalidCharacters,
}

/// Derive a slug from a human-readable name.
///
/// Lowercases, strips diacritics, turns whitespace into hyphens, drops anything
/// outside `[a-z0-9-]`, collapses and trims hyphens, and truncates to
/// [`MAX_SLUG_LEN`]. The output is a fixed point: `slugify(slugify(x)) == slugify(x)`.
pub fn slugify(name: &str) -> String {
    let folded: String = name
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let kept: String = folded
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() || c == '-' {
                Some('-')
            } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    let slug = kept
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.len() > MAX_SLUG_LEN {
        // ASCII only at this point, so byte indexing is safe.
        slug[..MAX_SLUG_LEN].trim_end_matches('-').to_string()
    } else {
        slug
    }
}

/// Check a slug typed by the user.
pub fn validate_slug(slug: &str) -> Result<(), SlugProblem> {
    if slug.is_empty() {
        return Err(SlugProblem::Empty);
    }
    if slug.chars().count() < MIN_SLUG_LEN {
        return Err(SlugProblem::TooShort);
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(SlugProblem::InvalidCharacters);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_strips_accents_and_punctuation() {
        assert_eq!(slugify("Café del Mar!"), "cafe-del-mar");
        assert_eq!(slugify("Demo Project"), "demo-project");
        assert_eq!(slugify("  Niño   Ñandú  "), "nino-nandu");
    }

    #[test]
    fn test_slugify_collapses_and_trims_hyphens() {
        assert_eq!(slugify("--a -- b--"), "a-b");
        assert_eq!(slugify("a ! b"), "a-b");
        assert_eq!(slugify("snake_case_name"), "snakecasename");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        let inputs = vec![
            "Café del Mar!".to_string(),
            "  Proyecto  301: la   app ".to_string(),
            "ÀÉÎÕÜ çñ".to_string(),
            "x".repeat(120),
            "palabra ".repeat(20),
            "日本語 mixed Ω text".to_string(),
            String::new(),
        ];
        for input in inputs {
            let once = slugify(&input);
            assert_eq!(slugify(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_slugify_truncates_to_fifty() {
        let long = "abcdefghij ".repeat(10);
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
        assert_eq!(slugify(&"z".repeat(80)).len(), MAX_SLUG_LEN);
    }

    #[test]
    fn test_validate_slug() {
        assert_eq!(validate_slug(""), Err(SlugProblem::Empty));
        assert_eq!(validate_slug("ab"), Err(SlugProblem::TooShort));
        assert_eq!(validate_slug("Ab-3"), Err(SlugProblem::InvalidCharacters));
        assert_eq!(validate_slug("ab-3"), Ok(()));
    }
}
