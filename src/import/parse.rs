// ABOUTME: Best-effort parsers for loosely structured recipe dataset fields
// ABOUTME: Normalizes free-text durations, ingredient lines, and cuisine paths
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Heuristic field parsers for the bulk importer.
//!
//! These run over uncontrolled dataset text, so every parse failure degrades
//! to a safe default (`None` or the `"some"` quantity placeholder) instead of
//! erroring.

use crate::models::DEFAULT_QUANTITY;

/// Quantity and name split out of one free-text ingredient entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIngredient {
    pub quantity: String,
    pub name: String,
}

/// Parse a free-text duration into minutes.
///
/// `"90 min"` → 90, `"2 hour"` → 120, `"45"` → 45. Text containing `"min"`
/// takes the numeric prefix before the token; `"hour"` takes the prefix
/// times 60; otherwise the whole trimmed string must be an integer. Anything
/// unparseable is `None`.
#[must_use]
pub fn parse_duration(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some((prefix, _)) = text.split_once("min") {
        prefix.trim().parse::<i64>().ok()
    } else if let Some((prefix, _)) = text.split_once("hour") {
        prefix.trim().parse::<i64>().ok().map(|hours| hours * 60)
    } else {
        text.parse::<i64>().ok()
    }
}

/// Pick the first non-empty duration candidate and parse it.
///
/// Candidates are checked in priority order; once one is non-empty it is the
/// only one parsed, even if the parse then fails.
#[must_use]
pub fn normalize_duration(candidates: &[Option<&str>]) -> Option<i64> {
    candidates
        .iter()
        .flatten()
        .find(|text| !text.trim().is_empty())
        .and_then(|text| parse_duration(text))
}

/// A leading token counts as a quantity when it is numeric with at most one
/// decimal point, or looks like a fraction.
fn is_quantity_token(token: &str) -> bool {
    if token.contains('/') {
        return true;
    }
    let digits = token.replacen('.', "", 1);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Split one ingredient entry into quantity and name.
///
/// `"2 cups flour"` → `("2", "cups flour")`; entries without a leading
/// quantity get the `"some"` placeholder with the whole entry as the name.
/// Returns `None` when no name remains.
#[must_use]
pub fn parse_ingredient_line(entry: &str) -> Option<ParsedIngredient> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }

    let (quantity, name) = match entry.split_once(' ') {
        Some((first, rest)) if is_quantity_token(first) => (first.to_owned(), rest.trim()),
        _ => (DEFAULT_QUANTITY.to_owned(), entry),
    };

    if name.is_empty() {
        return None;
    }

    Some(ParsedIngredient {
        quantity,
        name: name.to_owned(),
    })
}

/// Derive a cuisine label from a slash-delimited category path.
///
/// Takes the last path segment, replaces hyphens with spaces, and
/// title-cases each word: `"world/italian-cuisine"` → `"Italian Cuisine"`.
/// Empty paths yield `None`.
#[must_use]
pub fn derive_cuisine(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next().unwrap_or("").replace('-', " ");

    let label = segment
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_minutes() {
        assert_eq!(parse_duration("90 min"), Some(90));
        assert_eq!(parse_duration("90 minutes"), Some(90));
        assert_eq!(parse_duration("15min"), Some(15));
    }

    #[test]
    fn test_duration_hours() {
        assert_eq!(parse_duration("2 hour"), Some(120));
        assert_eq!(parse_duration("1 hours"), Some(60));
    }

    #[test]
    fn test_duration_bare_integer() {
        assert_eq!(parse_duration("45"), Some(45));
        assert_eq!(parse_duration(" 45 "), Some(45));
    }

    #[test]
    fn test_duration_garbage_is_unknown() {
        assert_eq!(parse_duration("garbage"), None);
        assert_eq!(parse_duration(""), None);
        // A mixed "1 hour 30 min" has a non-numeric prefix before "min"
        assert_eq!(parse_duration("1 hour 30 min"), None);
    }

    #[test]
    fn test_normalize_first_non_empty_wins() {
        assert_eq!(normalize_duration(&[Some("30 min"), Some("2 hour")]), Some(30));
        assert_eq!(normalize_duration(&[Some(""), Some("2 hour")]), Some(120));
        assert_eq!(normalize_duration(&[None, None, Some("45")]), Some(45));
        // The first non-empty candidate is authoritative even when it fails
        assert_eq!(normalize_duration(&[Some("junk"), Some("45")]), None);
        assert_eq!(normalize_duration(&[None, None, None]), None);
    }

    #[test]
    fn test_ingredient_with_numeric_quantity() {
        let parsed = parse_ingredient_line("2 cups flour").unwrap();
        assert_eq!(parsed.quantity, "2");
        assert_eq!(parsed.name, "cups flour");
    }

    #[test]
    fn test_ingredient_with_fraction_quantity() {
        let parsed = parse_ingredient_line("1/2 cup sugar").unwrap();
        assert_eq!(parsed.quantity, "1/2");
        assert_eq!(parsed.name, "cup sugar");
    }

    #[test]
    fn test_ingredient_with_decimal_quantity() {
        let parsed = parse_ingredient_line("2.5 kg potatoes").unwrap();
        assert_eq!(parsed.quantity, "2.5");
        assert_eq!(parsed.name, "kg potatoes");
    }

    #[test]
    fn test_ingredient_without_quantity() {
        let parsed = parse_ingredient_line("salt").unwrap();
        assert_eq!(parsed.quantity, "some");
        assert_eq!(parsed.name, "salt");

        let parsed = parse_ingredient_line("fresh basil").unwrap();
        assert_eq!(parsed.quantity, "some");
        assert_eq!(parsed.name, "fresh basil");
    }

    #[test]
    fn test_ingredient_double_decimal_is_not_a_quantity() {
        let parsed = parse_ingredient_line("1.2.3 things").unwrap();
        assert_eq!(parsed.quantity, "some");
        assert_eq!(parsed.name, "1.2.3 things");
    }

    #[test]
    fn test_empty_ingredient_entry() {
        assert!(parse_ingredient_line("").is_none());
        assert!(parse_ingredient_line("   ").is_none());
    }

    #[test]
    fn test_cuisine_from_path() {
        assert_eq!(
            derive_cuisine("world/italian-cuisine").as_deref(),
            Some("Italian Cuisine")
        );
        assert_eq!(derive_cuisine("thai").as_deref(), Some("Thai"));
        assert_eq!(
            derive_cuisine("a/b/new-york-style").as_deref(),
            Some("New York Style")
        );
        assert_eq!(derive_cuisine(""), None);
        assert_eq!(derive_cuisine("world/"), None);
    }
}
