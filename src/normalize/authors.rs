//! Author string parsing.
//!
//! Free-text author lists come in many shapes: `"John Smith, Jane Doe"`,
//! `"Smith, John and Doe, Jane"`, `"Smith, J. & Doe, J."`. Parsing is a
//! heuristic and never fails; input with no usable names yields an empty list.

use crate::regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Separators between author groups. Commas are handled per group.
static GROUP_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+and\s+|\s*&\s*|\s*;\s*").unwrap());

/// A single author split into name parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedAuthor {
    /// Given name(s) in original order; empty for single-token names
    pub given_name: String,
    /// Family name, or the whole name for single-token segments
    pub surname: String,
    /// Uppercased first letter of each given-name token, without periods
    pub initials: Vec<char>,
}

impl ParsedAuthor {
    /// Builds an author from a `Given Surname` segment.
    ///
    /// The last whitespace token is the surname. A segment with a single token
    /// is passed through verbatim as the surname.
    pub fn from_segment(segment: &str) -> Self {
        let tokens: Vec<&str> = segment.split_whitespace().collect();
        match tokens.split_last() {
            Some((surname, given)) if !given.is_empty() => {
                Self::with_given(surname.to_string(), given.join(" "))
            }
            _ => Self {
                given_name: String::new(),
                surname: segment.trim().to_string(),
                initials: Vec::new(),
            },
        }
    }

    /// Builds an author from an inverted `Surname, Given` pair.
    pub fn from_inverted(surname: &str, given: &str) -> Self {
        Self::with_given(surname.trim().to_string(), given.trim().to_string())
    }

    fn with_given(surname: String, given_name: String) -> Self {
        let initials = given_name
            .split(|c: char| c.is_whitespace() || c == '.')
            .filter_map(|token| token.chars().next())
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .collect();
        Self {
            given_name,
            surname,
            initials,
        }
    }

    /// Returns true when the name has no given-name part.
    pub fn is_single_name(&self) -> bool {
        self.given_name.is_empty()
    }
}

/// Splits a raw author string into parsed authors, preserving order.
pub fn parse_authors(raw: &str) -> Vec<ParsedAuthor> {
    GROUP_SEPARATOR
        .split(raw)
        .flat_map(|group| {
            let segments: Vec<&str> = group
                .split(',')
                .map(str::trim)
                .filter(|s| s.chars().any(char::is_alphanumeric))
                .collect();

            if is_inverted_list(&segments) {
                segments
                    .chunks(2)
                    .map(|pair| ParsedAuthor::from_inverted(pair[0], pair[1]))
                    .collect::<Vec<_>>()
            } else {
                segments
                    .into_iter()
                    .map(ParsedAuthor::from_segment)
                    .collect()
            }
        })
        .collect()
}

/// A group reads as `Surname, Given[, Surname, Given...]` when its comma
/// segments pair up and every surname position holds a single token.
fn is_inverted_list(segments: &[&str]) -> bool {
    !segments.is_empty()
        && segments.len() % 2 == 0
        && segments
            .iter()
            .step_by(2)
            .all(|s| s.split_whitespace().count() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn surnames(authors: &[ParsedAuthor]) -> Vec<&str> {
        authors.iter().map(|a| a.surname.as_str()).collect()
    }

    #[test]
    fn test_parse_given_surname_list() {
        let authors = parse_authors("John Smith, Jane Doe and Bob Lee");
        assert_eq!(surnames(&authors), vec!["Smith", "Doe", "Lee"]);
        assert_eq!(authors[0].given_name, "John");
        assert_eq!(authors[0].initials, vec!['J']);
    }

    #[test]
    fn test_parse_inverted_pairs() {
        let authors = parse_authors("Smith, John and Doe, Jane");
        assert_eq!(
            authors,
            vec![
                ParsedAuthor {
                    given_name: "John".to_string(),
                    surname: "Smith".to_string(),
                    initials: vec!['J'],
                },
                ParsedAuthor {
                    given_name: "Jane".to_string(),
                    surname: "Doe".to_string(),
                    initials: vec!['J'],
                },
            ]
        );
    }

    #[test]
    fn test_parse_inverted_with_initials() {
        let authors = parse_authors("Smith, J. K., Doe, A.");
        assert_eq!(surnames(&authors), vec!["Smith", "Doe"]);
        assert_eq!(authors[0].initials, vec!['J', 'K']);
        assert_eq!(authors[1].initials, vec!['A']);
    }

    #[test]
    fn test_multiple_given_names() {
        let author = ParsedAuthor::from_segment("mary anne van Wyk");
        assert_eq!(author.surname, "Wyk");
        assert_eq!(author.given_name, "mary anne van");
        assert_eq!(author.initials, vec!['M', 'A', 'V']);
    }

    #[test]
    fn test_single_token_passes_through() {
        let authors = parse_authors("UNESCO");
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].surname, "UNESCO");
        assert!(authors[0].is_single_name());
        assert!(authors[0].initials.is_empty());
    }

    #[test]
    fn test_ampersand_and_semicolon() {
        let authors = parse_authors("Ada Lovelace & Charles Babbage; Alan Turing");
        assert_eq!(surnames(&authors), vec!["Lovelace", "Babbage", "Turing"]);
    }

    #[test]
    fn test_and_inside_name_is_not_a_separator() {
        let authors = parse_authors("Hans Andersen, Sandra Band");
        assert_eq!(surnames(&authors), vec!["Andersen", "Band"]);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(",,, & ;")]
    #[case(" and ")]
    #[case("...")]
    fn test_malformed_input_yields_empty(#[case] input: &str) {
        assert!(parse_authors(input).is_empty());
    }
}
