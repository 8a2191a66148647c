//! Per-style rendering of parsed author lists.

use crate::StyleId;
use crate::normalize::ParsedAuthor;
use itertools::Itertools;

/// Renders the author list for `style`, or `None` when there are no authors.
///
/// Single-token names are printed verbatim in every style.
pub(crate) fn render_authors(authors: &[ParsedAuthor], style: StyleId) -> Option<String> {
    if authors.is_empty() {
        return None;
    }

    let rendered = match style {
        // Surname, F. M.
        StyleId::Apa | StyleId::Harvard => authors.iter().map(surname_initials).join(", "),
        // Surname, Given, and Given Surname
        StyleId::Mla | StyleId::Chicago | StyleId::Asa => authors
            .iter()
            .enumerate()
            .map(|(i, author)| {
                if i == 0 {
                    inverted_full(author)
                } else {
                    natural_full(author)
                }
            })
            .join(", and "),
        // F. M. Surname
        StyleId::Ieee => authors.iter().map(initials_surname).join(", "),
        // Surname FM
        StyleId::Ama => authors.iter().map(compact_initials).join(", "),
    };

    Some(rendered)
}

fn dotted_initials(author: &ParsedAuthor) -> String {
    author.initials.iter().map(|i| format!("{i}.")).join(" ")
}

fn surname_initials(author: &ParsedAuthor) -> String {
    if author.initials.is_empty() {
        author.surname.clone()
    } else {
        format!("{}, {}", author.surname, dotted_initials(author))
    }
}

fn initials_surname(author: &ParsedAuthor) -> String {
    if author.initials.is_empty() {
        author.surname.clone()
    } else {
        format!("{} {}", dotted_initials(author), author.surname)
    }
}

fn compact_initials(author: &ParsedAuthor) -> String {
    if author.initials.is_empty() {
        author.surname.clone()
    } else {
        format!("{} {}", author.surname, author.initials.iter().collect::<String>())
    }
}

fn inverted_full(author: &ParsedAuthor) -> String {
    if author.is_single_name() {
        author.surname.clone()
    } else {
        format!("{}, {}", author.surname, author.given_name)
    }
}

fn natural_full(author: &ParsedAuthor) -> String {
    if author.is_single_name() {
        author.surname.clone()
    } else {
        format!("{} {}", author.given_name, author.surname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::parse_authors;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(StyleId::Apa, "Smith, J., Doe, J.")]
    #[case(StyleId::Harvard, "Smith, J., Doe, J.")]
    #[case(StyleId::Mla, "Smith, John, and Jane Doe")]
    #[case(StyleId::Chicago, "Smith, John, and Jane Doe")]
    #[case(StyleId::Asa, "Smith, John, and Jane Doe")]
    #[case(StyleId::Ieee, "J. Smith, J. Doe")]
    #[case(StyleId::Ama, "Smith J, Doe J")]
    fn test_render_two_authors(#[case] style: StyleId, #[case] expected: &str) {
        let authors = parse_authors("Smith, John and Doe, Jane");
        assert_eq!(render_authors(&authors, style).as_deref(), Some(expected));
    }

    #[rstest]
    #[case(StyleId::Apa, "Curie, M. S.")]
    #[case(StyleId::Mla, "Curie, Marie Salomea")]
    #[case(StyleId::Ieee, "M. S. Curie")]
    #[case(StyleId::Ama, "Curie MS")]
    fn test_render_middle_names(#[case] style: StyleId, #[case] expected: &str) {
        let authors = parse_authors("Marie Salomea Curie");
        assert_eq!(render_authors(&authors, style).as_deref(), Some(expected));
    }

    #[test]
    fn test_single_token_name_is_verbatim() {
        let authors = parse_authors("UNESCO");
        for style in StyleId::ALL {
            assert_eq!(render_authors(&authors, style).as_deref(), Some("UNESCO"));
        }
    }

    #[test]
    fn test_no_authors() {
        assert_eq!(render_authors(&[], StyleId::Apa), None);
    }
}
