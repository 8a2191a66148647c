//! Punctuation-aware assembly of citation segments.

/// Characters that already close a sentence.
const TERMINALS: [char; 3] = ['.', '?', '!'];

/// Appends `mark` unless `text` already ends in sentence punctuation.
pub(crate) fn terminate(text: &str, mark: char) -> String {
    let text = text.trim_end();
    if text.ends_with(TERMINALS) {
        text.to_string()
    } else {
        format!("{text}{mark}")
    }
}

/// Wraps a title in quotation marks with its period inside the quotes.
pub(crate) fn quoted(title: &str) -> String {
    format!("\"{}\"", terminate(title, '.'))
}

/// Drops trailing separators so a value can be followed by more punctuation.
pub(crate) fn bare(text: &str) -> &str {
    text.trim().trim_end_matches(['.', ',', ';', ':']).trim_end()
}

/// Joins rendered fields with single spaces.
///
/// Empty segments are skipped so an absent field leaves no gap, and a
/// dangling comma at the very end is closed with a period.
#[derive(Debug, Default)]
pub(crate) struct CitationBuilder {
    buf: String,
}

impl CitationBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, segment: impl AsRef<str>) {
        let segment = segment.as_ref().trim();
        if segment.is_empty() {
            return;
        }
        if !self.buf.is_empty() {
            self.buf.push(' ');
        }
        self.buf.push_str(segment);
    }

    pub(crate) fn push_opt(&mut self, segment: Option<String>) {
        if let Some(segment) = segment {
            self.push(segment);
        }
    }

    pub(crate) fn finish(self) -> String {
        let mut out = self.buf.trim_end().to_string();
        if out.ends_with(',') {
            out.pop();
            out = terminate(&out, '.');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Title", "Title.")]
    #[case("Title.", "Title.")]
    #[case("Why Not?", "Why Not?")]
    #[case("Wow!  ", "Wow!")]
    fn test_terminate(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(terminate(input, '.'), expected);
    }

    #[test]
    fn test_quoted() {
        assert_eq!(quoted("On Things"), "\"On Things.\"");
        assert_eq!(quoted("Is It?"), "\"Is It?\"");
    }

    #[test]
    fn test_bare() {
        assert_eq!(bare(" Journal of X. "), "Journal of X");
        assert_eq!(bare("Nature,"), "Nature");
    }

    #[test]
    fn test_builder_skips_empty_segments() {
        let mut builder = CitationBuilder::new();
        builder.push("Smith, J.");
        builder.push("");
        builder.push_opt(None);
        builder.push("  (2020). ");
        assert_eq!(builder.finish(), "Smith, J. (2020).");
    }

    #[test]
    fn test_builder_closes_dangling_comma() {
        let mut builder = CitationBuilder::new();
        builder.push("\"Title.\"");
        builder.push("Journal, vol. 5,");
        assert_eq!(builder.finish(), "\"Title.\" Journal, vol. 5.");
    }

    #[test]
    fn test_builder_empty() {
        assert_eq!(CitationBuilder::new().finish(), "");
    }
}
