use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::DomainError;

/// Upper bound on suggestions returned for a single request.
pub const MAX_SUGGESTIONS: usize = 3;

/// Prefix of the synthetic entry a client shows when a fetch failed.
pub const ERROR_MARKER: &str = "[API error]";

/// Leading bullets, list numbering and the whitespace around them.
static LEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*0-9.\s]+").expect("marker pattern is valid"));

/// Ordered, display-ready message proposals.
///
/// Holds at most [`MAX_SUGGESTIONS`] entries, each trimmed and non-empty.
/// Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SuggestionList(Vec<String>);

impl SuggestionList {
    /// Turn free model text into suggestions, one per line.
    ///
    /// Blank lines are skipped, list markers are stripped, and only the first
    /// [`MAX_SUGGESTIONS`] survivors are kept. Whitespace-only text yields an
    /// empty list; a completely empty string is an error.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        if text.is_empty() {
            return Err(DomainError::EmptyModelResponse);
        }

        let suggestions = text
            .trim()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| LEADING_MARKER.replace(line, "").trim().to_string())
            .filter(|line| !line.is_empty())
            .take(MAX_SUGGESTIONS)
            .collect();

        Ok(Self(suggestions))
    }

    /// Build from entries that are already individual messages, enforcing
    /// the trim / non-empty / length invariants without touching markers.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            entries
                .into_iter()
                .map(|entry| entry.as_ref().trim().to_string())
                .filter(|entry| !entry.is_empty())
                .take(MAX_SUGGESTIONS)
                .collect(),
        )
    }

    /// Single-entry list describing a failed fetch, so callers always have
    /// something to render.
    pub fn diagnostic(message: impl std::fmt::Display) -> Self {
        Self(vec![format!("{ERROR_MARKER} {message}")])
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(self.0.as_slice(), [only] if only.starts_with(ERROR_MARKER))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a SuggestionList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn starts_with_marker(s: &str) -> bool {
        Regex::new(r"^[-*0-9.]\s*").unwrap().is_match(s)
    }

    #[test]
    fn plain_lines_pass_through() {
        let list = SuggestionList::parse("Hi there!\nHow are you?\nNice weather.").unwrap();
        assert_eq!(list.as_slice(), ["Hi there!", "How are you?", "Nice weather."]);
    }

    #[test]
    fn numbered_lines_are_cleaned_and_capped() {
        let list = SuggestionList::parse("1. First\n2. Second\n\n3. Third\n4. Fourth").unwrap();
        assert_eq!(list.as_slice(), ["First", "Second", "Third"]);
    }

    #[test]
    fn bullets_and_crlf_are_handled() {
        let list = SuggestionList::parse("- One\r\n* Two\r\n  -  Three  ").unwrap();
        assert_eq!(list.as_slice(), ["One", "Two", "Three"]);
    }

    #[test]
    fn marker_only_lines_are_dropped() {
        let list = SuggestionList::parse("1.\n-\nActual message").unwrap();
        assert_eq!(list.as_slice(), ["Actual message"]);
    }

    #[test]
    fn whitespace_only_text_is_an_empty_list() {
        let list = SuggestionList::parse(" \n\n\t").unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(matches!(
            SuggestionList::parse(""),
            Err(DomainError::EmptyModelResponse)
        ));
    }

    #[test]
    fn from_entries_keeps_markers_but_enforces_invariants() {
        let list = SuggestionList::from_entries(["  1 coffee?  ", "", "b", "c", "d"]);
        assert_eq!(list.as_slice(), ["1 coffee?", "b", "c"]);
    }

    #[test]
    fn diagnostic_is_recognisable() {
        let list = SuggestionList::diagnostic("connection refused");
        assert_eq!(list.len(), 1);
        assert!(list.as_slice()[0].starts_with(ERROR_MARKER));
        assert!(list.is_diagnostic());
        assert!(!SuggestionList::from_entries(["hello"]).is_diagnostic());
    }

    #[test]
    fn serializes_as_plain_array() {
        let list = SuggestionList::from_entries(["a", "b"]);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["a","b"]"#);
    }

    proptest! {
        #[test]
        fn parsed_lists_hold_their_invariants(text in "[-*0-9. a-zA-Z!?\n\r\t]{1,200}") {
            let list = SuggestionList::parse(&text).unwrap();
            prop_assert!(list.len() <= MAX_SUGGESTIONS);
            for entry in &list {
                prop_assert!(!entry.is_empty());
                prop_assert_eq!(entry.trim(), entry.as_str());
                prop_assert!(!starts_with_marker(entry), "entry kept a marker: {:?}", entry);
            }
        }

        #[test]
        fn order_of_surviving_lines_is_preserved(
            lines in proptest::collection::vec("[a-zA-Z][a-zA-Z ]{0,20}[a-zA-Z!?]", 1..6)
        ) {
            let text = lines.join("\n");
            let list = SuggestionList::parse(&text).unwrap();
            let expected: Vec<String> = lines.iter().take(MAX_SUGGESTIONS).cloned().collect();
            prop_assert_eq!(list.into_vec(), expected);
        }
    }
}
