//! Match results — the immutable report of one evaluation.
//!
//! A result is constructed fresh per evaluation and shares no state with
//! the registry. Either a full pattern matched, or the result is the
//! no-match sentinel: no partial outcomes exist.

use std::collections::{BTreeMap, HashMap};

/// Consumed-token count of the no-match sentinel.
pub const NO_MATCH: i32 = -1;

/// The outcome of one engine evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchResult {
    template_id: Option<String>,
    matched_token_count: i32,
    matched_from: Option<usize>,
    captured_vars: HashMap<String, String>,
    style_labels: BTreeMap<String, String>,
}

impl MatchResult {
    /// The no-match sentinel: no identifier, count `-1`, empty maps.
    pub fn no_match() -> Self {
        MatchResult {
            matched_token_count: NO_MATCH,
            ..Default::default()
        }
    }

    pub(crate) fn matched(
        template_id: String,
        matched_token_count: usize,
        matched_from: usize,
        captured_vars: HashMap<String, String>,
        style_labels: BTreeMap<String, String>,
    ) -> Self {
        MatchResult {
            template_id: Some(template_id),
            matched_token_count: matched_token_count as i32,
            matched_from: Some(matched_from),
            captured_vars,
            style_labels,
        }
    }

    /// Whether any pattern matched.
    pub fn is_match(&self) -> bool {
        self.matched_token_count >= 0
    }

    /// Identifier of the winning pattern, if any.
    pub fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref()
    }

    /// Number of tokens the winner consumed, or `-1` for no match.
    pub fn matched_token_count(&self) -> i32 {
        self.matched_token_count
    }

    /// The start offset the winner anchored at. For `match_any` this is
    /// the offset where the first matchable span begins.
    pub fn matched_from(&self) -> Option<usize> {
        self.matched_from
    }

    /// The text captured under a variable or capture name.
    pub fn captured_var(&self, name: &str) -> Option<&str> {
        self.captured_vars.get(name).map(String::as_str)
    }

    /// All captured variables.
    pub fn captured_vars(&self) -> &HashMap<String, String> {
        &self.captured_vars
    }

    /// The winner's value for a style key, `"*"` if another pattern
    /// declares the key but the winner does not.
    pub fn style_label(&self, key: &str) -> Option<&str> {
        self.style_labels.get(key).map(String::as_str)
    }

    /// All style labels.
    pub fn style_labels(&self) -> &BTreeMap<String, String> {
        &self.style_labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_shape() {
        let result = MatchResult::no_match();
        assert!(!result.is_match());
        assert_eq!(result.template_id(), None);
        assert_eq!(result.matched_token_count(), NO_MATCH);
        assert_eq!(result.matched_from(), None);
        assert!(result.captured_vars().is_empty());
        assert!(result.style_labels().is_empty());
    }

    #[test]
    fn matched_shape() {
        let result = MatchResult::matched(
            "greet".into(),
            3,
            1,
            HashMap::from([("name".to_string(), "aaa".to_string())]),
            BTreeMap::from([("lang".to_string(), "en".to_string())]),
        );
        assert!(result.is_match());
        assert_eq!(result.template_id(), Some("greet"));
        assert_eq!(result.matched_token_count(), 3);
        assert_eq!(result.matched_from(), Some(1));
        assert_eq!(result.captured_var("name"), Some("aaa"));
        assert_eq!(result.style_label("lang"), Some("en"));
    }
}
