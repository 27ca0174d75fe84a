//! The match engine — a registry of compiled patterns evaluated anchored
//! against annotated token ranges.
//!
//! The engine follows a configure-then-freeze discipline: patterns are
//! registered during setup, and evaluation borrows the registry immutably,
//! so concurrent readers are safe once setup completes. Evaluation walks a
//! pattern's elements left to right with a single cursor; quantifiers are
//! resolved deterministically by scanning forward for the earliest position
//! where the remaining elements match — never by exponential backtracking.
//! Cost is bounded by pattern length × range length.
//!
//! When several registered patterns match at the same offset, the one
//! consuming the most tokens wins; exact ties keep the earliest-registered
//! candidate.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use banter_annotate::{AnnotatedTokens, Lexicon, POS_LAYER};
use tracing::{debug, trace};

use crate::element::{PatternDefinition, PatternElement, PosRestriction, Quantifier};
use crate::result::MatchResult;

/// A registry of compiled patterns plus the lookup collaborators needed to
/// evaluate them.
///
/// The synonym dictionary is passed in at construction — there is no
/// process-wide lookup table. Matching is case-sensitive by default.
///
/// # Example
///
/// ```
/// use banter_annotate::{AnnotatedTokens, CategoryTable};
/// use banter_pattern::{MatchEngine, compile};
///
/// let mut dictionary = CategoryTable::new();
/// dictionary.add("brute", "animal");
///
/// let mut engine = MatchEngine::new(dictionary);
/// engine.add_matcher(compile("wild", "[animal] goes wild", None).unwrap());
///
/// let tokens = AnnotatedTokens::from_text("brute goes wild now");
/// let result = engine.match_at(&tokens, 0, 4);
/// assert_eq!(result.template_id(), Some("wild"));
/// assert_eq!(result.matched_token_count(), 3);
/// ```
pub struct MatchEngine<L> {
    lexicon: L,
    patterns: Vec<PatternDefinition>,
    /// Union of style keys declared across the whole registry.
    style_keys: BTreeSet<String>,
    pos_layer: String,
    case_sensitive: bool,
}

impl<L: Lexicon> MatchEngine<L> {
    pub fn new(lexicon: L) -> Self {
        MatchEngine {
            lexicon,
            patterns: Vec::new(),
            style_keys: BTreeSet::new(),
            pos_layer: POS_LAYER.to_string(),
            case_sensitive: true,
        }
    }

    /// Read POS restrictions from a different annotation layer.
    pub fn with_pos_layer(mut self, layer: impl Into<String>) -> Self {
        self.pos_layer = layer.into();
        self
    }

    /// Compare literals and category names ignoring case.
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// Register a compiled pattern. Insertion order is the tie-break order.
    pub fn add_matcher(&mut self, definition: PatternDefinition) {
        self.style_keys.extend(definition.style.keys().cloned());
        self.patterns.push(definition);
    }

    /// Number of registered patterns.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Evaluate every registered pattern anchored at `from` against
    /// `tokens[from..to]` and select a winner.
    ///
    /// Anchored means the pattern's first element must align exactly with
    /// `tokens[from]`; no later starting alignment is tried. Absence of a
    /// match is not an error: the sentinel result is returned.
    pub fn match_at(&self, tokens: &AnnotatedTokens, from: usize, to: usize) -> MatchResult {
        let to = to.min(tokens.token_count());
        if from > to {
            return MatchResult::no_match();
        }

        let mut winner: Option<(usize, usize, HashMap<String, String>)> = None;
        for (index, definition) in self.patterns.iter().enumerate() {
            let mut captures = HashMap::new();
            let Some(end) = self.match_elements(&definition.elements, tokens, from, to, &mut captures)
            else {
                continue;
            };
            let consumed = end - from;
            trace!(pattern = %definition.id, from, consumed, "candidate matched");
            // Strictly-greater keeps the earliest-registered candidate on
            // exact ties.
            if winner.as_ref().is_none_or(|(_, best, _)| consumed > *best) {
                winner = Some((index, consumed, captures));
            }
        }

        match winner {
            Some((index, consumed, captures)) => {
                let definition = &self.patterns[index];
                debug!(template = %definition.id, from, consumed, "selected winning pattern");
                MatchResult::matched(
                    definition.id.clone(),
                    consumed,
                    from,
                    captures,
                    self.fill_style(definition),
                )
            }
            None => MatchResult::no_match(),
        }
    }

    /// Scan increasing start offsets in `from..to` until some pattern
    /// matches; the first matchable span wins.
    ///
    /// This is the template-extraction entry point: callers use it to find
    /// the first matchable span in a sentence, then read the span's origin
    /// from [`MatchResult::matched_from`].
    pub fn match_any(&self, tokens: &AnnotatedTokens, from: usize, to: usize) -> MatchResult {
        let to = to.min(tokens.token_count());
        for start in from..to {
            let result = self.match_at(tokens, start, to);
            if result.is_match() {
                return result;
            }
        }
        MatchResult::no_match()
    }

    /// The winner's style map, with every key declared elsewhere in the
    /// registry defaulted to `"*"`.
    fn fill_style(&self, winner: &PatternDefinition) -> BTreeMap<String, String> {
        let mut labels = winner.style.clone();
        for key in &self.style_keys {
            labels
                .entry(key.clone())
                .or_insert_with(|| "*".to_string());
        }
        labels
    }

    /// Walk `elements` from `pos`, returning the cursor position after the
    /// last consumed token, or `None` if the walk fails.
    fn match_elements(
        &self,
        elements: &[PatternElement],
        tokens: &AnnotatedTokens,
        pos: usize,
        to: usize,
        captures: &mut HashMap<String, String>,
    ) -> Option<usize> {
        let Some((element, rest)) = elements.split_first() else {
            return Some(pos);
        };

        match element {
            PatternElement::Literal(text) => {
                if pos < to && self.literal_matches(text, tokens, pos) {
                    self.match_elements(rest, tokens, pos + 1, to, captures)
                } else {
                    None
                }
            }

            PatternElement::Variable { name, quantifier } => match quantifier {
                Quantifier::One => {
                    if pos < to {
                        captures.insert(name.clone(), self.span_text(tokens, pos, pos + 1));
                        self.match_elements(rest, tokens, pos + 1, to, captures)
                    } else {
                        None
                    }
                }
                Quantifier::Optional => {
                    // 0-token hypothesis first: consume nothing if the
                    // remainder already matches in place.
                    let mut trial = captures.clone();
                    if let Some(end) = self.match_elements(rest, tokens, pos, to, &mut trial) {
                        *captures = trial;
                        return Some(end);
                    }
                    if pos < to {
                        captures.insert(name.clone(), self.span_text(tokens, pos, pos + 1));
                        self.match_elements(rest, tokens, pos + 1, to, captures)
                    } else {
                        None
                    }
                }
                Quantifier::Star => {
                    let star = StarElement {
                        capture: Some(name),
                        category: None,
                        restriction: None,
                    };
                    self.match_star(star, rest, tokens, pos, to, captures)
                }
            },

            PatternElement::Category {
                name,
                restriction,
                capture,
            } => match restriction.as_ref().map(|r| r.quantifier) {
                None | Some(Quantifier::One) => {
                    if pos < to && self.category_satisfies(name, restriction.as_ref(), tokens, pos)
                    {
                        if let Some(capture) = capture {
                            captures.insert(capture.clone(), self.span_text(tokens, pos, pos + 1));
                        }
                        self.match_elements(rest, tokens, pos + 1, to, captures)
                    } else {
                        None
                    }
                }
                Some(Quantifier::Optional) => {
                    let mut trial = captures.clone();
                    if let Some(end) = self.match_elements(rest, tokens, pos, to, &mut trial) {
                        *captures = trial;
                        return Some(end);
                    }
                    if pos < to && self.category_satisfies(name, restriction.as_ref(), tokens, pos)
                    {
                        if let Some(capture) = capture {
                            captures.insert(capture.clone(), self.span_text(tokens, pos, pos + 1));
                        }
                        self.match_elements(rest, tokens, pos + 1, to, captures)
                    } else {
                        None
                    }
                }
                Some(Quantifier::Star) => {
                    let star = StarElement {
                        capture: capture.as_deref(),
                        category: Some(name),
                        restriction: restriction.as_ref(),
                    };
                    self.match_star(star, rest, tokens, pos, to, captures)
                }
            },
        }
    }

    /// Resolve an unbounded element: find the earliest `j >= pos` such that
    /// the remaining elements match starting at `j`, every token in
    /// `pos..j` individually satisfying the element's restriction. With no
    /// remaining elements the run is greedy instead: it extends through the
    /// last satisfying token (for a variable, through `to`).
    fn match_star(
        &self,
        star: StarElement<'_>,
        rest: &[PatternElement],
        tokens: &AnnotatedTokens,
        pos: usize,
        to: usize,
        captures: &mut HashMap<String, String>,
    ) -> Option<usize> {
        let satisfies = |j: usize| match star.category {
            None => true,
            Some(name) => self.category_satisfies(name, star.restriction, tokens, j),
        };

        if rest.is_empty() {
            let mut j = pos;
            while j < to && satisfies(j) {
                j += 1;
            }
            if j > pos {
                if let Some(capture) = star.capture {
                    captures.insert(capture.to_string(), self.span_text(tokens, pos, j));
                }
            }
            return Some(j);
        }

        let mut j = pos;
        loop {
            let mut trial = captures.clone();
            if j > pos {
                if let Some(capture) = star.capture {
                    trial.insert(capture.to_string(), self.span_text(tokens, pos, j));
                }
            }
            if let Some(end) = self.match_elements(rest, tokens, j, to, &mut trial) {
                *captures = trial;
                return Some(end);
            }
            if j < to && satisfies(j) {
                j += 1;
            } else {
                return None;
            }
        }
    }

    fn literal_matches(&self, text: &str, tokens: &AnnotatedTokens, pos: usize) -> bool {
        let Some(token) = tokens.token(pos) else {
            return false;
        };
        if self.case_sensitive {
            token.original == text
        } else {
            token.text == text.to_lowercase()
        }
    }

    /// Whether the token at `pos` satisfies a category element: carries the
    /// restriction's POS label, equals the element name, is a synonym of
    /// it, or belongs to it as a semantic category.
    fn category_satisfies(
        &self,
        name: &str,
        restriction: Option<&PosRestriction>,
        tokens: &AnnotatedTokens,
        pos: usize,
    ) -> bool {
        let Some(token) = tokens.token(pos) else {
            return false;
        };
        if let Some(restriction) = restriction {
            if !restriction.tag.is_empty()
                && tokens.label_at(&self.pos_layer, pos) == Some(restriction.tag.as_str())
            {
                return true;
            }
        }
        let name_matches = if self.case_sensitive {
            token.original == name
        } else {
            token.text == name.to_lowercase()
        };
        name_matches
            || self.lexicon.is_synonym(&token.original, name)
            || self.lexicon.in_category(&token.original, name)
    }

    /// Surface text of `tokens[from..to]`, joined with single spaces.
    fn span_text(&self, tokens: &AnnotatedTokens, from: usize, to: usize) -> String {
        (from..to)
            .filter_map(|i| tokens.token_text(i))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The star-resolution view of an unbounded element: its capture name and,
/// for categories, the per-token satisfaction requirement.
struct StarElement<'a> {
    capture: Option<&'a str>,
    category: Option<&'a str>,
    restriction: Option<&'a PosRestriction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use banter_annotate::{CategoryTable, EmptyLexicon};
    use crate::compile::compile;

    fn engine_with(patterns: &[(&str, &str)]) -> MatchEngine<EmptyLexicon> {
        let mut engine = MatchEngine::new(EmptyLexicon);
        for (id, text) in patterns {
            engine.add_matcher(compile(id, text, None).unwrap());
        }
        engine
    }

    #[test]
    fn match_is_anchored_at_from() {
        let engine = engine_with(&[("t", "xxx yyy zzz")]);
        let tokens = AnnotatedTokens::from_text("aaa xxx yyy zzz");

        assert!(!engine.match_at(&tokens, 0, 4).is_match());

        let result = engine.match_at(&tokens, 1, 4);
        assert_eq!(result.template_id(), Some("t"));
        assert_eq!(result.matched_token_count(), 3);
        assert_eq!(result.matched_from(), Some(1));
    }

    #[test]
    fn optional_consumes_one_when_anchor_demands_it() {
        let engine = engine_with(&[("t", "xxx $name1? zzz")]);
        let tokens = AnnotatedTokens::from_text("xxx aaa zzz");

        let result = engine.match_at(&tokens, 0, 3);
        assert_eq!(result.matched_token_count(), 3);
        assert_eq!(result.captured_var("name1"), Some("aaa"));
    }

    #[test]
    fn optional_consumes_nothing_when_anchor_is_next() {
        let engine = engine_with(&[("t", "xxx $name1? zzz")]);
        let tokens = AnnotatedTokens::from_text("xxx zzz");

        let result = engine.match_at(&tokens, 0, 2);
        assert_eq!(result.matched_token_count(), 2);
        assert_eq!(result.captured_var("name1"), None);
    }

    #[test]
    fn star_runs_to_the_trailing_anchor() {
        let engine = engine_with(&[("t", "xxx $name2* zzz")]);
        let tokens = AnnotatedTokens::from_text("xxx aaa aaa aaa yyy zzz");

        let result = engine.match_at(&tokens, 0, 6);
        assert_eq!(result.matched_token_count(), 6);
        assert_eq!(result.captured_var("name2"), Some("aaa aaa aaa yyy"));
    }

    #[test]
    fn star_may_consume_nothing() {
        let engine = engine_with(&[("t", "xxx $name2* zzz")]);
        let tokens = AnnotatedTokens::from_text("xxx zzz");

        let result = engine.match_at(&tokens, 0, 2);
        assert_eq!(result.matched_token_count(), 2);
        assert_eq!(result.captured_var("name2"), None);
    }

    #[test]
    fn trailing_star_is_greedy_to_range_end() {
        let engine = engine_with(&[("t", "xxx $tail*")]);
        let tokens = AnnotatedTokens::from_text("xxx aaa bbb ccc");

        let result = engine.match_at(&tokens, 0, 4);
        assert_eq!(result.matched_token_count(), 4);
        assert_eq!(result.captured_var("tail"), Some("aaa bbb ccc"));

        // The range bound still applies.
        let bounded = engine.match_at(&tokens, 0, 2);
        assert_eq!(bounded.matched_token_count(), 2);
        assert_eq!(bounded.captured_var("tail"), Some("aaa"));
    }

    #[test]
    fn longest_match_wins() {
        let engine = engine_with(&[("short", "xxx yyy"), ("long", "xxx yyy zzz")]);
        let tokens = AnnotatedTokens::from_text("xxx yyy zzz");

        let result = engine.match_at(&tokens, 0, 3);
        assert_eq!(result.template_id(), Some("long"));
        assert_eq!(result.matched_token_count(), 3);
    }

    #[test]
    fn exact_ties_keep_the_earliest_registered() {
        let engine = engine_with(&[
            ("1", "xxx $name1? zzz"),
            ("2", "xxx yyy"),
            ("3", "xxx $name2* zzz"),
        ]);
        let tokens = AnnotatedTokens::from_text("xxx yyy zzz");

        let result = engine.match_at(&tokens, 0, 3);
        assert_eq!(result.template_id(), Some("1"));
        assert_eq!(result.matched_token_count(), 3);
        assert_eq!(result.captured_var("name1"), Some("yyy"));
    }

    #[test]
    fn category_matches_through_the_dictionary() {
        let mut dictionary = CategoryTable::new();
        dictionary.add("brute", "animal");

        let mut engine = MatchEngine::new(dictionary);
        engine.add_matcher(compile("wild", "[animal] goes wild", None).unwrap());

        let tokens = AnnotatedTokens::from_text("brute goes wild now");
        let result = engine.match_at(&tokens, 0, 4);
        assert_eq!(result.template_id(), Some("wild"));
        assert_eq!(result.matched_token_count(), 3);
    }

    #[test]
    fn category_matches_its_own_name() {
        let engine = {
            let mut engine = MatchEngine::new(EmptyLexicon);
            engine.add_matcher(compile("wild", "[animal] goes wild", None).unwrap());
            engine
        };
        let tokens = AnnotatedTokens::from_text("animal goes wild");
        assert!(engine.match_at(&tokens, 0, 3).is_match());
    }

    #[test]
    fn pos_restricted_star_captures_the_run() {
        let mut tokens = AnnotatedTokens::from_text("feeling well now");
        tokens.annotate(POS_LAYER, 1, "RB");

        let mut engine = MatchEngine::new(EmptyLexicon);
        engine.add_matcher(compile("feel", "feeling [good|RB*#attribute]", None).unwrap());

        let result = engine.match_at(&tokens, 0, 3);
        assert_eq!(result.template_id(), Some("feel"));
        assert_eq!(result.matched_token_count(), 2);
        assert_eq!(result.captured_var("attribute"), Some("well"));
    }

    #[test]
    fn pos_restriction_reads_the_configured_layer() {
        let mut tokens = AnnotatedTokens::from_text("feeling well");
        tokens.annotate("tagger-b", 1, "RB");

        let mut engine = MatchEngine::new(EmptyLexicon).with_pos_layer("tagger-b");
        engine.add_matcher(compile("feel", "feeling [good|RB#attribute]", None).unwrap());

        let result = engine.match_at(&tokens, 0, 2);
        assert_eq!(result.matched_token_count(), 2);
        assert_eq!(result.captured_var("attribute"), Some("well"));
    }

    #[test]
    fn no_match_returns_the_sentinel() {
        let engine = engine_with(&[("car", "[car]")]);
        let tokens = AnnotatedTokens::from_text("yeah");

        let result = engine.match_at(&tokens, 0, 1);
        assert_eq!(result.template_id(), None);
        assert_eq!(result.matched_token_count(), -1);
        assert!(result.captured_vars().is_empty());
        assert!(result.style_labels().is_empty());
    }

    #[test]
    fn empty_registry_is_a_silent_miss() {
        let engine = MatchEngine::new(EmptyLexicon);
        let tokens = AnnotatedTokens::from_text("anything");
        assert!(!engine.match_at(&tokens, 0, 1).is_match());
    }

    #[test]
    fn absent_style_keys_are_wildcarded() {
        let mut engine = MatchEngine::new(EmptyLexicon);
        engine.add_matcher(compile("fr", "bonjour", Some("lang=fr;mood=angry")).unwrap());
        engine.add_matcher(compile("en", "hello", Some("lang=en")).unwrap());
        engine.add_matcher(compile("any", "hey", Some("mood=good")).unwrap());

        let tokens = AnnotatedTokens::from_text("hello");
        let result = engine.match_at(&tokens, 0, 1);
        assert_eq!(result.template_id(), Some("en"));
        assert_eq!(result.style_label("lang"), Some("en"));
        assert_eq!(result.style_label("mood"), Some("*"));
    }

    #[test]
    fn match_any_finds_the_first_matchable_span() {
        let engine = engine_with(&[("t", "xxx yyy")]);
        let tokens = AnnotatedTokens::from_text("aaa bbb xxx yyy ccc");

        let result = engine.match_any(&tokens, 0, 5);
        assert_eq!(result.template_id(), Some("t"));
        assert_eq!(result.matched_from(), Some(2));
        assert_eq!(result.matched_token_count(), 2);

        assert!(!engine.match_any(&tokens, 3, 5).is_match());
    }

    #[test]
    fn repeated_capture_names_keep_the_last_value() {
        let engine = engine_with(&[("t", "$a yyy $a")]);
        let tokens = AnnotatedTokens::from_text("first yyy second");

        let result = engine.match_at(&tokens, 0, 3);
        assert_eq!(result.matched_token_count(), 3);
        assert_eq!(result.captured_var("a"), Some("second"));
    }

    #[test]
    fn case_sensitive_by_default() {
        let engine = engine_with(&[("t", "Hello")]);
        let tokens = AnnotatedTokens::from_text("hello");
        assert!(!engine.match_at(&tokens, 0, 1).is_match());

        let mut relaxed = MatchEngine::new(EmptyLexicon).case_insensitive();
        relaxed.add_matcher(compile("t", "Hello", None).unwrap());
        assert!(relaxed.match_at(&tokens, 0, 1).is_match());
    }

    #[test]
    fn range_bound_caps_consumption() {
        let engine = engine_with(&[("t", "xxx yyy zzz")]);
        let tokens = AnnotatedTokens::from_text("xxx yyy zzz");

        // The pattern needs three tokens but the range only grants two.
        assert!(!engine.match_at(&tokens, 0, 2).is_match());
        assert!(engine.match_at(&tokens, 0, 3).is_match());
        // An out-of-range bound is clamped to the token count.
        assert!(engine.match_at(&tokens, 0, 99).is_match());
    }

    #[test]
    fn variable_consumes_any_token() {
        let engine = engine_with(&[("t", "$one")]);
        let tokens = AnnotatedTokens::from_text("whatever");

        let result = engine.match_at(&tokens, 0, 1);
        assert_eq!(result.matched_token_count(), 1);
        assert_eq!(result.captured_var("one"), Some("whatever"));
    }
}
