//! Pattern elements — the compiled form of one authored template.
//!
//! A pattern definition string like `feeling [good|RB*#attribute]` compiles
//! into an ordered list of [`PatternElement`]s, one per whitespace-separated
//! unit. Three element kinds exist:
//!
//! - **Literal** — `feeling` matches a token with exactly that text.
//! - **Variable** — `$name`, `$name?`, `$name*` consume one, zero-or-one,
//!   or zero-or-more tokens and capture the consumed text under `name`.
//! - **Category** — `[good|RB*#attribute]` resolves the token(s) against
//!   the synonym dictionary and/or a part-of-speech restriction, optionally
//!   capturing the surface text.

use std::collections::BTreeMap;
use std::fmt;

/// Multiplicity of a variable or restricted category element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// Exactly one token. The default, written with no sigil.
    One,
    /// Zero or one token, written `?`.
    Optional,
    /// Zero or more tokens, written `*`.
    Star,
}

impl Quantifier {
    /// The sigil this quantifier is written with, empty for [`Quantifier::One`].
    pub fn sigil(&self) -> &'static str {
        match self {
            Quantifier::One => "",
            Quantifier::Optional => "?",
            Quantifier::Star => "*",
        }
    }
}

/// A part-of-speech restriction inside a category element.
///
/// `RB*` consumes a greedy run of tokens tagged `RB`; `RB?` consumes at
/// most one; bare `RB` consumes exactly one. An empty `tag` (written
/// `[name|*]`) quantifies the category over dictionary membership alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosRestriction {
    /// The POS label tokens must carry, e.g. `RB`, `NN`, `JJ`.
    pub tag: String,
    /// How many satisfying tokens are consumed.
    pub quantifier: Quantifier,
}

impl fmt::Display for PosRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tag, self.quantifier.sigil())
    }
}

/// One unit of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternElement {
    /// A token that must equal this text (under the engine's case mode).
    Literal(String),
    /// A capture slot: `$name`, `$name?`, `$name*`.
    Variable {
        name: String,
        quantifier: Quantifier,
    },
    /// A bracketed unit resolved via the synonym dictionary and/or a POS
    /// restriction: `[name]`, `[name|RB]`, `[name|RB*#capture]`.
    Category {
        /// A literal word for synonym lookup, or a semantic category label.
        name: String,
        /// Optional POS/quantifier restriction after `|`.
        restriction: Option<PosRestriction>,
        /// Optional capture name after `#`.
        capture: Option<String>,
    },
}

impl PatternElement {
    /// Whether this element may consume an unbounded run of tokens.
    ///
    /// Two adjacent unbounded elements have no deterministic resolution
    /// and are rejected at compile time.
    pub fn is_unbounded(&self) -> bool {
        match self {
            PatternElement::Literal(_) => false,
            PatternElement::Variable { quantifier, .. } => *quantifier == Quantifier::Star,
            PatternElement::Category { restriction, .. } => restriction
                .as_ref()
                .is_some_and(|r| r.quantifier == Quantifier::Star),
        }
    }
}

impl fmt::Display for PatternElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternElement::Literal(text) => write!(f, "{text}"),
            PatternElement::Variable { name, quantifier } => {
                write!(f, "${name}{}", quantifier.sigil())
            }
            PatternElement::Category {
                name,
                restriction,
                capture,
            } => {
                write!(f, "[{name}")?;
                if restriction.is_some() || capture.is_some() {
                    write!(f, "|")?;
                }
                if let Some(restriction) = restriction {
                    write!(f, "{restriction}")?;
                }
                if let Some(capture) = capture {
                    write!(f, "#{capture}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// A compiled pattern: identifier, element list, and style metadata.
///
/// The identifier need not be unique within a registry — several patterns
/// may share one id to express alternative phrasings of the same template.
/// Style labels are metadata handed back to the caller on a win; they play
/// no part in matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternDefinition {
    pub id: String,
    /// Non-empty, in authored order.
    pub elements: Vec<PatternElement>,
    /// `key=value` pairs from the style string.
    pub style: BTreeMap<String, String>,
}

impl fmt::Display for PatternDefinition {
    /// Renders the pattern back to its definition-string form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{element}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_elements() {
        let star = PatternElement::Variable {
            name: "x".into(),
            quantifier: Quantifier::Star,
        };
        let one = PatternElement::Variable {
            name: "x".into(),
            quantifier: Quantifier::One,
        };
        let category_star = PatternElement::Category {
            name: "good".into(),
            restriction: Some(PosRestriction {
                tag: "RB".into(),
                quantifier: Quantifier::Star,
            }),
            capture: None,
        };
        assert!(star.is_unbounded());
        assert!(category_star.is_unbounded());
        assert!(!one.is_unbounded());
        assert!(!PatternElement::Literal("xxx".into()).is_unbounded());
    }

    #[test]
    fn render_elements() {
        assert_eq!(PatternElement::Literal("zzz".into()).to_string(), "zzz");
        assert_eq!(
            PatternElement::Variable {
                name: "name2".into(),
                quantifier: Quantifier::Star
            }
            .to_string(),
            "$name2*"
        );
        assert_eq!(
            PatternElement::Category {
                name: "good".into(),
                restriction: Some(PosRestriction {
                    tag: "RB".into(),
                    quantifier: Quantifier::Star
                }),
                capture: Some("attribute".into()),
            }
            .to_string(),
            "[good|RB*#attribute]"
        );
        assert_eq!(
            PatternElement::Category {
                name: "animal".into(),
                restriction: None,
                capture: None,
            }
            .to_string(),
            "[animal]"
        );
    }
}
