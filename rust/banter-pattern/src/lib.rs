//! # banter-pattern
//!
//! The pattern/template matching engine behind Banter's dialogue layer.
//! Hand-authored textual patterns are compiled once at setup time and then
//! evaluated, deterministically and anchored, against annotated token
//! sequences — producing captured variables and style metadata that the
//! dialogue layer uses to pick a reply template and fill its slots.
//!
//! ## Pattern syntax
//!
//! A pattern is a whitespace-separated list of units:
//!
//! ```text
//! xxx                      literal token
//! $name                    any one token, captured as `name`
//! $name?                   zero or one token
//! $name*                   zero or more tokens (greedy, anchor-bounded)
//! [animal]                 token equal to `animal`, a synonym of it, or a
//!                          member of the `animal` semantic category
//! [good|RB]                ... or carrying POS label `RB`
//! [good|RB*#attribute]     greedy run of satisfying tokens, captured as
//!                          `attribute`
//! ```
//!
//! A pattern may carry a style string of `key=value` pairs separated by
//! `;`. Style labels never influence matching; they are returned to the
//! caller with the winning match, with keys declared only by other
//! patterns defaulted to `"*"`.
//!
//! ## Example
//!
//! ```
//! use banter_annotate::{AnnotatedTokens, CategoryTable, POS_LAYER};
//! use banter_pattern::{MatchEngine, compile};
//!
//! let mut dictionary = CategoryTable::new();
//! dictionary.add("brute", "animal");
//!
//! let mut engine = MatchEngine::new(dictionary);
//! engine.add_matcher(compile("wild", "[animal] goes $how*", Some("mood=excited")).unwrap());
//!
//! let tokens = AnnotatedTokens::from_text("brute goes really wild");
//! let result = engine.match_at(&tokens, 0, tokens.token_count());
//!
//! assert_eq!(result.template_id(), Some("wild"));
//! assert_eq!(result.matched_token_count(), 4);
//! assert_eq!(result.captured_var("how"), Some("really wild"));
//! assert_eq!(result.style_label("mood"), Some("excited"));
//! ```
//!
//! ## Evaluation guarantees
//!
//! - Matching is anchored: the first element must align with the start
//!   offset.
//! - Quantifier resolution is deterministic — a forward scan to the
//!   earliest position where the rest of the pattern matches — never
//!   exponential backtracking.
//! - Among patterns matching at one offset, the longest consumption wins;
//!   exact ties keep the earliest-registered pattern.
//! - "No match" is an ordinary data outcome, never an error.

pub mod compile;
pub mod element;
pub mod engine;
pub mod error;
pub mod result;

pub use compile::compile;
pub use element::{PatternDefinition, PatternElement, PosRestriction, Quantifier};
pub use engine::MatchEngine;
pub use error::CompileError;
pub use result::{MatchResult, NO_MATCH};
