//! # banter-annotate
//!
//! The annotation-side contracts consumed by Banter's pattern engine:
//! word tokens, named annotation layers (part-of-speech and friends), and
//! the dictionary lookup interface for synonym/category membership.
//!
//! In the running agent these are fed by external tagger and lemmatizer
//! components; this crate defines the in-memory representation those
//! adapters write into and the engine reads from.
//!
//! ## Example
//!
//! ```
//! use banter_annotate::{AnnotatedTokens, CategoryTable, Lexicon, POS_LAYER};
//!
//! let mut tokens = AnnotatedTokens::from_text("feeling well now");
//! tokens.annotate(POS_LAYER, 1, "RB");
//!
//! assert_eq!(tokens.token_text(1), Some("well"));
//! assert_eq!(tokens.label_at(POS_LAYER, 1), Some("RB"));
//!
//! let mut dictionary = CategoryTable::new();
//! dictionary.add("brute", "animal");
//! assert!(dictionary.in_category("brute", "animal"));
//! ```

pub mod annotate;
pub mod lexicon;
pub mod token;

pub use annotate::{AnnotatedTokens, POS_LAYER};
pub use lexicon::{CategoryTable, EmptyLexicon, Lexicon};
pub use token::{Token, tokenize};
