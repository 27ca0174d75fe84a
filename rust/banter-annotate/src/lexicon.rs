//! The dictionary lookup contract — synonym and semantic-category queries.
//!
//! The agent's synonym dictionary is an external collaborator with its own
//! storage and loading mechanism; the pattern engine only consumes two
//! queries from it: "is this word a synonym of that one" and "which
//! categories does this word belong to". Both are synchronous and
//! side-effect-free, and the engine never caches answers — token counts
//! per utterance are small enough that repeated lookups are cheap.
//!
//! [`CategoryTable`] is the in-memory implementation used by hosts that
//! configure their dictionary programmatically and by tests.

use std::collections::{BTreeSet, HashMap};

/// Synonym and semantic-category lookup.
pub trait Lexicon {
    /// Whether `word` is a registered synonym of `target`.
    fn is_synonym(&self, word: &str, target: &str) -> bool;

    /// The set of semantic categories `word` belongs to.
    fn categories_of(&self, word: &str) -> BTreeSet<String>;

    /// Whether `word` belongs to the semantic category `category`.
    fn in_category(&self, word: &str, category: &str) -> bool {
        self.categories_of(word).contains(category)
    }
}

impl<L: Lexicon + ?Sized> Lexicon for &L {
    fn is_synonym(&self, word: &str, target: &str) -> bool {
        (**self).is_synonym(word, target)
    }

    fn categories_of(&self, word: &str) -> BTreeSet<String> {
        (**self).categories_of(word)
    }

    fn in_category(&self, word: &str, category: &str) -> bool {
        (**self).in_category(word, category)
    }
}

impl<L: Lexicon + ?Sized> Lexicon for Box<L> {
    fn is_synonym(&self, word: &str, target: &str) -> bool {
        (**self).is_synonym(word, target)
    }

    fn categories_of(&self, word: &str) -> BTreeSet<String> {
        (**self).categories_of(word)
    }

    fn in_category(&self, word: &str, category: &str) -> bool {
        (**self).in_category(word, category)
    }
}

/// An in-memory category table.
///
/// Words and categories are normalized to lowercase on insert and on
/// query, so `Brute` and `brute` resolve identically. A word registered
/// under a category is also a synonym of that category's name, which is
/// how flat synonym groups are expressed: register every member under the
/// group's head word.
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    /// word → categories it belongs to.
    memberships: HashMap<String, BTreeSet<String>>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `word` as a member of `category`.
    pub fn add(&mut self, word: &str, category: &str) {
        self.memberships
            .entry(word.to_lowercase())
            .or_default()
            .insert(category.to_lowercase());
    }

    /// Register several members of `category` at once.
    pub fn add_all<'a>(&mut self, category: &str, words: impl IntoIterator<Item = &'a str>) {
        for word in words {
            self.add(word, category);
        }
    }
}

impl Lexicon for CategoryTable {
    fn is_synonym(&self, word: &str, target: &str) -> bool {
        word.eq_ignore_ascii_case(target) || self.in_category(word, target)
    }

    fn categories_of(&self, word: &str) -> BTreeSet<String> {
        self.memberships
            .get(&word.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    fn in_category(&self, word: &str, category: &str) -> bool {
        self.memberships
            .get(&word.to_lowercase())
            .is_some_and(|categories| categories.contains(&category.to_lowercase()))
    }
}

/// A lexicon with no entries.
///
/// For hosts whose patterns contain no category elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyLexicon;

impl Lexicon for EmptyLexicon {
    fn is_synonym(&self, word: &str, target: &str) -> bool {
        word.eq_ignore_ascii_case(target)
    }

    fn categories_of(&self, _word: &str) -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn in_category(&self, _word: &str, _category: &str) -> bool {
        false
    }
}
