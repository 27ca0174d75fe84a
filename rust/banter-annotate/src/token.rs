//! Word tokens — the unit the pattern engine walks over.
//!
//! Tokenization here is deliberately simple: the real agent receives token
//! sequences from its annotation pipeline (taggers, lemmatizers) over the
//! component bus, already split. `tokenize` exists for hosts and tests that
//! start from raw text.

/// A single word token in an utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token's text, lowercased for case-insensitive matching.
    pub text: String,
    /// The original surface text before normalization.
    pub original: String,
    /// Zero-based position in the token sequence.
    pub position: usize,
}

impl Token {
    /// Build a token at the given position, normalizing the lowercase form.
    pub fn new(original: impl Into<String>, position: usize) -> Self {
        let original = original.into();
        Token {
            text: original.to_lowercase(),
            original,
            position,
        }
    }
}

/// Split input text on whitespace into positioned tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split_whitespace()
        .enumerate()
        .map(|(position, word)| Token::new(word, position))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_numbers_positions() {
        let tokens = tokenize("how are you feeling");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].text, "how");
        assert_eq!(tokens[3].text, "feeling");
        assert_eq!(tokens[3].position, 3);
    }

    #[test]
    fn tokenize_preserves_original_case() {
        let tokens = tokenize("Feeling Good");
        assert_eq!(tokens[0].text, "feeling");
        assert_eq!(tokens[0].original, "Feeling");
        assert_eq!(tokens[1].text, "good");
        assert_eq!(tokens[1].original, "Good");
    }

    #[test]
    fn tokenize_collapses_whitespace() {
        let tokens = tokenize("  a \t b\n c ");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].position, 1);
    }
}
