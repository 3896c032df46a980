//! # Sentencizer
//!
//! Estágio de pipeline que define fronteiras de sentença só pela pontuação:
//! depois de um token de pontuação final, a próxima sentença começa no
//! primeiro token que não é pontuação.
//!
//! ```text
//! Hi there . How are you ?
//! ^^^^^^^^^^ ^^^^^^^^^^^^^
//! ```
//!
//! É o estágio acrescentado ao pipeline quando o modo pede segmentação, mas o
//! backend não traz nem `parser` nem `sentencizer`.

use crate::doc::Doc;

/// Pontuação que encerra uma sentença (token inteiro).
pub const DEFAULT_PUNCT_CHARS: &[&str] = &[
    ".", "!", "?", "…", "...", "。", "！", "？", "‼", "⁇", "⁈", "⁉", "!?", "?!",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Sentencizer {
    punct_chars: Vec<String>,
}

impl Default for Sentencizer {
    fn default() -> Self {
        Self::new(DEFAULT_PUNCT_CHARS.iter().map(|s| s.to_string()))
    }
}

impl Sentencizer {
    pub fn new(punct_chars: impl IntoIterator<Item = String>) -> Self {
        Self {
            punct_chars: punct_chars.into_iter().collect(),
        }
    }

    fn is_final(&self, text: &str) -> bool {
        self.punct_chars.iter().any(|p| p == text)
    }

    /// Marca os inícios de sentença, substituindo fronteiras anteriores.
    pub fn segment(&self, doc: &mut Doc) {
        let mut starts = vec![false; doc.len()];
        let mut seen_final = false;
        for (pos, token) in doc.tokens().iter().enumerate() {
            let is_final = self.is_final(&token.text);
            if seen_final && !token.is_punct() && !is_final {
                starts[pos] = true;
                seen_final = false;
            } else if is_final {
                seen_final = true;
            }
        }
        doc.set_sent_starts(starts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn sentences(text: &str) -> Vec<String> {
        let mut doc = Doc::from_tokens(text, "en", Tokenizer::default().tokenize(text));
        Sentencizer::default().segment(&mut doc);
        doc.sents().iter().map(|s| s.text().to_string()).collect()
    }

    #[test]
    fn test_splits_on_final_punctuation() {
        assert_eq!(sentences("Hi there. How are you?"), ["Hi there.", "How are you?"]);
    }

    #[test]
    fn test_trailing_punctuation_stays_with_sentence() {
        assert_eq!(sentences("Wait!!) ok then"), ["Wait!!)", "ok then"]);
    }

    #[test]
    fn test_no_final_punctuation_is_one_sentence() {
        assert_eq!(sentences("just some words"), ["just some words"]);
    }

    #[test]
    fn test_abbreviation_does_not_split() {
        assert_eq!(sentences("Mr. Smith left."), ["Mr. Smith left."]);
    }

    #[test]
    fn test_empty_doc_has_no_sentences() {
        assert!(sentences("").is_empty());
    }
}
