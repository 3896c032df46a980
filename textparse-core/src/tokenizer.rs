//! # Tokenizador
//!
//! Divide o texto bruto em tokens (palavras, pontuações, clíticos). Cada token
//! preserva sua posição original no texto (offsets em bytes), de modo que o
//! segmentador baseado em regras e o parser possam raciocinar sobre o texto
//! original sem re-tokenizar.
//!
//! ## Esquema de Tokenização
//!
//! 1. **URLs e e-mails** são protegidos por regex e viram um único token.
//! 2. O restante segue as fronteiras de palavra do Unicode (UAX #29), via
//!    `unicode-segmentation`: "3.5" e "don't" ficam inteiros, "well-known" é
//!    dividido em "well", "-", "known".
//! 3. **Abreviações** conhecidas reabsorvem o ponto final ("Dr" + "." → "Dr.").
//! 4. **Reticências** ("...") viram um único token.
//! 5. **Clíticos** do idioma são separados ("don't" → "do", "n't").
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use textparse_core::tokenizer::Tokenizer;
//!
//! let tokenizer = Tokenizer::for_language("en");
//! let tokens = tokenizer.tokenize("Dr. Smith doesn't know.");
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, ["Dr.", "Smith", "does", "n't", "know", "."]);
//! ```

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::lexicon;

/// URLs e e-mails: tokens atômicos que o UAX #29 quebraria em pedaços.
static ATOMIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:https?://|www\.)\S+|\b[\w.+-]+@[\w-]+(?:\.[\w-]+)+").expect("regex válida")
});

/// Pontuação que não faz parte de uma URL quando aparece no final dela.
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '"', '\''];

/// Um token extraído do texto original.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token (ex: "Smith", ",", "n't").
    pub text: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

impl Token {
    /// Token composto apenas por pontuação/símbolos.
    pub fn is_punct(&self) -> bool {
        is_punct_text(&self.text)
    }
}

/// Texto composto apenas por caracteres que não são letras, dígitos ou espaço.
pub fn is_punct_text(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

/// Tokenizador configurado para um idioma.
#[derive(Debug, Clone, PartialEq)]
pub struct Tokenizer {
    /// Abreviações em minúsculas, sem o ponto final (ex: "dr", "u.s").
    abbreviations: HashSet<String>,
    /// Sufixos separados como tokens próprios, do mais longo ao mais curto.
    clitic_suffixes: Vec<String>,
}

impl Tokenizer {
    pub fn new<A, C>(abbreviations: A, clitic_suffixes: C) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let abbreviations = abbreviations
            .into_iter()
            .map(|a| a.as_ref().trim_end_matches('.').to_lowercase())
            .collect();
        let mut clitic_suffixes: Vec<String> = clitic_suffixes
            .into_iter()
            .map(|s| s.as_ref().to_lowercase().replace('\u{2019}', "'"))
            .collect();
        // O sufixo mais longo deve ser testado primeiro ("n't" antes de "'t")
        clitic_suffixes.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        Self {
            abbreviations,
            clitic_suffixes,
        }
    }

    /// Tokenizador com as listas embutidas do idioma (ou apenas as regras
    /// universais, se o idioma não for conhecido).
    pub fn for_language(lang: &str) -> Self {
        let (abbrevs, clitics) = lexicon::tokenizer_exceptions(lang);
        Self::new(abbrevs.iter(), clitics.iter())
    }

    pub fn is_abbreviation(&self, word: &str) -> bool {
        self.abbreviations
            .contains(&word.trim_end_matches('.').to_lowercase())
    }

    /// Tokeniza o texto. Tokens de espaço em branco são descartados.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut cursor = 0;

        for m in ATOMIC.find_iter(text) {
            let atom = m.as_str().trim_end_matches(URL_TRAILING);
            if atom.is_empty() || m.start() < cursor {
                continue;
            }
            self.tokenize_segment(text, cursor, m.start(), &mut tokens);
            push_token(&mut tokens, atom.to_string(), m.start(), m.start() + atom.len());
            cursor = m.start() + atom.len();
        }
        self.tokenize_segment(text, cursor, text.len(), &mut tokens);

        for (i, token) in tokens.iter_mut().enumerate() {
            token.index = i;
        }
        tokens
    }

    fn tokenize_segment(&self, text: &str, from: usize, to: usize, tokens: &mut Vec<Token>) {
        if from >= to {
            return;
        }
        for (offset, piece) in text[from..to].split_word_bound_indices() {
            if piece.chars().all(char::is_whitespace) {
                continue;
            }
            let start = from + offset;
            let end = start + piece.len();

            if piece == "." {
                if let Some(prev) = tokens.last_mut() {
                    // Abreviação: reabsorve o ponto
                    if prev.end == start && !prev.is_punct() && self.is_abbreviation(&prev.text) {
                        prev.text.push('.');
                        prev.end = end;
                        continue;
                    }
                    // Reticências: junta pontos consecutivos
                    if prev.end == start && prev.text.chars().all(|c| c == '.') {
                        prev.text.push('.');
                        prev.end = end;
                        continue;
                    }
                }
            }

            match self.split_clitic(piece) {
                Some(split) => {
                    push_token(tokens, piece[..split].to_string(), start, start + split);
                    push_token(tokens, piece[split..].to_string(), start + split, end);
                }
                None => push_token(tokens, piece.to_string(), start, end),
            }
        }
    }

    /// Posição (em bytes) onde o clítico começa, se a palavra terminar em um.
    fn split_clitic(&self, word: &str) -> Option<usize> {
        self.clitic_suffixes.iter().find_map(|suffix| {
            let n = suffix.chars().count();
            // Compara por caracteres: o apóstrofo tipográfico ocupa 3 bytes
            let split = word.char_indices().rev().nth(n.checked_sub(1)?)?.0;
            let tail = word[split..].to_lowercase().replace('\u{2019}', "'");
            (split > 0 && tail == *suffix).then_some(split)
        })
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer::for_language(crate::config::DEFAULT_LANGUAGE)
    }
}

/// Adiciona um token diretamente (o índice é atribuído ao final)
fn push_token(tokens: &mut Vec<Token>, text: String, start: usize, end: usize) {
    tokens.push(Token {
        text,
        start,
        end,
        index: 0,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_basic() {
        let tokens = Tokenizer::for_language("en").tokenize("Hi there. How are you?");
        assert_eq!(texts(&tokens), ["Hi", "there", ".", "How", "are", "you", "?"]);
        assert_eq!(tokens[2].start, 8);
        assert_eq!(tokens[6].index, 6);
    }

    #[test]
    fn test_tokenize_offsets_point_into_text() {
        let text = "  The cat, sat.";
        for token in Tokenizer::for_language("en").tokenize(text) {
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_abbreviation_keeps_period() {
        let tokens = Tokenizer::for_language("en").tokenize("Mr. Brown left.");
        assert_eq!(texts(&tokens), ["Mr.", "Brown", "left", "."]);
    }

    #[test]
    fn test_contractions_are_split() {
        let tokens = Tokenizer::for_language("en").tokenize("I can't go, it's late");
        assert_eq!(texts(&tokens), ["I", "ca", "n't", "go", ",", "it", "'s", "late"]);
    }

    #[test]
    fn test_typographic_apostrophe_contraction() {
        let text = "we\u{2019}re here";
        let tokens = Tokenizer::for_language("en").tokenize(text);
        assert_eq!(tokens[0].text, "we");
        assert_eq!(tokens[1].text, "\u{2019}re");
        assert_eq!(&text[tokens[1].start..tokens[1].end], "\u{2019}re");
    }

    #[test]
    fn test_numbers_and_ellipsis() {
        let tokens = Tokenizer::for_language("en").tokenize("It costs 3.50... maybe");
        assert_eq!(texts(&tokens), ["It", "costs", "3.50", "...", "maybe"]);
    }

    #[test]
    fn test_url_is_atomic() {
        let tokens = Tokenizer::for_language("en").tokenize("See https://example.com/a?b=1.");
        assert_eq!(texts(&tokens), ["See", "https://example.com/a?b=1", "."]);
    }

    #[test]
    fn test_portuguese_abbreviations_and_hyphen() {
        let tokens = Tokenizer::for_language("pt").tokenize("Dr. Silva curou-se.");
        assert_eq!(texts(&tokens), ["Dr.", "Silva", "curou", "-", "se", "."]);
    }

    #[test]
    fn test_empty_text() {
        assert!(Tokenizer::default().tokenize("").is_empty());
        assert!(Tokenizer::default().tokenize("   \n ").is_empty());
    }
}
