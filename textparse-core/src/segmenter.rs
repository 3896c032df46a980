//! Segmentadores de sentença externos ao backend.
//!
//! Nos modos `tag` e `tokenize` o parser não roda, então alguém precisa dizer
//! onde cada sentença termina. Qualquer tipo que implemente
//! [`SentenceSegmenter`] serve, inclusive closures:
//!
//! ```
//! use textparse_core::segmenter::SentenceSegmenter;
//!
//! let by_line = |text: &str| text.lines().map(str::to_string).collect::<Vec<_>>();
//! assert_eq!(by_line.segment("a b\nc"), vec!["a b", "c"]);
//! ```

use std::sync::Arc;

/// Divide um texto em sentenças, na ordem em que aparecem.
pub trait SentenceSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

impl<F> SentenceSegmenter for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn segment(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

/// Segmentador compartilhável entre threads.
pub type SharedSegmenter = Arc<dyn SentenceSegmenter>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_a_segmenter() {
        let shared: SharedSegmenter = Arc::new(|text: &str| {
            text.split('|').map(|s| s.trim().to_string()).collect::<Vec<_>>()
        });
        assert_eq!(shared.segment("one | two"), ["one", "two"]);
    }
}
