//! # Lematizador por Regras
//!
//! Reduz cada token à forma de dicionário usando a tag POS: plurais perdem o
//! "-s", gerúndios o "-ing", particípios o "-ed". Formas irregulares ("went",
//! "was") vêm de uma tabela do modelo.
//!
//! O lematizador depende das tags. Sem o etiquetador no pipeline, ele apenas
//! põe as palavras em minúsculas e emite um aviso a cada documento; por isso o
//! modo `tokenize` desliga os dois juntos.

use std::collections::BTreeMap;

use tracing::warn;

use crate::doc::Doc;
use crate::tagger::Tagset;

#[derive(Debug, Clone, PartialEq)]
pub struct Lemmatizer {
    tagset: Tagset,
    irregular: BTreeMap<String, String>,
}

impl Lemmatizer {
    pub fn new(tagset: Tagset, irregular: BTreeMap<String, String>) -> Self {
        Self { tagset, irregular }
    }

    pub fn lemmatize(&self, doc: &mut Doc) {
        let tagged = doc.is_tagged();
        if !tagged && !doc.is_empty() {
            warn!("Lematizador sem tags POS: os lemas serão apenas as formas em minúsculas");
        }
        for token in doc.tokens_mut() {
            token.lemma = if tagged {
                self.lemma(&token.text, &token.tag)
            } else {
                token.text.to_lowercase()
            };
        }
    }

    fn lemma(&self, word: &str, tag: &str) -> String {
        if matches!(tag, "NNP" | "NNPS" | "PROPN") {
            return word.to_string();
        }
        let lower = word.to_lowercase();
        if let Some(lemma) = self.irregular.get(&lower) {
            return lemma.clone();
        }
        if self.tagset != Tagset::Ptb {
            return lower;
        }
        match tag {
            "NNS" | "VBZ" => strip_plural(&lower),
            "VBG" => strip_suffix(&lower, "ing"),
            "VBD" | "VBN" => match lower.strip_suffix("ied") {
                Some(stem) if !stem.is_empty() => format!("{stem}y"),
                _ => strip_suffix(&lower, "ed"),
            },
            _ => lower,
        }
    }
}

fn strip_plural(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() > 1 {
            return format!("{stem}y");
        }
    }
    for sibilant in ["sses", "xes", "ches", "shes"] {
        if word.ends_with(sibilant) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with("ss") || word.ends_with("us") {
        return word.to_string();
    }
    strip_suffix(word, "s")
}

/// Remove o sufixo se sobrarem ao menos dois caracteres.
fn strip_suffix(word: &str, suffix: &str) -> String {
    match word.strip_suffix(suffix) {
        Some(stem) if stem.chars().count() >= 2 => stem.to_string(),
        _ => word.to_string(),
    }
}
