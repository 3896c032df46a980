//! # Etiquetador POS (Part-of-Speech)
//!
//! Atribui uma tag morfossintática a cada token do [`Doc`], combinando:
//!
//! 1. **Pontuação e números**: reconhecidos pela forma.
//! 2. **Léxico**: lookup da palavra em minúsculas.
//! 3. **Nomes próprios**: palavra capitalizada fora do início da sentença.
//! 4. **Regras de sufixo**: "-ly" → advérbio, "-tion" → substantivo, etc.
//! 5. **Contexto**: ajustes com base na tag anterior (ex: depois de um modal,
//!    a forma verbal é infinitiva).
//!
//! ## Conjuntos de Tags
//!
//! | Conjunto     | Exemplo             | Usado por        |
//! |--------------|---------------------|------------------|
//! | Penn Treebank| `NN`, `VBZ`, `DT`   | `en_core_rules`  |
//! | Universal    | `NOUN`, `VERB`, `DET` | `pt_core_rules`|
//!
//! O parser não depende do conjunto escolhido: ele raciocina sobre a classe
//! gramatical grossa ([`PosClass`]) derivada de qualquer uma das duas.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::doc::Doc;

/// Conjunto de tags produzido por um modelo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tagset {
    /// Penn Treebank (tags finas do inglês).
    Ptb,
    /// Universal Dependencies (UPOS).
    Universal,
}

impl Tagset {
    fn default_tag(&self) -> &'static str {
        match self {
            Tagset::Ptb => "NN",
            Tagset::Universal => "NOUN",
        }
    }

    fn proper_tag(&self) -> &'static str {
        match self {
            Tagset::Ptb => "NNP",
            Tagset::Universal => "PROPN",
        }
    }

    fn number_tag(&self) -> &'static str {
        match self {
            Tagset::Ptb => "CD",
            Tagset::Universal => "NUM",
        }
    }

    /// Tag de um token de pontuação.
    fn punct_tag(&self, text: &str) -> &'static str {
        if *self == Tagset::Universal {
            return if text.chars().all(|c| c.is_ascii_punctuation() || !c.is_ascii()) {
                "PUNCT"
            } else {
                "SYM"
            };
        }
        match text {
            "." | "!" | "?" | "…" => ".",
            "," => ",",
            ":" | ";" | "..." | "--" | "—" | "–" => ":",
            "-" => "HYPH",
            "(" | "[" | "{" => "-LRB-",
            ")" | "]" | "}" => "-RRB-",
            "\"" | "``" | "\u{201c}" | "'" | "\u{2018}" => "``",
            "''" | "\u{201d}" | "\u{2019}" => "''",
            "$" | "€" | "£" => "$",
            "#" => "#",
            _ if text.chars().all(|c| c == '.') => ":",
            _ => "NFP",
        }
    }
}

/// Classe gramatical grossa, independente do conjunto de tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosClass {
    Noun,
    Propn,
    Pron,
    Det,
    Adj,
    Adv,
    Verb,
    Aux,
    Adp,
    Part,
    Cconj,
    Sconj,
    Num,
    Intj,
    Punct,
    Other,
}

impl PosClass {
    /// Mapeia uma tag Penn Treebank ou UPOS para a classe grossa.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "NN" | "NNS" | "NOUN" => PosClass::Noun,
            "NNP" | "NNPS" | "PROPN" => PosClass::Propn,
            "PRP" | "WP" | "EX" | "PRON" => PosClass::Pron,
            "DT" | "PDT" | "WDT" | "PRP$" | "WP$" | "DET" => PosClass::Det,
            "JJ" | "JJR" | "JJS" | "ADJ" => PosClass::Adj,
            "RB" | "RBR" | "RBS" | "WRB" | "ADV" => PosClass::Adv,
            "VB" | "VBD" | "VBG" | "VBN" | "VBP" | "VBZ" | "VERB" => PosClass::Verb,
            "MD" | "AUX" => PosClass::Aux,
            "IN" | "ADP" => PosClass::Adp,
            "TO" | "RP" | "POS" | "PART" => PosClass::Part,
            "CC" | "CCONJ" => PosClass::Cconj,
            "SCONJ" => PosClass::Sconj,
            "CD" | "NUM" => PosClass::Num,
            "UH" | "INTJ" => PosClass::Intj,
            "." | "," | ":" | "``" | "''" | "-LRB-" | "-RRB-" | "HYPH" | "NFP" | "$" | "#"
            | "PUNCT" | "SYM" => PosClass::Punct,
            _ => PosClass::Other,
        }
    }

    /// Núcleos nominais: podem ser sujeito, objeto ou objeto de preposição.
    pub fn is_nominal(&self) -> bool {
        matches!(self, PosClass::Noun | PosClass::Propn | PosClass::Pron)
    }
}

/// Etiquetador baseado em léxico e regras de sufixo.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagger {
    tagset: Tagset,
    lexicon: HashMap<String, String>,
    suffix_rules: Vec<(String, String)>,
}

impl Tagger {
    pub fn new(
        tagset: Tagset,
        lexicon: impl IntoIterator<Item = (String, String)>,
        suffix_rules: Vec<(String, String)>,
    ) -> Self {
        Self {
            tagset,
            lexicon: lexicon
                .into_iter()
                .map(|(word, tag)| (word.to_lowercase(), tag))
                .collect(),
            suffix_rules,
        }
    }

    pub fn tagset(&self) -> Tagset {
        self.tagset
    }

    /// Etiqueta todos os tokens do documento, em ordem.
    pub fn tag(&self, doc: &mut Doc) {
        let mut prev: Option<String> = None;
        let mut sentence_initial = true;
        for token in doc.tokens_mut() {
            let tag = self.tag_word(&token.text, prev.as_deref(), sentence_initial);
            sentence_initial = matches!(token.text.as_str(), "." | "!" | "?" | "…" | "...");
            token.tag = tag.clone();
            prev = Some(tag);
        }
        doc.mark_tagged();
    }

    fn tag_word(&self, word: &str, prev: Option<&str>, sentence_initial: bool) -> String {
        if crate::tokenizer::is_punct_text(word) {
            return self.tagset.punct_tag(word).to_string();
        }
        if is_number(word) {
            return self.tagset.number_tag().to_string();
        }

        let lower = word.to_lowercase();
        let base = if let Some(tag) = self.lexicon.get(&lower) {
            tag.clone()
        } else if starts_uppercase(word) && !sentence_initial {
            self.tagset.proper_tag().to_string()
        } else if let Some(tag) = self.suffix_tag(&lower) {
            tag.to_string()
        } else if starts_uppercase(word) {
            self.tagset.proper_tag().to_string()
        } else {
            self.tagset.default_tag().to_string()
        };

        match self.tagset {
            Tagset::Ptb => adjust_ptb(&lower, base, prev),
            Tagset::Universal => base,
        }
    }

    fn suffix_tag(&self, lower: &str) -> Option<&str> {
        let chars = lower.chars().count();
        self.suffix_rules
            .iter()
            .find(|(suffix, _)| chars > suffix.chars().count() + 1 && lower.ends_with(suffix.as_str()))
            .map(|(_, tag)| tag.as_str())
    }
}

/// Ajustes contextuais para Penn Treebank.
fn adjust_ptb(lower: &str, tag: String, prev: Option<&str>) -> String {
    let Some(prev) = prev else { return tag };
    match (prev, tag.as_str()) {
        // "it's" → verbo; "John's" → possessivo
        ("PRP" | "WP" | "EX" | "DT" | "WDT", "POS") if lower == "'s" => "VBZ".to_string(),
        // Depois de modal ou "to", a forma é infinitiva
        ("MD" | "TO", "NN" | "VBP" | "VBD" | "VB") => "VB".to_string(),
        // Sujeito pronominal seguido de forma nominal: verbo conjugado
        ("PRP", "NNS") => "VBZ".to_string(),
        ("PRP", "NN" | "VB") => "VBP".to_string(),
        _ => tag,
    }
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

fn is_number(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
        && word.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '/' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelData;
    use crate::tokenizer::Tokenizer;

    fn tags(model: &ModelData, text: &str) -> Vec<String> {
        let tokenizer = Tokenizer::for_language(&model.lang);
        let mut doc = Doc::from_tokens(text, model.lang.clone(), tokenizer.tokenize(text));
        model.tagger().tag(&mut doc);
        assert!(doc.is_tagged());
        doc.tokens().iter().map(|t| t.tag.clone()).collect()
    }

    #[test]
    fn test_ptb_lexicon_and_punct() {
        let en = ModelData::english();
        assert_eq!(tags(&en, "The cat sat."), ["DT", "NN", "VBD", "."]);
    }

    #[test]
    fn test_ptb_context_rules() {
        let en = ModelData::english();
        assert_eq!(tags(&en, "it's late"), ["PRP", "VBZ", "JJ"]);
        assert_eq!(tags(&en, "I can run"), ["PRP", "MD", "VB"]);
        assert_eq!(tags(&en, "she walks"), ["PRP", "VBZ"]);
    }

    #[test]
    fn test_proper_nouns_and_numbers() {
        let en = ModelData::english();
        assert_eq!(tags(&en, "We met Alice in 2022"), ["PRP", "VBD", "NNP", "IN", "CD"]);
    }

    #[test]
    fn test_universal_tagset() {
        let pt = ModelData::portuguese();
        assert_eq!(
            tags(&pt, "O Brasil cresceu rapidamente."),
            ["DET", "PROPN", "VERB", "ADV", "PUNCT"]
        );
    }

    #[test]
    fn test_pos_class_mapping() {
        assert_eq!(PosClass::from_tag("VBZ"), PosClass::Verb);
        assert_eq!(PosClass::from_tag("VERB"), PosClass::Verb);
        assert_eq!(PosClass::from_tag("MD"), PosClass::Aux);
        assert_eq!(PosClass::from_tag("-LRB-"), PosClass::Punct);
        assert_eq!(PosClass::from_tag("???"), PosClass::Other);
        assert!(PosClass::Pron.is_nominal());
        assert!(!PosClass::Det.is_nominal());
    }
}
