//! # Segmentador Punkt
//!
//! Segmentação estatística de sentenças no estilo Punkt (Kiss & Strunk, 2006),
//! usando parâmetros **já treinados**: tipos de abreviação, colocações e
//! palavras que costumam iniciar sentenças. Nada é aprendido em tempo de
//! execução.
//!
//! ## Regras de decisão
//!
//! | Palavra termina em | Fronteira quando...                                        |
//! |--------------------|------------------------------------------------------------|
//! | `!` `?`            | sempre                                                     |
//! | `…` ou `...`       | a próxima palavra não começa com minúscula                 |
//! | `.` (abreviação)   | a próxima palavra é um iniciador frequente e capitalizado  |
//! | `.` (outras)       | a próxima palavra não começa com minúscula                 |
//!
//! Abreviação aqui inclui os tipos conhecidos, iniciais ("J.", "U.S.") e
//! números. Aspas e parênteses de fechamento ficam com a sentença anterior.
//!
//! ## Recursos
//!
//! Os parâmetros vivem em `tokenizers/punkt/<idioma>.json` (mesma organização
//! de diretórios do NLTK). Há uma cópia embutida para inglês.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ResourceConfig;
use crate::error::{Error, Result};
use crate::lexicon;
use crate::segmenter::SentenceSegmenter;

/// Idioma dos parâmetros embutidos.
pub const PUNKT_ENGLISH: &str = "english";

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").expect("regex de palavra válida"));

const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '\u{201d}', '\u{2019}', '»'];
const OPENERS: &[char] = &['"', '\'', '(', '[', '{', '\u{201c}', '\u{2018}', '«'];

/// Parâmetros Punkt treinados, no formato dos arquivos JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PunktParameters {
    /// Abreviações conhecidas (minúsculas, sem o ponto final).
    pub abbrev_types: BTreeSet<String>,
    /// Pares que nunca delimitam sentença (ex: "no." + "1").
    pub collocations: BTreeSet<(String, String)>,
    /// Palavras que frequentemente iniciam sentenças.
    pub sent_starters: BTreeSet<String>,
}

impl PunktParameters {
    /// Parâmetros embutidos para inglês.
    pub fn english() -> Self {
        Self {
            abbrev_types: lexicon::PUNKT_EN_ABBREVIATIONS.iter().map(|s| s.to_string()).collect(),
            collocations: lexicon::PUNKT_EN_COLLOCATIONS
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
            sent_starters: lexicon::PUNKT_EN_SENTENCE_STARTERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn bundled(language: &str) -> Option<Self> {
        (language == PUNKT_ENGLISH).then(Self::english)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|source| Error::Resource {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Caminho relativo dos parâmetros de um idioma dentro de um diretório de dados.
pub fn punkt_path(language: &str) -> PathBuf {
    Path::new("tokenizers")
        .join("punkt")
        .join(format!("{language}.json"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct PunktSegmenter {
    params: PunktParameters,
}

impl PunktSegmenter {
    pub fn new(params: PunktParameters) -> Self {
        Self { params }
    }

    /// Carrega os parâmetros do idioma: diretórios de dados primeiro, depois
    /// a cópia embutida (se permitida).
    pub fn load(language: &str, resources: &ResourceConfig) -> Result<Self> {
        let relative = punkt_path(language);
        if let Some(path) = resources.locate(&relative) {
            debug!("Carregando parâmetros Punkt de {}", path.display());
            return PunktParameters::load_file(&path).map(Self::new);
        }
        if resources.allow_bundled {
            if let Some(params) = PunktParameters::bundled(language) {
                debug!("Usando parâmetros Punkt embutidos para '{}'", language);
                return Ok(Self::new(params));
            }
        }
        Err(Error::MissingLinguisticResource {
            resource: format!("punkt/{language}"),
            directive: format!(
                "instale os parâmetros em {} dentro de um dos diretórios de dados ({}) \
                 ou defina a variável {}",
                relative.display(),
                resources.searched(),
                crate::config::DATA_ENV_VAR
            ),
        })
    }

    pub fn params(&self) -> &PunktParameters {
        &self.params
    }

    /// Divide o texto em sentenças aparadas.
    pub fn split(&self, text: &str) -> Vec<String> {
        let words: Vec<(usize, usize)> = WORD.find_iter(text).map(|m| (m.start(), m.end())).collect();
        let Some(&(first, _)) = words.first() else {
            return Vec::new();
        };

        let mut sentences = Vec::new();
        let mut start = first;
        for pair in words.windows(2) {
            let (ws, we) = pair[0];
            let (ns, ne) = pair[1];
            if self.is_boundary(&text[ws..we], &text[ns..ne]) {
                sentences.push(text[start..we].trim().to_string());
                start = ns;
            }
        }
        if let Some(&(_, end)) = words.last() {
            sentences.push(text[start..end].trim().to_string());
        }
        sentences
    }

    fn is_boundary(&self, word: &str, next: &str) -> bool {
        let core = word.trim_end_matches(CLOSERS);
        if core.ends_with("..") || core.ends_with('…') {
            return !starts_lowercase(next);
        }
        match core.chars().last() {
            Some('!' | '?' | '‼' | '⁇' | '⁈' | '⁉') => true,
            Some('.') => {
                let typ = core.trim_start_matches(OPENERS).trim_end_matches('.').to_lowercase();
                let next_typ = normalize(next);
                if self.params.collocations.contains(&(typ.clone(), next_typ.clone())) {
                    return false;
                }
                if self.is_abbreviation(&typ) {
                    return self.params.sent_starters.contains(&next_typ) && starts_uppercase(next);
                }
                !starts_lowercase(next)
            }
            _ => false,
        }
    }

    fn is_abbreviation(&self, typ: &str) -> bool {
        if typ.is_empty() {
            return false;
        }
        self.params.abbrev_types.contains(typ)
            || is_initials(typ)
            || (typ.chars().any(|c| c.is_ascii_digit())
                && typ.chars().all(|c| c.is_ascii_digit() || matches!(c, ',' | '.')))
    }
}

impl SentenceSegmenter for PunktSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        self.split(text)
    }
}

/// "j", "u.s", "e.g": letras isoladas separadas por pontos.
fn is_initials(typ: &str) -> bool {
    typ.split('.')
        .all(|part| part.chars().count() == 1 && part.chars().all(char::is_alphabetic))
}

fn normalize(word: &str) -> String {
    word.trim_start_matches(OPENERS)
        .trim_end_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

fn first_letter(word: &str) -> Option<char> {
    word.trim_start_matches(OPENERS).chars().next()
}

fn starts_lowercase(word: &str) -> bool {
    first_letter(word).is_some_and(char::is_lowercase)
}

fn starts_uppercase(word: &str) -> bool {
    first_letter(word).is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> PunktSegmenter {
        PunktSegmenter::new(PunktParameters::english())
    }

    #[test]
    fn test_basic_split() {
        assert_eq!(
            english().split("Hi there. How are you?"),
            ["Hi there.", "How are you?"]
        );
    }

    #[test]
    fn test_abbreviations_and_initials() {
        assert_eq!(
            english().split("Mr. Smith met J. R. Tolkien in the U.S. last year. He smiled."),
            ["Mr. Smith met J. R. Tolkien in the U.S. last year.", "He smiled."]
        );
    }

    #[test]
    fn test_abbreviation_before_sentence_starter_splits() {
        assert_eq!(
            english().split("We bought apples, pears, etc. The rest was sold."),
            ["We bought apples, pears, etc.", "The rest was sold."]
        );
    }

    #[test]
    fn test_lowercase_continuation_and_closing_quote() {
        assert_eq!(
            english().split("He said \"stop.\" Then he left. it was late... really"),
            ["He said \"stop.\"", "Then he left. it was late... really"]
        );
    }

    #[test]
    fn test_collocation_blocks_split() {
        assert_eq!(english().split("See no. 1 above."), ["See no. 1 above."]);
    }

    #[test]
    fn test_whitespace_only() {
        assert!(english().split("   \n ").is_empty());
    }

    #[test]
    fn test_load_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut params = PunktParameters::default();
        params.abbrev_types.insert("blvd".into());
        let path = dir.path().join(punkt_path(PUNKT_ENGLISH));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, serde_json::to_string(&params).unwrap()).unwrap();

        let cfg = ResourceConfig::files_only(vec![dir.path().to_path_buf()]);
        let segmenter = PunktSegmenter::load(PUNKT_ENGLISH, &cfg).unwrap();
        assert_eq!(segmenter.params(), &params);
        assert_eq!(segmenter.split("Main Blvd. is closed."), ["Main Blvd. is closed."]);
    }

    #[test]
    fn test_missing_parameters() {
        let cfg = ResourceConfig::files_only(vec![]);
        let err = PunktSegmenter::load(PUNKT_ENGLISH, &cfg).unwrap_err();
        assert!(matches!(err, Error::MissingLinguisticResource { .. }));
        assert!(err.requires_remediation());
    }
}
