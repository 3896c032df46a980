//! # Modelos Linguísticos
//!
//! Um modelo ([`ModelData`]) reúne tudo o que o backend embutido precisa para
//! analisar um idioma: exceções do tokenizador, léxico, regras de sufixo e
//! lemas irregulares. O modelo é **carregado**, nunca treinado.
//!
//! ## Localização
//!
//! [`find_model`] procura, em ordem:
//!
//! 1. `models/<nome>.json` em cada diretório de dados configurado
//!    ([`ResourceConfig::data_dirs`], ou `TEXTPARSE_DATA`).
//! 2. Os modelos embutidos no binário (`en_core_rules`, `pt_core_rules`), se
//!    [`ResourceConfig::allow_bundled`] permitir.
//!
//! Se nada for encontrado, a falha é [`Error::BackendUnavailable`], com a
//! instrução de como disponibilizar o modelo.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ResourceConfig;
use crate::error::{Error, Result};
use crate::lemmatizer::Lemmatizer;
use crate::lexicon;
use crate::parser::DependencyParser;
use crate::tagger::{Tagger, Tagset};
use crate::tokenizer::Tokenizer;

/// Nome do modelo embutido para inglês.
pub const ENGLISH_MODEL: &str = "en_core_rules";
/// Nome do modelo embutido para português.
pub const PORTUGUESE_MODEL: &str = "pt_core_rules";

/// Dados de um modelo, no formato dos arquivos `models/<nome>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelData {
    pub name: String,
    /// Código ISO do idioma (ex: "en", "pt").
    pub lang: String,
    pub tagset: Tagset,
    #[serde(default)]
    pub abbreviations: Vec<String>,
    #[serde(default)]
    pub clitic_suffixes: Vec<String>,
    /// Palavra (minúsculas) → tag.
    #[serde(default)]
    pub lexicon: BTreeMap<String, String>,
    /// Pares `(sufixo, tag)`, testados em ordem.
    #[serde(default)]
    pub suffix_rules: Vec<(String, String)>,
    #[serde(default)]
    pub irregular_lemmas: BTreeMap<String, String>,
}

impl ModelData {
    /// O modelo embutido para inglês (tags Penn Treebank).
    pub fn english() -> Self {
        Self {
            name: ENGLISH_MODEL.to_string(),
            lang: "en".to_string(),
            tagset: Tagset::Ptb,
            abbreviations: owned(lexicon::EN_ABBREVIATIONS),
            clitic_suffixes: owned(lexicon::EN_CLITICS),
            lexicon: owned_pairs(lexicon::EN_LEXICON).into_iter().collect(),
            suffix_rules: owned_pairs(lexicon::EN_SUFFIX_RULES),
            irregular_lemmas: owned_pairs(lexicon::EN_IRREGULAR_LEMMAS).into_iter().collect(),
        }
    }

    /// O modelo embutido para português (tags Universal Dependencies).
    pub fn portuguese() -> Self {
        Self {
            name: PORTUGUESE_MODEL.to_string(),
            lang: "pt".to_string(),
            tagset: Tagset::Universal,
            abbreviations: owned(lexicon::PT_ABBREVIATIONS),
            clitic_suffixes: Vec::new(),
            lexicon: owned_pairs(lexicon::PT_LEXICON).into_iter().collect(),
            suffix_rules: owned_pairs(lexicon::PT_SUFFIX_RULES),
            irregular_lemmas: BTreeMap::new(),
        }
    }

    /// Modelo embutido pelo nome.
    pub fn bundled(name: &str) -> Option<Self> {
        match name {
            ENGLISH_MODEL => Some(Self::english()),
            PORTUGUESE_MODEL => Some(Self::portuguese()),
            _ => None,
        }
    }

    /// Modelo sem léxico: só as exceções do tokenizador do idioma.
    pub fn empty(lang: &str) -> Self {
        let (abbreviations, clitics) = lexicon::tokenizer_exceptions(lang);
        let tagset = if lang == "en" { Tagset::Ptb } else { Tagset::Universal };
        Self {
            name: format!("{lang}_blank"),
            lang: lang.to_string(),
            tagset,
            abbreviations: owned(abbreviations),
            clitic_suffixes: owned(clitics),
            lexicon: BTreeMap::new(),
            suffix_rules: Vec::new(),
            irregular_lemmas: BTreeMap::new(),
        }
    }

    /// O modelo embutido do idioma, ou um modelo vazio se não houver.
    pub fn for_language(lang: &str) -> Self {
        [Self::english(), Self::portuguese()]
            .into_iter()
            .find(|m| m.lang == lang)
            .unwrap_or_else(|| Self::empty(lang))
    }

    /// Nomes dos modelos embutidos.
    pub fn bundled_names() -> [&'static str; 2] {
        [ENGLISH_MODEL, PORTUGUESE_MODEL]
    }

    /// Lê um modelo de um arquivo JSON.
    pub fn load_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|source| Error::Resource {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(&self.abbreviations, &self.clitic_suffixes)
    }

    pub fn tagger(&self) -> Tagger {
        Tagger::new(
            self.tagset,
            self.lexicon.iter().map(|(w, t)| (w.clone(), t.clone())),
            self.suffix_rules.clone(),
        )
    }

    pub fn lemmatizer(&self) -> Lemmatizer {
        Lemmatizer::new(self.tagset, self.irregular_lemmas.clone())
    }

    pub fn parser(&self) -> DependencyParser {
        DependencyParser::new(self.lang.clone())
    }
}

/// Caminho relativo do arquivo de um modelo dentro de um diretório de dados.
pub fn model_path(name: &str) -> PathBuf {
    Path::new("models").join(format!("{name}.json"))
}

/// Localiza um modelo pelo nome (disco primeiro, depois os embutidos).
pub fn find_model(name: &str, resources: &ResourceConfig) -> Result<ModelData> {
    if let Some(path) = resources.locate(&model_path(name)) {
        debug!("Carregando modelo '{}' de {}", name, path.display());
        return ModelData::load_file(&path);
    }
    if resources.allow_bundled {
        if let Some(model) = ModelData::bundled(name) {
            debug!("Usando modelo embutido '{}'", name);
            return Ok(model);
        }
    }
    Err(Error::BackendUnavailable {
        model: name.to_string(),
        directive: format!(
            "copie o arquivo {} para um dos diretórios de dados ({}) e tente novamente; \
             modelos embutidos disponíveis: {}",
            model_path(name).display(),
            resources.searched(),
            ModelData::bundled_names().join(", ")
        ),
    })
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn owned_pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect()
}
