//! # Configuração do Pipeline
//!
//! Toda escolha implícita (qual modelo carregar, onde procurar recursos, qual
//! segmentador usar) fica explícita aqui:
//!
//! - [`ParseMode`]: controla o subconjunto de capacidades do backend.
//! - [`ResourceConfig`]: onde procurar modelos e parâmetros de segmentação.
//! - [`ParserConfig`]: a configuração completa de um [`crate::TextParser`].
//!
//! A configuração pode ser lida de JSON:
//!
//! ```rust
//! use textparse_core::config::{ParseMode, ParserConfig};
//!
//! let cfg: ParserConfig = serde_json::from_str(r#"{"mode": "tag"}"#).unwrap();
//! assert_eq!(cfg.mode, ParseMode::TagOnly);
//! assert_eq!(cfg.output_field, "parsed");
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Variável de ambiente com a lista de diretórios de dados (mesmo formato do `PATH`).
pub const DATA_ENV_VAR: &str = "TEXTPARSE_DATA";

/// Modelo carregado quando o chamador não fornece um backend.
pub const DEFAULT_MODEL: &str = "en_core_rules";

/// Idioma nativo do pipeline: o único com segmentador estatístico embutido.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Modo de fidelidade da anotação.
///
/// Cada modo é estritamente mais barato que o anterior:
///
/// | Modo           | Tokens | Tags POS | Dependências | Segmentação          |
/// |----------------|--------|----------|--------------|----------------------|
/// | `FullParse`    | sim    | sim      | sim          | derivada do parser   |
/// | `TagOnly`      | sim    | sim      | não          | segmentador externo  |
/// | `TokenizeOnly` | sim    | não      | não          | segmentador externo  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseMode {
    #[serde(rename = "parse")]
    FullParse,
    #[serde(rename = "tag")]
    TagOnly,
    #[serde(rename = "tokenize")]
    TokenizeOnly,
}

impl Default for ParseMode {
    fn default() -> Self {
        ParseMode::FullParse
    }
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::FullParse => "parse",
            ParseMode::TagOnly => "tag",
            ParseMode::TokenizeOnly => "tokenize",
        }
    }

    /// O modo emite tags POS?
    pub fn emits_tags(&self) -> bool {
        !matches!(self, ParseMode::TokenizeOnly)
    }

    /// O modo emite a árvore de dependências?
    pub fn emits_dependencies(&self) -> bool {
        matches!(self, ParseMode::FullParse)
    }

    /// Nos modos leves o parser é desligado, então as fronteiras de sentença
    /// precisam vir de um segmentador externo.
    pub fn needs_external_segmenter(&self) -> bool {
        !self.emits_dependencies()
    }

    pub fn all() -> [ParseMode; 3] {
        [ParseMode::FullParse, ParseMode::TagOnly, ParseMode::TokenizeOnly]
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParseMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parse" => Ok(ParseMode::FullParse),
            "tag" => Ok(ParseMode::TagOnly),
            "tokenize" => Ok(ParseMode::TokenizeOnly),
            other => Err(Error::invalid_input(format!(
                "modo desconhecido '{other}' (use parse, tag ou tokenize)"
            ))),
        }
    }
}

/// Onde procurar modelos (`models/<nome>.json`) e parâmetros de segmentação
/// (`tokenizers/punkt/<idioma>.json`).
///
/// Os diretórios são consultados em ordem; se nada for encontrado e
/// `allow_bundled` for verdadeiro, usa-se a cópia embutida no binário.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub data_dirs: Vec<PathBuf>,
    pub allow_bundled: bool,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            data_dirs: Vec::new(),
            allow_bundled: true,
        }
    }
}

impl ResourceConfig {
    /// Lê os diretórios de dados de `TEXTPARSE_DATA`.
    pub fn from_env() -> Self {
        let data_dirs = std::env::var_os(DATA_ENV_VAR)
            .map(|paths| std::env::split_paths(&paths).collect())
            .unwrap_or_default();
        Self {
            data_dirs,
            allow_bundled: true,
        }
    }

    /// Configuração que só aceita recursos em disco.
    pub fn files_only(data_dirs: Vec<PathBuf>) -> Self {
        Self {
            data_dirs,
            allow_bundled: false,
        }
    }

    /// Primeiro arquivo existente com o caminho relativo dado.
    pub fn locate(&self, relative: &Path) -> Option<PathBuf> {
        self.data_dirs
            .iter()
            .map(|dir| dir.join(relative))
            .find(|candidate| candidate.is_file())
    }

    /// Descrição dos locais consultados, usada nas mensagens de erro.
    pub(crate) fn searched(&self) -> String {
        if self.data_dirs.is_empty() {
            format!("nenhum diretório configurado (defina {DATA_ENV_VAR})")
        } else {
            self.data_dirs
                .iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

/// Configuração completa de um [`crate::TextParser`].
///
/// Backend e segmentador são objetos de execução e entram pelos métodos
/// `with_backend` / `with_segmenter` do [`crate::TextParserBuilder`]; quando ausentes, o modelo
/// `model` é carregado e o segmentador é escolhido conforme o modo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub mode: ParseMode,
    /// Nome do modelo padrão, carregado quando nenhum backend é fornecido.
    pub model: String,
    /// Campo de saída nos itens do corpus.
    pub output_field: String,
    /// Campo de entrada; `None` usa o texto do próprio item.
    pub input_field: Option<String>,
    /// Frequência das mensagens de progresso (0 desliga).
    pub verbosity: usize,
    pub resources: ResourceConfig,
    /// Valida as capacidades de um backend fornecido pelo chamador.
    pub validate_backend: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            mode: ParseMode::default(),
            model: DEFAULT_MODEL.to_string(),
            output_field: "parsed".to_string(),
            input_field: None,
            verbosity: 0,
            resources: ResourceConfig::default(),
            validate_backend: true,
        }
    }
}

impl ParserConfig {
    pub fn new(mode: ParseMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}
