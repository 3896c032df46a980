//! # textparse-core: Anotação Linguística por Sentença
//!
//! Este crate transforma texto bruto numa representação compacta e serializável
//! da análise sintática de cada sentença: tokens, tags POS e árvore de
//! dependências, com índices **locais** à sentença.
//!
//! ## Arquitetura do Sistema
//!
//! 1.  **Resolução do backend** ([`pipeline`]): escolhe o analisador e os estágios
//!     exigidos pelo modo (`parse`, `tag` ou `tokenize`).
//! 2.  **Segmentação** ([`segmenter`], [`punkt`], [`sentencizer`]): o parser define
//!     as sentenças no modo `parse`; nos modos leves, um segmentador externo.
//! 3.  **Análise** ([`tokenizer`], [`tagger`], [`lemmatizer`], [`parser`]): o backend
//!     embutido, baseado em regras e léxicos carregados de [`model`].
//! 4.  **Construção das árvores** ([`tree`]): reindexa cada sentença e monta o
//!     [`ParseResult`].
//! 5.  **Entrada** ([`annotate`], [`transformer`]): [`process_text`] para textos
//!     isolados, [`TextParser`] para corpora.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use textparse_core::{ParseMode, TextParser};
//!
//! // 1. Resolve backend e segmentação uma única vez
//! let parser = TextParser::for_mode(ParseMode::FullParse).unwrap();
//!
//! // 2. Analisa
//! let result = parser.parse("The cat sat on the mat.").unwrap();
//!
//! // 3. Cada sentença traz a raiz e as ligações em índices locais
//! let sentence = &result.sentences()[0];
//! let root = sentence.root_index.unwrap();
//! assert_eq!(sentence.tokens[root].text, "sat");
//! println!("{}", serde_json::to_string(&result).unwrap());
//! ```

pub mod annotate;
pub mod config;
pub mod doc;
pub mod error;
pub mod lemmatizer;
pub mod lexicon;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod punkt;
pub mod segmenter;
pub mod sentencizer;
pub mod tagger;
pub mod tokenizer;
pub mod transformer;
pub mod tree;

pub use annotate::{process_text, AuxInput, Segmentation, TextParser, TextParserBuilder};
pub use config::{ParseMode, ParserConfig, ResourceConfig};
pub use doc::{Doc, DocToken, Span};
pub use error::{Error, Result};
pub use pipeline::{Analyzer, Backend, Capabilities, Pipeline, Stage};
pub use segmenter::{SentenceSegmenter, SharedSegmenter};
pub use transformer::{CorpusItem, Utterance};
pub use tree::{ParseResult, SentenceRecord, TokenRecord};
