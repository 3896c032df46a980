//! # Ponto de Entrada da Anotação
//!
//! Orquestra uma chamada completa:
//!
//! ```text
//! texto ──trim──► segmentação (conforme o modo) ──► backend ──► build_document ──► ParseResult
//! ```
//!
//! ## Segmentação por modo
//!
//! - **`parse`**: o backend roda sobre o texto inteiro e o próprio parser
//!   define as sentenças. Um segmentador fornecido é ignorado.
//! - **`tag` / `tokenize`**: o parser está desligado, então:
//!   1. um segmentador fornecido pelo chamador é usado diretamente;
//!   2. senão, para backends em inglês, carrega-se o Punkt (`english`);
//!   3. senão, um sentencizer é acoplado ao backend (se ele não tiver parser
//!      nem sentencizer).
//!
//!   Nos casos 2 e 3 é emitido um aviso (`warn!`): a segmentação padrão está em
//!   uso. Com um segmentador externo, cada sentença é reanalisada isoladamente
//!   e conta como exatamente uma sentença.
//!
//! ## Exemplo de Uso
//!
//! ```
//! use textparse_core::{process_text, ParseMode};
//!
//! let result = process_text("Hi there. How are you?", ParseMode::TokenizeOnly, None, None).unwrap();
//! assert_eq!(result.len(), 2);
//! assert_eq!(result.sentences()[1].words(), ["How", "are", "you", "?"]);
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{ParseMode, ParserConfig, ResourceConfig, DEFAULT_LANGUAGE};
use crate::doc::Doc;
use crate::error::Result;
use crate::pipeline::{attach_sentencizer, resolve_backend, Backend};
use crate::punkt::{PunktSegmenter, PUNKT_ENGLISH};
use crate::segmenter::SharedSegmenter;
use crate::transformer::CorpusItem;
use crate::tree::{build_document, ParseResult};

/// Origem das fronteiras de sentença.
#[derive(Clone)]
pub enum Segmentation {
    /// O backend (parser ou sentencizer) segmenta o texto inteiro.
    Backend,
    /// Um segmentador externo divide o texto; cada parte é analisada à parte.
    External(SharedSegmenter),
}

impl fmt::Debug for Segmentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segmentation::Backend => f.write_str("Backend"),
            Segmentation::External(_) => f.write_str("External(..)"),
        }
    }
}

/// Escolhe a segmentação do modo. Pode devolver um backend novo (com um
/// sentencizer acoplado); o backend recebido nunca é alterado.
pub fn resolve_segmentation(
    mode: ParseMode,
    backend: Backend,
    supplied: Option<SharedSegmenter>,
    resources: &ResourceConfig,
) -> Result<(Backend, Segmentation)> {
    if !mode.needs_external_segmenter() {
        return Ok((backend, Segmentation::Backend));
    }
    if let Some(segmenter) = supplied {
        return Ok((backend, Segmentation::External(segmenter)));
    }

    warn!(
        "Nenhum segmentador de sentenças fornecido para o modo '{}': usando a segmentação padrão",
        mode
    );
    if backend.lang() == DEFAULT_LANGUAGE {
        let punkt = PunktSegmenter::load(PUNKT_ENGLISH, resources)?;
        Ok((backend, Segmentation::External(Arc::new(punkt))))
    } else {
        Ok((attach_sentencizer(&backend), Segmentation::Backend))
    }
}

/// Modo, backend e segmentação já resolvidos, compartilhados por todas as
/// chamadas de um [`TextParser`].
#[derive(Clone)]
pub struct AuxInput {
    mode: ParseMode,
    backend: Backend,
    segmentation: Segmentation,
}

impl fmt::Debug for AuxInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuxInput")
            .field("mode", &self.mode)
            .field("lang", &self.backend.lang())
            .field("stages", &self.backend.capabilities().pipe_names())
            .field("segmentation", &self.segmentation)
            .finish()
    }
}

impl AuxInput {
    /// Resolve backend e segmentação para a configuração.
    pub fn resolve(
        config: &ParserConfig,
        backend: Option<Backend>,
        segmenter: Option<SharedSegmenter>,
    ) -> Result<Self> {
        let backend = resolve_backend(config.mode, backend, config)?;
        let (backend, segmentation) =
            resolve_segmentation(config.mode, backend, segmenter, &config.resources)?;
        Ok(Self {
            mode: config.mode,
            backend,
            segmentation,
        })
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn segmentation(&self) -> &Segmentation {
        &self.segmentation
    }

    /// Analisa um texto com a configuração resolvida.
    pub fn process(&self, text: &str) -> Result<ParseResult> {
        let text = text.trim();
        let result = match &self.segmentation {
            Segmentation::Backend => {
                let doc = self.backend.analyze(text)?;
                build_document(doc.sents(), self.mode)?
            }
            Segmentation::External(segmenter) => {
                let mut docs: Vec<Doc> = Vec::new();
                let mut offset = 0;
                for sentence in segmenter.segment(text) {
                    let mut doc = self.backend.analyze(&sentence)?;
                    if doc.is_empty() {
                        continue;
                    }
                    doc.rebase(offset);
                    offset += doc.len();
                    docs.push(doc);
                }
                build_document(docs.iter().map(Doc::as_span), self.mode)?
            }
        };
        debug!(
            "Texto analisado no modo '{}': {} sentenças, {} tokens",
            self.mode,
            result.len(),
            result.token_count()
        );
        Ok(result)
    }
}

/// Analisa um texto isolado. Backend e segmentador ausentes são resolvidos a
/// cada chamada; para muitos textos, prefira um [`TextParser`].
pub fn process_text(
    text: &str,
    mode: ParseMode,
    segmenter: Option<SharedSegmenter>,
    backend: Option<Backend>,
) -> Result<ParseResult> {
    let config = ParserConfig::new(mode);
    AuxInput::resolve(&config, backend, segmenter)?.process(text)
}

/// Predicado que decide se um item do corpus deve ser analisado.
pub type InputFilter = Arc<dyn Fn(&dyn CorpusItem, &AuxInput) -> bool + Send + Sync>;

/// Analisador reutilizável: configuração resolvida uma única vez.
#[derive(Clone)]
pub struct TextParser {
    config: ParserConfig,
    aux: AuxInput,
    filter: Option<InputFilter>,
}

impl fmt::Debug for TextParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextParser")
            .field("config", &self.config)
            .field("aux", &self.aux)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

impl TextParser {
    /// Resolve tudo a partir da configuração (modelo e segmentador padrão).
    pub fn new(config: ParserConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn for_mode(mode: ParseMode) -> Result<Self> {
        Self::new(ParserConfig::new(mode))
    }

    pub fn builder(config: ParserConfig) -> TextParserBuilder {
        TextParserBuilder {
            config,
            backend: None,
            segmenter: None,
            filter: None,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn mode(&self) -> ParseMode {
        self.aux.mode
    }

    pub fn aux_input(&self) -> &AuxInput {
        &self.aux
    }

    pub fn parse(&self, text: &str) -> Result<ParseResult> {
        self.aux.process(text)
    }

    /// Aplica o filtro de entrada (sem filtro, todo item é aceito).
    pub fn accepts(&self, item: &dyn CorpusItem) -> bool {
        self.filter.as_ref().map_or(true, |f| f(item, &self.aux))
    }
}

/// Monta um [`TextParser`] com backend, segmentador e filtro opcionais.
pub struct TextParserBuilder {
    config: ParserConfig,
    backend: Option<Backend>,
    segmenter: Option<SharedSegmenter>,
    filter: Option<InputFilter>,
}

impl TextParserBuilder {
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_segmenter(mut self, segmenter: SharedSegmenter) -> Self {
        self.segmenter = Some(segmenter);
        self
    }

    pub fn with_input_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&dyn CorpusItem, &AuxInput) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn build(self) -> Result<TextParser> {
        let aux = AuxInput::resolve(&self.config, self.backend, self.segmenter)?;
        debug!("TextParser pronto: {:?}", aux);
        Ok(TextParser {
            config: self.config,
            aux,
            filter: self.filter,
        })
    }
}
