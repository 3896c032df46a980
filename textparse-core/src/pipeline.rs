//! # Pipeline de Análise
//!
//! O backend é qualquer tipo que implemente [`Analyzer`]: recebe texto, devolve
//! um [`Doc`] anotado e declara, via [`Capabilities`], quais estágios possui.
//! O backend embutido é o [`Pipeline`], montado a partir de um modelo:
//!
//! ```text
//! texto → tokenizer → [sentencizer] → [tagger] → [lemmatizer] → [parser] → Doc
//! ```
//!
//! ## Resolução por modo
//!
//! | Modo       | Estágios exigidos            | Backend padrão desliga        |
//! |------------|------------------------------|-------------------------------|
//! | `parse`    | tokenizer, tagger, parser    | nada                          |
//! | `tag`      | tokenizer, tagger            | parser                        |
//! | `tokenize` | tokenizer                    | tagger, parser, lemmatizer    |
//!
//! A configuração do backend é fixada na construção. Acrescentar um
//! sentencizer ([`attach_sentencizer`]) cria um backend novo que embrulha o
//! original; o original nunca é alterado.
//!
//! ## Exemplo de Uso
//!
//! ```
//! use textparse_core::pipeline::{Analyzer, Pipeline, Stage};
//!
//! let nlp = Pipeline::blank("en").with_pipe(Stage::Sentencizer);
//! let doc = nlp.analyze("One. Two.").unwrap();
//! assert_eq!(doc.sents().len(), 2);
//! assert!(!nlp.capabilities().has_pipe("parser"));
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ParseMode, ParserConfig, ResourceConfig};
use crate::doc::Doc;
use crate::error::{Error, Result};
use crate::lemmatizer::Lemmatizer;
use crate::model::{find_model, ModelData};
use crate::parser::DependencyParser;
use crate::sentencizer::Sentencizer;
use crate::tagger::Tagger;
use crate::tokenizer::Tokenizer;

/// Um componente nomeado do backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Tokenizer,
    Sentencizer,
    Tagger,
    Lemmatizer,
    Parser,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Tokenizer,
        Stage::Sentencizer,
        Stage::Tagger,
        Stage::Lemmatizer,
        Stage::Parser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Tokenizer => "tokenizer",
            Stage::Sentencizer => "sentencizer",
            Stage::Tagger => "tagger",
            Stage::Lemmatizer => "lemmatizer",
            Stage::Parser => "parser",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estágios presentes em um backend, resolvidos na construção.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub tokenizer: bool,
    pub sentencizer: bool,
    pub tagger: bool,
    pub lemmatizer: bool,
    pub parser: bool,
}

impl Capabilities {
    pub fn has(&self, stage: Stage) -> bool {
        match stage {
            Stage::Tokenizer => self.tokenizer,
            Stage::Sentencizer => self.sentencizer,
            Stage::Tagger => self.tagger,
            Stage::Lemmatizer => self.lemmatizer,
            Stage::Parser => self.parser,
        }
    }

    /// Consulta pelo nome do estágio (`"tagger"`, `"parser"`...).
    pub fn has_pipe(&self, name: &str) -> bool {
        Stage::from_name(name).is_some_and(|s| self.has(s))
    }

    pub fn with(mut self, stage: Stage) -> Self {
        *self.flag(stage) = true;
        self
    }

    pub fn without(mut self, stage: Stage) -> Self {
        *self.flag(stage) = false;
        self
    }

    fn flag(&mut self, stage: Stage) -> &mut bool {
        match stage {
            Stage::Tokenizer => &mut self.tokenizer,
            Stage::Sentencizer => &mut self.sentencizer,
            Stage::Tagger => &mut self.tagger,
            Stage::Lemmatizer => &mut self.lemmatizer,
            Stage::Parser => &mut self.parser,
        }
    }

    pub fn pipe_names(&self) -> Vec<&'static str> {
        Stage::ALL
            .into_iter()
            .filter(|s| self.has(*s))
            .map(|s| s.as_str())
            .collect()
    }

    /// Estágios que um backend precisa ter para atender ao modo.
    pub fn required_for(mode: ParseMode) -> Self {
        let base = Self::default().with(Stage::Tokenizer);
        match mode {
            ParseMode::FullParse => base.with(Stage::Tagger).with(Stage::Parser),
            ParseMode::TagOnly => base.with(Stage::Tagger),
            ParseMode::TokenizeOnly => base,
        }
    }

    /// Estágios exigidos pelo modo que faltam aqui. Estágios extras não contam.
    pub fn missing_for(&self, mode: ParseMode) -> Vec<Stage> {
        let required = Self::required_for(mode);
        Stage::ALL
            .into_iter()
            .filter(|s| required.has(*s) && !self.has(*s))
            .collect()
    }
}

/// Um backend de análise linguística.
///
/// A inferência recebe `&self`: um backend resolvido pode ser compartilhado
/// entre threads sem sincronização.
pub trait Analyzer: Send + Sync {
    /// Código do idioma processado (ex: "en").
    fn lang(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    /// Analisa o texto inteiro, numa única execução.
    fn analyze(&self, text: &str) -> Result<Doc>;
}

/// Backend compartilhável.
pub type Backend = Arc<dyn Analyzer>;

/// Backend embutido, baseado em regras.
#[derive(Debug, Clone)]
pub struct Pipeline {
    model: ModelData,
    tokenizer: Tokenizer,
    sentencizer: Option<Sentencizer>,
    tagger: Option<Tagger>,
    lemmatizer: Option<Lemmatizer>,
    parser: Option<DependencyParser>,
}

impl Pipeline {
    /// Pipeline completo do modelo, menos os estágios em `disable`.
    pub fn from_model(model: ModelData, disable: &[Stage]) -> Self {
        let enabled = |stage: Stage| !disable.contains(&stage);
        Self {
            tokenizer: model.tokenizer(),
            sentencizer: None,
            tagger: enabled(Stage::Tagger).then(|| model.tagger()),
            lemmatizer: enabled(Stage::Lemmatizer).then(|| model.lemmatizer()),
            parser: enabled(Stage::Parser).then(|| model.parser()),
            model,
        }
    }

    /// Pipeline só com o tokenizador do idioma. Os estágios acrescentados com
    /// [`Pipeline::with_pipe`] usam o modelo embutido do idioma, se houver.
    pub fn blank(lang: &str) -> Self {
        let model = ModelData::for_language(lang);
        Self {
            tokenizer: model.tokenizer(),
            sentencizer: None,
            tagger: None,
            lemmatizer: None,
            parser: None,
            model,
        }
    }

    pub fn with_pipe(mut self, stage: Stage) -> Self {
        match stage {
            Stage::Tokenizer => self.tokenizer = self.model.tokenizer(),
            Stage::Sentencizer => self.sentencizer = Some(Sentencizer::default()),
            Stage::Tagger => self.tagger = Some(self.model.tagger()),
            Stage::Lemmatizer => self.lemmatizer = Some(self.model.lemmatizer()),
            Stage::Parser => self.parser = Some(self.model.parser()),
        }
        self
    }

    /// Remove um estágio. O tokenizador é obrigatório e permanece.
    pub fn without_pipe(mut self, stage: Stage) -> Self {
        match stage {
            Stage::Tokenizer => {}
            Stage::Sentencizer => self.sentencizer = None,
            Stage::Tagger => self.tagger = None,
            Stage::Lemmatizer => self.lemmatizer = None,
            Stage::Parser => self.parser = None,
        }
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model.name
    }
}

impl Analyzer for Pipeline {
    fn lang(&self) -> &str {
        &self.model.lang
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            tokenizer: true,
            sentencizer: self.sentencizer.is_some(),
            tagger: self.tagger.is_some(),
            lemmatizer: self.lemmatizer.is_some(),
            parser: self.parser.is_some(),
        }
    }

    fn analyze(&self, text: &str) -> Result<Doc> {
        let mut doc = Doc::from_tokens(text, self.model.lang.clone(), self.tokenizer.tokenize(text));
        if let Some(sentencizer) = &self.sentencizer {
            sentencizer.segment(&mut doc);
        }
        if let Some(tagger) = &self.tagger {
            tagger.tag(&mut doc);
        }
        if let Some(lemmatizer) = &self.lemmatizer {
            lemmatizer.lemmatize(&mut doc);
        }
        if let Some(parser) = &self.parser {
            parser.parse(&mut doc);
        }
        Ok(doc)
    }
}

/// Backend embrulhado com um sentencizer ao final.
pub struct Sentencized {
    inner: Backend,
    sentencizer: Sentencizer,
}

impl Sentencized {
    pub fn new(inner: Backend) -> Self {
        Self {
            inner,
            sentencizer: Sentencizer::default(),
        }
    }

    pub fn inner(&self) -> &Backend {
        &self.inner
    }
}

impl Analyzer for Sentencized {
    fn lang(&self) -> &str {
        self.inner.lang()
    }

    fn capabilities(&self) -> Capabilities {
        self.inner.capabilities().with(Stage::Sentencizer)
    }

    fn analyze(&self, text: &str) -> Result<Doc> {
        let mut doc = self.inner.analyze(text)?;
        self.sentencizer.segment(&mut doc);
        Ok(doc)
    }
}

/// Garante que o backend defina fronteiras de sentença. Se ele já tiver um
/// `parser` ou um `sentencizer`, é devolvido como está.
pub fn attach_sentencizer(backend: &Backend) -> Backend {
    let caps = backend.capabilities();
    if caps.parser || caps.sentencizer {
        return Arc::clone(backend);
    }
    debug!("Acrescentando sentencizer ao backend ({})", backend.lang());
    Arc::new(Sentencized::new(Arc::clone(backend)))
}

/// Verifica se o backend tem os estágios que o modo exige.
pub fn validate_backend(backend: &dyn Analyzer, mode: ParseMode) -> Result<()> {
    let missing = backend.capabilities().missing_for(mode);
    if missing.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = missing.iter().map(Stage::as_str).collect();
    Err(Error::invalid_backend(format!(
        "o modo '{}' exige os estágios ausentes: {}",
        mode,
        names.join(", ")
    )))
}

/// Carrega o modelo e monta o pipeline embutido com os estágios do modo.
pub fn load_default(mode: ParseMode, model: &str, resources: &ResourceConfig) -> Result<Backend> {
    let data = find_model(model, resources)?;
    let disable: &[Stage] = match mode {
        ParseMode::FullParse => &[],
        ParseMode::TagOnly => &[Stage::Parser],
        ParseMode::TokenizeOnly => &[Stage::Tagger, Stage::Parser, Stage::Lemmatizer],
    };
    let pipeline = Pipeline::from_model(data, disable);
    debug!(
        "Backend '{}' para o modo '{}': {:?}",
        pipeline.model_name(),
        mode,
        pipeline.capabilities().pipe_names()
    );
    Ok(Arc::new(pipeline))
}

/// Usa o backend fornecido (validado, se configurado) ou carrega o padrão.
pub fn resolve_backend(mode: ParseMode, supplied: Option<Backend>, config: &ParserConfig) -> Result<Backend> {
    match supplied {
        Some(backend) => {
            if config.validate_backend {
                validate_backend(&*backend, mode)?;
            }
            Ok(backend)
        }
        None => load_default(mode, &config.model, &config.resources),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend mínimo: um token por palavra, sem anotações.
    struct Whitespace;

    impl Analyzer for Whitespace {
        fn lang(&self) -> &str {
            "xx"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::default().with(Stage::Tokenizer)
        }

        fn analyze(&self, text: &str) -> Result<Doc> {
            Ok(Doc::from_tokens(text, "xx", Tokenizer::for_language("xx").tokenize(text)))
        }
    }

    #[test]
    fn test_default_backend_stages_per_mode() {
        let resources = ResourceConfig::default();
        let names = |mode| {
            load_default(mode, crate::config::DEFAULT_MODEL, &resources)
                .unwrap()
                .capabilities()
                .pipe_names()
        };
        assert_eq!(names(ParseMode::FullParse), ["tokenizer", "tagger", "lemmatizer", "parser"]);
        assert_eq!(names(ParseMode::TagOnly), ["tokenizer", "tagger", "lemmatizer"]);
        assert_eq!(names(ParseMode::TokenizeOnly), ["tokenizer"]);
    }

    #[test]
    fn test_unknown_model_is_backend_unavailable() {
        let err = load_default(ParseMode::FullParse, "xx_missing", &ResourceConfig::default());
        assert!(matches!(err, Err(Error::BackendUnavailable { .. })));
    }

    #[test]
    fn test_full_pipeline_annotates() {
        let nlp = Pipeline::from_model(ModelData::english(), &[]);
        let doc = nlp.analyze("The cat sat. It slept.").unwrap();
        assert!(doc.is_tagged() && doc.is_parsed());
        assert_eq!(doc.sents().len(), 2);
        assert_eq!(doc.tokens()[1].lemma, "cat");
    }

    #[test]
    fn test_blank_with_and_without_pipes() {
        let nlp = Pipeline::blank("en").with_pipe(Stage::Tagger).with_pipe(Stage::Parser);
        assert!(nlp.capabilities().has_pipe("parser"));
        let nlp = nlp.without_pipe(Stage::Parser).without_pipe(Stage::Tokenizer);
        assert_eq!(nlp.capabilities().pipe_names(), ["tokenizer", "tagger"]);
        assert!(!nlp.capabilities().has_pipe("nonexistent"));
    }

    #[test]
    fn test_attach_sentencizer_wraps_without_mutating() {
        let plain: Backend = Arc::new(Whitespace);
        let wrapped = attach_sentencizer(&plain);
        assert!(wrapped.capabilities().sentencizer);
        assert!(!plain.capabilities().sentencizer);
        assert_eq!(wrapped.analyze("A b. C d.").unwrap().sents().len(), 2);
        assert_eq!(plain.analyze("A b. C d.").unwrap().sents().len(), 1);

        let parsing: Backend = Arc::new(Pipeline::from_model(ModelData::english(), &[]));
        assert!(Arc::ptr_eq(&attach_sentencizer(&parsing), &parsing));
    }

    #[test]
    fn test_validation_rejects_missing_and_tolerates_extra() {
        let cfg = ParserConfig::default();
        let tokenizer_only: Backend = Arc::new(Whitespace);
        let Err(err) = resolve_backend(ParseMode::TagOnly, Some(tokenizer_only.clone()), &cfg) else {
            panic!("backend sem tagger aceito no modo 'tag'");
        };
        assert!(matches!(err, Error::InvalidBackend(_)));
        assert!(err.to_string().contains("tagger"));
        assert!(resolve_backend(ParseMode::TokenizeOnly, Some(tokenizer_only.clone()), &cfg).is_ok());

        let full: Backend = Arc::new(Pipeline::from_model(ModelData::english(), &[]));
        assert!(resolve_backend(ParseMode::TagOnly, Some(full), &cfg).is_ok());

        let lenient = ParserConfig {
            validate_backend: false,
            ..ParserConfig::default()
        };
        assert!(resolve_backend(ParseMode::FullParse, Some(tokenizer_only), &lenient).is_ok());
    }
}
