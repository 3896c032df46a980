//! # Transformação de Corpus
//!
//! Aplica um [`TextParser`] a uma coleção de itens (ex: falas de uma conversa),
//! gravando o resultado num campo de metadados de cada item.
//!
//! - **Entrada**: o texto do item, ou o campo `input_field` (precisa ser texto).
//! - **Filtro**: itens rejeitados pelo filtro de entrada ficam intocados.
//! - **Saída**: o [`ParseResult`](crate::ParseResult) em JSON, no campo
//!   `output_field` (padrão `"parsed"`).
//! - **Progresso**: uma mensagem `info!` a cada `verbosity` itens.
//!
//! [`TextParser::transform_par`] distribui os itens entre as threads do
//! `rayon`; o backend resolvido é só lido, então é compartilhado entre elas.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::annotate::TextParser;
use crate::error::{Error, Result};
use crate::tree::ParseResult;

/// Um item de corpus com texto e metadados.
pub trait CorpusItem {
    fn text(&self) -> &str;

    fn meta(&self, field: &str) -> Option<&Value>;

    fn set_meta(&mut self, field: &str, value: Value);
}

/// Uma fala em memória.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl Utterance {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            meta: Map::new(),
        }
    }

    pub fn with_meta(mut self, field: &str, value: Value) -> Self {
        self.meta.insert(field.to_string(), value);
        self
    }

    /// Lê de volta um resultado gravado no campo.
    pub fn parse_result(&self, field: &str) -> Result<Option<ParseResult>> {
        self.meta
            .get(field)
            .map(|value| serde_json::from_value(value.clone()).map_err(Error::from))
            .transpose()
    }
}

impl CorpusItem for Utterance {
    fn text(&self) -> &str {
        &self.text
    }

    fn meta(&self, field: &str) -> Option<&Value> {
        self.meta.get(field)
    }

    fn set_meta(&mut self, field: &str, value: Value) {
        self.meta.insert(field.to_string(), value);
    }
}

impl TextParser {
    fn input_text<'a>(&self, item: &'a dyn CorpusItem) -> Result<&'a str> {
        let Some(field) = &self.config().input_field else {
            return Ok(item.text());
        };
        match item.meta(field) {
            Some(Value::String(text)) => Ok(text),
            Some(other) => Err(Error::invalid_input(format!(
                "o campo de entrada '{field}' não é texto: {other}"
            ))),
            None => Err(Error::invalid_input(format!(
                "o item não tem o campo de entrada '{field}'"
            ))),
        }
    }

    /// Analisa um item, se o filtro aceitar. Devolve se o item foi anotado.
    pub fn transform_item<T: CorpusItem>(&self, item: &mut T) -> Result<bool> {
        if !self.accepts(&*item) {
            return Ok(false);
        }
        let result = self.parse(self.input_text(&*item)?)?;
        item.set_meta(&self.config().output_field, serde_json::to_value(&result)?);
        Ok(true)
    }

    /// Analisa os itens em ordem. Devolve quantos foram anotados.
    pub fn transform<T: CorpusItem>(&self, items: &mut [T]) -> Result<usize> {
        let total = items.len();
        let mut annotated = 0;
        for (idx, item) in items.iter_mut().enumerate() {
            self.report_progress(idx, total);
            annotated += usize::from(self.transform_item(item)?);
        }
        Ok(annotated)
    }

    /// Como [`TextParser::transform`], em paralelo.
    pub fn transform_par<T: CorpusItem + Send>(&self, items: &mut [T]) -> Result<usize> {
        let total = items.len();
        let seen = AtomicUsize::new(0);
        items
            .par_iter_mut()
            .map(|item| {
                self.report_progress(seen.fetch_add(1, Ordering::Relaxed), total);
                self.transform_item(item).map(usize::from)
            })
            .try_reduce(|| 0, |a, b| Ok(a + b))
    }

    fn report_progress(&self, idx: usize, total: usize) {
        let every = self.config().verbosity;
        if every > 0 && idx > 0 && idx % every == 0 {
            info!("{}/{} itens analisados", idx, total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParseMode, ParserConfig};
    use serde_json::json;

    fn corpus() -> Vec<Utterance> {
        vec![
            Utterance::new("u1", "Hi there. How are you?"),
            Utterance::new("u2", "Fine, thanks."),
            Utterance::new("u3", "skip me"),
        ]
    }

    #[test]
    fn test_transform_writes_output_field() {
        let parser = TextParser::for_mode(ParseMode::TokenizeOnly).unwrap();
        let mut items = corpus();
        assert_eq!(parser.transform(&mut items).unwrap(), 3);

        let parsed = items[0].parse_result("parsed").unwrap().unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(items[1].meta["parsed"], json!([{"toks": [{"tok": "Fine"}, {"tok": ","}, {"tok": "thanks"}, {"tok": "."}]}]));
    }

    #[test]
    fn test_filtered_items_are_untouched() {
        let parser = TextParser::builder(ParserConfig::new(ParseMode::TagOnly))
            .with_input_filter(|item, _aux| !item.text().starts_with("skip"))
            .build()
            .unwrap();
        let mut items = corpus();
        assert_eq!(parser.transform(&mut items).unwrap(), 2);
        assert!(items[2].meta.is_empty());
        assert!(items[0].meta.contains_key("parsed"));
    }

    #[test]
    fn test_input_and_output_fields() {
        let mut config = ParserConfig::new(ParseMode::FullParse);
        config.input_field = Some("clean".into());
        config.output_field = "tree".into();
        let parser = TextParser::new(config).unwrap();

        let mut item = Utterance::new("u1", "ignored").with_meta("clean", json!("The cat sat."));
        assert!(parser.transform_item(&mut item).unwrap());
        let tree = item.parse_result("tree").unwrap().unwrap();
        assert_eq!(tree.sentences()[0].words(), ["The", "cat", "sat", "."]);
        assert!(item.parse_result("parsed").unwrap().is_none());

        let mut bad = Utterance::new("u2", "x").with_meta("clean", json!(42));
        assert!(matches!(parser.transform_item(&mut bad), Err(Error::InvalidInput(_))));
        let mut missing = Utterance::new("u3", "x");
        assert!(matches!(parser.transform_item(&mut missing), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut config = ParserConfig::new(ParseMode::FullParse);
        config.verbosity = 2;
        let parser = TextParser::new(config).unwrap();
        let mut sequential: Vec<Utterance> = (0..16)
            .map(|i| Utterance::new(format!("u{i}"), format!("The dog number {i} ran home. It slept.")))
            .collect();
        let mut parallel = sequential.clone();

        assert_eq!(parser.transform(&mut sequential).unwrap(), 16);
        assert_eq!(parser.transform_par(&mut parallel).unwrap(), 16);
        assert_eq!(sequential, parallel);
    }
}
