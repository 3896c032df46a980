//! # Construção das Árvores por Sentença
//!
//! Converte as sentenças analisadas pelo backend no formato canônico de saída,
//! com índices **locais** (posição dentro da sentença):
//!
//! ```json
//! [{"toks": [{"tok": "Hi", "tag": "UH", "dep": "intj", "up": 1, "dn": []}, ...], "rt": 1}]
//! ```
//!
//! | Chave | Campo               | Presente em            |
//! |-------|---------------------|------------------------|
//! | `tok` | texto do token      | todos os modos         |
//! | `tag` | tag POS             | `tag`, `parse`         |
//! | `dep` | rótulo da relação   | `parse`                |
//! | `up`  | índice da cabeça    | `parse` (exceto raiz)  |
//! | `dn`  | índices dos filhos  | `parse` (pode ser `[]`)|
//! | `rt`  | índice da raiz      | `parse`                |
//!
//! ## Índices locais
//!
//! Cada sentença é numerada a partir de zero. O construtor mantém um
//! deslocamento (`offset`) com o total de tokens das sentenças anteriores:
//!
//! ```text
//! global:  0   1     2   3   4   5   6
//!          Hi  there .   How are you ?
//! local:   0   1     2 | 0   1   2   3      offset = 0, depois 3
//! ```
//!
//! O deslocamento começa no primeiro índice global do documento e cada
//! sentença precisa começar exatamente nele. Qualquer índice que caia fora da
//! sentença, ou uma sentença com zero ou várias raízes no modo `parse`,
//! invalida a chamada inteira ([`Error::InvalidBackend`]).
//!
//! A raiz sempre sai com o rótulo `ROOT`, qualquer que seja o rótulo usado
//! pelo backend.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::config::ParseMode;
use crate::doc::{DocToken, Span, ROOT_LABEL};
use crate::error::{Error, Result};

/// Um token no formato de saída.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(rename = "tok")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(rename = "dep", default, skip_serializing_if = "Option::is_none")]
    pub dependency_label: Option<String>,
    /// Índice local da cabeça; ausente para a raiz.
    #[serde(rename = "up", default, skip_serializing_if = "Option::is_none")]
    pub head_index: Option<usize>,
    #[serde(rename = "dn", default, skip_serializing_if = "Option::is_none")]
    pub children_indices: Option<Vec<usize>>,
}

impl TokenRecord {
    /// Filhos do token (vazio fora do modo `parse`).
    pub fn children(&self) -> &[usize] {
        self.children_indices.as_deref().unwrap_or(&[])
    }

    pub fn is_root(&self) -> bool {
        self.dependency_label.is_some() && self.head_index.is_none()
    }
}

/// Uma sentença no formato de saída.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    #[serde(rename = "toks")]
    pub tokens: Vec<TokenRecord>,
    #[serde(rename = "rt", default, skip_serializing_if = "Option::is_none")]
    pub root_index: Option<usize>,
}

impl SentenceRecord {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Textos dos tokens, em ordem.
    pub fn words(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// Resultado de uma análise: as sentenças em ordem. Serializa como um array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParseResult {
    sentences: Vec<SentenceRecord>,
}

impl ParseResult {
    pub fn new(sentences: Vec<SentenceRecord>) -> Self {
        Self { sentences }
    }

    pub fn sentences(&self) -> &[SentenceRecord] {
        &self.sentences
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SentenceRecord> {
        self.sentences.iter()
    }

    /// Total de tokens em todas as sentenças.
    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(SentenceRecord::len).sum()
    }

    pub fn into_sentences(self) -> Vec<SentenceRecord> {
        self.sentences
    }
}

impl IntoIterator for ParseResult {
    type Item = SentenceRecord;
    type IntoIter = std::vec::IntoIter<SentenceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParseResult {
    type Item = &'a SentenceRecord;
    type IntoIter = std::slice::Iter<'a, SentenceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.iter()
    }
}

/// Converte um índice global em local, verificando que ele pertence à sentença.
fn to_local(global: usize, sentence: &Range<usize>, offset: usize, what: &str) -> Result<usize> {
    if !sentence.contains(&global) {
        return Err(Error::invalid_backend(format!(
            "{what} {global} fora da sentença {sentence:?}"
        )));
    }
    global
        .checked_sub(offset)
        .ok_or_else(|| Error::invalid_backend(format!("{what} {global} anterior ao deslocamento {offset}")))
}

/// Registro de um token da sentença `span`.
pub fn build_token(span: &Span<'_>, token: &DocToken, offset: usize, mode: ParseMode) -> Result<TokenRecord> {
    let mut record = TokenRecord {
        text: token.text.clone(),
        tag: None,
        dependency_label: None,
        head_index: None,
        children_indices: None,
    };
    if mode.emits_tags() {
        record.tag = Some(token.tag.clone());
    }
    if mode.emits_dependencies() {
        let range = span.global_range();
        if token.is_root() {
            record.dependency_label = Some(ROOT_LABEL.to_string());
        } else {
            record.dependency_label = Some(token.dep.clone());
            record.head_index = Some(to_local(token.head, &range, offset, "cabeça")?);
        }
        let children = span
            .doc()
            .children(token)
            .map(|child| to_local(child.i, &range, offset, "filho"))
            .collect::<Result<Vec<_>>>()?;
        record.children_indices = Some(children);
    }
    Ok(record)
}

/// Registro de uma sentença, com a raiz no modo `parse`.
pub fn build_sentence(span: &Span<'_>, offset: usize, mode: ParseMode) -> Result<SentenceRecord> {
    if mode.emits_dependencies() && !span.doc().is_parsed() {
        return Err(Error::invalid_backend(
            "o modo 'parse' exige um documento com análise de dependências",
        ));
    }
    let range = span.global_range();
    if range.start != offset {
        return Err(Error::invalid_backend(format!(
            "sentença {range:?} não começa no deslocamento {offset}"
        )));
    }
    let tokens = span
        .tokens()
        .iter()
        .map(|t| build_token(span, t, offset, mode))
        .collect::<Result<Vec<_>>>()?;

    let root_index = if mode.emits_dependencies() {
        let mut roots = span.tokens().iter().filter(|t| t.is_root());
        let root = roots
            .next()
            .ok_or_else(|| Error::invalid_backend(format!("sentença sem raiz: {:?}", span.text())))?;
        if let Some(extra) = roots.next() {
            return Err(Error::invalid_backend(format!(
                "sentença com mais de uma raiz ({} e {}): {:?}",
                root.i,
                extra.i,
                span.text()
            )));
        }
        Some(to_local(root.i, &range, offset, "raiz")?)
    } else {
        None
    };

    Ok(SentenceRecord { tokens, root_index })
}

/// Registros de todas as sentenças, em ordem, com o deslocamento acumulado
/// a partir do primeiro índice global.
pub fn build_document<'a>(sentences: impl IntoIterator<Item = Span<'a>>, mode: ParseMode) -> Result<ParseResult> {
    let mut sentences = sentences.into_iter().peekable();
    let mut offset = sentences.peek().map_or(0, |span| span.global_range().start);
    let mut records = Vec::new();
    for span in sentences {
        let record = build_sentence(&span, offset, mode)?;
        offset += record.len();
        records.push(record);
    }
    Ok(ParseResult::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::Doc;
    use serde_json::json;

    fn token(i: usize, text: &str, tag: &str, dep: &str, head: usize) -> DocToken {
        DocToken {
            text: text.to_string(),
            start: 0,
            end: 0,
            i,
            tag: tag.to_string(),
            lemma: String::new(),
            dep: dep.to_string(),
            head,
        }
    }

    /// "Hi there . Go !" já analisado, em duas sentenças.
    fn two_sentences() -> Doc {
        Doc::from_parts(
            "Hi there. Go!",
            "en",
            vec![
                token(0, "Hi", "UH", "ROOT", 0),
                token(1, "there", "RB", "advmod", 0),
                token(2, ".", ".", "punct", 0),
                token(3, "Go", "VB", "ROOT", 3),
                token(4, "!", ".", "punct", 3),
            ],
            Some(vec![0..3, 3..5]),
        )
        .unwrap()
    }

    #[test]
    fn test_full_parse_uses_local_indices() {
        let doc = two_sentences();
        let result = build_document(doc.sents(), ParseMode::FullParse).unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!([
                {"toks": [
                    {"tok": "Hi", "tag": "UH", "dep": "ROOT", "dn": [1, 2]},
                    {"tok": "there", "tag": "RB", "dep": "advmod", "up": 0, "dn": []},
                    {"tok": ".", "tag": ".", "dep": "punct", "up": 0, "dn": []}
                ], "rt": 0},
                {"toks": [
                    {"tok": "Go", "tag": "VB", "dep": "ROOT", "dn": [1]},
                    {"tok": "!", "tag": ".", "dep": "punct", "up": 0, "dn": []}
                ], "rt": 0}
            ])
        );
    }

    #[test]
    fn test_lighter_modes_suppress_fields() {
        let doc = two_sentences();
        let tagged = build_document(doc.sents(), ParseMode::TagOnly).unwrap();
        assert_eq!(
            serde_json::to_value(&tagged.sentences()[1]).unwrap(),
            json!({"toks": [{"tok": "Go", "tag": "VB"}, {"tok": "!", "tag": "."}]})
        );
        let tokens = build_document(doc.sents(), ParseMode::TokenizeOnly).unwrap();
        assert_eq!(
            serde_json::to_value(&tokens.sentences()[0]).unwrap(),
            json!({"toks": [{"tok": "Hi"}, {"tok": "there"}, {"tok": "."}]})
        );
        assert!(tokens.sentences()[0].tokens[0].children().is_empty());
    }

    #[test]
    fn test_head_outside_sentence_is_invalid() {
        let mut tokens = two_sentences().tokens().to_vec();
        tokens[4].head = 0;
        let doc = Doc::from_parts("Hi there. Go!", "en", tokens, Some(vec![0..3, 3..5])).unwrap();
        let err = build_document(doc.sents(), ParseMode::FullParse).unwrap_err();
        assert!(matches!(err, Error::InvalidBackend(_)));
        // Nos modos leves as cabeças não são lidas
        assert!(build_document(doc.sents(), ParseMode::TagOnly).is_ok());
    }

    #[test]
    fn test_sentence_without_root_is_invalid() {
        let doc = Doc::from_parts(
            "a b",
            "en",
            vec![token(0, "a", "X", "dep", 1), token(1, "b", "X", "dep", 0)],
            None,
        )
        .unwrap();
        assert!(matches!(
            build_document(doc.sents(), ParseMode::FullParse),
            Err(Error::InvalidBackend(_))
        ));
    }

    #[test]
    fn test_root_label_is_normalized() {
        let doc = Doc::from_parts(
            "Go home",
            "en",
            vec![token(0, "Go", "VB", "root", 0), token(1, "home", "NN", "obj", 0)],
            None,
        )
        .unwrap();
        let result = build_document(doc.sents(), ParseMode::FullParse).unwrap();
        let sentence = &result.sentences()[0];
        assert_eq!(sentence.tokens[0].dependency_label.as_deref(), Some("ROOT"));
        assert_eq!(sentence.tokens[1].dependency_label.as_deref(), Some("obj"));

        let mut tokens = doc.tokens().to_vec();
        tokens[0].dep = String::new();
        let unlabeled = Doc::from_parts("Go home", "en", tokens, None).unwrap();
        let result = build_document(unlabeled.sents(), ParseMode::FullParse).unwrap();
        assert!(result.sentences()[0].tokens[0].is_root());
        assert_eq!(result.sentences()[0].tokens[0].dependency_label.as_deref(), Some("ROOT"));
    }

    #[test]
    fn test_nonzero_base_gives_local_indices() {
        let doc = Doc::from_parts(
            "Go home",
            "en",
            vec![token(5, "Go", "VB", "ROOT", 5), token(6, "home", "NN", "obj", 5)],
            None,
        )
        .unwrap();
        let result = build_document(doc.sents(), ParseMode::FullParse).unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!([{"toks": [
                {"tok": "Go", "tag": "VB", "dep": "ROOT", "dn": [1]},
                {"tok": "home", "tag": "NN", "dep": "obj", "up": 0, "dn": []}
            ], "rt": 0}])
        );
    }

    #[test]
    fn test_sentence_not_at_offset_is_invalid() {
        let first = two_sentences();
        let mut second = two_sentences();
        second.rebase(20);
        let spans = first.sents().into_iter().chain(second.sents());
        assert!(matches!(
            build_document(spans, ParseMode::TokenizeOnly),
            Err(Error::InvalidBackend(_))
        ));
    }

    #[test]
    fn test_several_roots_are_invalid() {
        let doc = Doc::from_parts(
            "a b",
            "en",
            vec![token(0, "a", "X", "ROOT", 0), token(1, "b", "X", "ROOT", 1)],
            None,
        )
        .unwrap();
        assert!(matches!(
            build_document(doc.sents(), ParseMode::FullParse),
            Err(Error::InvalidBackend(_))
        ));
        assert!(build_document(doc.sents(), ParseMode::TagOnly).is_ok());
    }

    #[test]
    fn test_unparsed_doc_is_invalid_for_full_parse() {
        let doc = Doc::from_tokens("a b", "en", crate::tokenizer::Tokenizer::default().tokenize("a b"));
        assert!(matches!(
            build_document(doc.sents(), ParseMode::FullParse),
            Err(Error::InvalidBackend(_))
        ));
        assert_eq!(build_document(doc.sents(), ParseMode::TokenizeOnly).unwrap().token_count(), 2);
    }

    #[test]
    fn test_empty_doc_gives_empty_result() {
        let doc = Doc::from_tokens("", "en", Vec::new());
        for mode in ParseMode::all() {
            assert!(build_document(doc.sents(), mode).unwrap().is_empty());
        }
    }

    #[test]
    fn test_result_round_trips_as_bare_array() {
        let doc = two_sentences();
        let result = build_document(doc.sents(), ParseMode::FullParse).unwrap();
        let text = serde_json::to_string(&result).unwrap();
        assert!(text.starts_with('['));
        let back: ParseResult = serde_json::from_str(&text).unwrap();
        assert_eq!(back, result);
        assert!(back.sentences()[0].tokens[0].is_root());
    }
}
