//! # Documento Analisado
//!
//! [`Doc`] é a forma normalizada da saída de qualquer backend: a lista de tokens
//! com tags, rótulos de dependência e cabeças, mais as fronteiras de sentença.
//! É a entrada do construtor de árvores ([`crate::tree`]).
//!
//! ## Índices Globais
//!
//! Cada token carrega o índice `i` **global ao documento** (`base + posição`),
//! e a cabeça sintática (`head`) também é um índice global. Um token cuja cabeça
//! é ele mesmo é uma raiz. O construtor de árvores converte esses índices em
//! índices locais à sentença subtraindo o deslocamento acumulado.
//!
//! Quando cada sentença é analisada separadamente (modos leves com segmentador
//! externo), cada `Doc` começa em zero; [`Doc::rebase`] desloca os índices para
//! que todas as sentenças compartilhem o mesmo espaço global.

use std::ops::Range;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tokenizer::{is_punct_text, Token};

/// Rótulo da raiz da árvore de dependências.
pub const ROOT_LABEL: &str = "ROOT";

/// Um token analisado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocToken {
    pub text: String,
    /// Offset de byte inicial no texto analisado.
    pub start: usize,
    /// Offset de byte final (exclusivo).
    pub end: usize,
    /// Índice global no documento.
    pub i: usize,
    /// Tag POS (vazia se o documento não foi etiquetado).
    pub tag: String,
    /// Lema (vazio se o lematizador não rodou).
    pub lemma: String,
    /// Relação com a cabeça; `ROOT` para a raiz.
    pub dep: String,
    /// Índice global da cabeça; igual a `i` para raízes e documentos sem parse.
    pub head: usize,
}

impl DocToken {
    pub fn is_root(&self) -> bool {
        self.head == self.i
    }

    pub fn is_punct(&self) -> bool {
        is_punct_text(&self.text)
    }
}

/// Documento produzido por uma execução do backend.
#[derive(Debug, Clone)]
pub struct Doc {
    text: String,
    lang: String,
    base: usize,
    tokens: Vec<DocToken>,
    /// `Some` quando algum estágio definiu fronteiras de sentença.
    sent_starts: Option<Vec<bool>>,
    tagged: bool,
    parsed: bool,
    /// Filhos de cada token (por posição), calculados sob demanda.
    children: OnceLock<Vec<Vec<usize>>>,
}

impl Doc {
    /// Cria o documento a partir da saída do tokenizador, sem anotações.
    pub fn from_tokens(text: impl Into<String>, lang: impl Into<String>, tokens: Vec<Token>) -> Self {
        let tokens = tokens
            .into_iter()
            .enumerate()
            .map(|(i, t)| DocToken {
                text: t.text,
                start: t.start,
                end: t.end,
                i,
                tag: String::new(),
                lemma: String::new(),
                dep: String::new(),
                head: i,
            })
            .collect();
        Self {
            text: text.into(),
            lang: lang.into(),
            base: 0,
            tokens,
            sent_starts: None,
            tagged: false,
            parsed: false,
            children: OnceLock::new(),
        }
    }

    /// Monta um documento já anotado (ex: saída de um backend externo).
    ///
    /// Os índices `i` precisam ser consecutivos; as cabeças precisam apontar
    /// para tokens do próprio documento; os offsets precisam cair no texto.
    pub fn from_parts(
        text: impl Into<String>,
        lang: impl Into<String>,
        tokens: Vec<DocToken>,
        sentences: Option<Vec<Range<usize>>>,
    ) -> Result<Self> {
        let text = text.into();
        let base = tokens.first().map(|t| t.i).unwrap_or(0);
        for (pos, token) in tokens.iter().enumerate() {
            if token.start > token.end || text.get(token.start..token.end).is_none() {
                return Err(Error::invalid_backend(format!(
                    "offsets {}..{} do token {} fora do texto",
                    token.start, token.end, token.i
                )));
            }
            if token.i != base + pos {
                return Err(Error::invalid_backend(format!(
                    "índices de token não consecutivos: esperado {}, encontrado {}",
                    base + pos,
                    token.i
                )));
            }
            if token.head < base || token.head >= base + tokens.len() {
                return Err(Error::invalid_backend(format!(
                    "cabeça {} do token {} fora do documento",
                    token.head, token.i
                )));
            }
        }
        let tagged = tokens.iter().any(|t| !t.tag.is_empty());
        let parsed = tokens.iter().any(|t| !t.dep.is_empty());
        let mut doc = Self {
            text,
            lang: lang.into(),
            base,
            tokens,
            sent_starts: None,
            tagged,
            parsed,
            children: OnceLock::new(),
        };
        if let Some(ranges) = sentences {
            doc.set_sentences(&ranges)?;
        }
        Ok(doc)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Índice global do primeiro token.
    pub fn base(&self) -> usize {
        self.base
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[DocToken] {
        &self.tokens
    }

    /// Acesso mutável para os estágios do pipeline. Invalida o cache de filhos.
    pub(crate) fn tokens_mut(&mut self) -> &mut [DocToken] {
        self.children.take();
        &mut self.tokens
    }

    pub fn is_tagged(&self) -> bool {
        self.tagged
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    pub fn has_sentences(&self) -> bool {
        self.sent_starts.is_some()
    }

    pub(crate) fn mark_tagged(&mut self) {
        self.tagged = true;
    }

    pub(crate) fn mark_parsed(&mut self) {
        self.parsed = true;
    }

    /// Token pelo índice global.
    pub fn token(&self, i: usize) -> Option<&DocToken> {
        i.checked_sub(self.base).and_then(|pos| self.tokens.get(pos))
    }

    /// Cabeça sintática do token; `None` para raízes.
    pub fn head_of(&self, token: &DocToken) -> Option<&DocToken> {
        if token.is_root() {
            None
        } else {
            self.token(token.head)
        }
    }

    /// Dependentes do token, na ordem do documento.
    pub fn children(&self, token: &DocToken) -> impl Iterator<Item = &DocToken> + '_ {
        let positions = token
            .i
            .checked_sub(self.base)
            .and_then(|pos| self.children_index().get(pos))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        positions.iter().map(move |&p| &self.tokens[p])
    }

    fn children_index(&self) -> &[Vec<usize>] {
        self.children.get_or_init(|| {
            let mut children = vec![Vec::new(); self.tokens.len()];
            for (pos, token) in self.tokens.iter().enumerate() {
                if token.is_root() {
                    continue;
                }
                if let Some(head_pos) = token.head.checked_sub(self.base) {
                    if let Some(list) = children.get_mut(head_pos) {
                        list.push(pos);
                    }
                }
            }
            children
        })
    }

    /// Define as fronteiras de sentença a partir dos inícios (por posição).
    /// O primeiro token sempre inicia uma sentença.
    pub(crate) fn set_sent_starts(&mut self, mut starts: Vec<bool>) {
        starts.resize(self.tokens.len(), false);
        if let Some(first) = starts.first_mut() {
            *first = true;
        }
        self.sent_starts = Some(starts);
    }

    /// Define as fronteiras de sentença a partir de intervalos de posições,
    /// que precisam cobrir o documento em ordem e sem lacunas.
    pub fn set_sentences(&mut self, ranges: &[Range<usize>]) -> Result<()> {
        let mut expected = 0;
        let mut starts = vec![false; self.tokens.len()];
        for range in ranges {
            if range.start != expected || range.end <= range.start || range.end > self.tokens.len() {
                return Err(Error::invalid_backend(format!(
                    "sentenças não cobrem o documento em ordem (intervalo {:?})",
                    range
                )));
            }
            starts[range.start] = true;
            expected = range.end;
        }
        if expected != self.tokens.len() {
            return Err(Error::invalid_backend("sentenças não cobrem o fim do documento"));
        }
        self.sent_starts = Some(starts);
        Ok(())
    }

    /// Desloca os índices globais para começarem em `base`.
    pub fn rebase(&mut self, base: usize) {
        let old = self.base;
        for token in self.tokens_mut() {
            token.i = token.i - old + base;
            token.head = token.head - old + base;
        }
        self.base = base;
    }

    /// O documento inteiro como uma única sentença.
    pub fn as_span(&self) -> Span<'_> {
        Span {
            doc: self,
            start: 0,
            end: self.tokens.len(),
        }
    }

    /// Sentenças em ordem. Sem fronteiras definidas, o documento inteiro é uma
    /// sentença; um documento vazio não tem sentenças.
    pub fn sents(&self) -> Vec<Span<'_>> {
        if self.tokens.is_empty() {
            return Vec::new();
        }
        let Some(starts) = &self.sent_starts else {
            return vec![self.as_span()];
        };
        let mut spans = Vec::new();
        let mut begin = 0;
        for pos in 1..self.tokens.len() {
            if starts[pos] {
                spans.push(Span { doc: self, start: begin, end: pos });
                begin = pos;
            }
        }
        spans.push(Span {
            doc: self,
            start: begin,
            end: self.tokens.len(),
        });
        spans
    }
}

/// Uma sentença: visão emprestada de um intervalo do [`Doc`].
#[derive(Debug, Clone, Copy)]
pub struct Span<'a> {
    doc: &'a Doc,
    start: usize,
    end: usize,
}

impl<'a> Span<'a> {
    pub fn doc(&self) -> &'a Doc {
        self.doc
    }

    pub fn tokens(&self) -> &'a [DocToken] {
        &self.doc.tokens[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Intervalo de índices globais coberto pela sentença.
    pub fn global_range(&self) -> Range<usize> {
        self.doc.base + self.start..self.doc.base + self.end
    }

    /// A raiz sintática: o primeiro token cuja cabeça é ele mesmo.
    pub fn root(&self) -> Option<&'a DocToken> {
        self.tokens().iter().find(|t| t.is_root())
    }

    /// Texto original da sentença.
    pub fn text(&self) -> &'a str {
        match (self.tokens().first(), self.tokens().last()) {
            (Some(first), Some(last)) => self.doc.text.get(first.start..last.end).unwrap_or(""),
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn doc(text: &str) -> Doc {
        Doc::from_tokens(text, "en", Tokenizer::default().tokenize(text))
    }

    #[test]
    fn test_unsegmented_doc_is_one_sentence() {
        let d = doc("Hi there. How are you?");
        let sents = d.sents();
        assert_eq!(sents.len(), 1);
        assert_eq!(sents[0].len(), 7);
        assert!(doc("").sents().is_empty());
    }

    #[test]
    fn test_set_sentences_and_text() {
        let mut d = doc("Hi there. How are you?");
        d.set_sentences(&[0..3, 3..7]).unwrap();
        let sents = d.sents();
        assert_eq!(sents.len(), 2);
        assert_eq!(sents[0].text(), "Hi there.");
        assert_eq!(sents[1].text(), "How are you?");
        assert_eq!(sents[1].global_range(), 3..7);
    }

    #[test]
    fn test_set_sentences_rejects_gaps() {
        let mut d = doc("Hi there. How are you?");
        assert!(d.set_sentences(&[0..3, 4..7]).is_err());
        assert!(d.set_sentences(&[0..3]).is_err());
    }

    #[test]
    fn test_children_follow_heads() {
        let mut d = doc("the cat sat");
        {
            let toks = d.tokens_mut();
            toks[0].head = 1;
            toks[1].head = 2;
        }
        let cat = &d.tokens()[1];
        let kids: Vec<usize> = d.children(cat).map(|t| t.i).collect();
        assert_eq!(kids, [0]);
        let sat = &d.tokens()[2];
        assert_eq!(d.children(sat).map(|t| t.i).collect::<Vec<_>>(), [1]);
        assert!(d.head_of(sat).is_none());
        assert_eq!(d.head_of(cat).unwrap().text, "sat");
    }

    #[test]
    fn test_rebase_shifts_indices_and_heads() {
        let mut d = doc("the cat sat");
        d.tokens_mut()[0].head = 1;
        d.rebase(10);
        assert_eq!(d.base(), 10);
        assert_eq!(d.tokens()[0].i, 10);
        assert_eq!(d.tokens()[0].head, 11);
        assert_eq!(d.token(12).unwrap().text, "sat");
        assert!(d.token(3).is_none());
        let cat = d.token(11).unwrap();
        assert_eq!(d.children(cat).map(|t| t.i).collect::<Vec<_>>(), [10]);
    }

    #[test]
    fn test_from_parts_validates_indices() {
        let mut tokens: Vec<DocToken> = doc("a b").tokens().to_vec();
        tokens[1].i = 5;
        assert!(Doc::from_parts("a b", "en", tokens, None).is_err());

        let mut tokens: Vec<DocToken> = doc("a b").tokens().to_vec();
        tokens[0].head = 9;
        assert!(Doc::from_parts("a b", "en", tokens, None).is_err());
    }

    #[test]
    fn test_from_parts_validates_offsets() {
        let mut tokens: Vec<DocToken> = doc("a b").tokens().to_vec();
        tokens[1].start = 10;
        tokens[1].end = 13;
        assert!(matches!(
            Doc::from_parts("a b", "en", tokens, None),
            Err(Error::InvalidBackend(_))
        ));

        // "é" ocupa dois bytes: o offset 1 cai no meio do caractere
        let mut tokens: Vec<DocToken> = doc("a b").tokens().to_vec();
        tokens.truncate(1);
        tokens[0].end = 1;
        assert!(Doc::from_parts("é b", "en", tokens, None).is_err());

        let tokens: Vec<DocToken> = doc("a b").tokens().to_vec();
        let mut ok = Doc::from_parts("a b", "en", tokens, None).unwrap();
        assert_eq!(ok.as_span().text(), "a b");

        // Offsets corrompidos depois da construção não derrubam o texto da sentença
        ok.tokens_mut()[1].end = 13;
        assert_eq!(ok.as_span().text(), "");
    }
}
