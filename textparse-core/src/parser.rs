//! # Parser de Dependências Heurístico
//!
//! Constrói, para cada sentença, uma árvore de dependências no estilo
//! ClearNLP/spaCy (`nsubj`, `dobj`, `det`, `prep`, `pobj`...) a partir das
//! classes gramaticais ([`PosClass`]) atribuídas pelo etiquetador.
//!
//! ## Algoritmo
//!
//! 1. **Auxiliares**: modais e formas de "be/have/do" seguidos de outro verbo
//!    são ligados ao verbo principal (`aux`).
//! 2. **Raiz**: o primeiro verbo principal; na falta dele, o primeiro auxiliar,
//!    o primeiro núcleo nominal ou o primeiro token que não é pontuação.
//! 3. **Ligações locais**: cada token escolhe sua cabeça olhando os vizinhos
//!    (determinante → próximo substantivo, preposição → nominal/verbo à
//!    esquerda, substantivo → preposição ou verbo à esquerda, etc.).
//! 4. **Garantia de árvore**: qualquer ciclo é quebrado religando o token à raiz.
//!
//! Como o parser do spaCy, este estágio também **segmenta sentenças** quando
//! nenhum estágio anterior definiu as fronteiras: é isso que permite ao modo
//! `parse` dispensar um segmentador externo.

use tracing::warn;

use crate::doc::{Doc, DocToken, ROOT_LABEL};
use crate::tagger::PosClass;

/// Formas de "be/have/do" que podem atuar como auxiliares.
const AUX_FORMS: &[&str] = &[
    "be", "am", "is", "are", "was", "were", "been", "being", "'m", "'re", "'s",
    "have", "has", "had", "'ve", "do", "does", "did",
];

/// Formas de "be", que ligam o nominal seguinte como atributo.
const COPULAS: &[&str] = &["be", "am", "is", "are", "was", "were", "been", "'m", "'re", "'s"];

const NEGATIONS: &[&str] = &["not", "n't", "never", "não"];

/// Pontuação que encerra uma sentença.
const SENTENCE_FINAL: &[&str] = &[".", "!", "?", "…", "...", "!?", "?!"];

/// Pontuação de fechamento que acompanha a sentença anterior.
const CLOSING: &[&str] = &["\"", "'", "\u{201d}", "\u{2019}", ")", "]", "}", "''"];

/// Parser de dependências baseado em regras.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyParser {
    lang: String,
}

impl DependencyParser {
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Segmenta (se necessário) e analisa todas as sentenças do documento.
    pub fn parse(&self, doc: &mut Doc) {
        if doc.is_empty() {
            doc.mark_parsed();
            return;
        }
        if !doc.is_tagged() {
            warn!("Parser executado sem tags POS: a árvore terá apenas ligações à raiz");
        }
        if !doc.has_sentences() {
            let starts = sentence_starts(doc.tokens());
            doc.set_sent_starts(starts);
        }

        let base = doc.base();
        let ranges: Vec<(usize, usize)> = doc
            .sents()
            .iter()
            .map(|s| {
                let r = s.global_range();
                (r.start - base, r.end - base)
            })
            .collect();

        let tokens = doc.tokens_mut();
        for (start, end) in ranges {
            let sentence = &tokens[start..end];
            let classes: Vec<PosClass> = sentence.iter().map(|t| PosClass::from_tag(&t.tag)).collect();
            let words: Vec<String> = sentence.iter().map(|t| t.text.to_lowercase()).collect();
            let arcs = attach(&classes, &words);
            for (pos, (head, dep)) in arcs.into_iter().enumerate() {
                let token = &mut tokens[start + pos];
                token.head = base + start + head;
                token.dep = dep.to_string();
            }
        }
        doc.mark_parsed();
    }
}

/// Fronteiras de sentença usadas pelo parser: uma sentença nova começa no
/// primeiro token após a pontuação final (e eventuais fechamentos), desde que
/// esse token não comece com letra minúscula.
fn sentence_starts(tokens: &[DocToken]) -> Vec<bool> {
    let mut starts = vec![false; tokens.len()];
    let mut after_final = false;
    for (pos, token) in tokens.iter().enumerate() {
        let text = token.text.as_str();
        if after_final {
            if SENTENCE_FINAL.contains(&text) || CLOSING.contains(&text) {
                continue;
            }
            if !text.chars().next().is_some_and(char::is_lowercase) {
                starts[pos] = true;
            }
            after_final = false;
        }
        if SENTENCE_FINAL.contains(&text) {
            after_final = true;
        }
    }
    starts
}

/// Calcula `(cabeça, rótulo)` para cada token de uma sentença, em posições
/// locais. A raiz aponta para si mesma com o rótulo `ROOT`.
pub fn attach(classes: &[PosClass], words: &[String]) -> Vec<(usize, &'static str)> {
    let n = classes.len();
    if n == 0 {
        return Vec::new();
    }
    let aux_head = auxiliary_heads(classes, words);
    let root = find_root(classes, &aux_head);
    let main = |k: usize| aux_head[k].unwrap_or(k);

    let mut arcs: Vec<(usize, &'static str)> = (0..n)
        .map(|i| {
            if i == root {
                return (root, ROOT_LABEL);
            }
            if let Some(h) = aux_head[i] {
                return (h, "aux");
            }
            let word = words[i].as_str();
            match classes[i] {
                PosClass::Punct => (root, "punct"),
                PosClass::Part if NEGATIONS.contains(&word) => {
                    (nearest(classes, i, is_verbal).map(main).unwrap_or(root), "neg")
                }
                PosClass::Part if word == "'s" => {
                    (left(classes, i, |c| c.is_nominal()).unwrap_or(root), "case")
                }
                PosClass::Part => match right(classes, i, |c| c == PosClass::Verb) {
                    Some(v) => (v, "aux"),
                    None => (root, "prt"),
                },
                PosClass::Adv if NEGATIONS.contains(&word) => {
                    (nearest(classes, i, is_verbal).map(main).unwrap_or(root), "neg")
                }
                PosClass::Det => match nominal_head_right(classes, i) {
                    Some(h) => (h, "det"),
                    None => (root, "dep"),
                },
                PosClass::Adj => match nominal_head_right(classes, i) {
                    Some(h) => (h, "amod"),
                    None => (left(classes, i, is_verbal).map(main).unwrap_or(root), "acomp"),
                },
                PosClass::Num => match nominal_head_right(classes, i) {
                    Some(h) => (h, "nummod"),
                    None => attach_nominal(classes, words, i, root, &aux_head),
                },
                PosClass::Noun | PosClass::Propn
                    if i + 1 < n && matches!(classes[i + 1], PosClass::Noun | PosClass::Propn) =>
                {
                    (compound_end(classes, i + 1), "compound")
                }
                PosClass::Noun | PosClass::Propn | PosClass::Pron => {
                    attach_nominal(classes, words, i, root, &aux_head)
                }
                PosClass::Adp => {
                    let head = left(classes, i, |c| c.is_nominal() || is_verbal(c)).map(main);
                    (head.unwrap_or(root), "prep")
                }
                PosClass::Adv => (
                    nearest(classes, i, |c| is_verbal(c) || c == PosClass::Adj)
                        .map(main)
                        .unwrap_or(root),
                    "advmod",
                ),
                PosClass::Verb => attach_clause(classes, i, root),
                PosClass::Aux => (root, "aux"),
                PosClass::Cconj => (
                    left(classes, i, |c| c != PosClass::Punct).unwrap_or(root),
                    "cc",
                ),
                PosClass::Sconj => (
                    right(classes, i, |c| c == PosClass::Verb).unwrap_or(root),
                    "mark",
                ),
                PosClass::Intj => (root, "intj"),
                PosClass::Other => (root, "dep"),
            }
        })
        .collect();

    break_cycles(&mut arcs, root);
    arcs
}

fn is_verbal(c: PosClass) -> bool {
    matches!(c, PosClass::Verb | PosClass::Aux)
}

/// Para cada auxiliar, o verbo principal que ele acompanha.
fn auxiliary_heads(classes: &[PosClass], words: &[String]) -> Vec<Option<usize>> {
    let n = classes.len();
    let mut heads = vec![None; n];
    for i in (0..n).rev() {
        let candidate = classes[i] == PosClass::Aux
            || (classes[i] == PosClass::Verb && AUX_FORMS.contains(&words[i].as_str()));
        if !candidate {
            continue;
        }
        for j in i + 1..n.min(i + 5) {
            match classes[j] {
                PosClass::Adv | PosClass::Part | PosClass::Pron => continue,
                PosClass::Verb | PosClass::Aux => {
                    heads[i] = match heads[j] {
                        Some(h) => Some(h),
                        None if classes[j] == PosClass::Verb => Some(j),
                        None => None,
                    };
                    break;
                }
                _ => break,
            }
        }
    }
    heads
}

fn find_root(classes: &[PosClass], aux_head: &[Option<usize>]) -> usize {
    let first = |pred: &dyn Fn(usize) -> bool| (0..classes.len()).find(|&i| pred(i));
    first(&|i| classes[i] == PosClass::Verb && aux_head[i].is_none())
        .or_else(|| first(&|i| is_verbal(classes[i]) && aux_head[i].is_none()))
        .or_else(|| first(&|i| classes[i].is_nominal()))
        .or_else(|| first(&|i| classes[i] != PosClass::Punct))
        .unwrap_or(0)
}

/// Cabeça de um substantivo: preposição, verbo ou a raiz, conforme o contexto
/// à esquerda.
fn attach_nominal(
    classes: &[PosClass],
    words: &[String],
    i: usize,
    root: usize,
    aux_head: &[Option<usize>],
) -> (usize, &'static str) {
    let governor = (0..i).rev().find(|&k| {
        !matches!(
            classes[k],
            PosClass::Det | PosClass::Adj | PosClass::Num | PosClass::Noun | PosClass::Propn | PosClass::Adv
        )
    });
    let Some(k) = governor else {
        return if i < root { (root, "nsubj") } else { (root, "dobj") };
    };
    match classes[k] {
        PosClass::Adp => (k, "pobj"),
        PosClass::Aux => (aux_head[k].unwrap_or(root), "nsubj"),
        PosClass::Verb => {
            let verb = aux_head[k].unwrap_or(k);
            let word = words[k].as_str();
            if aux_head[k].is_some() {
                // "have you seen": sujeito entre o auxiliar e o verbo
                (verb, "nsubj")
            } else if k == root && AUX_FORMS.contains(&word) && !has_nominal_before(classes, root) {
                // "how are you": sujeito invertido
                (verb, "nsubj")
            } else if COPULAS.contains(&word) {
                (verb, "attr")
            } else {
                (verb, "dobj")
            }
        }
        PosClass::Cconj => match left(classes, k, |c| c.is_nominal()) {
            Some(first) => (first, "conj"),
            None if i < root => (root, "nsubj"),
            None => (root, "conj"),
        },
        _ if i < root => (root, "nsubj"),
        _ => (root, "dobj"),
    }
}

/// Cabeça de um verbo que não é a raiz.
fn attach_clause(classes: &[PosClass], i: usize, root: usize) -> (usize, &'static str) {
    let before = (0..i).rev().find(|&k| classes[k] != PosClass::Adv);
    if let Some(k) = before {
        if classes[k] == PosClass::Part {
            let head = left(classes, k, |c| c == PosClass::Verb).unwrap_or(root);
            return (head, "xcomp");
        }
    }
    let (lo, hi) = if i < root { (i, root) } else { (root, i) };
    let between = &classes[lo..hi];
    if between.contains(&PosClass::Cconj) {
        (root, "conj")
    } else if between.contains(&PosClass::Sconj) || classes[..i].contains(&PosClass::Sconj) {
        (root, "advcl")
    } else {
        (root, "ccomp")
    }
}

fn has_nominal_before(classes: &[PosClass], pos: usize) -> bool {
    classes[..pos].iter().any(|c| c.is_nominal())
}

/// Primeiro núcleo nominal à direita, pulando modificadores; compostos
/// ("bus station") resolvem para o último substantivo.
fn nominal_head_right(classes: &[PosClass], i: usize) -> Option<usize> {
    for j in i + 1..classes.len() {
        match classes[j] {
            PosClass::Noun | PosClass::Propn | PosClass::Pron => return Some(compound_end(classes, j)),
            PosClass::Adj | PosClass::Num | PosClass::Adv | PosClass::Det => continue,
            _ => return None,
        }
    }
    None
}

fn compound_end(classes: &[PosClass], mut j: usize) -> usize {
    while j + 1 < classes.len() && matches!(classes[j + 1], PosClass::Noun | PosClass::Propn) {
        j += 1;
    }
    j
}

fn left(classes: &[PosClass], i: usize, pred: impl Fn(PosClass) -> bool) -> Option<usize> {
    (0..i).rev().find(|&k| pred(classes[k]))
}

fn right(classes: &[PosClass], i: usize, pred: impl Fn(PosClass) -> bool) -> Option<usize> {
    (i + 1..classes.len()).find(|&k| pred(classes[k]))
}

/// Token mais próximo que satisfaz o predicado; em caso de empate, o da direita.
fn nearest(classes: &[PosClass], i: usize, pred: impl Fn(PosClass) -> bool) -> Option<usize> {
    let l = left(classes, i, &pred);
    let r = right(classes, i, &pred);
    match (l, r) {
        (Some(l), Some(r)) => Some(if i - l < r - i { l } else { r }),
        (l, r) => l.or(r),
    }
}

/// Religa à raiz todo token cujo caminho de cabeças não chega nela.
fn break_cycles(arcs: &mut [(usize, &'static str)], root: usize) {
    let n = arcs.len();
    for i in 0..n {
        let mut current = i;
        let mut steps = 0;
        while current != root {
            current = arcs[current].0;
            steps += 1;
            if steps > n || current >= n {
                arcs[i] = (root, "dep");
                break;
            }
        }
    }
}
