//! # Tokenizador de Palavras-Chave
//!
//! Segundo consumidor do motor. Reduz um documento anotado a uma lista plana
//! de "palavras" canônicas para montar o corpus do modelo de tópicos:
//!
//! 1. **Entidades base**: corridas BIO aparadas (qualquer tipo, sem mapeamento).
//! 2. **Sintagmas nominais** (opcional): noun chunks aparados, na ordem recebida.
//! 3. **Verbos raiz** (opcional): cada token livre com dependência `root`.
//!
//! Todos compartilham o mesmo [`OverlapTracker`]: um candidato que toca um
//! token já usado é descartado. Os spans aceitos são ordenados pelo início e
//! convertidos em texto minúsculo unido por `_` (ex: "quick_pump").

use rayon::prelude::*;

use crate::config::KeywordConfig;
use crate::span::{trim_span, Span};
use crate::tagger::entity_runs;
use crate::token::{AnnotatedDocument, Token};
use crate::tracker::OverlapTracker;

/// Tokenizador de palavras-chave configurável.
#[derive(Debug, Clone, Default)]
pub struct KeywordTokenizer {
    pub config: KeywordConfig,
}

impl KeywordTokenizer {
    pub fn new(config: KeywordConfig) -> Self {
        Self { config }
    }

    /// Spans aceitos, ordenados pelo token inicial.
    pub fn select_spans(&self, doc: &AnnotatedDocument) -> Vec<Span> {
        let tokens = &doc.tokens;
        let mut tracker = OverlapTracker::new(tokens.len());
        let mut selected = Vec::new();

        for run in entity_runs(tokens) {
            if let Some(span) = trim_span(tokens, run.span) {
                if tracker.try_reserve(span) {
                    selected.push(span);
                }
            }
        }

        if self.config.extract_noun_phrases {
            for &chunk in &doc.noun_chunks {
                if let Some(span) = trim_span(tokens, chunk) {
                    if tracker.try_reserve(span) {
                        selected.push(span);
                    }
                }
            }
        }

        if self.config.extract_root_verbs {
            for (index, token) in tokens.iter().enumerate() {
                if token.is_root() && tracker.try_reserve(Span::single(index)) {
                    selected.push(Span::single(index));
                }
            }
        }

        selected.sort();
        selected
    }

    /// Lista de palavras-chave do documento, na ordem dos spans.
    pub fn tokenize(&self, doc: &AnnotatedDocument) -> Vec<String> {
        if doc.is_blank() {
            return Vec::new();
        }
        self.select_spans(doc)
            .into_iter()
            .map(|span| phrase_text(span.tokens(&doc.tokens)))
            .filter(|phrase| !phrase.is_empty())
            .collect()
    }

    /// Tokeniza vários documentos em paralelo, preservando a ordem.
    pub fn tokenize_corpus(&self, docs: &[AnnotatedDocument]) -> Vec<Vec<String>> {
        docs.par_iter().map(|doc| self.tokenize(doc)).collect()
    }
}

/// Texto canônico de um span: formas normalizadas unidas por `_`.
///
/// Pontuação e espaços são ignorados, assim como formas que não sejam
/// inteiramente alfanuméricas. Um span só de números vira string vazia.
pub fn phrase_text(tokens: &[Token]) -> String {
    let pieces: Vec<&str> = tokens
        .iter()
        .filter(|t| !t.is_punct() && !t.is_space())
        .map(|t| t.norm.trim())
        .filter(|norm| !norm.is_empty() && norm.chars().all(char::is_alphanumeric))
        .collect();

    if pieces.iter().all(|p| p.chars().all(char::is_numeric)) {
        return String::new();
    }
    pieces.join("_")
}
