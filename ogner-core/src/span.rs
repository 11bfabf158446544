//! # Spans e Aparador de Fronteiras
//!
//! Um [`Span`] é um intervalo semiaberto `[start, end)` de índices de tokens.
//! Todos os candidatos do motor (entidades base, ocorrências de dicionário,
//! sintagmas nominais, extensões de dependência) são expressos como spans.
//!
//! O **aparador** ([`trim_span`]) remove das bordas os tokens semanticamente
//! vazios: stop-words, determinantes, preposições, pronomes e pontuação.
//!
//! ## Exemplo
//! Em "the new pump ." o span `[0, 4)` é aparado para `[1, 3)` ("new pump").

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::token::{PosTag, Token};

/// Intervalo semiaberto de tokens.
///
/// O tipo (categoria) de um span comprometido não fica no span: é a lista em
/// que ele é guardado (ver [`crate::tagger::CommittedSpans`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Índice do token inicial (inclusivo)
    pub start: usize,
    /// Índice do token final (exclusivo)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span de um único token.
    pub fn single(index: usize) -> Self {
        Self::new(index, index + 1)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Os tokens cobertos pelo span (vazio se o span sair do documento).
    pub fn tokens<'a>(&self, tokens: &'a [Token]) -> &'a [Token] {
        let end = self.end.min(tokens.len());
        let start = self.start.min(end);
        &tokens[start..end]
    }
}

/// Token que não carrega conteúdo numa borda de span.
pub fn is_trimmable(token: &Token) -> bool {
    token.is_stop
        || matches!(
            token.pos,
            PosTag::Det | PosTag::Adp | PosTag::Pron | PosTag::Punct
        )
}

/// Apara as duas bordas de um span.
///
/// Retorna `None` quando o aparo consumiria o intervalo inteiro: o candidato
/// deve ser descartado. Intervalos invertidos ou fora do documento também
/// colapsam para `None`.
pub fn trim_span(tokens: &[Token], span: Span) -> Option<Span> {
    let end = span.end.min(tokens.len());
    let mut start = span.start;

    while start < end && is_trimmable(&tokens[start]) {
        start += 1;
    }
    if start >= end {
        return None;
    }

    let mut last = end - 1;
    while last > start && is_trimmable(&tokens[last]) {
        last -= 1;
    }
    Some(Span::new(start, last + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::DocBuilder;

    fn sample() -> Vec<Token> {
        DocBuilder::new()
            .token("the", PosTag::Det).stop()
            .token("new", PosTag::Adj)
            .token("pump", PosTag::Noun)
            .token("of", PosTag::Adp).stop()
            .token(".", PosTag::Punct)
            .build()
            .tokens
    }

    #[test]
    fn test_trim_both_sides() {
        let tokens = sample();
        assert_eq!(trim_span(&tokens, Span::new(0, 5)), Some(Span::new(1, 3)));
    }

    #[test]
    fn test_trim_idempotent() {
        let tokens = sample();
        let once = trim_span(&tokens, Span::new(0, 5)).unwrap();
        assert_eq!(trim_span(&tokens, once), Some(once));
    }

    #[test]
    fn test_trim_everything_is_discarded() {
        let tokens = sample();
        assert_eq!(trim_span(&tokens, Span::new(3, 5)), None);
        assert_eq!(trim_span(&tokens, Span::new(0, 1)), None);
    }

    #[test]
    fn test_trim_degenerate_intervals() {
        let tokens = sample();
        assert_eq!(trim_span(&tokens, Span::new(2, 2)), None);
        assert_eq!(trim_span(&tokens, Span::new(3, 1)), None);
        assert_eq!(trim_span(&tokens, Span::new(9, 12)), None);
    }

    #[test]
    fn test_stop_word_content_pos_is_trimmed() {
        // stop-word com POS de conteúdo também é aparada
        let tokens = DocBuilder::new()
            .token("many", PosTag::Adj).stop()
            .token("valves", PosTag::Noun)
            .build()
            .tokens;
        assert_eq!(trim_span(&tokens, Span::new(0, 2)), Some(Span::new(1, 2)));
    }

    #[test]
    fn test_span_tokens_clamped() {
        let tokens = sample();
        assert_eq!(Span::new(3, 10).tokens(&tokens).len(), 2);
        assert!(Span::new(7, 9).tokens(&tokens).is_empty());
    }
}
