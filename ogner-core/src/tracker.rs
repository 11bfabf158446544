//! # Rastreador de Sobreposição
//!
//! Guarda, por documento, quais tokens já pertencem a um span comprometido.
//! É o mecanismo de arbitragem entre candidatos conflitantes: quem chega
//! primeiro reserva seus tokens, e qualquer candidato posterior que toque um
//! token reservado é descartado em silêncio.
//!
//! Invariantes:
//! - um token reservado nunca volta a ficar livre durante a mesma passada;
//! - a reserva de um span é atômica (todos os tokens ou nenhum).

use crate::span::Span;
use crate::tagger::{CommittedSpans, EntityCategory};
use crate::token::Token;

/// Ocupação por token de um único documento.
#[derive(Debug, Clone)]
pub struct OverlapTracker {
    used: Vec<bool>,
}

impl OverlapTracker {
    /// Cria o rastreador com todos os `n_tokens` livres.
    pub fn new(n_tokens: usize) -> Self {
        Self {
            used: vec![false; n_tokens],
        }
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    pub fn is_used(&self, index: usize) -> bool {
        self.used.get(index).copied().unwrap_or(false)
    }

    /// Todos os tokens do span estão livres e dentro do documento.
    pub fn is_free(&self, span: Span) -> bool {
        !span.is_empty()
            && span.end <= self.used.len()
            && self.used[span.range()].iter().all(|used| !used)
    }

    /// Reserva o span se ele estiver inteiramente livre.
    ///
    /// Retorna `true` quando a reserva aconteceu.
    pub fn try_reserve(&mut self, span: Span) -> bool {
        if !self.is_free(span) {
            return false;
        }
        for used in &mut self.used[span.range()] {
            *used = true;
        }
        true
    }

    /// Quantidade de tokens reservados.
    pub fn used_count(&self) -> usize {
        self.used.iter().filter(|used| **used).count()
    }
}

/// Estado privado de um documento durante o reconhecimento.
///
/// Reúne os tokens (somente leitura), o rastreador e os spans já
/// comprometidos. É criado por documento e descartado ao final.
#[derive(Debug)]
pub struct DocumentState<'a> {
    pub tokens: &'a [Token],
    pub tracker: OverlapTracker,
    pub committed: CommittedSpans,
}

impl<'a> DocumentState<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            tracker: OverlapTracker::new(tokens.len()),
            committed: CommittedSpans::new(),
        }
    }

    /// Reserva os tokens do span e o registra na categoria.
    ///
    /// Retorna `false` (sem efeito) se algum token já estiver reservado.
    pub fn commit(&mut self, category: EntityCategory, span: Span) -> bool {
        if !self.tracker.try_reserve(span) {
            return false;
        }
        self.committed.push(category, span);
        true
    }
}
