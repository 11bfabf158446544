//! # Classificador de Frases do Dicionário
//!
//! Segundo estágio do NER. Cada ocorrência do dicionário de palavras-chave é
//! classificada pela composição gramatical dos seus tokens:
//!
//! 1. Se contém um **verbo** e algum token é a raiz sintática → `operations`.
//! 2. Senão, se contém um **substantivo** → `equipment`.
//! 3. Caso contrário, a ocorrência é descartada.
//!
//! Ocorrências que tocam tokens já reservados são rejeitadas antes da
//! classificação. As ocorrências chegam sem ordem garantida e podem se
//! sobrepor: a primeira a reservar vence.

use crate::span::Span;
use crate::tagger::EntityCategory;
use crate::token::{PosTag, Token};
use crate::tracker::DocumentState;

/// Decide a categoria de uma ocorrência pela composição dos tokens.
pub fn classify_phrase(tokens: &[Token]) -> Option<EntityCategory> {
    let is_noun = tokens.iter().any(|t| t.pos == PosTag::Noun);
    let is_verb = tokens.iter().any(|t| t.pos == PosTag::Verb);

    if is_verb && tokens.iter().any(Token::is_root) {
        return Some(EntityCategory::Operations);
    }
    if is_noun {
        return Some(EntityCategory::Equipment);
    }
    None
}

/// Executa o estágio sobre as ocorrências do dicionário, na ordem recebida.
pub fn classify_phrases(
    state: &mut DocumentState<'_>,
    matches: &[Span],
) -> Vec<(EntityCategory, Span)> {
    let mut committed = Vec::new();

    for &span in matches {
        if !state.tracker.is_free(span) {
            continue;
        }
        let Some(category) = classify_phrase(span.tokens(state.tokens)) else {
            continue;
        };
        if state.commit(category, span) {
            committed.push((category, span));
        }
    }

    committed
}
