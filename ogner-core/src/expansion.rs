//! # Expansor de Fronteiras por Dependência
//!
//! Terceiro estágio do NER. Para cada span `equipment` `[l, r)`, percorre as
//! bordas das subárvores de dependência dos seus tokens e encontra o maior
//! intervalo envolvente `[left, right)`. Os pedaços que sobram de cada lado
//! viram candidatos a `properties`:
//!
//! - **esquerda** `[left, l)`: precisa de um token NOUN/PROPN;
//! - **direita** `[r, right)`: precisa de um token NOUN/PROPN/ADJ.
//!
//! Em ambos os lados é obrigatório haver ao menos uma palavra que não seja
//! stop-word e todos os tokens precisam estar livres. A assimetria entre os
//! lados é mantida tal como observada nos dados de treino.
//!
//! ## Exemplo
//! "the offshore **compressor** station": o modificador "offshore" e o
//! núcleo "station" pertencem à subárvore de "compressor". "offshore" só
//! entra pela esquerda se for NOUN/PROPN; "station" entra pela direita.

use crate::span::Span;
use crate::tagger::EntityCategory;
use crate::token::{PosTag, Token};
use crate::tracker::DocumentState;

/// Intervalo envolvente das subárvores de dependência dos tokens do span.
pub fn dependency_bounds(tokens: &[Token], span: Span) -> Span {
    let (left, right) = span
        .tokens(tokens)
        .iter()
        .fold((span.start, span.end), |(left, right), token| {
            (left.min(token.left_edge), right.max(token.right_edge + 1))
        });
    Span::new(left, right.min(tokens.len()))
}

fn is_admissible(tokens: &[Token], allow_adjective: bool) -> bool {
    let has_head = tokens
        .iter()
        .any(|t| t.pos.is_nominal() || (allow_adjective && t.pos == PosTag::Adj));
    let has_content = tokens.iter().any(|t| !t.is_stop);
    has_head && has_content
}

/// Executa o estágio sobre os spans `equipment` existentes.
///
/// Os `properties` criados aqui não disparam novas expansões.
pub fn expand_equipment(state: &mut DocumentState<'_>) -> Vec<(EntityCategory, Span)> {
    let mut committed = Vec::new();
    let equipment = state.committed.get(EntityCategory::Equipment).to_vec();

    for span in equipment {
        let bounds = dependency_bounds(state.tokens, span);

        let left = Span::new(bounds.start, span.start);
        if !left.is_empty()
            && is_admissible(left.tokens(state.tokens), false)
            && state.commit(EntityCategory::Properties, left)
        {
            committed.push((EntityCategory::Properties, left));
        }

        let right = Span::new(span.end, bounds.end);
        if !right.is_empty()
            && is_admissible(right.tokens(state.tokens), true)
            && state.commit(EntityCategory::Properties, right)
        {
            committed.push((EntityCategory::Properties, right));
        }
    }

    committed
}
