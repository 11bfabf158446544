//! # Consolidador de Entidades Base
//!
//! Primeiro estágio do NER: transforma as tags BIO do anotador em spans de
//! domínio. Cada corrida de entidade é aparada, mapeada para uma categoria
//! (`ORG`/`PRODUCT` → `equipment`, `QUANTITY` → `property_values`) e reservada.
//! Corridas sem categoria, vazias após o aparo ou que tocam tokens já
//! reservados são descartadas sem aviso.

use crate::span::{trim_span, Span};
use crate::tagger::{entity_runs, EntityCategory};
use crate::tracker::DocumentState;

/// Executa o estágio e retorna os spans comprometidos, em ordem.
pub fn consolidate_entities(state: &mut DocumentState<'_>) -> Vec<(EntityCategory, Span)> {
    let mut committed = Vec::new();

    for run in entity_runs(state.tokens) {
        let Some(span) = trim_span(state.tokens, run.span) else {
            continue;
        };
        let Some(category) = EntityCategory::from_entity_type(&run.ent_type) else {
            continue;
        };
        if state.commit(category, span) {
            committed.push((category, span));
        }
    }

    committed
}
