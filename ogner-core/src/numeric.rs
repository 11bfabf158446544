//! # Classificador Numérico e de Medidas
//!
//! Último estágio do NER. Varre os tokens ainda livres à procura de símbolos
//! monetários ou de tokens com dígitos que não sejam números simples
//! ("5kg", "3%", "F-150", "X3000"). Inteiros e decimais puros não carregam
//! sinal de entidade sozinhos e são ignorados.
//!
//! Cada token aceito vira um span de um token:
//! - **medida** (`is_measure`) → `property_values`
//! - **identificador** → `equipment`

use crate::span::Span;
use crate::tagger::EntityCategory;
use crate::token::Token;
use crate::tracker::DocumentState;

/// Heurística de medida: `dígitos+ não-dígitos+`, sem dígito depois do sufixo.
///
/// - `"123"` → `true` (só dígitos)
/// - `"abc"` → `false` (começa com não-dígito)
/// - `"5kg"` → `true`
/// - `"5kg3"` → `false` (um dígito reaparece)
pub fn is_measure(text: &str) -> bool {
    let Some(first_non_digit) = text.chars().position(|c| !c.is_ascii_digit()) else {
        return true;
    };
    if first_non_digit == 0 {
        return false;
    }
    !text.chars().skip(first_non_digit).any(|c| c.is_ascii_digit())
}

/// O token carrega sinal numérico de entidade.
pub fn is_numeric_candidate(token: &Token) -> bool {
    token.is_currency
        || (token.text.chars().any(|c| c.is_ascii_digit()) && !token.is_digit && !token.like_num)
}

/// Executa o estágio sobre os tokens livres, em ordem.
pub fn classify_numeric(state: &mut DocumentState<'_>) -> Vec<(EntityCategory, Span)> {
    let mut committed = Vec::new();
    let tokens = state.tokens;

    for (index, token) in tokens.iter().enumerate() {
        if !is_numeric_candidate(token) {
            continue;
        }
        let category = if is_measure(&token.text) {
            EntityCategory::PropertyValues
        } else {
            EntityCategory::Equipment
        };
        let span = Span::single(index);
        if state.commit(category, span) {
            committed.push((category, span));
        }
    }

    committed
}
