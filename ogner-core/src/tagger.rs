//! # Categorias de Entidade e Máquina de Estados BIO
//!
//! Define as quatro categorias do domínio e a máquina de estados finita que
//! reconstrói as *corridas* de entidade (sequências contíguas do mesmo tipo)
//! a partir das tags BIO atribuídas pelo anotador.
//!
//! ## Categorias
//!
//! | Categoria         | Significado                    | Exemplos                   |
//! |-------------------|--------------------------------|----------------------------|
//! | `equipment`       | Equipamento, fabricante, modelo| "Acme Pump", "F-150"       |
//! | `operations`      | Operação (verbo no dicionário) | "drill", "shut in"         |
//! | `properties`      | Modificador descritivo         | "centrifugal", "offshore"  |
//! | `property_values` | Medida ou quantidade           | "5 bar", "3%", "12kg"      |
//!
//! ## Transições
//!
//! | Estado atual          | Tag      | Próximo estado     | Emite corrida?   |
//! |-----------------------|----------|--------------------|------------------|
//! | `Idle`                | `O`      | `Idle`             | não              |
//! | `Idle`                | `B-T`/`I-T` | `Open(i, T)`    | não              |
//! | `Open(s, U)`          | `O`      | `Idle`             | sim, `[s, i)`    |
//! | `Open(s, U)`          | `B-T`    | `Open(i, T)`       | sim, `[s, i)`    |
//! | `Open(s, U)`          | `I-U`    | `Open(s, U)`       | não              |
//! | `Open(s, U)`          | `I-T`, T≠U | `Open(i, T)`     | sim, `[s, i)`    |
//!
//! No fim do documento, uma corrida aberta é emitida como `[s, n)`.

use serde::{Deserialize, Serialize};

use crate::span::Span;
use crate::token::{Iob, Token};

/// Categorias de entidade do domínio.
///
/// A ordem de declaração é a ordem de saída.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    /// **Equipamento**: organizações/produtos e identificadores alfanuméricos.
    Equipment,
    /// **Operações**: frases do dicionário centradas no verbo raiz.
    Operations,
    /// **Propriedades**: extensões descritivas em volta de um equipamento.
    Properties,
    /// **Valores de propriedade**: quantidades e medidas.
    PropertyValues,
}

impl EntityCategory {
    pub const COUNT: usize = 4;

    /// Todas as categorias na ordem de saída.
    pub fn all() -> [EntityCategory; 4] {
        [
            EntityCategory::Equipment,
            EntityCategory::Operations,
            EntityCategory::Properties,
            EntityCategory::PropertyValues,
        ]
    }

    /// Nome da categoria (para serialização e logs)
    pub fn name(&self) -> &'static str {
        match self {
            EntityCategory::Equipment => "equipment",
            EntityCategory::Operations => "operations",
            EntityCategory::Properties => "properties",
            EntityCategory::PropertyValues => "property_values",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            EntityCategory::Equipment => 0,
            EntityCategory::Operations => 1,
            EntityCategory::Properties => 2,
            EntityCategory::PropertyValues => 3,
        }
    }

    /// Mapeia o tipo de entidade do anotador (esquema OntoNotes) para o domínio.
    ///
    /// Tipos sem correspondência retornam `None` e a corrida é descartada.
    pub fn from_entity_type(ent_type: &str) -> Option<Self> {
        match ent_type {
            "ORG" | "PRODUCT" => Some(EntityCategory::Equipment),
            "QUANTITY" => Some(EntityCategory::PropertyValues),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Spans comprometidos de um documento, agrupados por categoria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommittedSpans {
    by_category: [Vec<Span>; EntityCategory::COUNT],
}

impl CommittedSpans {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: EntityCategory, span: Span) {
        self.by_category[category.index()].push(span);
    }

    pub fn get(&self, category: EntityCategory) -> &[Span] {
        &self.by_category[category.index()]
    }

    /// Total de spans em todas as categorias.
    pub fn total(&self) -> usize {
        self.by_category.iter().map(Vec::len).sum()
    }

    /// Itera `(categoria, span)` na ordem das categorias.
    pub fn iter(&self) -> impl Iterator<Item = (EntityCategory, Span)> + '_ {
        EntityCategory::all()
            .into_iter()
            .flat_map(move |cat| self.get(cat).iter().map(move |span| (cat, *span)))
    }
}

/// Uma corrida de entidade antes do aparo: `[span.start, span.end)` com o tipo do anotador.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRun {
    pub span: Span,
    pub ent_type: String,
}

/// Estado da máquina BIO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// Nenhuma corrida aberta.
    Idle,
    /// Corrida aberta desde `start` com o tipo `ent_type`.
    Open { start: usize, ent_type: String },
}

impl RunState {
    /// Aplica a tag do token `index` ao estado atual.
    ///
    /// Retorna o novo estado e, se a tag fechou uma corrida, a corrida fechada.
    pub fn step(self, index: usize, iob: Iob, ent_type: &str) -> (RunState, Option<EntityRun>) {
        match (self, iob) {
            (RunState::Idle, Iob::Outside) => (RunState::Idle, None),
            (RunState::Idle, Iob::Begin | Iob::Inside) => (RunState::open(index, ent_type), None),
            (RunState::Open { start, ent_type: open }, Iob::Outside) => {
                (RunState::Idle, Some(EntityRun::closed(start, index, open)))
            }
            (RunState::Open { start, ent_type: open }, Iob::Begin) => (
                RunState::open(index, ent_type),
                Some(EntityRun::closed(start, index, open)),
            ),
            (RunState::Open { start, ent_type: open }, Iob::Inside) => {
                if open == ent_type {
                    (RunState::Open { start, ent_type: open }, None)
                } else {
                    (
                        RunState::open(index, ent_type),
                        Some(EntityRun::closed(start, index, open)),
                    )
                }
            }
        }
    }

    /// Fecha a corrida pendente no fim do documento.
    pub fn finish(self, n_tokens: usize) -> Option<EntityRun> {
        match self {
            RunState::Idle => None,
            RunState::Open { start, ent_type } => Some(EntityRun::closed(start, n_tokens, ent_type)),
        }
    }

    fn open(start: usize, ent_type: &str) -> Self {
        RunState::Open {
            start,
            ent_type: ent_type.to_string(),
        }
    }
}

impl EntityRun {
    fn closed(start: usize, end: usize, ent_type: String) -> Self {
        EntityRun {
            span: Span::new(start, end),
            ent_type,
        }
    }
}

/// Reconstrói todas as corridas de entidade do documento, em ordem.
pub fn entity_runs(tokens: &[Token]) -> Vec<EntityRun> {
    let mut runs = Vec::new();
    let mut state = RunState::Idle;

    for (index, token) in tokens.iter().enumerate() {
        let (next, closed) = state.step(index, token.ent_iob, &token.ent_type);
        runs.extend(closed);
        state = next;
    }
    runs.extend(state.finish(tokens.len()));
    runs
}
