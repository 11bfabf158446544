//! # Pipeline NER — Orquestrador com Eventos Observáveis
//!
//! O pipeline aplica os quatro estágios do motor sobre um documento anotado e
//! emite eventos em cada passo via um canal Rust (`mpsc`), permitindo que o
//! servidor WebSocket transmita o progresso em tempo real para o cliente.
//!
//! ## Estágios (ordem fixa)
//!
//! 1. [`Stage::BaseEntities`]: corridas BIO mapeadas para categorias.
//! 2. [`Stage::DictionaryPhrases`]: ocorrências do dicionário (operações ou equipamentos).
//! 3. [`Stage::DependencyExpansion`]: propriedades em volta dos equipamentos.
//! 4. [`Stage::Numeric`]: medidas e identificadores alfanuméricos.
//!
//! Todos compartilham o mesmo [`DocumentState`]; o número de tokens usados
//! nunca diminui de um estágio para o seguinte.

use std::borrow::Cow;
use std::sync::mpsc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dictionary::PhraseDictionary;
use crate::entities::consolidate_entities;
use crate::expansion::expand_equipment;
use crate::numeric::classify_numeric;
use crate::phrases::classify_phrases;
use crate::span::Span;
use crate::tagger::{CommittedSpans, EntityCategory};
use crate::token::{AnnotatedDocument, Token};
use crate::tracker::DocumentState;

/// Estágio do motor que comprometeu um span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    BaseEntities,
    DictionaryPhrases,
    DependencyExpansion,
    Numeric,
}

impl Stage {
    /// Estágios na ordem de execução.
    pub const ALL: [Stage; 4] = [
        Stage::BaseEntities,
        Stage::DictionaryPhrases,
        Stage::DependencyExpansion,
        Stage::Numeric,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::BaseEntities => "base_entities",
            Stage::DictionaryPhrases => "dictionary_phrases",
            Stage::DependencyExpansion => "dependency_expansion",
            Stage::Numeric => "numeric",
        }
    }
}

/// Resultado do caminho NER: offsets de caractere `(início, fim)` por categoria.
///
/// Serializa como objeto JSON com as quatro chaves sempre presentes, nesta
/// ordem, e cada lista ordenada de forma crescente.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntities {
    pub equipment: Vec<(usize, usize)>,
    pub operations: Vec<(usize, usize)>,
    pub properties: Vec<(usize, usize)>,
    pub property_values: Vec<(usize, usize)>,
}

impl NamedEntities {
    /// Converte os spans de tokens em offsets de caractere e ordena cada categoria.
    pub fn from_committed(tokens: &[Token], committed: &CommittedSpans) -> Self {
        let mut entities = NamedEntities::default();
        for (category, span) in committed.iter() {
            if let Some(offsets) = char_offsets(tokens, span) {
                entities.get_mut(category).push(offsets);
            }
        }
        for category in EntityCategory::all() {
            entities.get_mut(category).sort_unstable();
        }
        entities
    }

    pub fn get(&self, category: EntityCategory) -> &[(usize, usize)] {
        match category {
            EntityCategory::Equipment => &self.equipment,
            EntityCategory::Operations => &self.operations,
            EntityCategory::Properties => &self.properties,
            EntityCategory::PropertyValues => &self.property_values,
        }
    }

    fn get_mut(&mut self, category: EntityCategory) -> &mut Vec<(usize, usize)> {
        match category {
            EntityCategory::Equipment => &mut self.equipment,
            EntityCategory::Operations => &mut self.operations,
            EntityCategory::Properties => &mut self.properties,
            EntityCategory::PropertyValues => &mut self.property_values,
        }
    }

    /// Total de entidades em todas as categorias.
    pub fn total(&self) -> usize {
        EntityCategory::all().iter().map(|&cat| self.get(cat).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Offset inicial do primeiro token e final do último token do span.
fn char_offsets(tokens: &[Token], span: Span) -> Option<(usize, usize)> {
    let members = span.tokens(tokens);
    let first = members.first()?;
    let last = members.last()?;
    Some((first.idx, last.end_offset()))
}

/// Eventos emitidos pelo pipeline durante o processamento.
///
/// Cada variante carrega os dados necessários para renderizar uma etapa da
/// visualização.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    /// **Início**: documento recebido.
    Started { total_tokens: usize },
    /// Um span foi comprometido (índices de token, `[start, end)`).
    SpanCommitted {
        category: EntityCategory,
        start: usize,
        end: usize,
        stage: Stage,
    },
    /// Fim de um estágio, com o total de tokens usados até aqui.
    StageFinished {
        stage: Stage,
        committed: usize,
        used_tokens: usize,
    },
    /// **Conclusão**: entidades finais e estatísticas de tempo.
    Done {
        entities: NamedEntities,
        total_tokens: usize,
        processing_ms: u64,
    },
}

/// O pipeline NER principal.
///
/// Guarda apenas o dicionário de frases, somente leitura; todo o estado de
/// um documento vive no [`DocumentState`] criado a cada chamada. Por isso a
/// mesma instância atende várias threads ao mesmo tempo.
///
/// # Modos de Uso
/// - **Sync**: [`NerPipeline::recognize`] para scripts e chamadas diretas.
/// - **Streaming**: [`NerPipeline::recognize_streaming`] para UIs reativas (via WebSocket).
/// - **Lote**: [`NerPipeline::recognize_batch`] processa documentos em paralelo.
#[derive(Debug, Clone, Default)]
pub struct NerPipeline {
    dictionary: Option<PhraseDictionary>,
}

impl NerPipeline {
    /// Pipeline sem dicionário: usa apenas as ocorrências que vêm no documento.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline que localiza as ocorrências do dicionário quando o
    /// documento não traz nenhuma.
    pub fn with_dictionary(dictionary: PhraseDictionary) -> Self {
        Self {
            dictionary: Some(dictionary),
        }
    }

    pub fn dictionary(&self) -> Option<&PhraseDictionary> {
        self.dictionary.as_ref()
    }

    /// Processa o documento de forma síncrona e retorna o resultado final.
    pub fn recognize(&self, doc: &AnnotatedDocument) -> NamedEntities {
        let (tx, rx) = mpsc::channel();
        self.recognize_streaming(doc, tx);

        let mut entities = NamedEntities::default();
        while let Ok(event) = rx.recv() {
            if let PipelineEvent::Done { entities: done, .. } = event {
                entities = done;
            }
        }
        entities
    }

    /// Processa vários documentos em paralelo, preservando a ordem.
    pub fn recognize_batch(&self, docs: &[AnnotatedDocument]) -> Vec<NamedEntities> {
        docs.par_iter().map(|doc| self.recognize(doc)).collect()
    }

    /// Executa o pipeline enviando eventos de progresso em tempo real.
    ///
    /// # Fluxo de Eventos
    /// 1. `Started`: total de tokens.
    /// 2. Para cada estágio: um `SpanCommitted` por span e um `StageFinished`.
    /// 3. `Done`: resultado final consolidado.
    ///
    /// Documentos vazios ou só com espaços pulam direto para `Done`.
    pub fn recognize_streaming(&self, doc: &AnnotatedDocument, tx: mpsc::Sender<PipelineEvent>) {
        let start = Instant::now();
        let total_tokens = doc.tokens.len();
        let _ = tx.send(PipelineEvent::Started { total_tokens });

        if doc.is_blank() {
            let _ = tx.send(PipelineEvent::Done {
                entities: NamedEntities::default(),
                total_tokens,
                processing_ms: start.elapsed().as_millis() as u64,
            });
            return;
        }

        let matches = self.phrase_matches(doc);
        let mut state = DocumentState::new(&doc.tokens);

        for stage in Stage::ALL {
            let committed = match stage {
                Stage::BaseEntities => consolidate_entities(&mut state),
                Stage::DictionaryPhrases => classify_phrases(&mut state, &matches),
                Stage::DependencyExpansion => expand_equipment(&mut state),
                Stage::Numeric => classify_numeric(&mut state),
            };

            for &(category, span) in &committed {
                let _ = tx.send(PipelineEvent::SpanCommitted {
                    category,
                    start: span.start,
                    end: span.end,
                    stage,
                });
            }

            let used_tokens = state.tracker.used_count();
            debug!(
                "estágio {}: {} spans, {}/{} tokens usados",
                stage.name(),
                committed.len(),
                used_tokens,
                total_tokens
            );
            let _ = tx.send(PipelineEvent::StageFinished {
                stage,
                committed: committed.len(),
                used_tokens,
            });
        }

        let _ = tx.send(PipelineEvent::Done {
            entities: NamedEntities::from_committed(&doc.tokens, &state.committed),
            total_tokens,
            processing_ms: start.elapsed().as_millis() as u64,
        });
    }

    /// Ocorrências do documento; sem elas, as do dicionário (se houver).
    fn phrase_matches<'d>(&self, doc: &'d AnnotatedDocument) -> Cow<'d, [Span]> {
        match &self.dictionary {
            Some(dictionary) if doc.phrase_matches.is_empty() => {
                Cow::Owned(dictionary.find_matches(&doc.tokens))
            }
            _ => Cow::Borrowed(&doc.phrase_matches),
        }
    }
}
