//! # ogner-core — Motor de Fusão e Classificação de Spans
//!
//! Este crate extrai entidades de domínio (óleo e gás) e palavras-chave de
//! documentos já anotados por um analisador linguístico externo. O problema
//! central é transformar vários candidatos de span, possivelmente
//! conflitantes, num único conjunto de spans tipados e sem sobreposição.
//!
//! ## Arquitetura do Sistema
//!
//! Dois consumidores compartilham as mesmas primitivas ([`span`], [`tracker`], [`tagger`]):
//!
//! 1.  **Caminho NER** ([`pipeline`]): documento anotado → entidades base
//!     ([`entities`]) → frases do dicionário ([`phrases`]) → expansão por
//!     dependência ([`expansion`]) → medidas e identificadores ([`numeric`])
//!     → offsets de caractere por categoria.
//! 2.  **Caminho de palavras-chave** ([`keywords`]): documento anotado →
//!     lista plana de frases canônicas → corpus bag-of-words ([`corpus`]).
//!
//! Em volta do motor ficam o pré-processamento do texto bruto ([`preprocess`]),
//! o dicionário de frases ([`dictionary`]) e a seleção de palavras-chave a
//! partir do modelo de tópicos ([`topics`]). O módulo [`batch`] encadeia o
//! caminho de palavras-chave de ponta a ponta.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use ogner_core::{AnnotatedDocument, NerPipeline};
//!
//! let json = r#"{
//!     "text": "Acme Pump",
//!     "tokens": [
//!         {"index": 0, "text": "Acme", "norm": "acme", "pos": "PROPN", "ent_iob": "B", "ent_type": "ORG",
//!          "left_edge": 0, "right_edge": 0, "idx": 0},
//!         {"index": 1, "text": "Pump", "norm": "pump", "pos": "PROPN", "ent_iob": "I", "ent_type": "ORG",
//!          "left_edge": 0, "right_edge": 1, "idx": 5}
//!     ]
//! }"#;
//! let doc: AnnotatedDocument = serde_json::from_str(json).unwrap();
//!
//! let entities = NerPipeline::new().recognize(&doc);
//! assert_eq!(entities.equipment, vec![(0, 9)]);
//!
//! // O caminho de palavras-chave depende de `norm`.
//! let keywords = ogner_core::KeywordTokenizer::default().tokenize(&doc);
//! assert_eq!(keywords, vec!["acme_pump"]);
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: Orquestrador que conecta os quatro estágios e emite eventos.
//! - [`token`]: Contrato dos tokens entregues pelo anotador.
//! - [`config`]: Parâmetros da execução, carregados de JSON.

pub mod batch;
pub mod config;
pub mod corpus;
pub mod dictionary;
pub mod entities;
pub mod error;
pub mod expansion;
pub mod keywords;
pub mod numeric;
pub mod phrases;
pub mod pipeline;
pub mod preprocess;
pub mod span;
pub mod tagger;
pub mod token;
pub mod topics;
pub mod tracker;

#[cfg(test)]
mod testing;

pub use batch::{CorpusFiles, KeywordBatch};
pub use config::{EngineConfig, KeywordConfig, TopicConfig};
pub use corpus::BagOfWords;
pub use dictionary::PhraseDictionary;
pub use error::{Error, Result};
pub use keywords::KeywordTokenizer;
pub use pipeline::{NamedEntities, NerPipeline, PipelineEvent, Stage};
pub use preprocess::{normalize_source_text, OilAndGasPreprocessor, TextPreprocessor};
pub use span::Span;
pub use tagger::EntityCategory;
pub use token::{AnnotatedDocument, Iob, PosTag, Token};
pub use topics::{select_keywords, TopicWordTable};
