//! # Seleção de Palavras-Chave por Tópicos
//!
//! O treinador do modelo de tópicos é externo: ele consome o corpus gerado por
//! [`BagOfWords`](crate::corpus::BagOfWords) e devolve, para cada tópico, a
//! probabilidade de cada palavra do vocabulário. Este módulo reduz essa
//! tabela à lista de palavras-chave que alimenta o [`PhraseDictionary`].
//!
//! [`PhraseDictionary`]: crate::dictionary::PhraseDictionary

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

/// Tabela tópico × palavra produzida pelo treinador.
///
/// `topics[t][w]` é a probabilidade da palavra `vocabulary[w]` no tópico `t`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicWordTable {
    pub vocabulary: Vec<String>,
    pub topics: Vec<Vec<f64>>,
}

impl TopicWordTable {
    pub fn new(vocabulary: Vec<String>, topics: Vec<Vec<f64>>) -> Self {
        Self { vocabulary, topics }
    }

    pub fn number_of_topics(&self) -> usize {
        self.topics.len()
    }
}

/// Palavras com probabilidade `>= threshold` em algum tópico.
///
/// Os `_` das palavras compostas viram espaços ("gas_lift" → "gas lift").
/// O resultado é ordenado e sem repetições; uma lista vazia é erro fatal.
pub fn select_keywords(table: &TopicWordTable, threshold: f64) -> Result<Vec<String>> {
    let mut keywords = BTreeSet::new();
    for distribution in &table.topics {
        for (token, &probability) in table.vocabulary.iter().zip(distribution) {
            if probability >= threshold {
                keywords.insert(token.replace('_', " "));
            }
        }
    }

    if keywords.is_empty() {
        return Err(Error::EmptyKeywords);
    }
    info!(
        "{} palavras-chave selecionadas de {} tópicos (limiar {threshold})",
        keywords.len(),
        table.number_of_topics()
    );
    Ok(keywords.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TopicWordTable {
        TopicWordTable::new(
            vec!["pump".into(), "gas_lift".into(), "rig".into()],
            vec![vec![0.5, 0.009, 0.01], vec![0.2, 0.7, 0.0]],
        )
    }

    #[test]
    fn test_union_over_topics() {
        let keywords = select_keywords(&table(), 0.01).unwrap();
        assert_eq!(keywords, vec!["gas lift", "pump", "rig"]);
    }

    #[test]
    fn test_higher_threshold() {
        let keywords = select_keywords(&table(), 0.6).unwrap();
        assert_eq!(keywords, vec!["gas lift"]);
    }

    #[test]
    fn test_empty_selection_is_fatal() {
        assert!(matches!(select_keywords(&table(), 0.9), Err(Error::EmptyKeywords)));
        assert!(matches!(
            select_keywords(&TopicWordTable::default(), 0.01),
            Err(Error::EmptyKeywords)
        ));
    }

    #[test]
    fn test_table_from_json() {
        let table: TopicWordTable = serde_json::from_str(
            r#"{"vocabulary": ["choke"], "topics": [[0.3], [0.1]]}"#,
        )
        .unwrap();
        assert_eq!(table.number_of_topics(), 2);
        assert_eq!(select_keywords(&table, 0.2).unwrap(), vec!["choke"]);
    }
}
