//! # Configuração
//!
//! Parâmetros que valem para todos os documentos de uma execução. São
//! validados uma única vez, antes do primeiro documento: um parâmetro fora do
//! domínio é erro fatal, nunca uma falha por documento.
//!
//! ## Exemplo (JSON)
//!
//! ```json
//! {
//!   "keywords_dictionary": "data/keywords.txt",
//!   "keywords": { "extract_noun_phrases": true, "extract_root_verbs": false },
//!   "topics": { "number_of_topics": 50, "probability_threshold": 0.01 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Quais fontes de candidatos o tokenizador de palavras-chave usa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Inclui os sintagmas nominais (noun chunks).
    pub extract_noun_phrases: bool,
    /// Inclui os tokens raiz da árvore de dependência.
    pub extract_root_verbs: bool,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            extract_noun_phrases: true,
            extract_root_verbs: false,
        }
    }
}

/// Parâmetros da seleção de palavras-chave a partir do modelo de tópicos.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    pub number_of_topics: usize,
    /// Probabilidade mínima de uma palavra num tópico.
    pub probability_threshold: f64,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            number_of_topics: 50,
            probability_threshold: 1e-2,
        }
    }
}

impl TopicConfig {
    pub fn validate(&self) -> Result<()> {
        if self.number_of_topics <= 1 {
            return Err(Error::invalid_config(format!(
                "{} é um número de tópicos pequeno demais",
                self.number_of_topics
            )));
        }
        if !(self.probability_threshold > 0.0) {
            return Err(Error::invalid_config(format!(
                "{} é um limiar de probabilidade pequeno demais",
                self.probability_threshold
            )));
        }
        if !(self.probability_threshold < 1.0) {
            return Err(Error::invalid_config(format!(
                "{} é um limiar de probabilidade grande demais",
                self.probability_threshold
            )));
        }
        Ok(())
    }
}

/// Configuração completa do motor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Arquivo com uma palavra-chave por linha.
    pub keywords_dictionary: Option<PathBuf>,
    pub keywords: KeywordConfig,
    pub topics: TopicConfig,
}

impl EngineConfig {
    /// Lê e valida a configuração de um arquivo JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.topics.validate()?;
        if let Some(path) = &self.keywords_dictionary {
            if path.as_os_str().is_empty() {
                return Err(Error::invalid_config("caminho do dicionário vazio"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert!(config.keywords.extract_noun_phrases);
        assert!(!config.keywords.extract_root_verbs);
        assert_eq!(config.topics.number_of_topics, 50);
        assert_eq!(config.keywords_dictionary, None);
    }

    #[test]
    fn test_partial_sections() {
        let config = EngineConfig::from_json(
            r#"{"keywords": {"extract_root_verbs": true}, "keywords_dictionary": "kw.txt"}"#,
        )
        .unwrap();
        assert!(config.keywords.extract_noun_phrases);
        assert!(config.keywords.extract_root_verbs);
        assert_eq!(config.keywords_dictionary, Some(PathBuf::from("kw.txt")));
    }

    #[test]
    fn test_invalid_topics() {
        let too_few = TopicConfig { number_of_topics: 1, ..TopicConfig::default() };
        assert!(matches!(too_few.validate(), Err(Error::InvalidConfig(_))));

        for threshold in [0.0, 1.0, -0.5, f64::NAN] {
            let config = TopicConfig { probability_threshold: threshold, ..TopicConfig::default() };
            assert!(config.validate().is_err(), "limiar {threshold} deveria ser rejeitado");
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(EngineConfig::from_json("{"), Err(Error::Json(_))));
        assert!(matches!(
            EngineConfig::from_json(r#"{"topics": {"number_of_topics": 0}}"#),
            Err(Error::InvalidConfig(_))
        ));
    }
}
