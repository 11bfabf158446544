//! # Corpus Bag-of-Words (formato UCI)
//!
//! Converte as listas de palavras-chave produzidas pelo
//! [`KeywordTokenizer`](crate::keywords::KeywordTokenizer) no corpus de
//! entrada do treinador de modelos de tópicos.
//!
//! ## Arquivos gerados
//!
//! - **docword**: três linhas de cabeçalho (número de documentos, tamanho do
//!   vocabulário, total de ocorrências), seguidas de uma linha
//!   `documento id_palavra contagem` por par (documento e id começam em 1).
//! - **vocab**: uma palavra por linha, na ordem dos ids.
//!
//! Os ids são atribuídos em ordem lexicográfica das palavras distintas.

use std::collections::BTreeMap;
use std::io::Write;

use tracing::info;

use crate::error::Result;

/// Corpus de contagens por documento.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BagOfWords {
    /// Contagens de cada documento não vazio.
    documents: Vec<BTreeMap<String, usize>>,
    /// Contagens globais; a ordem do mapa é a ordem dos ids.
    global: BTreeMap<String, usize>,
}

impl BagOfWords {
    /// Monta o corpus. Documentos sem palavras são ignorados.
    pub fn from_documents<I, D, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut corpus = BagOfWords::default();
        for document in documents {
            let mut counts = BTreeMap::new();
            for token in document {
                let token: String = token.into();
                *corpus.global.entry(token.clone()).or_insert(0) += 1;
                *counts.entry(token).or_insert(0) += 1;
            }
            if !counts.is_empty() {
                corpus.documents.push(counts);
            }
        }
        info!(
            "Corpus montado: {} documentos, {} palavras distintas",
            corpus.document_count(),
            corpus.vocabulary_size()
        );
        corpus
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.global.len()
    }

    /// Total de ocorrências de palavras no corpus.
    pub fn total_occurrences(&self) -> usize {
        self.global.values().sum()
    }

    /// Vocabulário na ordem dos ids (o id da posição `i` é `i + 1`).
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.global.keys().map(String::as_str)
    }

    /// Id (base 1) de uma palavra.
    pub fn token_id(&self, token: &str) -> Option<usize> {
        self.global.keys().position(|k| k == token).map(|i| i + 1)
    }

    /// Escreve o arquivo docword.
    pub fn write_docword<W: Write>(&self, mut writer: W) -> Result<()> {
        let ids: BTreeMap<&str, usize> = self
            .vocabulary()
            .enumerate()
            .map(|(i, token)| (token, i + 1))
            .collect();

        writeln!(writer, "{}", self.document_count())?;
        writeln!(writer, "{}", self.vocabulary_size())?;
        writeln!(writer, "{}", self.total_occurrences())?;
        for (doc_index, counts) in self.documents.iter().enumerate() {
            for (token, count) in counts {
                writeln!(writer, "{} {} {}", doc_index + 1, ids[token.as_str()], count)?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Escreve o arquivo vocab.
    pub fn write_vocab<W: Write>(&self, mut writer: W) -> Result<()> {
        for token in self.vocabulary() {
            writeln!(writer, "{token}")?;
        }
        writer.flush()?;
        Ok(())
    }
}
