//! # Execução em Lote do Caminho de Palavras-Chave
//!
//! Encadeia as etapas offline que produzem o dicionário usado pelo NER:
//!
//! 1. **Preparação**: arquivos brutos → textos limpos ([`prepare_texts`]),
//!    entregues ao anotador externo.
//! 2. **Corpus**: documentos anotados → palavras-chave → arquivos
//!    `docword.<nome>.txt` e `vocab.<nome>.txt` ([`KeywordBatch::write_corpus`]).
//! 3. **Seleção**: tabela tópico × palavra do treinador externo → lista de
//!    palavras-chave, uma por linha ([`KeywordBatch::select_keywords`]).
//!
//! A configuração é validada ao criar o [`KeywordBatch`], antes do primeiro
//! documento.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::corpus::BagOfWords;
use crate::error::Result;
use crate::keywords::KeywordTokenizer;
use crate::preprocess::TextPreprocessor;
use crate::token::AnnotatedDocument;
use crate::topics::{select_keywords, TopicWordTable};

/// Lê um arquivo JSON com uma lista de documentos anotados.
pub fn read_documents(path: impl AsRef<Path>) -> Result<Vec<AnnotatedDocument>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Lê a tabela tópico × palavra (JSON) produzida pelo treinador.
pub fn read_topic_table(path: impl AsRef<Path>) -> Result<TopicWordTable> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Divide cada arquivo de origem em textos, na ordem dos arquivos.
pub fn prepare_texts<P: TextPreprocessor>(preprocessor: &P, sources: &[PathBuf]) -> Result<Vec<String>> {
    let mut texts = Vec::new();
    for source in sources {
        let before = texts.len();
        texts.extend(preprocessor.texts_from_file(source)?);
        info!("`{}`: {} textos", source.display(), texts.len() - before);
    }
    Ok(texts)
}

/// Caminhos dos arquivos do corpus gravados.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusFiles {
    pub docword: PathBuf,
    pub vocab: PathBuf,
}

/// Caminho de palavras-chave com uma configuração já validada.
#[derive(Debug, Clone)]
pub struct KeywordBatch {
    config: EngineConfig,
    tokenizer: KeywordTokenizer,
}

impl KeywordBatch {
    /// Valida a configuração; parâmetros inválidos são erro fatal.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let tokenizer = KeywordTokenizer::new(config.keywords);
        Ok(Self { config, tokenizer })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tokeniza os documentos (em paralelo) e monta o corpus.
    pub fn build_corpus(&self, docs: &[AnnotatedDocument]) -> BagOfWords {
        BagOfWords::from_documents(self.tokenizer.tokenize_corpus(docs))
    }

    /// Grava `docword.<name>.txt` e `vocab.<name>.txt` em `dir`.
    pub fn write_corpus(&self, corpus: &BagOfWords, dir: &Path, name: &str) -> Result<CorpusFiles> {
        fs::create_dir_all(dir)?;
        let files = CorpusFiles {
            docword: dir.join(format!("docword.{name}.txt")),
            vocab: dir.join(format!("vocab.{name}.txt")),
        };
        corpus.write_docword(BufWriter::new(File::create(&files.docword)?))?;
        corpus.write_vocab(BufWriter::new(File::create(&files.vocab)?))?;
        info!(
            "Corpus gravado em `{}` e `{}`",
            files.docword.display(),
            files.vocab.display()
        );
        Ok(files)
    }

    /// Seleciona as palavras-chave com o limiar da configuração.
    pub fn select_keywords(&self, table: &TopicWordTable) -> Result<Vec<String>> {
        let topics = &self.config.topics;
        if table.number_of_topics() != topics.number_of_topics {
            warn!(
                "A tabela tem {} tópicos, a configuração pede {}",
                table.number_of_topics(),
                topics.number_of_topics
            );
        }
        select_keywords(table, topics.probability_threshold)
    }
}

/// Grava uma palavra-chave por linha (formato lido por
/// [`PhraseDictionary::from_file`](crate::dictionary::PhraseDictionary::from_file)).
pub fn write_keywords(keywords: &[String], path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for keyword in keywords {
        writeln!(writer, "{keyword}")?;
    }
    writer.flush()?;
    info!("{} palavras-chave gravadas em `{}`", keywords.len(), path.display());
    Ok(())
}
