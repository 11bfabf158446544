//! # Erros de Configuração e de I/O
//!
//! O motor em si nunca falha por documento: documentos vazios e conflitos de
//! sobreposição são tratados como casos normais. Os erros deste módulo são
//! **pré-condições** verificadas antes do primeiro documento (dicionário
//! ausente ou vazio, parâmetros de tópicos inválidos, JSON malformado).

use std::path::PathBuf;

use thiserror::Error;

/// Tipo `Result` usado em todo o crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Erros fatais do sistema.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Falha de leitura ou escrita (ex: arquivo de dicionário inexistente).
    #[error("erro de I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Documento ou arquivo de configuração com JSON inválido.
    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),

    /// O dicionário de palavras-chave não contém nenhuma entrada.
    #[error("o dicionário de palavras-chave `{}` está vazio", .0.display())]
    EmptyDictionary(PathBuf),

    /// A seleção a partir do modelo de tópicos não produziu palavras-chave.
    #[error("a lista de palavras-chave está vazia")]
    EmptyKeywords,

    /// Parâmetro de configuração fora do domínio válido.
    #[error("configuração inválida: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Cria um erro de configuração inválida.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}
