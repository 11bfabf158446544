//! # Pré-processamento de Texto Bruto
//!
//! Limpeza aplicada aos documentos de origem antes do anotador externo.
//!
//! - **Normalização**: entidades HTML comuns decodificadas e tokens colados
//!   separados ("5:30" → "5: 30", "10%water" → "10% water").
//! - **Segmentação**: o [`OilAndGasPreprocessor`] divide um arquivo extraído
//!   de relatórios técnicos em parágrafos, descartando cabeçalhos, tabelas e
//!   outros fragmentos curtos.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::Result;

// Padrões constantes: um regex inválido aqui é erro de programação.
static GLUED_TOKENS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\w:\d",
        r"\d%\w",
        r"\w[\\/]\w",
        r".\w[\\/]",
        r"\w\+\w",
        r".\w\+\S",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("padrão de token colado inválido"))
    .collect()
});

static SPECIAL_SPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{00A0}\x{2002}\x{2003}\x{2004}\x{2005}\x{2006}\x{2009}\x{200A}\x{0}\r\n\t]+")
        .expect("padrão de espaço especial inválido")
});

static NUMERIC_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(\d+);").expect("padrão de entidade numérica inválido"));

/// Decodifica `&quot;`, `&gt;`, `&lt;` e insere um espaço depois do segundo
/// caractere de cada ocorrência dos padrões de tokens colados.
///
/// Os padrões são aplicados em sequência, cada um sobre o resultado do
/// anterior; a busca recomeça logo após a ocorrência tratada.
pub fn normalize_source_text(source: &str) -> String {
    let mut text = source
        .replace("&quot;", "\"")
        .replace("&gt;", ">")
        .replace("&lt;", "<");

    for pattern in GLUED_TOKENS.iter() {
        let mut pos = 0;
        while let Some((split, end)) = pattern.find_at(&text, pos).map(|m| {
            let split = m
                .as_str()
                .char_indices()
                .nth(2)
                .map_or(m.end(), |(offset, _)| m.start() + offset);
            (split, m.end())
        }) {
            text.insert(split, ' ');
            pos = end + 1;
        }
    }
    text
}

/// Divide um texto de origem em documentos prontos para anotação.
pub trait TextPreprocessor {
    fn split_texts(&self, source: &str) -> Vec<String>;

    /// Lê o arquivo (bytes UTF-8 inválidos são descartados) e o divide.
    fn texts_from_file(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = fs::read(path)?;
        let source: String = String::from_utf8_lossy(&bytes)
            .chars()
            .filter(|&c| c != char::REPLACEMENT_CHARACTER)
            .collect();
        Ok(self.split_texts(&source))
    }
}

/// Segmentador de relatórios de óleo e gás extraídos de PDF.
#[derive(Debug, Clone)]
pub struct OilAndGasPreprocessor {
    /// Linhas mais curtas invalidam o parágrafo inteiro.
    pub min_characters_in_line: usize,
    /// Parágrafos mais curtos são descartados.
    pub min_characters_in_text: usize,
}

impl Default for OilAndGasPreprocessor {
    fn default() -> Self {
        Self {
            min_characters_in_line: 20,
            min_characters_in_text: 200,
        }
    }
}

impl OilAndGasPreprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limpa uma linha já aparada e não vazia.
    fn clean_line(&self, line: &str) -> String {
        let line = normalize_source_text(line).trim().replace('\u{FB01}', "fi");
        let line = SPECIAL_SPACE.replace_all(&line, " ");
        NUMERIC_ENTITY
            .replace_all(line.trim(), |caps: &Captures| {
                caps[1]
                    .parse::<u32>()
                    .ok()
                    .and_then(char::from_u32)
                    .map_or_else(|| caps[0].to_string(), String::from)
            })
            .into_owned()
    }

    /// Junta as linhas de um parágrafo, ou `None` se ele for descartado.
    fn join_paragraph(&self, lines: &[String]) -> Option<String> {
        if lines.is_empty()
            || lines
                .iter()
                .any(|line| line.chars().count() < self.min_characters_in_line)
        {
            return None;
        }

        let mut text = lines[0].clone();
        for line in &lines[1..] {
            let hyphenated = text.ends_with('-')
                && text.chars().rev().nth(1).is_some_and(|c| !c.is_whitespace());
            if !hyphenated {
                text.push(' ');
            }
            text.push_str(line);
        }

        (text.chars().count() >= self.min_characters_in_text).then_some(text)
    }
}

impl TextPreprocessor for OilAndGasPreprocessor {
    fn split_texts(&self, source: &str) -> Vec<String> {
        let mut texts = Vec::new();
        let mut paragraph: Vec<String> = Vec::new();

        for raw in source.lines() {
            let raw = raw.trim();
            if raw.is_empty() {
                texts.extend(self.join_paragraph(&paragraph));
                paragraph.clear();
                continue;
            }
            let line = self.clean_line(raw);
            if !line.is_empty() {
                paragraph.push(line);
            }
        }
        texts.extend(self.join_paragraph(&paragraph));
        texts
    }
}
