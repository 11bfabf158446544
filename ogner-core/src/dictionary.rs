//! # Dicionário de Palavras-Chave
//!
//! Carrega a lista de palavras-chave do domínio (uma por linha), expande cada
//! entrada nas variações de caixa que aparecem em textos técnicos e localiza
//! as ocorrências numa sequência de tokens.
//!
//! ## Variações geradas para "gas lift valve"
//! - `gas lift valve` (minúsculas)
//! - `GAS LIFT VALVE` (maiúsculas)
//! - `Gas Lift Valve` (título por palavra e título da linha inteira)
//!
//! As variações ficam ordenadas por tamanho decrescente e depois em ordem
//! lexicográfica, de modo que frases mais longas tenham precedência.

use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::span::Span;
use crate::token::Token;

/// Dicionário somente leitura, compartilhado entre documentos.
#[derive(Debug, Clone, Default)]
pub struct PhraseDictionary {
    /// Formas de superfície, da mais longa para a mais curta.
    entries: Vec<String>,
    /// Formas de superfície separadas em palavras, para casamento por tokens.
    phrases: HashSet<Vec<String>>,
    /// Maior frase em número de palavras.
    max_words: usize,
}

impl PhraseDictionary {
    /// Constrói o dicionário a partir de palavras-chave já em memória.
    pub fn from_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut forms = BTreeSet::new();
        for keyword in keywords {
            let line = keyword.as_ref().trim().to_lowercase();
            if line.is_empty() {
                continue;
            }
            forms.insert(line.to_uppercase());
            forms.insert(
                line.split_whitespace()
                    .map(title_case)
                    .collect::<Vec<_>>()
                    .join(" "),
            );
            forms.insert(title_case(&line));
            forms.insert(line);
        }

        let mut entries: Vec<String> = forms.into_iter().collect();
        entries.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });

        let phrases: HashSet<Vec<String>> = entries
            .iter()
            .map(|entry| entry.split_whitespace().map(str::to_string).collect())
            .collect();
        let max_words = phrases.iter().map(Vec::len).max().unwrap_or(0);

        Self {
            entries,
            phrases,
            max_words,
        }
    }

    /// Lê uma palavra-chave por linha.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut keywords = Vec::new();
        for line in reader.lines() {
            keywords.push(line?);
        }
        Ok(Self::from_keywords(keywords))
    }

    /// Carrega o dicionário de um arquivo.
    ///
    /// Arquivo inexistente ou sem nenhuma palavra-chave é erro fatal.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let dictionary = Self::from_reader(BufReader::new(File::open(path)?))?;
        if dictionary.is_empty() {
            return Err(Error::EmptyDictionary(path.to_path_buf()));
        }
        info!(
            "Dicionário `{}` carregado: {} formas de superfície",
            path.display(),
            dictionary.len()
        );
        Ok(dictionary)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Formas de superfície na ordem de precedência.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Localiza todas as ocorrências (casamento exato do texto dos tokens).
    ///
    /// O resultado vem ordenado por início e, no mesmo início, da frase mais
    /// longa para a mais curta. Ocorrências podem se sobrepor.
    pub fn find_matches(&self, tokens: &[Token]) -> Vec<Span> {
        let mut matches = Vec::new();
        if self.max_words == 0 {
            return matches;
        }

        for start in 0..tokens.len() {
            let longest = self.max_words.min(tokens.len() - start);
            for len in (1..=longest).rev() {
                let candidate: Vec<String> = tokens[start..start + len]
                    .iter()
                    .map(|t| t.text.clone())
                    .collect();
                if self.phrases.contains(&candidate) {
                    matches.push(Span::new(start, start + len));
                }
            }
        }
        matches
    }
}

/// Caixa de título: maiúscula após qualquer não-letra, minúsculas no resto.
///
/// "f-150 pump" → "F-150 Pump"
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::DocBuilder;
    use crate::token::PosTag;

    #[test]
    fn test_case_expansion() {
        let dict = PhraseDictionary::from_keywords(["  Gas Lift valve "]);
        assert_eq!(
            dict.entries(),
            &["GAS LIFT VALVE", "Gas Lift Valve", "gas lift valve"]
        );
    }

    #[test]
    fn test_sorted_by_length_then_lexicographic() {
        let dict = PhraseDictionary::from_keywords(["rig", "pump", "", "mud pump"]);
        let entries = dict.entries();
        assert_eq!(entries[0], "MUD PUMP");
        assert_eq!(entries[1], "Mud Pump");
        assert_eq!(entries[2], "mud pump");
        assert_eq!(&entries[3..6], &["PUMP", "Pump", "pump"]);
        assert_eq!(&entries[6..], &["RIG", "Rig", "rig"]);
    }

    #[test]
    fn test_title_case_after_non_letters() {
        assert_eq!(title_case("f-150 pump"), "F-150 Pump");
        assert_eq!(title_case("o'ring"), "O'Ring");
        assert_eq!(title_case("x3000b"), "X3000B");
    }

    #[test]
    fn test_find_matches_longest_first() {
        let dict = PhraseDictionary::from_keywords(["gas lift", "gas lift valve", "valve"]);
        let doc = DocBuilder::new()
            .token("the", PosTag::Det)
            .token("Gas", PosTag::Noun)
            .token("Lift", PosTag::Noun)
            .token("Valve", PosTag::Noun)
            .build();
        assert_eq!(
            dict.find_matches(&doc.tokens),
            vec![Span::new(1, 4), Span::new(1, 3), Span::new(3, 4)]
        );
    }

    #[test]
    fn test_mixed_case_is_not_matched() {
        let dict = PhraseDictionary::from_keywords(["mud pump"]);
        let doc = DocBuilder::new()
            .token("mud", PosTag::Noun)
            .token("PUMP", PosTag::Noun)
            .build();
        assert!(dict.find_matches(&doc.tokens).is_empty());
    }

    #[test]
    fn test_from_reader_skips_blank_lines() {
        let dict = PhraseDictionary::from_reader("choke\n\n  \nblowout preventer\n".as_bytes()).unwrap();
        assert_eq!(dict.len(), 6);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PhraseDictionary::from_file("/nonexistent/keywords.txt").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_empty_file_is_fatal() {
        let path = std::env::temp_dir().join(format!("ogner-empty-dict-{}.txt", std::process::id()));
        std::fs::write(&path, "\n\n").unwrap();
        let err = PhraseDictionary::from_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, Error::EmptyDictionary(_)));
    }
}
