//! # Contrato do Token Anotado
//!
//! O motor não tokeniza nem analisa sintaticamente o texto: ele consome a saída
//! de um anotador linguístico externo. Este módulo fixa o **contrato** que
//! qualquer integração de anotador precisa cumprir, campo a campo.
//!
//! ## Exemplo de documento (JSON)
//!
//! ```json
//! {
//!   "text": "Acme Pump",
//!   "tokens": [
//!     { "index": 0, "text": "Acme", "norm": "acme", "pos": "PROPN", "dep": "compound",
//!       "left_edge": 0, "right_edge": 0, "ent_iob": "B", "ent_type": "ORG", "idx": 0 },
//!     { "index": 1, "text": "Pump", "norm": "pump", "pos": "PROPN", "dep": "ROOT",
//!       "left_edge": 0, "right_edge": 1, "ent_iob": "I", "ent_type": "ORG", "idx": 5 }
//!   ],
//!   "noun_chunks": [{ "start": 0, "end": 2 }]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// Classe gramatical (Universal POS) atribuída pelo anotador.
///
/// O conjunto é fechado: rótulos desconhecidos viram [`PosTag::X`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum PosTag {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    Space,
    #[default]
    #[serde(other)]
    X,
}

impl PosTag {
    /// Substantivo comum ou próprio.
    pub fn is_nominal(&self) -> bool {
        matches!(self, PosTag::Noun | PosTag::Propn)
    }
}

/// Marcação BIO da entidade base do token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Iob {
    /// `B`: primeiro token de uma entidade.
    #[serde(rename = "B")]
    Begin,
    /// `I`: continuação de uma entidade.
    #[serde(rename = "I")]
    Inside,
    /// `O`: fora de entidade. A string vazia também é aceita (tag não atribuída).
    #[default]
    #[serde(rename = "O", alias = "")]
    Outside,
}

/// Um token produzido pelo anotador externo.
///
/// Tokens são imutáveis: o motor apenas lê estes campos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Posição do token no documento (0, 1, 2...).
    pub index: usize,
    /// Texto de superfície (ex: "Pumps").
    pub text: String,
    /// Forma normalizada em minúsculas (ex: "pump").
    ///
    /// É o texto das palavras-chave: sem ela o token não entra na lista.
    #[serde(default)]
    pub norm: String,
    /// Classe gramatical.
    #[serde(default)]
    pub pos: PosTag,
    /// Palavra vazia (stop-word).
    #[serde(default)]
    pub is_stop: bool,
    /// Rótulo de dependência sintática (ex: "ROOT", "amod", "compound").
    #[serde(default)]
    pub dep: String,
    /// Índice do token mais à esquerda da subárvore de dependência.
    pub left_edge: usize,
    /// Índice do token mais à direita da subárvore de dependência (inclusivo).
    pub right_edge: usize,
    /// Marcação BIO da entidade base.
    #[serde(default)]
    pub ent_iob: Iob,
    /// Tipo da entidade base (ex: "ORG", "PRODUCT", "QUANTITY").
    #[serde(default)]
    pub ent_type: String,
    /// Símbolo monetário.
    #[serde(default)]
    pub is_currency: bool,
    /// Número puro (apenas dígitos).
    #[serde(default)]
    pub is_digit: bool,
    /// Parece com número ("10.5", "1,000", "ten").
    #[serde(default)]
    pub like_num: bool,
    /// Offset em caracteres do início do token no texto original.
    pub idx: usize,
}

impl Token {
    /// Raiz da árvore de dependência.
    pub fn is_root(&self) -> bool {
        self.dep.eq_ignore_ascii_case("root")
    }

    pub fn is_punct(&self) -> bool {
        self.pos == PosTag::Punct
    }

    /// Token composto apenas por espaços.
    pub fn is_space(&self) -> bool {
        self.pos == PosTag::Space || self.text.trim().is_empty()
    }

    /// Tamanho do texto em caracteres.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Offset (exclusivo) do fim do token no texto original.
    pub fn end_offset(&self) -> usize {
        self.idx + self.char_len()
    }
}

/// Documento anotado: entrada de ambos os consumidores do motor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    /// Texto original.
    #[serde(default)]
    pub text: String,
    pub tokens: Vec<Token>,
    /// Fronteiras de sintagmas nominais (noun chunks).
    #[serde(default)]
    pub noun_chunks: Vec<Span>,
    /// Ocorrências do dicionário de frases, sem ordem garantida.
    #[serde(default)]
    pub phrase_matches: Vec<Span>,
}

impl AnnotatedDocument {
    /// Documento sem tokens ou só com espaços.
    pub fn is_blank(&self) -> bool {
        self.tokens.iter().all(Token::is_space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_json() {
        let json = r#"{
            "index": 1, "text": "Pump", "norm": "pump", "pos": "PROPN", "dep": "ROOT",
            "left_edge": 0, "right_edge": 1, "ent_iob": "I", "ent_type": "ORG", "idx": 5
        }"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.pos, PosTag::Propn);
        assert_eq!(token.ent_iob, Iob::Inside);
        assert!(token.is_root());
        assert_eq!(token.end_offset(), 9);
        assert!(!token.is_stop);
    }

    #[test]
    fn test_unknown_pos_and_empty_iob() {
        let json = r#"{
            "index": 0, "text": "x", "pos": "FOO", "ent_iob": "",
            "left_edge": 0, "right_edge": 0, "idx": 0
        }"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.pos, PosTag::X);
        assert_eq!(token.ent_iob, Iob::Outside);
    }

    #[test]
    fn test_space_tag() {
        let json = r#"{"index": 0, "text": " ", "pos": "SPACE", "left_edge": 0, "right_edge": 0, "idx": 0}"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.pos, PosTag::Space);
        assert!(token.is_space());
        assert_eq!(serde_json::to_string(&PosTag::Space).unwrap(), r#""SPACE""#);
    }

    #[test]
    fn test_end_offset_counts_chars() {
        let json = r#"{"index": 0, "text": "Ação", "left_edge": 0, "right_edge": 0, "idx": 3}"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.end_offset(), 7);
    }

    #[test]
    fn test_blank_document() {
        assert!(AnnotatedDocument::default().is_blank());
    }
}
