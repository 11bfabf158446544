//! Construtor de documentos anotados para os testes.
//!
//! Cada `token()` acrescenta um token separado por espaço; os modificadores
//! seguintes (`stop()`, `ent()`, `dep()`...) alteram o último token criado.

use crate::span::Span;
use crate::token::{AnnotatedDocument, Iob, PosTag, Token};

pub(crate) struct DocBuilder {
    text: String,
    tokens: Vec<Token>,
    noun_chunks: Vec<Span>,
    phrase_matches: Vec<Span>,
}

impl DocBuilder {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            tokens: Vec::new(),
            noun_chunks: Vec::new(),
            phrase_matches: Vec::new(),
        }
    }

    pub fn token(mut self, text: &str, pos: PosTag) -> Self {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        let index = self.tokens.len();
        let idx = self.text.chars().count();
        self.text.push_str(text);
        self.tokens.push(Token {
            index,
            text: text.to_string(),
            norm: text.to_lowercase(),
            pos,
            is_stop: false,
            dep: "dep".to_string(),
            left_edge: index,
            right_edge: index,
            ent_iob: Iob::Outside,
            ent_type: String::new(),
            is_currency: false,
            is_digit: false,
            like_num: false,
            idx,
        });
        self
    }

    fn last(&mut self) -> &mut Token {
        self.tokens.last_mut().expect("nenhum token criado")
    }

    pub fn stop(mut self) -> Self {
        self.last().is_stop = true;
        self
    }

    pub fn norm(mut self, norm: &str) -> Self {
        self.last().norm = norm.to_string();
        self
    }

    pub fn dep(mut self, label: &str) -> Self {
        self.last().dep = label.to_string();
        self
    }

    pub fn root(self) -> Self {
        self.dep("ROOT")
    }

    pub fn edges(mut self, left: usize, right: usize) -> Self {
        let token = self.last();
        token.left_edge = left;
        token.right_edge = right;
        self
    }

    pub fn ent(mut self, iob: Iob, ent_type: &str) -> Self {
        let token = self.last();
        token.ent_iob = iob;
        token.ent_type = ent_type.to_string();
        self
    }

    pub fn begin(self, ent_type: &str) -> Self {
        self.ent(Iob::Begin, ent_type)
    }

    pub fn inside(self, ent_type: &str) -> Self {
        self.ent(Iob::Inside, ent_type)
    }

    pub fn currency(mut self) -> Self {
        self.last().is_currency = true;
        self
    }

    pub fn digit(mut self) -> Self {
        self.last().is_digit = true;
        self
    }

    pub fn like_num(mut self) -> Self {
        self.last().like_num = true;
        self
    }

    pub fn chunk(mut self, start: usize, end: usize) -> Self {
        self.noun_chunks.push(Span::new(start, end));
        self
    }

    pub fn phrase(mut self, start: usize, end: usize) -> Self {
        self.phrase_matches.push(Span::new(start, end));
        self
    }

    pub fn build(self) -> AnnotatedDocument {
        AnnotatedDocument {
            text: self.text,
            tokens: self.tokens,
            noun_chunks: self.noun_chunks,
            phrase_matches: self.phrase_matches,
        }
    }
}
