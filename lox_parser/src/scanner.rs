use crate::error::ScanError;
use lox_syntax::{Literal, Token, TokenKind};

type ScanResult<T> = Result<T, ScanError>;

pub struct Scanner {
    source: Vec<char>,
    start: usize,
    current: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    /// Scans the whole source. The result always ends with an `Eof` token.
    pub fn scan_tokens(mut self) -> ScanResult<Vec<Token>> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }

        self.tokens.push(Token::eof(self.line));
        Ok(self.tokens)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn scan_token(&mut self) -> ScanResult<()> {
        let c = self.advance();
        match c {
            '(' => self.add_empty_token(TokenKind::LeftParen),
            ')' => self.add_empty_token(TokenKind::RightParen),
            '{' => self.add_empty_token(TokenKind::LeftBrace),
            '}' => self.add_empty_token(TokenKind::RightBrace),
            ',' => self.add_empty_token(TokenKind::Comma),
            '.' => self.add_empty_token(TokenKind::Dot),
            '-' => self.add_empty_token(TokenKind::Minus),
            '+' => self.add_empty_token(TokenKind::Plus),
            ';' => self.add_empty_token(TokenKind::Semicolon),
            '*' => self.add_empty_token(TokenKind::Star),
            '!' => self.add_either('=', TokenKind::BangEqual, TokenKind::Bang),
            '=' => self.add_either('=', TokenKind::EqualEqual, TokenKind::Equal),
            '<' => self.add_either('=', TokenKind::LessEqual, TokenKind::Less),
            '>' => self.add_either('=', TokenKind::GreaterEqual, TokenKind::Greater),
            '/' => {
                if self.match_('/') {
                    // comment
                    while self.peek() != Some('\n') && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_empty_token(TokenKind::Slash);
                }
            }
            ' ' | '\r' | '\t' => {
                // skip
            }
            '\n' => {
                self.line += 1;
            }
            '"' => {
                self.string()?;
            }
            c if c.is_ascii_digit() => self.number(),
            c if is_identifier_start(c) => self.identifier(),
            character => {
                return Err(ScanError::UnexpectedCharacter {
                    line: self.line,
                    character,
                });
            }
        }
        Ok(())
    }

    fn string(&mut self) -> ScanResult<()> {
        let start_line = self.line;
        while self.peek() != Some('"') && !self.is_at_end() {
            if self.peek() == Some('\n') {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            return Err(ScanError::UnterminatedString { line: start_line });
        }

        self.advance(); // Closing "
        let value = self.source[self.start + 1..self.current - 1]
            .iter()
            .collect::<String>();
        self.add_literal_token(TokenKind::String, Literal::String(value));
        Ok(())
    }

    fn number(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();

            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let lexeme: String = self.source[self.start..self.current].iter().collect();
        // Digits with an optional `.digits` fraction always parse as f64.
        let value = lexeme.parse::<f64>().unwrap_or(f64::NAN);
        self.add_literal_token(TokenKind::Number, Literal::Number(value));
    }

    fn identifier(&mut self) {
        while self.peek().is_some_and(is_identifier_part) {
            self.advance();
        }

        let lexeme: String = self.source[self.start..self.current].iter().collect();
        match TokenKind::keyword(&lexeme) {
            Some(TokenKind::True) => self.add_literal_token(TokenKind::True, Literal::Boolean(true)),
            Some(TokenKind::False) => {
                self.add_literal_token(TokenKind::False, Literal::Boolean(false))
            }
            Some(kind) => self.add_empty_token(kind),
            None => self.add_empty_token(TokenKind::Identifier),
        }
    }

    fn advance(&mut self) -> char {
        let result = self.source[self.current];
        self.current += 1;
        result
    }

    fn match_(&mut self, expected: char) -> bool {
        if self.peek() != Some(expected) {
            return false;
        }
        self.current += 1;
        true
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.source.get(self.current + 1).copied()
    }

    fn add_either(&mut self, next: char, matched: TokenKind, otherwise: TokenKind) {
        let kind = if self.match_(next) { matched } else { otherwise };
        self.add_empty_token(kind);
    }

    fn add_empty_token(&mut self, kind: TokenKind) {
        self.add_token(kind, None);
    }

    fn add_literal_token(&mut self, kind: TokenKind, literal: Literal) {
        self.add_token(kind, Some(literal));
    }

    fn add_token(&mut self, kind: TokenKind, literal: Option<Literal>) {
        let lexeme = &self.source[self.start..self.current];
        self.tokens.push(Token {
            kind,
            lexeme: lexeme.iter().collect(),
            literal,
            line: self.line,
        })
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
