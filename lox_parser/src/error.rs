use lox_syntax::{Token, TokenKind};
use thiserror::Error;

fn at(token: &Token) -> String {
    if token.kind == TokenKind::Eof {
        "at end".to_owned()
    } else {
        format!("at '{}'", token.lexeme)
    }
}

/// Fault raised while turning source text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("[line {line}] Error: Unexpected character '{character}'.")]
    UnexpectedCharacter { line: usize, character: char },

    #[error("[line {line}] Error: Unterminated string.")]
    UnterminatedString { line: usize },
}

/// Fault raised on the first malformed construct. Parsing never resumes
/// after one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error("[line {line}] Error {at}: Expect ';' after {context}.", line = .token.line, at = at(.token))]
    MissingSemicolon {
        token: Token,
        context: &'static str,
    },

    #[error("[line {line}] Error {at}: Expect ')' after {context}.", line = .token.line, at = at(.token))]
    MissingRightParen {
        token: Token,
        context: &'static str,
    },

    #[error("[line {line}] Error {at}: Expect '(' after {context}.", line = .token.line, at = at(.token))]
    MissingLeftParen {
        token: Token,
        context: &'static str,
    },

    #[error("[line {line}] Error {at}: Expect '}}' after block.", line = .token.line, at = at(.token))]
    MissingRightBrace { token: Token },

    #[error("[line {line}] Error {at}: Expect variable name.", line = .token.line, at = at(.token))]
    MissingIdentifier { token: Token },

    #[error("[line {line}] Error {at}: Invalid assignment target.", line = .token.line, at = at(.token))]
    InvalidAssignmentTarget { token: Token },

    #[error("[line {line}] Error {at}: Expect expression.", line = .token.line, at = at(.token))]
    UnrecognizedExpression { token: Token },
}

impl SyntaxError {
    /// The token the parser was looking at when it gave up.
    pub fn token(&self) -> &Token {
        match self {
            SyntaxError::MissingSemicolon { token, .. }
            | SyntaxError::MissingRightParen { token, .. }
            | SyntaxError::MissingLeftParen { token, .. }
            | SyntaxError::MissingRightBrace { token }
            | SyntaxError::MissingIdentifier { token }
            | SyntaxError::InvalidAssignmentTarget { token }
            | SyntaxError::UnrecognizedExpression { token } => token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_at_token() {
        let error = SyntaxError::MissingRightParen {
            token: Token::new(TokenKind::Semicolon, ";", 4),
            context: "expression",
        };
        assert_eq!(
            error.to_string(),
            "[line 4] Error at ';': Expect ')' after expression."
        );
    }

    #[test]
    fn test_display_at_end() {
        let error = SyntaxError::MissingSemicolon {
            token: Token::eof(2),
            context: "value",
        };
        assert_eq!(error.to_string(), "[line 2] Error at end: Expect ';' after value.");
    }

    #[test]
    fn test_display_right_brace() {
        let error = SyntaxError::MissingRightBrace {
            token: Token::eof(1),
        };
        assert_eq!(error.to_string(), "[line 1] Error at end: Expect '}' after block.");
    }

    #[test]
    fn test_scan_error_display() {
        let error = ScanError::UnexpectedCharacter {
            line: 3,
            character: '@',
        };
        assert_eq!(error.to_string(), "[line 3] Error: Unexpected character '@'.");
    }
}
