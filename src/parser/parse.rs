//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the program entry point
//! [`parse_program`].
//!
//! # Parser Architecture
//!
//! - This module: Parser struct, helper methods, and coordination
//! - `statements`: one statement per source line
//! - `expressions`: expressions with precedence climbing
//!
//! A line that fails to lex or parse does not abort the program parse. It is
//! kept as [`Stmt::Invalid`] so the interpreter can report it at the point
//! execution reaches it and carry on with the next statement.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use std::mem;
use thiserror::Error;

/// Most tokens a single line may hold
pub const MAX_LINE_TOKENS: usize = 4096;

/// What part of a line failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Malformed statement syntax
    Statement,
    /// Malformed expression inside an otherwise recognised statement
    Expression,
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} (column {})", location.column)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn statement(message: impl Into<String>, location: SourceLocation) -> Self {
        ParseError {
            message: message.into(),
            location,
            kind: ParseErrorKind::Statement,
        }
    }

    pub fn expression(message: impl Into<String>, location: SourceLocation) -> Self {
        ParseError {
            message: message.into(),
            location,
            kind: ParseErrorKind::Expression,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::expression(err.message, err.location)
    }
}

/// Parse a whole source text into a [`Program`].
///
/// Blank lines and lines starting with `#` are skipped; every other line
/// becomes exactly one [`Line`], keeping its 1-based source line number.
pub fn parse_program(source: &str) -> Program {
    let mut program = Program::new();

    for (index, raw) in source.lines().enumerate() {
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let number = index + 1;
        let stmt = match parse_line(text, number) {
            Ok(stmt) => stmt,
            Err(err) => Stmt::Invalid(err),
        };

        program.lines.push(Line {
            number,
            text: text.to_string(),
            stmt,
        });
    }

    program
}

/// Parse the text of a single source line
pub fn parse_line(text: &str, number: usize) -> Result<Stmt, ParseError> {
    let mut parser = Parser::new(text, number)?;
    parser.parse_statement()
}

/// Recursive descent parser over the tokens of one line
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    /// Current expression nesting, bounded while parsing
    pub(crate) depth: usize,
}

impl Parser {
    pub fn new(text: &str, number: usize) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(text, number);
        let tokens = lexer.tokenize()?;
        if tokens.len() > MAX_LINE_TOKENS {
            return Err(ParseError::statement(
                format!(
                    "Line has {} tokens, more than the limit of {}",
                    tokens.len(),
                    MAX_LINE_TOKENS
                ),
                SourceLocation::new(number, 1),
            ));
        }
        Ok(Self {
            tokens,
            position: 0,
            depth: 0,
        })
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Compare variant only, ignoring payload and location
    pub(crate) fn check(&self, token: &Token) -> bool {
        mem::discriminant(self.peek_token()) == mem::discriminant(token)
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.match_token(token) {
            Ok(())
        } else {
            Err(ParseError::statement(
                format!("{}, found {}", message, self.peek_token()),
                self.current_location(),
            ))
        }
    }

    pub(crate) fn expect_identifier(&mut self, message: &str) -> Result<String, ParseError> {
        match self.peek_token().clone() {
            Token::Ident(name, _) => {
                self.advance();
                Ok(name)
            }
            other => Err(ParseError::statement(
                format!("{}, found {}", message, other),
                other.location(),
            )),
        }
    }

    /// Parse a type keyword such as `INTEGER`
    pub(crate) fn expect_base_type(&mut self) -> Result<BaseType, ParseError> {
        let location = self.current_location();
        let word = self.expect_identifier("Expected a type name")?;
        BaseType::from_keyword(&word).ok_or_else(|| {
            ParseError::statement(
                format!(
                    "Unknown type '{}', expected INTEGER, REAL, CHAR, STRING or BOOLEAN",
                    word
                ),
                location,
            )
        })
    }

    /// Require that the whole line has been consumed
    pub(crate) fn expect_end(&mut self) -> Result<(), ParseError> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(ParseError::statement(
                format!("Unexpected {} after statement", self.peek_token()),
                self.current_location(),
            ))
        }
    }

    pub(crate) fn peek_token(&self) -> &Token {
        // The token stream always ends with Eol
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> &Token {
        &self.tokens[(self.position + n).min(self.tokens.len() - 1)]
    }

    pub(crate) fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek_token(), Token::Eol(_))
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek_token().location()
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        if self.position > 0 {
            self.tokens[self.position - 1].location()
        } else {
            self.current_location()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let program = parse_program("# heading\n\nDECLARE x:INTEGER\n   \nx ← 1\n");

        assert_eq!(program.len(), 2);
        assert_eq!(program.lines[0].number, 3);
        assert_eq!(program.lines[1].number, 5);
        assert_eq!(program.lines[1].text, "x ← 1");
    }

    #[test]
    fn test_bad_line_becomes_invalid_statement() {
        let program = parse_program("DECLARE x\nOUTPUT 1");

        assert_eq!(program.len(), 2);
        match &program.lines[0].stmt {
            Stmt::Invalid(err) => assert_eq!(err.kind, ParseErrorKind::Statement),
            other => panic!("Expected invalid statement, got {:?}", other),
        }
        assert!(matches!(program.lines[1].stmt, Stmt::Output { .. }));
    }

    #[test]
    fn test_lex_error_is_expression_error() {
        let program = parse_program("OUTPUT \"unterminated");

        match &program.lines[0].stmt {
            Stmt::Invalid(err) => {
                assert_eq!(err.kind, ParseErrorKind::Expression);
                assert_eq!(err.location.line, 1);
            }
            other => panic!("Expected invalid statement, got {:?}", other),
        }
    }
}
