//! Lexer (tokenizer) for pseudocode source lines
//!
//! The dialect is line oriented: every statement lives on exactly one line, so
//! the lexer works on one line at a time and stamps each token with that
//! line's number. Comment and blank lines never reach the lexer; the statement
//! parser filters them out first.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Unsigned magnitude; the parser folds a leading minus into it
    IntLiteral(u64, SourceLocation),
    RealLiteral(f64, SourceLocation),
    StringLiteral(String, SourceLocation),
    CharLiteral(char, SourceLocation),
    True(SourceLocation),
    False(SourceLocation),

    // Identifiers (type names are identifiers too)
    Ident(String, SourceLocation),

    // Statement keywords
    Declare(SourceLocation),
    Array(SourceLocation),
    Of(SourceLocation),
    Output(SourceLocation),
    Input(SourceLocation),
    If(SourceLocation),
    Then(SourceLocation),
    Else(SourceLocation),
    EndIf(SourceLocation),
    For(SourceLocation),
    To(SourceLocation),
    Next(SourceLocation),
    EndFor(SourceLocation),
    While(SourceLocation),
    Do(SourceLocation),
    EndWhile(SourceLocation),
    Procedure(SourceLocation),
    EndProcedure(SourceLocation),
    Call(SourceLocation),

    // Word operators
    And(SourceLocation),
    Or(SourceLocation),
    Not(SourceLocation),
    Mod(SourceLocation),

    // Arithmetic
    Plus(SourceLocation),  // +
    Minus(SourceLocation), // -
    Star(SourceLocation),  // *
    Slash(SourceLocation), // /
    Caret(SourceLocation), // ^

    // Relational
    Eq(SourceLocation),    // =
    NotEq(SourceLocation), // != <> ≠
    Lt(SourceLocation),    // <
    Le(SourceLocation),    // <= ≤
    Gt(SourceLocation),    // >
    Ge(SourceLocation),    // >= ≥

    // Assignment
    Assign(SourceLocation), // ← <-

    // Punctuation
    LParen(SourceLocation),   // (
    RParen(SourceLocation),   // )
    LBracket(SourceLocation), // [
    RBracket(SourceLocation), // ]
    Colon(SourceLocation),    // :
    Comma(SourceLocation),    // ,

    // End of line
    Eol(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::IntLiteral(_, loc)
            | Token::RealLiteral(_, loc)
            | Token::StringLiteral(_, loc)
            | Token::CharLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::True(loc)
            | Token::False(loc)
            | Token::Declare(loc)
            | Token::Array(loc)
            | Token::Of(loc)
            | Token::Output(loc)
            | Token::Input(loc)
            | Token::If(loc)
            | Token::Then(loc)
            | Token::Else(loc)
            | Token::EndIf(loc)
            | Token::For(loc)
            | Token::To(loc)
            | Token::Next(loc)
            | Token::EndFor(loc)
            | Token::While(loc)
            | Token::Do(loc)
            | Token::EndWhile(loc)
            | Token::Procedure(loc)
            | Token::EndProcedure(loc)
            | Token::Call(loc)
            | Token::And(loc)
            | Token::Or(loc)
            | Token::Not(loc)
            | Token::Mod(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::Caret(loc)
            | Token::Eq(loc)
            | Token::NotEq(loc)
            | Token::Lt(loc)
            | Token::Le(loc)
            | Token::Gt(loc)
            | Token::Ge(loc)
            | Token::Assign(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBracket(loc)
            | Token::RBracket(loc)
            | Token::Colon(loc)
            | Token::Comma(loc)
            | Token::Eol(loc) => *loc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntLiteral(n, _) => write!(f, "integer literal {}", n),
            Token::RealLiteral(r, _) => write!(f, "real literal {:?}", r),
            Token::StringLiteral(s, _) => write!(f, "string literal \"{}\"", s),
            Token::CharLiteral(c, _) => write!(f, "char literal '{}'", c),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::True(_) => write!(f, "'TRUE'"),
            Token::False(_) => write!(f, "'FALSE'"),
            Token::Declare(_) => write!(f, "'DECLARE'"),
            Token::Array(_) => write!(f, "'ARRAY'"),
            Token::Of(_) => write!(f, "'OF'"),
            Token::Output(_) => write!(f, "'OUTPUT'"),
            Token::Input(_) => write!(f, "'INPUT'"),
            Token::If(_) => write!(f, "'IF'"),
            Token::Then(_) => write!(f, "'THEN'"),
            Token::Else(_) => write!(f, "'ELSE'"),
            Token::EndIf(_) => write!(f, "'ENDIF'"),
            Token::For(_) => write!(f, "'FOR'"),
            Token::To(_) => write!(f, "'TO'"),
            Token::Next(_) => write!(f, "'NEXT'"),
            Token::EndFor(_) => write!(f, "'ENDFOR'"),
            Token::While(_) => write!(f, "'WHILE'"),
            Token::Do(_) => write!(f, "'DO'"),
            Token::EndWhile(_) => write!(f, "'ENDWHILE'"),
            Token::Procedure(_) => write!(f, "'PROCEDURE'"),
            Token::EndProcedure(_) => write!(f, "'ENDPROCEDURE'"),
            Token::Call(_) => write!(f, "'CALL'"),
            Token::And(_) => write!(f, "'AND'"),
            Token::Or(_) => write!(f, "'OR'"),
            Token::Not(_) => write!(f, "'NOT'"),
            Token::Mod(_) => write!(f, "'MOD'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::Caret(_) => write!(f, "'^'"),
            Token::Eq(_) => write!(f, "'='"),
            Token::NotEq(_) => write!(f, "'!='"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Le(_) => write!(f, "'<='"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Ge(_) => write!(f, "'>='"),
            Token::Assign(_) => write!(f, "'←'"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::Colon(_) => write!(f, "':'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Eol(_) => write!(f, "end of line"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} (column {})", location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Lexer for a single pseudocode line
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a lexer over the text of source line `line`.
    pub fn new(input: &str, line: usize) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line,
            column: 1,
        }
    }

    /// Tokenize the entire line, terminated by [`Token::Eol`]
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                tokens.push(Token::Eol(self.current_location()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of line".to_string(),
            location: loc,
        })?;

        match ch {
            '"' => self.string_literal(loc),
            '\'' => self.char_literal(loc),
            '0'..='9' => self.number_literal(ch, loc),
            c if c.is_alphabetic() || c == '_' => Ok(self.identifier_or_keyword(ch, loc)),

            '+' => Ok(Token::Plus(loc)),
            '-' => Ok(Token::Minus(loc)),
            '*' => Ok(Token::Star(loc)),
            '/' => Ok(Token::Slash(loc)),
            '^' => Ok(Token::Caret(loc)),
            '=' => Ok(Token::Eq(loc)),
            '←' => Ok(Token::Assign(loc)),
            '≠' => Ok(Token::NotEq(loc)),
            '≤' => Ok(Token::Le(loc)),
            '≥' => Ok(Token::Ge(loc)),
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::NotEq(loc))
                } else {
                    Err(LexError {
                        message: "Expected '=' after '!'".to_string(),
                        location: loc,
                    })
                }
            }
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    Ok(Token::Le(loc))
                }
                Some('>') => {
                    self.advance();
                    Ok(Token::NotEq(loc))
                }
                Some('-') => {
                    self.advance();
                    Ok(Token::Assign(loc))
                }
                _ => Ok(Token::Lt(loc)),
            },
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::Ge(loc))
                } else {
                    Ok(Token::Gt(loc))
                }
            }
            '(' => Ok(Token::LParen(loc)),
            ')' => Ok(Token::RParen(loc)),
            '[' => Ok(Token::LBracket(loc)),
            ']' => Ok(Token::RBracket(loc)),
            ':' => Ok(Token::Colon(loc)),
            ',' => Ok(Token::Comma(loc)),

            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Parse string literal; the dialect has no escape sequences
    fn string_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.advance() {
            if ch == '"' {
                return Ok(Token::StringLiteral(string, loc));
            }
            string.push(ch);
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    /// Parse character literal: exactly one codepoint between single quotes
    fn char_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of line in character literal".to_string(),
            location: loc,
        })?;

        if self.advance() != Some('\'') {
            return Err(LexError {
                message: "Expected closing quote in character literal".to_string(),
                location: loc,
            });
        }

        Ok(Token::CharLiteral(ch, loc))
    }

    /// Parse numeric literal (`123` or `1.5`)
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut num_str = String::new();
        num_str.push(first_digit);
        self.take_digits(&mut num_str);

        let is_real = self.peek() == Some('.')
            && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit());

        if is_real {
            num_str.push('.');
            self.advance();
            self.take_digits(&mut num_str);
            let value = num_str
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| LexError {
                    message: format!("Invalid real literal: {}", num_str),
                    location: loc,
                })?;
            return Ok(Token::RealLiteral(value, loc));
        }

        let value = num_str.parse::<u64>().map_err(|_| LexError {
            message: format!("Invalid integer literal: {}", num_str),
            location: loc,
        })?;

        Ok(Token::IntLiteral(value, loc))
    }

    fn take_digits(&mut self, into: &mut String) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                into.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "DECLARE" => Token::Declare(loc),
            "ARRAY" => Token::Array(loc),
            "OF" => Token::Of(loc),
            "OUTPUT" | "PRINT" => Token::Output(loc),
            "INPUT" => Token::Input(loc),
            "IF" => Token::If(loc),
            "THEN" => Token::Then(loc),
            "ELSE" => Token::Else(loc),
            "ENDIF" => Token::EndIf(loc),
            "FOR" => Token::For(loc),
            "TO" => Token::To(loc),
            "NEXT" => Token::Next(loc),
            "ENDFOR" => Token::EndFor(loc),
            "WHILE" => Token::While(loc),
            "DO" => Token::Do(loc),
            "ENDWHILE" => Token::EndWhile(loc),
            "PROCEDURE" => Token::Procedure(loc),
            "ENDPROCEDURE" => Token::EndProcedure(loc),
            "CALL" => Token::Call(loc),
            "AND" => Token::And(loc),
            "OR" => Token::Or(loc),
            "NOT" => Token::Not(loc),
            "MOD" => Token::Mod(loc),
            "TRUE" => Token::True(loc),
            "FALSE" => Token::False(loc),
            _ => Token::Ident(ident, loc),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        self.column += 1;
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}
