//! Statement parsing implementation
//!
//! Each source line holds exactly one statement. The leading keyword selects
//! the form; a line starting with an identifier is an assignment when an
//! arrow follows the target, otherwise a bare procedure call.
//!
//! Block statements (`IF`, `FOR`, `WHILE`, `PROCEDURE`) and their closing
//! keywords parse as standalone lines. Pairing them up is the job of the
//! block segmenter, not the parser.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

/// A throwaway location for variant-only token comparisons
const ANY: SourceLocation = SourceLocation { line: 0, column: 0 };

impl Parser {
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let stmt = match self.peek_token().clone() {
            Token::Declare(_) => self.parse_declare()?,
            Token::Array(_) => self.parse_array_decl()?,
            Token::Output(_) => self.parse_output()?,
            Token::Input(_) => {
                self.advance();
                let name = self.expect_identifier("Expected variable name after INPUT")?;
                Stmt::Input { name }
            }
            Token::If(_) => self.parse_if()?,
            Token::Else(_) => {
                self.advance();
                Stmt::Else
            }
            Token::EndIf(_) => {
                self.advance();
                Stmt::EndIf
            }
            Token::For(_) => self.parse_for()?,
            Token::Next(_) => {
                self.advance();
                let var = match self.peek_token().clone() {
                    Token::Ident(name, _) => {
                        self.advance();
                        Some(name)
                    }
                    _ => None,
                };
                Stmt::Next { var }
            }
            Token::EndFor(_) => {
                self.advance();
                Stmt::EndFor
            }
            Token::While(_) => self.parse_while()?,
            Token::EndWhile(_) => {
                self.advance();
                Stmt::EndWhile
            }
            Token::Procedure(_) => self.parse_procedure()?,
            Token::EndProcedure(_) => {
                self.advance();
                Stmt::EndProcedure
            }
            Token::Call(_) => {
                self.advance();
                let name = self.expect_identifier("Expected procedure name after CALL")?;
                let args = self.parse_call_arguments()?;
                Stmt::Call { name, args }
            }
            Token::Ident(name, _) => self.parse_assignment_or_call(name)?,
            other => {
                return Err(ParseError::statement(
                    format!("Unsupported statement starting with {}", other),
                    other.location(),
                ));
            }
        };

        self.expect_end()?;
        Ok(stmt)
    }

    /// `DECLARE name:TYPE`
    fn parse_declare(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        let name = self.expect_identifier("Expected variable name after DECLARE")?;
        self.expect_token(&Token::Colon(ANY), "Expected ':' after variable name")?;
        let base = self.expect_base_type()?;
        Ok(Stmt::Declare { name, base })
    }

    /// `ARRAY name[lower:upper] OF TYPE`
    fn parse_array_decl(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        let name = self.expect_identifier("Expected array name after ARRAY")?;
        self.expect_token(&Token::LBracket(ANY), "Expected '[' after array name")?;
        let lower = self.parse_expression()?;
        self.expect_token(&Token::Colon(ANY), "Expected ':' between array bounds")?;
        let upper = self.parse_expression()?;
        self.expect_token(&Token::RBracket(ANY), "Expected ']' after array bounds")?;
        self.expect_token(&Token::Of(ANY), "Expected OF after array bounds")?;
        let element = self.expect_base_type()?;
        Ok(Stmt::ArrayDecl {
            name,
            lower,
            upper,
            element,
        })
    }

    /// `OUTPUT expr[, expr...]`
    fn parse_output(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        if self.is_at_end() {
            return Err(ParseError::statement(
                "Expected an expression after OUTPUT",
                self.current_location(),
            ));
        }

        let mut items = vec![self.parse_expression()?];
        while self.match_token(&Token::Comma(ANY)) {
            items.push(self.parse_expression()?);
        }
        Ok(Stmt::Output { items })
    }

    /// `IF condition THEN`
    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        let condition = self.parse_expression()?;
        self.expect_token(&Token::Then(ANY), "Expected THEN after IF condition")?;
        Ok(Stmt::If { condition })
    }

    /// `FOR var ← start TO end`
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        let var = self.expect_identifier("Expected loop variable after FOR")?;
        self.expect_token(&Token::Assign(ANY), "Expected '←' after loop variable")?;
        let start = self.parse_expression()?;
        self.expect_token(&Token::To(ANY), "Expected TO in FOR statement")?;
        let end = self.parse_expression()?;
        Ok(Stmt::For { var, start, end })
    }

    /// `WHILE condition [DO]`
    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        let condition = self.parse_expression()?;
        self.match_token(&Token::Do(ANY));
        Ok(Stmt::While { condition })
    }

    /// `PROCEDURE name(p1[:TYPE], p2, ...)`
    fn parse_procedure(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        let name = self.expect_identifier("Expected procedure name after PROCEDURE")?;
        let mut params = Vec::new();

        if self.match_token(&Token::LParen(ANY)) {
            if !self.match_token(&Token::RParen(ANY)) {
                loop {
                    let param = self.expect_identifier("Expected parameter name")?;
                    if params.contains(&param) {
                        return Err(ParseError::statement(
                            format!("Duplicate parameter '{}'", param),
                            self.previous_location(),
                        ));
                    }
                    // Type annotations are informational only
                    if self.match_token(&Token::Colon(ANY)) {
                        self.expect_base_type()?;
                    }
                    params.push(param);

                    if self.match_token(&Token::RParen(ANY)) {
                        break;
                    }
                    self.expect_token(&Token::Comma(ANY), "Expected ',' or ')' in parameter list")?;
                }
            }
        }

        Ok(Stmt::Procedure { name, params })
    }

    /// `name ← expr`, `name[index] ← expr` or `name(args)`
    fn parse_assignment_or_call(&mut self, name: String) -> Result<Stmt, ParseError> {
        match self.peek_ahead(1).clone() {
            Token::Assign(_) => {
                self.advance(); // name
                self.advance(); // arrow
                let value = self.parse_expression()?;
                Ok(Stmt::Assign {
                    target: Target::Variable(name),
                    value,
                })
            }
            Token::LBracket(_) => {
                self.advance(); // name
                self.advance(); // [
                let index = self.parse_expression()?;
                self.expect_token(&Token::RBracket(ANY), "Expected ']' after array index")?;
                self.expect_token(&Token::Assign(ANY), "Expected '←' after array element")?;
                let value = self.parse_expression()?;
                Ok(Stmt::Assign {
                    target: Target::Element { array: name, index },
                    value,
                })
            }
            Token::LParen(_) => {
                self.advance(); // name
                let args = self.parse_call_arguments()?;
                Ok(Stmt::Call { name, args })
            }
            _ => Err(ParseError::statement(
                format!("Unsupported command: '{}' is not followed by '←' or '('", name),
                self.current_location(),
            )),
        }
    }

    /// Optional parenthesised, comma separated argument list
    fn parse_call_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if !self.match_token(&Token::LParen(ANY)) {
            return Ok(args);
        }
        if self.match_token(&Token::RParen(ANY)) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if self.match_token(&Token::RParen(ANY)) {
                break;
            }
            self.expect_token(&Token::Comma(ANY), "Expected ',' or ')' in argument list")?;
        }
        Ok(args)
    }
}
