//! Expression parsing implementation
//!
//! Precedence climbing from loosest to tightest binding:
//!
//! ```text
//! OR  <  AND  <  relational (= != < > <= >=)  <  + -  <  * / MOD  <  ^  <  NOT, unary -
//! ```
//!
//! `^` is right associative, every other binary operator is left associative.
//! Identifiers stay identifiers in the tree; they are resolved against the
//! scope chain only when the expression is evaluated.
//!
//! Parentheses, index brackets, unary operands and `^` exponents each open
//! one nesting level. Nesting deeper than [`MAX_NESTING`] is a parse error.

use crate::interpreter::stack::ensure_sufficient_stack;
use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

/// Deepest expression nesting accepted on one line
pub const MAX_NESTING: usize = 256;

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::parse_or)
    }

    /// Run `parse` one nesting level deeper
    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::expression(
                format!("Expression nests deeper than {} levels", MAX_NESTING),
                self.current_location(),
            ));
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| parse(self));
        self.depth -= 1;
        result
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while let Token::Or(loc) = *self.peek_token() {
            self.advance();
            let right = self.parse_and()?;
            left = binary(BinOp::Or, left, right, loc);
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;

        while let Token::And(loc) = *self.peek_token() {
            self.advance();
            let right = self.parse_relational()?;
            left = binary(BinOp::And, left, right, loc);
        }

        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let (op, loc) = match *self.peek_token() {
                Token::Eq(loc) => (BinOp::Eq, loc),
                Token::NotEq(loc) => (BinOp::Ne, loc),
                Token::Lt(loc) => (BinOp::Lt, loc),
                Token::Le(loc) => (BinOp::Le, loc),
                Token::Gt(loc) => (BinOp::Gt, loc),
                Token::Ge(loc) => (BinOp::Ge, loc),
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right, loc);
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let (op, loc) = match *self.peek_token() {
                Token::Plus(loc) => (BinOp::Add, loc),
                Token::Minus(loc) => (BinOp::Sub, loc),
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right, loc);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_power()?;

        loop {
            let (op, loc) = match *self.peek_token() {
                Token::Star(loc) => (BinOp::Mul, loc),
                Token::Slash(loc) => (BinOp::Div, loc),
                Token::Mod(loc) => (BinOp::Mod, loc),
                _ => break,
            };
            self.advance();
            let right = self.parse_power()?;
            left = binary(op, left, right, loc);
        }

        Ok(left)
    }

    /// Parse exponentiation (right-associative)
    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_unary()?;

        if let Token::Caret(loc) = *self.peek_token() {
            self.advance();
            let exponent = self.nested(Self::parse_power)?;
            return Ok(binary(BinOp::Pow, base, exponent, loc));
        }

        Ok(base)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let (op, loc) = match *self.peek_token() {
            Token::Not(loc) => (UnOp::Not, loc),
            Token::Minus(loc) => (UnOp::Neg, loc),
            _ => return self.parse_primary(),
        };
        self.advance();

        // i64::MIN has no positive counterpart, so its minus is folded in here
        if let (UnOp::Neg, Token::IntLiteral(magnitude, _)) = (op, self.peek_token().clone()) {
            if magnitude == i64::MIN.unsigned_abs() {
                self.advance();
                return Ok(Expr::IntLiteral(i64::MIN, loc));
            }
        }

        let operand = self.nested(Self::parse_unary)?;
        Ok(Expr::UnaryOp {
            op,
            operand: Box::new(operand),
            location: loc,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek_token().clone();

        let expr = match token {
            Token::IntLiteral(n, loc) => {
                let value = i64::try_from(n).map_err(|_| {
                    ParseError::expression(format!("Integer literal {} is out of range", n), loc)
                })?;
                Expr::IntLiteral(value, loc)
            }
            Token::RealLiteral(r, loc) => Expr::RealLiteral(r, loc),
            Token::StringLiteral(s, loc) => Expr::StringLiteral(s, loc),
            Token::CharLiteral(c, loc) => Expr::CharLiteral(c, loc),
            Token::True(loc) => Expr::BoolLiteral(true, loc),
            Token::False(loc) => Expr::BoolLiteral(false, loc),
            Token::LParen(_) => {
                self.advance();
                let inner = self.parse_expression()?;
                if !matches!(self.peek_token(), Token::RParen(_)) {
                    return Err(ParseError::expression(
                        format!("Expected ')', found {}", self.peek_token()),
                        self.current_location(),
                    ));
                }
                self.advance();
                return Ok(inner);
            }
            Token::Ident(name, loc) => {
                self.advance();
                match self.peek_token() {
                    Token::LBracket(_) => {
                        self.advance();
                        let index = self.parse_expression()?;
                        if !matches!(self.peek_token(), Token::RBracket(_)) {
                            return Err(ParseError::expression(
                                format!("Expected ']' after index, found {}", self.peek_token()),
                                self.current_location(),
                            ));
                        }
                        self.advance();
                        return Ok(Expr::Index {
                            array: name,
                            index: Box::new(index),
                            location: loc,
                        });
                    }
                    Token::LParen(_) => {
                        return Err(ParseError::expression(
                            format!("Procedure '{}' cannot be used inside an expression", name),
                            loc,
                        ));
                    }
                    _ => return Ok(Expr::Variable(name, loc)),
                }
            }
            other => {
                return Err(ParseError::expression(
                    format!("Expected an expression, found {}", other),
                    other.location(),
                ));
            }
        };

        self.advance();
        Ok(expr)
    }
}

fn binary(op: BinOp, left: Expr, right: Expr, location: SourceLocation) -> Expr {
    Expr::BinaryOp {
        op,
        left: Box::new(left),
        right: Box::new(right),
        location,
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use super::MAX_NESTING;
    use crate::parser::parse::{ParseErrorKind, Parser};

    fn parse(text: &str) -> Expr {
        let mut parser = Parser::new(text, 1).expect("Lexing failed");
        let expr = parser.parse_expression().expect("Parsing failed");
        assert!(parser.is_at_end(), "Trailing tokens in {:?}", text);
        expr
    }

    fn op_of(expr: &Expr) -> Option<BinOp> {
        match expr {
            Expr::BinaryOp { op, .. } => Some(*op),
            _ => None,
        }
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let expr = parse("1 + 2 * 3");
        match expr {
            Expr::BinaryOp {
                op: BinOp::Add,
                right,
                ..
            } => assert_eq!(op_of(&right), Some(BinOp::Mul)),
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_power_is_right_associative() {
        let expr = parse("2 ^ 3 ^ 2");
        match expr {
            Expr::BinaryOp {
                op: BinOp::Pow,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expr::IntLiteral(2, _)));
                assert_eq!(op_of(&right), Some(BinOp::Pow));
            }
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_logical_precedence() {
        // a OR (b AND (c < d))
        let expr = parse("a OR b AND c < d");
        match expr {
            Expr::BinaryOp {
                op: BinOp::Or,
                right,
                ..
            } => match *right {
                Expr::BinaryOp {
                    op: BinOp::And,
                    right: inner,
                    ..
                } => assert_eq!(op_of(&inner), Some(BinOp::Lt)),
                other => panic!("Unexpected tree {:?}", other),
            },
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_not_binds_tightest() {
        // (NOT a) = b
        let expr = parse("NOT a = b");
        match expr {
            Expr::BinaryOp {
                op: BinOp::Eq,
                left,
                ..
            } => assert!(matches!(*left, Expr::UnaryOp { op: UnOp::Not, .. })),
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_index_expression() {
        let expr = parse("values[i - 1] MOD 2");
        match expr {
            Expr::BinaryOp {
                op: BinOp::Mod,
                left,
                ..
            } => assert!(matches!(*left, Expr::Index { ref array, .. } if array == "values")),
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_unbalanced_parenthesis() {
        let mut parser = Parser::new("(1 + 2", 1).unwrap();
        let err = parser.parse_expression().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Expression);
    }

    #[test]
    fn test_nesting_limit() {
        let shallow = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert!(matches!(parse(&shallow), Expr::IntLiteral(1, _)));

        let deep = format!("{}TRUE", "NOT ".repeat(MAX_NESTING + 10));
        let mut parser = Parser::new(&deep, 1).unwrap();
        let err = parser.parse_expression().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Expression);
        assert!(err.message.contains("nests deeper"));
        assert_eq!(parser.depth, 0);
    }

    #[test]
    fn test_minimum_integer_literal() {
        assert!(matches!(parse("-9223372036854775808"), Expr::IntLiteral(i64::MIN, _)));
        assert!(matches!(parse("- 5"), Expr::UnaryOp { op: UnOp::Neg, .. }));

        let mut parser = Parser::new("9223372036854775808", 1).unwrap();
        assert!(parser.parse_expression().is_err());
    }

    #[test]
    fn test_call_inside_expression_rejected() {
        let mut parser = Parser::new("add(1, 2) + 1", 1).unwrap();
        assert!(parser.parse_expression().is_err());
    }
}
