//! Expression evaluation
//!
//! Identifiers are resolved against the live scope chain at the moment they
//! are evaluated; nothing is substituted into source text. Reading a name
//! that is declared but never assigned is a reference error, as is reading
//! an array cell that has not been written yet.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::stack::ensure_sufficient_stack;
use crate::memory::value::Value;
use crate::parser::ast::{BinOp, Expr, SourceLocation};

impl Interpreter {
    /// Evaluate an expression against the current scope chain
    pub(crate) fn evaluate(&self, expr: &Expr) -> Result<Value, RuntimeError> {
        ensure_sufficient_stack(|| self.evaluate_inner(expr))
    }

    fn evaluate_inner(&self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::IntLiteral(n, _) => Ok(Value::Integer(*n)),
            Expr::RealLiteral(r, _) => Ok(Value::Real(*r)),
            Expr::BoolLiteral(b, _) => Ok(Value::Boolean(*b)),
            Expr::CharLiteral(c, _) => Ok(Value::Char(*c)),
            Expr::StringLiteral(s, _) => Ok(Value::String(s.clone())),

            Expr::Variable(name, location) => self.read_variable(name, *location),

            Expr::Index {
                array,
                index,
                location,
            } => {
                let index = self.evaluate_integer(index, "Array index")?;
                self.read_element(array, index, *location)
            }

            Expr::BinaryOp {
                op: op @ (BinOp::And | BinOp::Or),
                left,
                right,
                location,
            } => {
                let left_value = self.evaluate(left)?;
                let Some(left_bool) = left_value.as_bool() else {
                    return Err(RuntimeError::evaluation(
                        format!("{} needs BOOLEAN operands, got {}", op, left_value.type_name()),
                        *location,
                    ));
                };
                // Short-circuit
                match (op, left_bool) {
                    (BinOp::And, false) => Ok(Value::Boolean(false)),
                    (BinOp::Or, true) => Ok(Value::Boolean(true)),
                    _ => {
                        let right_value = self.evaluate(right)?;
                        Self::apply_binary(*op, &left_value, &right_value, *location)
                    }
                }
            }

            Expr::BinaryOp {
                op,
                left,
                right,
                location,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                Self::apply_binary(*op, &left, &right, *location)
            }

            Expr::UnaryOp {
                op,
                operand,
                location,
            } => {
                let value = self.evaluate(operand)?;
                Self::apply_unary(*op, &value, *location)
            }
        }
    }

    fn read_variable(&self, name: &str, location: SourceLocation) -> Result<Value, RuntimeError> {
        let variable = self
            .scopes
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
                location,
            })?;

        if !variable.value.is_set() {
            return Err(RuntimeError::UnsetVariable {
                name: name.to_string(),
                location,
            });
        }
        Ok(variable.value.clone())
    }

    fn read_element(
        &self,
        array: &str,
        index: i64,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let variable = self
            .scopes
            .get(array)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: array.to_string(),
                location,
            })?;

        let Value::Array(cells) = &variable.value else {
            return Err(RuntimeError::NotAnArray {
                name: array.to_string(),
                location,
            });
        };

        match cells.get(index) {
            Some(Value::Unset) => Err(RuntimeError::UnsetVariable {
                name: format!("{}[{}]", array, index),
                location,
            }),
            Some(value) => Ok(value.clone()),
            None => Err(RuntimeError::IndexOutOfBounds {
                array: array.to_string(),
                index,
                lower: cells.lower,
                upper: cells.upper,
                location,
            }),
        }
    }

    /// Evaluate an expression that must produce an INTEGER
    pub(crate) fn evaluate_integer(&self, expr: &Expr, what: &str) -> Result<i64, RuntimeError> {
        let value = self.evaluate(expr)?;
        value.as_integer().ok_or_else(|| {
            RuntimeError::type_mismatch(format!("INTEGER for {}", what), value.type_name(), expr.location())
        })
    }

    /// Evaluate an IF/WHILE condition
    pub(crate) fn evaluate_condition(&self, expr: &Expr) -> Result<bool, RuntimeError> {
        let value = self.evaluate(expr)?;
        value
            .as_bool()
            .ok_or_else(|| RuntimeError::ConditionNotBoolean {
                got: value.type_name(),
                location: expr.location(),
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::Interpreter;
    use crate::interpreter::errors::{ErrorKind, RuntimeError};
    use crate::memory::scope::Variable;
    use crate::memory::value::{ArrayValue, Value};
    use crate::parser::ast::{BaseType, Expr, Stmt, Type};
    use crate::parser::parse::parse_line;

    fn expr(text: &str) -> Expr {
        match parse_line(&format!("OUTPUT {}", text), 1).expect("Parsing failed") {
            Stmt::Output { mut items } => items.remove(0),
            other => panic!("Expected OUTPUT, got {:?}", other),
        }
    }

    fn eval(interp: &Interpreter, text: &str) -> Result<Value, RuntimeError> {
        interp.evaluate(&expr(text))
    }

    #[test]
    fn test_precedence() {
        let interp = Interpreter::default();
        assert_eq!(eval(&interp, "2 + 3 * 4"), Ok(Value::Integer(14)));
        assert_eq!(eval(&interp, "(2 + 3) * 4"), Ok(Value::Integer(20)));
        assert_eq!(eval(&interp, "2 ^ 3 ^ 2"), Ok(Value::Integer(512)));
        assert_eq!(eval(&interp, "-2 ^ 2"), Ok(Value::Integer(4)));
        assert_eq!(eval(&interp, "1 < 2 AND NOT FALSE"), Ok(Value::Boolean(true)));
        assert_eq!(eval(&interp, "10 MOD 4 + 1"), Ok(Value::Integer(3)));
    }

    #[test]
    fn test_identifiers_resolve_whole_names() {
        let mut interp = Interpreter::default();
        interp.scopes.declare(
            "sum",
            Variable::new(Value::Integer(1), Type::Base(BaseType::Integer)),
        );
        interp.scopes.declare(
            "sum2",
            Variable::new(Value::Integer(20), Type::Base(BaseType::Integer)),
        );
        assert_eq!(eval(&interp, "sum + sum2"), Ok(Value::Integer(21)));
    }

    #[test]
    fn test_short_circuit_skips_right_operand() {
        let interp = Interpreter::default();
        assert_eq!(eval(&interp, "FALSE AND missing"), Ok(Value::Boolean(false)));
        assert_eq!(eval(&interp, "TRUE OR missing"), Ok(Value::Boolean(true)));
        assert!(eval(&interp, "TRUE AND missing").is_err());
    }

    #[test]
    fn test_unset_and_undefined_reads() {
        let mut interp = Interpreter::default();
        interp
            .scopes
            .declare("x", Variable::new(Value::Unset, Type::Base(BaseType::Integer)));

        let err = eval(&interp, "x + 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);
        let err = eval(&interp, "y").unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedVariable { .. }));
    }

    #[test]
    fn test_array_reads() {
        let mut interp = Interpreter::default();
        let mut cells = ArrayValue::new(1, 3, BaseType::Integer).unwrap();
        cells.set(2, Value::Integer(42));
        interp.scopes.declare(
            "a",
            Variable::new(
                Value::Array(cells),
                Type::Array {
                    lower: 1,
                    upper: 3,
                    element: BaseType::Integer,
                },
            ),
        );
        interp
            .scopes
            .declare("n", Variable::new(Value::Integer(5), Type::Base(BaseType::Integer)));

        assert_eq!(eval(&interp, "a[1 + 1]"), Ok(Value::Integer(42)));
        assert_eq!(eval(&interp, "a[4]").unwrap_err().kind(), ErrorKind::IndexOutOfBounds);
        assert_eq!(eval(&interp, "a[1]").unwrap_err().kind(), ErrorKind::Reference);
        assert_eq!(eval(&interp, "n[1]").unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(eval(&interp, "a[1.5]").unwrap_err().kind(), ErrorKind::Type);
    }

    #[test]
    fn test_condition_must_be_boolean() {
        let interp = Interpreter::default();
        let err = interp.evaluate_condition(&expr("1 + 1")).unwrap_err();
        assert!(matches!(err, RuntimeError::ConditionNotBoolean { .. }));
    }
}
