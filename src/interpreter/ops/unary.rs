use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{SourceLocation, UnOp};

impl Interpreter {
    pub(crate) fn apply_unary(
        op: UnOp,
        operand: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match (op, operand) {
            (UnOp::Neg, Value::Integer(n)) => n.checked_neg().map(Value::Integer).ok_or_else(|| {
                RuntimeError::evaluation(format!("Integer overflow in -{}", n), location)
            }),
            (UnOp::Neg, Value::Real(r)) => Ok(Value::Real(-r)),
            (UnOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
            (UnOp::Neg, other) => Err(RuntimeError::evaluation(
                format!("Cannot negate {}", other.type_name()),
                location,
            )),
            (UnOp::Not, other) => Err(RuntimeError::evaluation(
                format!("NOT needs a BOOLEAN operand, got {}", other.type_name()),
                location,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unary_operators() {
        let loc = SourceLocation::new(1, 1);
        assert_eq!(Interpreter::apply_unary(UnOp::Neg, &Value::Integer(3), loc), Ok(Value::Integer(-3)));
        assert_eq!(Interpreter::apply_unary(UnOp::Neg, &Value::Real(1.5), loc), Ok(Value::Real(-1.5)));
        assert_eq!(
            Interpreter::apply_unary(UnOp::Not, &Value::Boolean(false), loc),
            Ok(Value::Boolean(true))
        );
        assert!(Interpreter::apply_unary(UnOp::Not, &Value::Integer(1), loc).is_err());
        assert!(Interpreter::apply_unary(UnOp::Neg, &Value::Integer(i64::MIN), loc).is_err());
    }
}
