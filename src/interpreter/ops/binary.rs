use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{BinOp, SourceLocation};
use std::cmp::Ordering;

impl Interpreter {
    /// Apply an arithmetic or relational operator to two evaluated operands.
    ///
    /// `AND`/`OR` short-circuit and are handled by the evaluator before the
    /// right operand is computed; they only reach this function when both
    /// sides are already known.
    pub(crate) fn apply_binary(
        op: BinOp,
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul => {
                Self::checked_arithmetic(op, left, right, location)
            }
            BinOp::Div => Self::divide_values(left, right, location),
            BinOp::Mod => Self::modulo_values(left, right, location),
            BinOp::Pow => Self::power_values(left, right, location),
            BinOp::Eq | BinOp::Ne => {
                let equal = Self::values_equal(op, left, right, location)?;
                Ok(Value::Boolean(if op == BinOp::Eq { equal } else { !equal }))
            }
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                let ordering = Self::compare_values(op, left, right, location)?;
                let result = match op {
                    BinOp::Lt => ordering == Ordering::Less,
                    BinOp::Le => ordering != Ordering::Greater,
                    BinOp::Gt => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                };
                Ok(Value::Boolean(result))
            }
            BinOp::And | BinOp::Or => {
                let (Some(a), Some(b)) = (left.as_bool(), right.as_bool()) else {
                    return Err(Self::operand_error(op, left, right, location));
                };
                Ok(Value::Boolean(if op == BinOp::And { a && b } else { a || b }))
            }
        }
    }

    /// `+ - *`: INTEGER stays INTEGER with overflow checks, any REAL promotes
    fn checked_arithmetic(
        op: BinOp,
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if let (Value::Integer(a), Value::Integer(b)) = (left, right) {
            let result = match op {
                BinOp::Add => a.checked_add(*b),
                BinOp::Sub => a.checked_sub(*b),
                _ => a.checked_mul(*b),
            };
            return result.map(Value::Integer).ok_or_else(|| {
                RuntimeError::evaluation(
                    format!("Integer overflow in {} {} {}", a, op, b),
                    location,
                )
            });
        }

        match (left.as_real(), right.as_real()) {
            (Some(a), Some(b)) => Self::finite_real(
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    _ => a * b,
                },
                op,
                location,
            ),
            _ => Err(Self::operand_error(op, left, right, location)),
        }
    }

    /// `/` always produces REAL
    fn divide_values(
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let (Some(a), Some(b)) = (left.as_real(), right.as_real()) else {
            return Err(Self::operand_error(BinOp::Div, left, right, location));
        };
        if b == 0.0 {
            return Err(RuntimeError::evaluation("Division by zero", location));
        }
        Self::finite_real(a / b, BinOp::Div, location)
    }

    /// Integer remainder; the result takes the sign of the divisor
    fn modulo_values(
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let (Value::Integer(a), Value::Integer(b)) = (left, right) else {
            return Err(Self::operand_error(BinOp::Mod, left, right, location));
        };
        if *b == 0 {
            return Err(RuntimeError::evaluation("Modulo by zero", location));
        }
        let remainder = a.checked_rem(*b).ok_or_else(|| {
            RuntimeError::evaluation(format!("Integer overflow in {} MOD {}", a, b), location)
        })?;
        if remainder != 0 && (remainder < 0) != (*b < 0) {
            Ok(Value::Integer(remainder + b))
        } else {
            Ok(Value::Integer(remainder))
        }
    }

    fn power_values(
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if let (Value::Integer(base), Value::Integer(exponent)) = (left, right) {
            if *exponent >= 0 {
                return u32::try_from(*exponent)
                    .ok()
                    .and_then(|e| base.checked_pow(e))
                    .map(Value::Integer)
                    .ok_or_else(|| {
                        RuntimeError::evaluation(
                            format!("Integer overflow in {} ^ {}", base, exponent),
                            location,
                        )
                    });
            }
        }

        match (left.as_real(), right.as_real()) {
            (Some(a), Some(b)) => Self::finite_real(a.powf(b), BinOp::Pow, location),
            _ => Err(Self::operand_error(BinOp::Pow, left, right, location)),
        }
    }

    /// REAL results are always finite numbers
    fn finite_real(result: f64, op: BinOp, location: SourceLocation) -> Result<Value, RuntimeError> {
        if result.is_finite() {
            Ok(Value::Real(result))
        } else {
            Err(RuntimeError::evaluation(
                format!("REAL result of '{}' is not a finite number", op),
                location,
            ))
        }
    }

    fn values_equal(
        op: BinOp,
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<bool, RuntimeError> {
        match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(a == b),
            (Value::Boolean(a), Value::Boolean(b)) => Ok(a == b),
            (Value::String(a), Value::String(b)) => Ok(a == b),
            (Value::Char(a), Value::Char(b)) => Ok(a == b),
            _ => match (left.as_real(), right.as_real()) {
                (Some(a), Some(b)) => Ok(a == b),
                _ => Err(Self::operand_error(op, left, right, location)),
            },
        }
    }

    fn compare_values(
        op: BinOp,
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<Ordering, RuntimeError> {
        let ordering = match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Char(a), Value::Char(b)) => Some(a.cmp(b)),
            _ => match (left.as_real(), right.as_real()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        };
        ordering.ok_or_else(|| Self::operand_error(op, left, right, location))
    }

    fn operand_error(
        op: BinOp,
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> RuntimeError {
        RuntimeError::evaluation(
            format!(
                "Cannot apply '{}' to {} and {}",
                op,
                left.type_name(),
                right.type_name()
            ),
            location,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(op: BinOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
        Interpreter::apply_binary(op, &left, &right, SourceLocation::new(1, 1))
    }

    #[test]
    fn test_integer_arithmetic_stays_integer() {
        assert_eq!(apply(BinOp::Add, Value::Integer(2), Value::Integer(3)), Ok(Value::Integer(5)));
        assert_eq!(apply(BinOp::Mul, Value::Integer(4), Value::Integer(-2)), Ok(Value::Integer(-8)));
        assert_eq!(apply(BinOp::Add, Value::Integer(1), Value::Real(0.5)), Ok(Value::Real(1.5)));
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert!(apply(BinOp::Add, Value::Integer(i64::MAX), Value::Integer(1)).is_err());
        assert!(apply(BinOp::Pow, Value::Integer(10), Value::Integer(40)).is_err());
    }

    #[test]
    fn test_division_is_real() {
        assert_eq!(apply(BinOp::Div, Value::Integer(7), Value::Integer(2)), Ok(Value::Real(3.5)));
        assert_eq!(apply(BinOp::Div, Value::Integer(6), Value::Integer(3)), Ok(Value::Real(2.0)));
        assert!(apply(BinOp::Div, Value::Integer(1), Value::Integer(0)).is_err());
    }

    #[test]
    fn test_modulo_follows_divisor_sign() {
        assert_eq!(apply(BinOp::Mod, Value::Integer(7), Value::Integer(3)), Ok(Value::Integer(1)));
        assert_eq!(apply(BinOp::Mod, Value::Integer(-7), Value::Integer(3)), Ok(Value::Integer(2)));
        assert!(apply(BinOp::Mod, Value::Integer(7), Value::Integer(0)).is_err());
        assert!(apply(BinOp::Mod, Value::Real(7.0), Value::Integer(2)).is_err());
    }

    #[test]
    fn test_power() {
        assert_eq!(apply(BinOp::Pow, Value::Integer(2), Value::Integer(10)), Ok(Value::Integer(1024)));
        assert_eq!(apply(BinOp::Pow, Value::Integer(2), Value::Integer(-1)), Ok(Value::Real(0.5)));
    }

    #[test]
    fn test_real_results_stay_finite() {
        assert!(apply(BinOp::Mul, Value::Real(1e308), Value::Integer(10)).is_err());
        assert!(apply(BinOp::Pow, Value::Real(-8.0), Value::Real(0.5)).is_err());
        assert!(apply(BinOp::Div, Value::Real(1e308), Value::Real(1e-10)).is_err());
        assert_eq!(apply(BinOp::Sub, Value::Real(0.5), Value::Integer(2)), Ok(Value::Real(-1.5)));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(apply(BinOp::Lt, Value::Integer(1), Value::Real(1.5)), Ok(Value::Boolean(true)));
        assert_eq!(
            apply(BinOp::Ge, Value::String("b".into()), Value::String("a".into())),
            Ok(Value::Boolean(true))
        );
        assert_eq!(apply(BinOp::Ne, Value::Boolean(true), Value::Boolean(false)), Ok(Value::Boolean(true)));
        assert_eq!(apply(BinOp::Eq, Value::Integer(2), Value::Real(2.0)), Ok(Value::Boolean(true)));
    }

    #[test]
    fn test_incompatible_operands() {
        assert!(apply(BinOp::Add, Value::String("a".into()), Value::Integer(1)).is_err());
        assert!(apply(BinOp::Add, Value::String("a".into()), Value::String("b".into())).is_err());
        assert!(apply(BinOp::Lt, Value::Boolean(true), Value::Boolean(false)).is_err());
        assert!(apply(BinOp::Eq, Value::Char('a'), Value::String("a".into())).is_err());
    }
}
