//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents every runtime
//! value of the dialect, and [`ArrayValue`], the fixed-bounds array payload.
//!
//! # Value Types
//!
//! - [`Value::Integer`]: 64-bit signed integer
//! - [`Value::Real`]: 64-bit float
//! - [`Value::Boolean`], [`Value::Char`], [`Value::String`]
//! - [`Value::Array`]: inclusive `[lower, upper]` bounds, one element type
//! - [`Value::Unset`]: marker for a declared but never assigned variable
//!
//! # Typing
//!
//! Types are inferred from values on every plain assignment, so a variable
//! declared `INTEGER` becomes `REAL` after `x ← 2.5`. This is a dialect rule,
//! not a missing check. Array cells are the exception: they keep the element
//! type fixed at declaration, with INTEGER widened to REAL where needed.

use crate::parser::ast::{BaseType, Type};
use std::fmt;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Char(char),
    String(String),
    Array(ArrayValue),
    #[default]
    Unset,
}

impl Value {
    /// Check if this value has been assigned
    pub fn is_set(&self) -> bool {
        !matches!(self, Value::Unset)
    }

    /// The type tag this value implies, or `None` for [`Value::Unset`]
    pub fn infer_type(&self) -> Option<Type> {
        let base = match self {
            Value::Integer(_) => BaseType::Integer,
            Value::Real(_) => BaseType::Real,
            Value::Boolean(_) => BaseType::Boolean,
            Value::Char(_) => BaseType::Char,
            Value::String(_) => BaseType::String,
            Value::Array(array) => {
                return Some(Type::Array {
                    lower: array.lower,
                    upper: array.upper,
                    element: array.element,
                })
            }
            Value::Unset => return None,
        };
        Some(Type::Base(base))
    }

    /// Human-readable name of the value's type, used in diagnostics
    pub fn type_name(&self) -> String {
        match self.infer_type() {
            Some(t) => t.to_string(),
            None => "unset value".to_string(),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view used by mixed INTEGER/REAL arithmetic
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Convert this value for storage in a cell of type `base`.
    ///
    /// Only INTEGER → REAL widening is performed; anything else must already
    /// match. Returns the value unchanged in `Err` when it does not fit.
    pub fn coerce_to(self, base: BaseType) -> Result<Value, Value> {
        match (self, base) {
            (Value::Integer(n), BaseType::Real) => Ok(Value::Real(n as f64)),
            (v @ Value::Integer(_), BaseType::Integer)
            | (v @ Value::Real(_), BaseType::Real)
            | (v @ Value::Boolean(_), BaseType::Boolean)
            | (v @ Value::Char(_), BaseType::Char)
            | (v @ Value::String(_), BaseType::String) => Ok(v),
            (v, _) => Err(v),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            // Whole numbers keep one fractional digit: 3.0, 1e20 as 100000000000000000000.0
            Value::Real(r) if r.is_finite() && r.fract() == 0.0 => write!(f, "{:.1}", r),
            Value::Real(r) => write!(f, "{}", r),
            Value::Boolean(true) => f.write_str("TRUE"),
            Value::Boolean(false) => f.write_str("FALSE"),
            Value::Char(c) => write!(f, "{}", c),
            Value::String(s) => f.write_str(s),
            Value::Array(array) => write!(f, "{}", array),
            Value::Unset => f.write_str("unset"),
        }
    }
}

/// Fixed-size array with inclusive bounds
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    pub lower: i64,
    pub upper: i64,
    pub element: BaseType,
    pub elements: Vec<Value>,
}

impl ArrayValue {
    /// Create an array of `upper - lower + 1` unset cells.
    ///
    /// Returns `None` if the bounds are inverted, the size overflows, or the
    /// cells cannot be allocated.
    pub fn new(lower: i64, upper: i64, element: BaseType) -> Option<Self> {
        if lower > upper {
            return None;
        }
        let len = upper.checked_sub(lower)?.checked_add(1)?;
        let len = usize::try_from(len).ok()?;

        let mut elements = Vec::new();
        elements.try_reserve_exact(len).ok()?;
        elements.resize(len, Value::Unset);
        Some(ArrayValue {
            lower,
            upper,
            element,
            elements,
        })
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains_index(&self, index: i64) -> bool {
        (self.lower..=self.upper).contains(&index)
    }

    fn offset(&self, index: i64) -> Option<usize> {
        if self.contains_index(index) {
            usize::try_from(index - self.lower).ok()
        } else {
            None
        }
    }

    /// Element at a pseudocode index (not a zero-based offset)
    pub fn get(&self, index: i64) -> Option<&Value> {
        self.offset(index).and_then(|i| self.elements.get(i))
    }

    /// Store at a pseudocode index. Out-of-range writes leave the array untouched.
    pub fn set(&mut self, index: i64, value: Value) -> bool {
        match self.offset(index) {
            Some(i) => {
                self.elements[i] = value;
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", element)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printed_forms() {
        assert_eq!(Value::Integer(-4).to_string(), "-4");
        assert_eq!(Value::Real(3.0).to_string(), "3.0");
        assert_eq!(Value::Real(2.5).to_string(), "2.5");
        assert_eq!(Value::Real(1e20).to_string(), "100000000000000000000.0");
        assert_eq!(Value::Real(1e-7).to_string(), "0.0000001");
        assert_eq!(Value::Real(-4.0).to_string(), "-4.0");
        assert_eq!(Value::Boolean(true).to_string(), "TRUE");
        assert_eq!(Value::Char('q').to_string(), "q");
        assert_eq!(Value::String("hi there".into()).to_string(), "hi there");
        assert_eq!(Value::Unset.to_string(), "unset");
    }

    #[test]
    fn test_array_bounds_are_inclusive() {
        let mut array = ArrayValue::new(1, 3, BaseType::Integer).unwrap();
        assert_eq!(array.len(), 3);

        assert!(array.set(1, Value::Integer(10)));
        assert!(array.set(3, Value::Integer(30)));
        assert!(!array.set(0, Value::Integer(0)));
        assert!(!array.set(4, Value::Integer(40)));

        assert_eq!(array.get(1), Some(&Value::Integer(10)));
        assert_eq!(array.get(2), Some(&Value::Unset));
        assert_eq!(array.get(4), None);
        assert_eq!(array.to_string(), "[10, unset, 30]");
    }

    #[test]
    fn test_negative_lower_bound() {
        let mut array = ArrayValue::new(-2, 0, BaseType::Char).unwrap();
        assert!(array.set(-2, Value::Char('a')));
        assert_eq!(array.get(-2), Some(&Value::Char('a')));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(ArrayValue::new(5, 1, BaseType::Integer).is_none());
    }

    #[test]
    fn test_infer_type() {
        assert_eq!(
            Value::Real(1.5).infer_type(),
            Some(Type::Base(BaseType::Real))
        );
        assert_eq!(Value::Unset.infer_type(), None);

        let array = ArrayValue::new(0, 1, BaseType::String).unwrap();
        assert_eq!(
            Value::Array(array).infer_type(),
            Some(Type::Array {
                lower: 0,
                upper: 1,
                element: BaseType::String
            })
        );
    }

    #[test]
    fn test_coerce_widens_integer_only() {
        assert_eq!(
            Value::Integer(2).coerce_to(BaseType::Real),
            Ok(Value::Real(2.0))
        );
        assert_eq!(
            Value::Real(2.5).coerce_to(BaseType::Integer),
            Err(Value::Real(2.5))
        );
        assert_eq!(
            Value::Char('x').coerce_to(BaseType::String),
            Err(Value::Char('x'))
        );
    }
}
