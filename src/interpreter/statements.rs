//! Simple statement execution: declarations, assignment, OUTPUT and INPUT.
//!
//! Adds `impl Interpreter` methods for every statement that does not open a
//! block. Plain assignment re-infers the variable's type from the new value;
//! array cells keep their declared element type.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::scope::Variable;
use crate::memory::value::{ArrayValue, Value};
use crate::parser::ast::{BaseType, Expr, SourceLocation, Target, Type};

impl Interpreter {
    /// `DECLARE name:TYPE` binds an unset value in the current scope
    pub(crate) fn execute_declare(&mut self, name: &str, base: BaseType) -> Result<(), RuntimeError> {
        self.scopes
            .declare(name, Variable::new(Value::Unset, Type::Base(base)));
        Ok(())
    }

    /// `ARRAY name[lower:upper] OF TYPE`
    pub(crate) fn execute_array_decl(
        &mut self,
        name: &str,
        lower: &Expr,
        upper: &Expr,
        element: BaseType,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let lower = self.evaluate_integer(lower, "array lower bound")?;
        let upper = self.evaluate_integer(upper, "array upper bound")?;

        // Checked before allocating; inverted bounds are rejected below
        let count = (i128::from(upper) - i128::from(lower) + 1).max(0).unsigned_abs();
        let limit = self.limits.max_array_cells;
        if count > limit as u128 {
            return Err(RuntimeError::ArrayTooLarge {
                name: name.to_string(),
                cells: count,
                limit,
                location,
            });
        }

        let cells = ArrayValue::new(lower, upper, element).ok_or_else(|| {
            RuntimeError::evaluation(
                format!("Invalid bounds [{}:{}] for array '{}'", lower, upper, name),
                location,
            )
        })?;

        self.scopes.declare(
            name,
            Variable::new(
                Value::Array(cells),
                Type::Array {
                    lower,
                    upper,
                    element,
                },
            ),
        );
        Ok(())
    }

    pub(crate) fn execute_assign(
        &mut self,
        target: &Target,
        value: &Expr,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        match target {
            Target::Variable(name) => {
                let value = self.evaluate(value)?;
                let variable = Self::typed(value, location)?;
                if self.scopes.assign(name, variable.value, variable.var_type) {
                    Ok(())
                } else {
                    Err(RuntimeError::UndefinedVariable {
                        name: name.clone(),
                        location,
                    })
                }
            }
            Target::Element { array, index } => {
                let index = self.evaluate_integer(index, "Array index")?;
                let value = self.evaluate(value)?;
                self.store_element(array, index, value, location)
            }
        }
    }

    /// Store into one array cell. Nothing changes unless every check passes.
    fn store_element(
        &mut self,
        array: &str,
        index: i64,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let variable = self
            .scopes
            .get_mut(array)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: array.to_string(),
                location,
            })?;

        let Value::Array(cells) = &mut variable.value else {
            return Err(RuntimeError::NotAnArray {
                name: array.to_string(),
                location,
            });
        };

        if !cells.contains_index(index) {
            return Err(RuntimeError::IndexOutOfBounds {
                array: array.to_string(),
                index,
                lower: cells.lower,
                upper: cells.upper,
                location,
            });
        }

        let element = cells.element;
        let value = value
            .coerce_to(element)
            .map_err(|v| RuntimeError::type_mismatch(element.to_string(), v.type_name(), location))?;
        cells.set(index, value);
        Ok(())
    }

    /// `OUTPUT e1, e2, ...` prints all items on one line
    pub(crate) fn execute_output(&mut self, items: &[Expr]) -> Result<(), RuntimeError> {
        let mut text = String::new();
        for item in items {
            let value = self.evaluate(item)?;
            text.push_str(&value.to_string());
        }
        self.emit(text);
        Ok(())
    }

    /// `INPUT name` stores the next input line as a STRING
    pub(crate) fn execute_input(&mut self, name: &str, location: SourceLocation) -> Result<(), RuntimeError> {
        if self.scopes.get(name).is_none() {
            return Err(RuntimeError::UndefinedVariable {
                name: name.to_string(),
                location,
            });
        }

        let line = self
            .input
            .read_line()
            .ok_or_else(|| RuntimeError::InputUnavailable {
                name: name.to_string(),
                location,
            })?;

        self.scopes
            .assign(name, Value::String(line), Type::Base(BaseType::String));
        Ok(())
    }
}
