//! Procedure definition and invocation.
//!
//! Procedures live in one flat global table keyed by name. A call evaluates
//! its arguments left to right before anything else happens, then binds them
//! by value in a new scope. That scope is chained to the caller's current
//! scope, so a procedure body can read and assign the caller's variables.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::frames::LoopFrame;
use crate::parser::ast::{Expr, Line, SourceLocation};
use crate::parser::segment::Block;
use std::sync::Arc;
use tracing::debug;

/// A defined procedure: parameter names plus its owned body lines
#[derive(Debug, Clone, PartialEq)]
pub struct Procedure {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Line>,
    /// The ENDPROCEDURE line, recorded as the last step of every call
    pub close: Line,
}

impl Interpreter {
    pub(crate) fn define_procedure(&mut self, lines: &[Line], block: &Block, name: &str, params: &[String]) {
        let procedure = Procedure {
            name: name.to_string(),
            params: params.to_vec(),
            body: lines[block.body.clone()].to_vec(),
            close: lines[block.close].clone(),
        };

        let replaced = self
            .procedures
            .insert(name.to_string(), Arc::new(procedure))
            .is_some();
        debug!(procedure = name, params = params.len(), replaced, "procedure defined");
    }

    /// Call a procedure. Arity is checked before any scope is pushed.
    pub(crate) fn call_procedure(
        &mut self,
        name: &str,
        args: &[Expr],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let procedure = self
            .procedures
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedProcedure {
                name: name.to_string(),
                location,
            })?;

        let values = args
            .iter()
            .map(|arg| self.evaluate(arg))
            .collect::<Result<Vec<_>, _>>()?;

        if values.len() != procedure.params.len() {
            return Err(RuntimeError::ArityMismatch {
                procedure: name.to_string(),
                expected: procedure.params.len(),
                got: values.len(),
                location,
            });
        }

        let limit = self.limits.max_call_depth;
        if self.call_depth >= limit {
            return Err(RuntimeError::RecursionLimit {
                procedure: name.to_string(),
                limit,
                location,
            });
        }

        self.call_depth += 1;
        let result = self.in_scope(Some(LoopFrame::procedure(name)), |this| {
            for (param, value) in procedure.params.iter().zip(values) {
                let variable = Self::typed(value, location)?;
                this.scopes.declare(param, variable);
            }
            this.run_block(&procedure.body, 0..procedure.body.len())?;
            this.record_step(&procedure.close)
        });
        self.call_depth -= 1;
        result
    }
}
