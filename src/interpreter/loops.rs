//! Block statement execution (`IF`, `FOR`, `WHILE`).
//!
//! Each branch or iteration body runs through [`Interpreter::run_block`] in a
//! freshly pushed scope, so names declared inside do not survive the
//! iteration. The matching closer line (ENDIF, NEXT/ENDFOR, ENDWHILE) is
//! recorded as a step just before that scope is popped.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::frames::LoopFrame;
use crate::memory::scope::Variable;
use crate::memory::value::Value;
use crate::parser::ast::{BaseType, Expr, Line, SourceLocation, Type};
use crate::parser::segment::Block;

impl Interpreter {
    pub(crate) fn execute_if(
        &mut self,
        lines: &[Line],
        block: &Block,
        condition: &Expr,
    ) -> Result<(), RuntimeError> {
        let branch = if self.evaluate_condition(condition)? {
            Some(block.body.clone())
        } else {
            block.else_body.clone()
        };

        self.in_scope(None, |this| {
            if let Some(range) = branch {
                this.run_block(lines, range)?;
            }
            this.record_step(&lines[block.close])
        })
    }

    /// Counted loop over `start..=end`, bounds evaluated once
    pub(crate) fn execute_for(
        &mut self,
        lines: &[Line],
        block: &Block,
        var: &str,
        start: &Expr,
        end: &Expr,
    ) -> Result<(), RuntimeError> {
        let start = self.evaluate_integer(start, "FOR start")?;
        let end = self.evaluate_integer(end, "FOR end")?;
        let location = Self::line_location(&lines[block.open]);

        for (iteration, j) in (start..=end).enumerate() {
            let iteration = iteration + 1;
            self.check_iterations(iteration, location)?;

            self.in_scope(Some(LoopFrame::for_loop(var, iteration)), |this| {
                this.scopes.declare(
                    var,
                    Variable::new(Value::Integer(j), Type::Base(BaseType::Integer)),
                );
                this.run_block(lines, block.body.clone())?;
                this.record_step(&lines[block.close])
            })?;
        }
        Ok(())
    }

    /// Condition re-evaluated before every iteration
    pub(crate) fn execute_while(
        &mut self,
        lines: &[Line],
        block: &Block,
        condition: &Expr,
    ) -> Result<(), RuntimeError> {
        let location = Self::line_location(&lines[block.open]);
        let mut iteration = 0;

        while self.evaluate_condition(condition)? {
            iteration += 1;
            self.check_iterations(iteration, location)?;

            self.in_scope(Some(LoopFrame::while_loop(iteration)), |this| {
                this.run_block(lines, block.body.clone())?;
                this.record_step(&lines[block.close])
            })?;
        }
        Ok(())
    }

    fn check_iterations(&self, iteration: usize, location: SourceLocation) -> Result<(), RuntimeError> {
        let limit = self.limits.max_loop_iterations;
        if iteration > limit {
            return Err(RuntimeError::IterationLimit { limit, location });
        }
        Ok(())
    }
}
