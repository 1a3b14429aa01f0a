//! Full-run versus step-replay comparison.
//!
//! Runs a program once, then resets and runs it again while draining the
//! replay cursor. Concatenating the outputs of the replayed steps must give
//! the text of the first run.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::input::QueuedInput;
use crate::snapshot::ExecutionStep;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    /// Step outputs concatenate to the full-run output
    pub output_match: bool,
    /// Both runs recorded the same lines in the same order
    pub trace_match: bool,
    /// Both runs recorded the same variables at every step
    pub variable_match: bool,
    pub full_output: String,
    pub step_output: String,
    pub steps: usize,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.output_match && self.trace_match && self.variable_match
    }
}

impl Interpreter {
    /// Compare a full run of `source` against the step replay of a fresh run.
    ///
    /// Each run reads INPUT lines from its own copy of `input`. The
    /// interpreter is left holding the replayed run with its cursor at the end.
    pub fn check_consistency(&mut self, source: &str, input: &[String]) -> ConsistencyReport {
        self.reset_execution();
        self.queue_input(input);
        let full_output = self.interpret(source);
        let full_steps: Vec<ExecutionStep> = self.trace.steps().to_vec();

        self.reset_execution();
        self.queue_input(input);
        self.interpret(source);

        let mut replayed = Vec::new();
        while let Some(step) = self.next_step() {
            replayed.push(step);
        }

        let step_output = replayed
            .iter()
            .filter_map(|step| step.output.as_deref())
            .collect::<Vec<_>>()
            .join("\n");

        let same_length = full_steps.len() == replayed.len();
        let trace_match = same_length
            && full_steps
                .iter()
                .zip(&replayed)
                .all(|(a, b)| a.line_number == b.line_number && a.line == b.line);
        let variable_match = same_length
            && full_steps
                .iter()
                .zip(&replayed)
                .all(|(a, b)| a.variables == b.variables);

        ConsistencyReport {
            output_match: full_output == step_output,
            trace_match,
            variable_match,
            full_output,
            step_output,
            steps: replayed.len(),
        }
    }

    fn queue_input(&mut self, input: &[String]) {
        self.set_input_source(Box::new(input.iter().cloned().collect::<QueuedInput>()));
    }
}
