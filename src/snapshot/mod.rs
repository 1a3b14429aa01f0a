// Step trace recording for replay

use crate::memory::scope::{ScopeChain, Variable};
use serde::Serialize;
use std::collections::BTreeMap;
use std::mem;

/// Output buffer capturing what the program prints
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    pub lines: Vec<OutputLine>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        OutputBuffer { lines: Vec::new() }
    }

    /// Append one output line produced by source line `line`
    pub fn print(&mut self, text: String, line: usize) {
        self.lines.push(OutputLine { text, line });
    }

    /// Get all lines as a vector of strings
    pub fn get_output(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text.clone()).collect()
    }

    /// All lines joined with newlines
    pub fn text(&self) -> String {
        self.get_output().join("\n")
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// A line of output with the source line that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLine {
    pub text: String,
    pub line: usize,
}

/// Printed value and type of one variable at one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableView {
    pub value: String,
    #[serde(rename = "type")]
    pub var_type: String,
}

impl From<&Variable> for VariableView {
    fn from(variable: &Variable) -> Self {
        VariableView {
            value: variable.value.to_string(),
            var_type: variable.var_type.to_string(),
        }
    }
}

/// Flatten the visible scope chain into name → view, inner shadowing outer
pub fn capture_variables(scopes: &ScopeChain) -> BTreeMap<String, VariableView> {
    scopes
        .visible()
        .into_iter()
        .map(|(name, variable)| (name.to_string(), VariableView::from(variable)))
        .collect()
}

/// One executed statement: the line, the variables visible *before* it ran,
/// and whatever output it produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionStep {
    pub line_number: usize,
    pub line: String,
    pub variables: BTreeMap<String, VariableView>,
    pub output: Option<String>,
}

impl ExecutionStep {
    /// Estimate the memory usage of this step in bytes
    pub fn estimated_size(&self) -> usize {
        // Rough estimate: owned text plus a fixed cost per map entry
        const ENTRY_OVERHEAD: usize = 64;

        let vars: usize = self
            .variables
            .iter()
            .map(|(name, view)| {
                ENTRY_OVERHEAD + name.len() + view.value.len() + view.var_type.len()
            })
            .sum();
        mem::size_of::<Self>() + self.line.len() + vars + self.output.as_ref().map_or(0, String::len)
    }
}

/// Why a step could not be recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFull {
    /// The step count reached this limit
    Steps(usize),
    /// The estimated size would pass this many bytes
    Memory(usize),
}

/// Append-only step log with a forward-only replay cursor
#[derive(Debug)]
pub struct TraceRecorder {
    steps: Vec<ExecutionStep>,
    max_steps: usize,
    max_memory: usize,
    current_memory: usize,
    cursor: usize,
}

impl TraceRecorder {
    pub fn new(max_steps: usize, max_memory: usize) -> Self {
        TraceRecorder {
            steps: Vec::new(),
            max_steps,
            max_memory,
            current_memory: 0,
            cursor: 0,
        }
    }

    /// Append a step. Fails once the step count or memory budget is used up.
    pub fn push(&mut self, step: ExecutionStep) -> Result<(), TraceFull> {
        if self.steps.len() >= self.max_steps {
            return Err(TraceFull::Steps(self.max_steps));
        }

        let step_size = step.estimated_size();
        if self.current_memory.saturating_add(step_size) > self.max_memory {
            return Err(TraceFull::Memory(self.max_memory));
        }

        self.current_memory += step_size;
        self.steps.push(step);
        Ok(())
    }

    /// Attach output text to the most recently recorded step
    pub fn append_output(&mut self, text: &str) {
        if let Some(step) = self.steps.last_mut() {
            match &mut step.output {
                Some(existing) => {
                    existing.push('\n');
                    existing.push_str(text);
                    self.current_memory += text.len() + 1;
                }
                None => {
                    step.output = Some(text.to_string());
                    self.current_memory += text.len();
                }
            }
        }
    }

    /// Next step of the replay, or `None` at the end of the trace
    pub fn next_step(&mut self) -> Option<&ExecutionStep> {
        let step = self.steps.get(self.cursor)?;
        self.cursor += 1;
        Some(step)
    }

    /// Drop all steps and rewind the cursor
    pub fn clear(&mut self) {
        self.steps.clear();
        self.current_memory = 0;
        self.cursor = 0;
    }

    pub fn get(&self, index: usize) -> Option<&ExecutionStep> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[ExecutionStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Replay cursor position
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Estimated bytes held by the recorded steps
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(line_number: usize) -> ExecutionStep {
        ExecutionStep {
            line_number,
            line: format!("OUTPUT {}", line_number),
            variables: BTreeMap::new(),
            output: None,
        }
    }

    #[test]
    fn test_output_attaches_to_latest_step() {
        let mut trace = TraceRecorder::new(10, usize::MAX);
        trace.push(step(1)).unwrap();
        trace.push(step(2)).unwrap();
        trace.append_output("a");
        trace.append_output("b");

        assert_eq!(trace.get(0).unwrap().output, None);
        assert_eq!(trace.get(1).unwrap().output.as_deref(), Some("a\nb"));
    }

    #[test]
    fn test_cursor_is_forward_only() {
        let mut trace = TraceRecorder::new(10, usize::MAX);
        trace.push(step(1)).unwrap();
        trace.push(step(2)).unwrap();

        assert_eq!(trace.next_step().map(|s| s.line_number), Some(1));
        assert_eq!(trace.next_step().map(|s| s.line_number), Some(2));
        assert!(trace.next_step().is_none());
        assert!(trace.next_step().is_none());
        assert_eq!(trace.position(), 2);
    }

    #[test]
    fn test_step_limit() {
        let mut trace = TraceRecorder::new(1, usize::MAX);
        trace.push(step(1)).unwrap();
        assert_eq!(trace.push(step(2)), Err(TraceFull::Steps(1)));
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn test_memory_limit() {
        let size = step(1).estimated_size();
        let mut trace = TraceRecorder::new(100, size * 2 + 1);

        trace.push(step(1)).unwrap();
        trace.push(step(2)).unwrap();
        assert_eq!(trace.memory_usage(), size * 2);
        assert_eq!(trace.push(step(3)), Err(TraceFull::Memory(size * 2 + 1)));
        assert_eq!(trace.len(), 2);

        trace.clear();
        assert_eq!(trace.memory_usage(), 0);
        trace.push(step(3)).unwrap();
    }

    #[test]
    fn test_variables_count_towards_size() {
        let mut with_vars = step(1);
        with_vars.variables.insert(
            "scores".to_string(),
            VariableView {
                value: "[1, 2, 3]".to_string(),
                var_type: "ARRAY[1:3] OF INTEGER".to_string(),
            },
        );
        assert!(with_vars.estimated_size() > step(1).estimated_size() + 30);
    }

    #[test]
    fn test_clear_rewinds() {
        let mut trace = TraceRecorder::new(5, usize::MAX);
        trace.push(step(1)).unwrap();
        trace.next_step();
        trace.clear();

        assert!(trace.is_empty());
        assert_eq!(trace.position(), 0);
    }

    #[test]
    fn test_output_buffer_text() {
        let mut output = OutputBuffer::new();
        output.print("1".to_string(), 3);
        output.print("2".to_string(), 3);
        assert_eq!(output.text(), "1\n2");
        assert_eq!(output.lines[0].line, 3);
    }
}
