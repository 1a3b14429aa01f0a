// Execution engine for the pseudocode interpreter

use crate::config::Limits;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::frames::LoopFrame;
use crate::interpreter::input::{InputSource, QueuedInput};
use crate::interpreter::procedures::Procedure;
use crate::interpreter::stack::ensure_sufficient_stack;
use crate::memory::scope::{ScopeChain, Variable};
use crate::memory::value::Value;
use crate::parser::ast::{BlockKind, Line, SourceLocation, Stmt};
use crate::parser::parse_program;
use crate::parser::segment::{segment, Block};
use crate::snapshot::{
    capture_variables, ExecutionStep, OutputBuffer, TraceFull, TraceRecorder, VariableView,
};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, warn};

/// The interpreter: scope chain, procedure table, output and step trace
pub struct Interpreter {
    pub(crate) limits: Limits,

    /// Variable bindings, global scope at the root
    pub(crate) scopes: ScopeChain,

    /// Global procedure table; redefinition overwrites
    pub(crate) procedures: FxHashMap<String, Arc<Procedure>>,

    /// Live FOR/WHILE/PROCEDURE activations, innermost last
    pub(crate) frames: Vec<LoopFrame>,

    /// Everything the last run printed, diagnostics included
    pub(crate) output: OutputBuffer,

    /// Steps recorded by the last run, plus the replay cursor
    pub(crate) trace: TraceRecorder,

    pub(crate) input: Box<dyn InputSource>,

    /// Source line of the statement being executed
    pub(crate) current_line: usize,

    /// Number of procedure activations currently on the stack
    pub(crate) call_depth: usize,

    pub(crate) last_error: Option<String>,
}

impl Interpreter {
    pub fn new(limits: Limits) -> Self {
        Interpreter {
            limits,
            scopes: ScopeChain::new(),
            procedures: FxHashMap::default(),
            frames: Vec::new(),
            output: OutputBuffer::new(),
            trace: TraceRecorder::new(limits.max_trace_steps, limits.max_trace_bytes),
            input: Box::new(QueuedInput::new()),
            current_line: 0,
            call_depth: 0,
            last_error: None,
        }
    }

    /// Run a whole program and return everything it printed.
    ///
    /// Never fails: statement errors become inline diagnostics and fatal
    /// errors end the run with a final `Fatal error` entry. Each call starts a
    /// fresh trace and output buffer; variables and procedures persist until
    /// [`Interpreter::reset_execution`].
    pub fn interpret(&mut self, source: &str) -> String {
        let program = parse_program(source);

        self.output.clear();
        self.trace.clear();
        self.frames.clear();
        self.call_depth = 0;
        self.current_line = 0;
        self.last_error = None;

        debug!(lines = program.len(), "starting run");

        if let Err(err) = self.run_block(&program.lines, 0..program.len()) {
            let line = match err.location().line {
                0 => self.current_line,
                n => n,
            };
            warn!(line, error = %err, "run aborted");
            let message = format!("Fatal error on line {}: {}", line, err);
            self.emit(message.clone());
            self.last_error = Some(message);
        }

        debug!(
            steps = self.trace.len(),
            trace_bytes = self.trace.memory_usage(),
            output_lines = self.output.lines.len(),
            "run finished"
        );

        self.output.text()
    }

    /// Clear the trace, cursor, loop frames, output, scopes and procedures
    pub fn reset_execution(&mut self) {
        self.scopes.reset();
        self.procedures.clear();
        self.frames.clear();
        self.output.clear();
        self.trace.clear();
        self.call_depth = 0;
        self.current_line = 0;
        self.last_error = None;
    }

    /// Next recorded step of the last run, or `None` at the end of the trace
    pub fn next_step(&mut self) -> Option<ExecutionStep> {
        self.trace.next_step().cloned()
    }

    /// All variables visible from the current scope, inner bindings shadowing outer
    pub fn get_all_variables(&self) -> BTreeMap<String, VariableView> {
        capture_variables(&self.scopes)
    }

    /// Output lines of the last run
    pub fn output_lines(&self) -> Vec<String> {
        self.output.get_output()
    }

    pub fn output_text(&self) -> String {
        self.output.text()
    }

    /// Most recent diagnostic of the last run
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn trace(&self) -> &TraceRecorder {
        &self.trace
    }

    /// Names of all defined procedures, sorted
    pub fn procedure_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.procedures.keys().cloned().collect();
        names.sort();
        names
    }

    /// Queue a line for a future INPUT statement
    pub fn provide_input(&mut self, line: impl Into<String>) {
        self.input.push_line(line.into());
    }

    pub fn set_input_source(&mut self, input: Box<dyn InputSource>) {
        self.input = input;
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Execute `lines[range]`, catching recoverable errors per statement.
    ///
    /// Every nested body runs through its own call, so an error inside a loop
    /// iteration only skips the rest of that statement at its own level.
    pub(crate) fn run_block(&mut self, lines: &[Line], range: Range<usize>) -> Result<(), RuntimeError> {
        ensure_sufficient_stack(|| {
            let mut index = range.start;
            while index < range.end {
                let line = &lines[index];
                let (next, result) = self.execute_line(lines, index, range.end);
                match result {
                    Ok(()) => {}
                    Err(err) if err.is_fatal() => return Err(err),
                    Err(err) => self.report_error(line, &err),
                }
                index = next;
            }
            Ok(())
        })
    }

    /// Execute one line, returning the index to continue from
    fn execute_line(
        &mut self,
        lines: &[Line],
        index: usize,
        end: usize,
    ) -> (usize, Result<(), RuntimeError>) {
        let line = &lines[index];
        self.current_line = line.number;

        if let Err(err) = self.record_step(line) {
            return (end, Err(err));
        }

        if line.stmt.opens().is_none() {
            return (index + 1, self.execute_statement(line));
        }

        match segment(lines, index, end) {
            Ok(block) => {
                let next = block.next;
                (next, self.execute_block(lines, &block))
            }
            Err(source) => (
                index + 1,
                Err(RuntimeError::Block {
                    source,
                    location: Self::line_location(line),
                }),
            ),
        }
    }

    /// Dispatch a single-line statement
    fn execute_statement(&mut self, line: &Line) -> Result<(), RuntimeError> {
        let location = Self::line_location(line);
        match &line.stmt {
            Stmt::Declare { name, base } => self.execute_declare(name, *base),
            Stmt::ArrayDecl {
                name,
                lower,
                upper,
                element,
            } => self.execute_array_decl(name, lower, upper, *element, location),
            Stmt::Assign { target, value } => self.execute_assign(target, value, location),
            Stmt::Output { items } => self.execute_output(items),
            Stmt::Input { name } => self.execute_input(name, location),
            Stmt::Call { name, args } => self.call_procedure(name, args, location),
            Stmt::Invalid(err) => Err(err.clone().into()),
            Stmt::Else => Err(Self::orphan("ELSE", "IF", location)),
            Stmt::EndIf => Err(Self::orphan("ENDIF", "IF", location)),
            Stmt::Next { .. } => Err(Self::orphan("NEXT", "FOR", location)),
            Stmt::EndFor => Err(Self::orphan("ENDFOR", "FOR", location)),
            Stmt::EndWhile => Err(Self::orphan("ENDWHILE", "WHILE", location)),
            Stmt::EndProcedure => Err(Self::orphan("ENDPROCEDURE", "PROCEDURE", location)),
            Stmt::If { .. } | Stmt::For { .. } | Stmt::While { .. } | Stmt::Procedure { .. } => {
                Err(RuntimeError::Structural {
                    message: format!("{} must be executed as a block", line.text),
                    location,
                })
            }
        }
    }

    /// Dispatch a segmented block to its handler
    fn execute_block(&mut self, lines: &[Line], block: &Block) -> Result<(), RuntimeError> {
        let opener = &lines[block.open];
        match (&opener.stmt, block.kind) {
            (Stmt::If { condition }, BlockKind::If) => self.execute_if(lines, block, condition),
            (Stmt::For { var, start, end }, BlockKind::For) => {
                self.execute_for(lines, block, var, start, end)
            }
            (Stmt::While { condition }, BlockKind::While) => {
                self.execute_while(lines, block, condition)
            }
            (Stmt::Procedure { name, params }, BlockKind::Procedure) => {
                self.define_procedure(lines, block, name, params);
                Ok(())
            }
            _ => Err(RuntimeError::Structural {
                message: format!("'{}' does not open a block", opener.text),
                location: Self::line_location(opener),
            }),
        }
    }

    /// Record a step for `line` with the variables visible right now
    pub(crate) fn record_step(&mut self, line: &Line) -> Result<(), RuntimeError> {
        let step = ExecutionStep {
            line_number: line.number,
            line: line.text.clone(),
            variables: capture_variables(&self.scopes),
            output: None,
        };
        let location = Self::line_location(line);
        self.trace.push(step).map_err(|full| match full {
            TraceFull::Steps(limit) => RuntimeError::TraceLimitExceeded { limit, location },
            TraceFull::Memory(limit) => RuntimeError::TraceMemoryExceeded { limit, location },
        })
    }

    /// Run `body` in a freshly pushed scope (and frame), popping both afterwards
    pub(crate) fn in_scope<T>(
        &mut self,
        frame: Option<LoopFrame>,
        body: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        self.scopes.push();
        let has_frame = frame.is_some();
        if let Some(frame) = frame {
            self.frames.push(frame);
        }

        let result = body(self);

        if has_frame {
            self.frames.pop();
        }
        self.scopes.pop();
        result
    }

    /// Append a line of program output, attached to the latest step
    pub(crate) fn emit(&mut self, text: String) {
        self.trace.append_output(&text);
        self.output.print(text, self.current_line);
    }

    /// Turn a recoverable error into an inline diagnostic
    fn report_error(&mut self, line: &Line, err: &RuntimeError) {
        let line_number = match err.location().line {
            0 => line.number,
            n => n,
        };
        let context = self
            .frames
            .last()
            .map_or_else(|| "top level".to_string(), LoopFrame::to_string);

        debug!(line = line_number, kind = %err.kind(), error = %err, "statement failed");

        let message = format!(
            "Error on line {} [{}]: {} | variables: {}",
            line_number,
            context,
            err,
            self.describe_variables()
        );
        self.emit(message.clone());
        self.last_error = Some(message);
    }

    /// `{a: 1, b: "x"}` view of the visible variables for diagnostics
    fn describe_variables(&self) -> String {
        let entries: Vec<String> = self
            .scopes
            .visible()
            .into_iter()
            .map(|(name, variable)| format!("{}: {}", name, Self::describe_value(&variable.value)))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }

    fn describe_value(value: &Value) -> String {
        match value {
            Value::String(s) => format!("\"{}\"", s),
            Value::Char(c) => format!("'{}'", c),
            Value::Array(array) => {
                let cells: Vec<String> = array.elements.iter().map(Self::describe_value).collect();
                format!("[{}]", cells.join(", "))
            }
            other => other.to_string(),
        }
    }

    /// Bind a fresh variable whose type is inferred from its value
    pub(crate) fn typed(value: Value, location: SourceLocation) -> Result<Variable, RuntimeError> {
        match value.infer_type() {
            Some(var_type) => Ok(Variable::new(value, var_type)),
            None => Err(RuntimeError::evaluation("Expression produced no value", location)),
        }
    }

    pub(crate) fn line_location(line: &Line) -> SourceLocation {
        SourceLocation::new(line.number, 1)
    }

    fn orphan(found: &str, opener: &str, location: SourceLocation) -> RuntimeError {
        RuntimeError::Structural {
            message: format!("{} without matching {}", found, opener),
            location,
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}
