//! # Introduction
//!
//! pseudostep runs programs written in a small structured pseudocode dialect
//! and records one step per executed statement, so a finished run can be
//! replayed line by line. The replay is navigated through a terminal UI built
//! with [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Statement parser → Lines → Block segmenter → Interpreter → Trace → TUI
//! ```
//!
//! 1. [`parser`]: tokenises each line and parses it into one statement; the
//!    block segmenter pairs openers with their closers.
//! 2. [`interpreter`]: walks the lines, executes statements, and records an
//!    [`snapshot::ExecutionStep`] before each one.
//! 3. [`memory`]: typed [`memory::value::Value`]s held in an arena-backed
//!    [`memory::scope::ScopeChain`].
//! 4. [`snapshot`]: the output buffer and the step trace with its
//!    forward-only replay cursor.
//! 5. [`snippets`]: named programs saved as JSON files.
//! 6. [`ui`]: ratatui-based replay viewer; not part of the stable library API.
//!
//! ## Dialect
//!
//! Types: `INTEGER`, `REAL`, `BOOLEAN`, `CHAR`, `STRING`, fixed-bounds arrays.
//! Statements: `DECLARE`, `ARRAY`, assignment with `←`, `OUTPUT`, `INPUT`,
//! `IF/ELSE/ENDIF`, `FOR/NEXT`, `WHILE/ENDWHILE`, `PROCEDURE/ENDPROCEDURE`
//! and procedure calls.
//!
//! ## Sessions
//!
//! An [`interpreter::Interpreter`] holds all state of one session. It is
//! `Send` but not shared: a host serving several callers either creates one
//! interpreter per session or puts it behind a `Mutex`.
//!
//! ```
//! use pseudostep::interpreter::Interpreter;
//!
//! let mut interpreter = Interpreter::default();
//! let output = interpreter.interpret("DECLARE x:INTEGER\nx ← 3\nIF x > 2 THEN\nOUTPUT \"big\"\nENDIF");
//! assert_eq!(output, "big");
//! ```

pub mod config;
pub mod interpreter;
pub mod logging;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod snippets;
pub mod ui;
