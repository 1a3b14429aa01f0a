//! Pseudocode execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: the [`Interpreter`] struct, the per-statement run loop and
//!   the public run/replay API
//! - [`errors`]: runtime error types and their categories
//! - `statements`, `loops`, `procedures`: `impl Interpreter` handlers for
//!   each statement form
//! - `expressions` and [`ops`]: expression evaluation and operator semantics
//! - [`frames`]: loop/procedure activation records for error context
//! - [`input`]: line sources for INPUT
//! - [`consistency`]: full run versus step replay comparison
//!
//! # Execution Model
//!
//! A program is parsed once into lines. The run loop walks them in order;
//! a line that opens a block is handed to the block segmenter, and the
//! resulting body range is executed by a recursive call in a new scope. A
//! step is recorded before each statement runs, so every step shows the
//! variables as they were just before that line.

pub mod consistency;
pub mod engine;
pub mod errors;
mod expressions;
pub mod frames;
pub mod input;
mod loops;
pub mod ops;
pub mod procedures;
pub(crate) mod stack;
mod statements;

pub use consistency::ConsistencyReport;
pub use engine::Interpreter;
pub use errors::{ErrorKind, RuntimeError};
pub use input::{InputSource, LineReader, QueuedInput};
