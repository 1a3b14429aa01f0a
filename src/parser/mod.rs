//! Pseudocode source parser
//!
//! This module transforms source text into a flat list of parsed lines:
//! - [`lexer`]: Tokenization of one line (source text → tokens)
//! - [`parse`]: The [`parse::Parser`] struct and the [`parse_program`] entry point
//! - [`ast`]: Statement and expression node definitions
//! - [`segment`]: Pairing block openers with their closers
//!
//! # Dialect
//!
//! One statement per line. Blank lines and lines starting with `#` are
//! ignored. Blocks are delimited by keywords (`IF … ENDIF`,
//! `FOR … NEXT var`, `WHILE … ENDWHILE`, `PROCEDURE … ENDPROCEDURE`) rather
//! than by nesting in the parse tree, so the parser stays line local and the
//! segmenter resolves structure on demand.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary
//! operators, split across `statements` and `expressions`.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;
pub mod segment;
mod statements;

pub use parse::parse_program;
