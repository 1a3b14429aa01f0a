//! Memory model for the interpreter
//!
//! This module provides the core storage abstractions:
//! - [`value`]: Runtime value representation (scalars, arrays, unset marker)
//! - [`scope`]: Arena-backed scope chain holding typed variable bindings
//!
//! Arrays are stored by value. Passing one to a procedure copies it, which
//! keeps procedure calls strictly call-by-value.

pub mod scope;
pub mod value;
