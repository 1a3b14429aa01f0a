//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Program text with keyword highlighting and the current line marked
//! - [`variables`]: Variables visible at the current step
//! - [`terminal`]: Output produced up to the current step
//! - [`status`]: Status bar with keybindings and replay position
//!
//! Each pane module exports a stateless `render_*` function; scroll state is
//! owned by [`crate::ui::App`] and passed in by reference.

pub mod source;
pub mod status;
pub mod terminal;
pub mod variables;

// Re-export render functions for convenience
pub use source::{render_source_pane, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use terminal::render_terminal_pane;
pub use variables::{render_variables_pane, VariablesRenderData};
