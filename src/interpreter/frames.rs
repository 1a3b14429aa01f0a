//! Activation records used for error context.
//!
//! One [`LoopFrame`] is pushed per FOR iteration, WHILE iteration and
//! procedure call, and popped when that activation finishes (also when an
//! error unwinds through it). The innermost frame names the context of any
//! diagnostic raised while it is live.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    For,
    While,
    Procedure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopFrame {
    pub kind: FrameKind,
    /// Loop variable for FOR, procedure name for PROCEDURE, empty for WHILE
    pub name: String,
    /// 1-based iteration count; always 1 for a procedure call
    pub iteration: usize,
}

impl LoopFrame {
    pub fn for_loop(var: &str, iteration: usize) -> Self {
        LoopFrame {
            kind: FrameKind::For,
            name: var.to_string(),
            iteration,
        }
    }

    pub fn while_loop(iteration: usize) -> Self {
        LoopFrame {
            kind: FrameKind::While,
            name: String::new(),
            iteration,
        }
    }

    pub fn procedure(name: &str) -> Self {
        LoopFrame {
            kind: FrameKind::Procedure,
            name: name.to_string(),
            iteration: 1,
        }
    }
}

impl fmt::Display for LoopFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FrameKind::For => write!(f, "FOR {}, iteration {}", self.name, self.iteration),
            FrameKind::While => write!(f, "WHILE, iteration {}", self.iteration),
            FrameKind::Procedure => write!(f, "PROCEDURE {}", self.name),
        }
    }
}
