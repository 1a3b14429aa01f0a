//! Block segmentation
//!
//! Given the index of a block-opening line, [`segment`] finds the matching
//! closing line and returns index ranges into the same line list. Nested
//! execution walks those ranges; no text is re-split.
//!
//! Matching counts depth per block kind: depth starts at 1 on the opening
//! line, every further opener of the *same* kind increments it, every closer
//! of that kind decrements it, and the block ends when it reaches 0.

use crate::parser::ast::{BlockKind, Line, Stmt};
use std::ops::Range;
use thiserror::Error;

/// Structural failures found while pairing openers with closers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    #[error("{keyword} block opened on line {line} is never closed with {closing}")]
    Unterminated {
        keyword: &'static str,
        closing: &'static str,
        line: usize,
    },

    #[error("NEXT {found} on line {next_line} does not match FOR {expected} opened on line {line}")]
    LoopVariableMismatch {
        expected: String,
        found: String,
        line: usize,
        next_line: usize,
    },

    #[error("ELSE on line {else_line} repeats an ELSE of the IF opened on line {line}")]
    DuplicateElse { line: usize, else_line: usize },

    #[error("line {line} does not open a block")]
    NotABlock { line: usize },
}

/// Index ranges describing one segmented block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// Index of the opening line
    pub open: usize,
    /// Lines executed when the block runs (the THEN branch for IF)
    pub body: Range<usize>,
    /// ELSE branch of an IF, without the ELSE line itself
    pub else_body: Option<Range<usize>>,
    /// Index of the matching closing line
    pub close: usize,
    /// Index of the first line after the closing line
    pub next: usize,
}

/// Segment the block opened at `lines[open]`, searching no further than `end`.
pub fn segment(lines: &[Line], open: usize, end: usize) -> Result<Block, SegmentError> {
    let opener = &lines[open];
    let kind = opener.stmt.opens().ok_or(SegmentError::NotABlock {
        line: opener.number,
    })?;

    let mut depth = 1usize;
    let mut else_at: Option<usize> = None;

    for index in (open + 1)..end.min(lines.len()) {
        let stmt = &lines[index].stmt;

        if stmt.opens() == Some(kind) {
            depth += 1;
            continue;
        }

        if kind == BlockKind::If && depth == 1 && matches!(stmt, Stmt::Else) {
            if else_at.is_some() {
                return Err(SegmentError::DuplicateElse {
                    line: opener.number,
                    else_line: lines[index].number,
                });
            }
            else_at = Some(index);
            continue;
        }

        if stmt.closes() == Some(kind) {
            depth -= 1;
            if depth == 0 {
                check_loop_variable(opener, &lines[index])?;
                let (body, else_body) = match else_at {
                    Some(at) => ((open + 1)..at, Some((at + 1)..index)),
                    None => ((open + 1)..index, None),
                };
                return Ok(Block {
                    kind,
                    open,
                    body,
                    else_body,
                    close: index,
                    next: index + 1,
                });
            }
        }
    }

    Err(SegmentError::Unterminated {
        keyword: kind.keyword(),
        closing: kind.closing_keyword(),
        line: opener.number,
    })
}

/// `NEXT var` must name the variable of the `FOR` it closes; `ENDFOR` is unchecked
fn check_loop_variable(opener: &Line, closer: &Line) -> Result<(), SegmentError> {
    let (Stmt::For { var: expected, .. }, Stmt::Next { var: found }) = (&opener.stmt, &closer.stmt)
    else {
        return Ok(());
    };

    match found {
        Some(found) if found == expected => Ok(()),
        other => Err(SegmentError::LoopVariableMismatch {
            expected: expected.clone(),
            found: other.clone().unwrap_or_else(|| "(no variable)".to_string()),
            line: opener.number,
            next_line: closer.number,
        }),
    }
}
