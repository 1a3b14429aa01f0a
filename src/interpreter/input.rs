//! Line sources for the INPUT statement.
//!
//! The interpreter never blocks on its own: it asks an [`InputSource`] for
//! the next line and raises an input error when none is available. Hosts
//! that serve requests queue the lines up front with [`QueuedInput`]; the
//! command line wraps stdin in a [`LineReader`].

use std::collections::VecDeque;
use std::io::BufRead;

/// Supplier of INPUT lines
pub trait InputSource: Send {
    /// Next line without its trailing newline, or `None` when exhausted
    fn read_line(&mut self) -> Option<String>;

    /// Queue an extra line. Sources that cannot accept lines ignore it.
    fn push_line(&mut self, _line: String) {}
}

/// Pre-supplied lines consumed in order
#[derive(Debug, Clone, Default)]
pub struct QueuedInput {
    lines: VecDeque<String>,
}

impl QueuedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        QueuedInput {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl FromIterator<String> for QueuedInput {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        QueuedInput {
            lines: iter.into_iter().collect(),
        }
    }
}

impl InputSource for QueuedInput {
    fn read_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }

    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
    }
}

/// Reads lines lazily from any buffered reader
pub struct LineReader<R> {
    reader: R,
}

impl<R: BufRead + Send> LineReader<R> {
    pub fn new(reader: R) -> Self {
        LineReader { reader }
    }
}

impl<R: BufRead + Send> InputSource for LineReader<R> {
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let trimmed = line.trim_end_matches(['\n', '\r']).len();
                line.truncate(trimmed);
                Some(line)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_queued_input_in_order() {
        let mut input = QueuedInput::from_text("alice\nbob");
        input.push_line("carol".to_string());

        assert_eq!(input.read_line().as_deref(), Some("alice"));
        assert_eq!(input.read_line().as_deref(), Some("bob"));
        assert_eq!(input.read_line().as_deref(), Some("carol"));
        assert_eq!(input.read_line(), None);
    }

    #[test]
    fn test_line_reader_strips_newlines() {
        let mut input = LineReader::new(Cursor::new("one\r\ntwo\n"));
        assert_eq!(input.read_line().as_deref(), Some("one"));
        assert_eq!(input.read_line().as_deref(), Some("two"));
        assert_eq!(input.read_line(), None);
    }
}
