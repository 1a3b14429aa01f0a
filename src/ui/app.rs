//! Main TUI application state and logic
//!
//! The viewer never re-executes the program. It walks the step trace that
//! a completed run recorded, backwards and forwards.

use crate::interpreter::Interpreter;
use crate::snapshot::ExecutionStep;
use crate::ui::panes::{
    render_source_pane, render_status_bar, render_terminal_pane, render_variables_pane,
    SourceScrollState, StatusRenderData, VariablesRenderData,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Variables,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> output -> variables)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Variables,
            FocusedPane::Variables => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    /// Interpreter holding the trace of a finished run
    pub interpreter: Interpreter,

    /// The source code that was executed
    pub source_code: String,

    /// Index of the step being shown
    pub position: usize,

    pub focused_pane: FocusedPane,

    pub source_scroll: SourceScrollState,
    pub variables_scroll: usize,
    pub output_scroll: usize,

    pub should_quit: bool,

    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a viewer over an interpreter that has already run `source_code`
    pub fn new(interpreter: Interpreter, source_code: String) -> Self {
        let status_message = match interpreter.trace().len() {
            0 => "Nothing was executed".to_string(),
            n => format!("Recorded {} steps", n),
        };

        App {
            interpreter,
            source_code,
            position: 0,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState {
                offset: 0,
                target_line_row: None,
            },
            variables_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
        }
    }

    pub fn total_steps(&self) -> usize {
        self.interpreter.trace().len()
    }

    pub fn current_step(&self) -> Option<&ExecutionStep> {
        self.interpreter.trace().get(self.position)
    }

    /// Output produced by every step up to and including the current one
    pub fn visible_output(&self) -> Vec<String> {
        self.interpreter
            .trace()
            .steps()
            .iter()
            .take(self.position + 1)
            .filter_map(|step| step.output.as_deref())
            .flat_map(|text| text.split('\n'))
            .map(str::to_string)
            .collect()
    }

    /// Whether the current step printed an error diagnostic
    pub fn current_step_failed(&self) -> bool {
        self.current_step()
            .and_then(|step| step.output.as_deref())
            .is_some_and(|text| {
                text.lines()
                    .any(|line| line.starts_with("Error on line") || line.starts_with("Fatal error"))
            })
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(500) {
                if self.step_forward() {
                    self.status_message = "Playing...".to_string();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so auto-play keeps ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let current_line = self.current_step().map_or(0, |step| step.line_number);
        let is_error = self.current_step_failed();

        render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            current_line,
            is_error,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        let output = self.visible_output();
        render_terminal_pane(
            frame,
            left_rows[1],
            &output,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        let trace = self.interpreter.trace();
        let previous = self
            .position
            .checked_sub(1)
            .and_then(|index| trace.get(index))
            .map(|step| &step.variables);
        render_variables_pane(
            frame,
            columns[1],
            VariablesRenderData {
                variables: trace.get(self.position).map(|step| &step.variables),
                previous,
            },
            self.focused_pane == FocusedPane::Variables,
            &mut self.variables_scroll,
        );

        render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                current_step: self.position,
                total_steps: trace.len(),
                is_error,
                is_playing: self.is_playing,
            },
        );
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).map_or(1, |d| d as usize);
                let stepped = (0..n).take_while(|_| self.step_forward()).count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.status_message = if self.step_backward() {
                    "Stepped backward".to_string()
                } else {
                    "Already at the first step".to_string()
                };
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.status_message = if self.step_forward() {
                    "Stepped forward".to_string()
                } else {
                    "Already at the last step".to_string()
                };
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Variables => {
                    self.variables_scroll = self.variables_scroll.saturating_sub(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Variables => {
                    self.variables_scroll = self.variables_scroll.saturating_add(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play (200ms debounce against key repeat)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    self.status_message = if self.is_playing {
                        "Playing...".to_string()
                    } else {
                        "Paused".to_string()
                    };
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.jump_to_end();
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.jump_to_start();
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }

    /// Advance one step. Returns `false` at the end of the trace.
    pub fn step_forward(&mut self) -> bool {
        if self.position + 1 < self.total_steps() {
            self.position += 1;
            // Auto-scroll output to the bottom
            self.output_scroll = usize::MAX;
            true
        } else {
            false
        }
    }

    /// Go back one step. Returns `false` at the first step.
    pub fn step_backward(&mut self) -> bool {
        if self.position > 0 {
            self.position -= 1;
            self.output_scroll = usize::MAX;
            true
        } else {
            false
        }
    }

    pub fn jump_to_end(&mut self) {
        self.position = self.total_steps().saturating_sub(1);
        self.output_scroll = usize::MAX;
    }

    pub fn jump_to_start(&mut self) {
        self.position = 0;
        self.output_scroll = usize::MAX;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_for(source: &str) -> App {
        let mut interpreter = Interpreter::default();
        interpreter.interpret(source);
        App::new(interpreter, source.to_string())
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut app = app_for("OUTPUT 1\nOUTPUT 2\nOUTPUT 3");
        assert_eq!(app.total_steps(), 3);

        assert!(!app.step_backward());
        assert!(app.step_forward());
        assert!(app.step_forward());
        assert!(!app.step_forward());
        assert_eq!(app.position, 2);

        app.jump_to_start();
        assert_eq!(app.current_step().map(|s| s.line_number), Some(1));
        app.jump_to_end();
        assert_eq!(app.current_step().map(|s| s.line_number), Some(3));
    }

    #[test]
    fn test_visible_output_follows_position() {
        let mut app = app_for("OUTPUT \"a\"\nOUTPUT \"b\"");
        assert_eq!(app.visible_output(), vec!["a"]);
        app.step_forward();
        assert_eq!(app.visible_output(), vec!["a", "b"]);
        app.step_backward();
        assert_eq!(app.visible_output(), vec!["a"]);
    }

    #[test]
    fn test_error_step_is_flagged() {
        let app = app_for("OUTPUT missing");
        assert!(app.current_step_failed());
    }

    #[test]
    fn test_empty_program() {
        let mut app = app_for("");
        assert_eq!(app.total_steps(), 0);
        assert!(app.current_step().is_none());
        assert!(!app.step_forward());
        assert!(app.visible_output().is_empty());
    }
}
