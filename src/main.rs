// pseudostep: step-through pseudocode interpreter

use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use pseudostep::config::Config;
use pseudostep::interpreter::{Interpreter, LineReader, QueuedInput};
use pseudostep::logging::init_tracing;
use pseudostep::snippets::{SnippetStore, EXAMPLE_PROGRAM};
use pseudostep::ui::App;

/// Step-through interpreter for structured pseudocode
#[derive(Parser, Debug)]
#[command(name = "pseudostep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to ./pseudostep.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a program and print its output; INPUT reads from stdin
    Run {
        file: PathBuf,
    },

    /// Run a program, then step through the recorded trace in the terminal
    Step {
        file: PathBuf,

        /// File supplying INPUT lines
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print every recorded step
    Trace {
        file: PathBuf,

        /// Emit the trace as JSON
        #[arg(long)]
        json: bool,

        /// File supplying INPUT lines
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Compare a full run against its step replay
    Check {
        file: PathBuf,

        /// File supplying INPUT lines
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print the built-in example program
    Example,

    /// Manage saved snippets
    Snippet {
        #[command(subcommand)]
        action: SnippetAction,
    },
}

#[derive(Subcommand, Debug)]
enum SnippetAction {
    /// Save a program file under a name
    Save { name: String, file: PathBuf },
    /// Print a saved snippet
    Load { name: String },
    /// List saved snippet names
    List,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover()?,
    };

    match cli.command {
        Command::Run { file } => {
            let source = fs::read_to_string(&file)?;
            let mut interpreter = Interpreter::new(config.limits);
            interpreter.set_input_source(Box::new(LineReader::new(BufReader::new(io::stdin()))));
            let output = interpreter.interpret(&source);
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Command::Step { file, input } => {
            let source = fs::read_to_string(&file)?;
            let interpreter = run_with_input(&config, &source, input.as_deref())?;
            info!(steps = interpreter.trace().len(), "opening replay viewer");
            run_viewer(interpreter, source)?;
        }
        Command::Trace { file, json, input } => {
            let source = fs::read_to_string(&file)?;
            let interpreter = run_with_input(&config, &source, input.as_deref())?;
            let steps = interpreter.trace().steps();
            if json {
                println!("{}", serde_json::to_string_pretty(steps)?);
            } else {
                for (index, step) in steps.iter().enumerate() {
                    println!("[{}] line {}: {}", index + 1, step.line_number, step.line);
                    if let Some(output) = &step.output {
                        for line in output.lines() {
                            println!("    > {}", line);
                        }
                    }
                }
            }
        }
        Command::Check { file, input } => {
            let source = fs::read_to_string(&file)?;
            let lines = read_input_lines(input.as_deref())?;
            let mut interpreter = Interpreter::new(config.limits);
            let report = interpreter.check_consistency(&source, &lines);
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_consistent() {
                std::process::exit(1);
            }
        }
        Command::Example => {
            print!("{}", EXAMPLE_PROGRAM);
        }
        Command::Snippet { action } => {
            let store = SnippetStore::new(&config.snippets.dir);
            match action {
                SnippetAction::Save { name, file } => {
                    let code = fs::read_to_string(&file)?;
                    store.save(&name, &code)?;
                    println!("Snippet '{}' saved", name);
                }
                SnippetAction::Load { name } => {
                    print!("{}", store.load(&name)?.code);
                }
                SnippetAction::List => {
                    for name in store.list()? {
                        println!("{}", name);
                    }
                }
            }
        }
    }

    Ok(())
}

fn read_input_lines(path: Option<&Path>) -> io::Result<Vec<String>> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?.lines().map(str::to_string).collect()),
        None => Ok(Vec::new()),
    }
}

/// Run `source` with INPUT lines taken from `input`, keeping the trace
fn run_with_input(config: &Config, source: &str, input: Option<&Path>) -> io::Result<Interpreter> {
    let lines = read_input_lines(input)?;
    let mut interpreter = Interpreter::new(config.limits);
    interpreter.set_input_source(Box::new(lines.into_iter().collect::<QueuedInput>()));
    interpreter.interpret(source);
    Ok(interpreter)
}

fn run_viewer(interpreter: Interpreter, source: String) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(interpreter, source);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
