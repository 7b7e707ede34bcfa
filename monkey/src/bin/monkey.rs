extern crate monkey;

use monkey::{define_macros, eval, expand_macros, inspect, parse, Environment, Node, Object};
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
enum ReplError {
    #[error("readline: {0}")]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// What one chunk of source left behind
enum Outcome {
    Value(Option<Object>),
    ParseErrors(Vec<String>),
    MacroFailure(String),
}

// Root scope and macro scope, both kept alive across REPL lines
struct Session {
    env: Rc<Environment>,
    macros: Rc<Environment>,
}

impl Session {
    fn new() -> Session {
        Session{env: Rc::new(Environment::new()), macros: Rc::new(Environment::new())}
    }

    fn run(&self, source: &str) -> Outcome {
        let (mut program, errors) = parse(source);
        if !errors.is_empty() {
            return Outcome::ParseErrors(errors);
        }
        define_macros(&mut program, &self.macros);
        match expand_macros(program, &self.macros) {
            Ok(expanded) => Outcome::Value(eval(&Node::Program(expanded), &self.env)),
            Err(err) => Outcome::MacroFailure(err.to_string()),
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    // Only initialize if RUST_LOG is set
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn history_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".monkey_history"))
}

fn print_parse_errors(errors: &[String]) {
    println!("Woops! We ran into some monkey business here!");
    println!(" parser errors:");
    for err in errors {
        println!("\t{}", err);
    }
}

fn repl() -> Result<(), ReplError> {
    let mut rl = rustyline::DefaultEditor::new()?;
    let history = history_file();
    if let Some(path) = &history {
        let _ = rl.load_history(path);
    }
    let session = Session::new();
    loop {
        match rl.readline(">> ") {
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match session.run(&line) {
                    Outcome::ParseErrors(errors) => print_parse_errors(&errors),
                    Outcome::MacroFailure(err) => println!("macro error: {}", err),
                    Outcome::Value(Some(value)) => println!("{}", inspect(&value)),
                    Outcome::Value(None) => (),
                }
            },
        }
    }
    if let Some(path) = &history {
        if let Err(e) = rl.save_history(path) {
            tracing::debug!(%e, "could not save history");
        }
    }
    Ok(())
}

fn run_script(path: &str) -> Result<ExitCode, ReplError> {
    let source = std::fs::read_to_string(path)?;
    let session = Session::new();
    Ok(match session.run(&source) {
        Outcome::ParseErrors(errors) => {
            print_parse_errors(&errors);
            ExitCode::FAILURE
        },
        Outcome::MacroFailure(err) => {
            eprintln!("macro error: {}", err);
            ExitCode::FAILURE
        },
        Outcome::Value(Some(value @ Object::Error(_))) => {
            eprintln!("{}", inspect(&value));
            ExitCode::FAILURE
        },
        Outcome::Value(_) => ExitCode::SUCCESS,
    })
}

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.as_slice() {
        [] => repl().map(|_| ExitCode::SUCCESS),
        [script] => run_script(script),
        _ => {
            eprintln!("usage: monkey [script]");
            return ExitCode::from(2);
        },
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        },
    }
}
