use clap::Parser as _;
use lox_interpreter::{Interpreter, RuntimeError, StdOutPrinter};
use lox_parser::{Parser, ScanError, Scanner, SyntaxError};
use lox_syntax::{print_program, Statement};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

/// Runs a Lox script, or starts an interactive prompt when no script is given.
///
/// Set `RUST_LOG=lox_parser=trace,lox_interpreter=trace` to watch parsing and
/// scope handling on stderr.
#[derive(clap::Parser, Debug)]
#[command(name = "lox", version, about, long_about = None)]
struct Args {
    /// Script to run.
    script: Option<PathBuf>,

    /// Print the parsed syntax tree before running it.
    #[arg(long)]
    print_ast: bool,

    /// Do not echo the value of a prompt line that is a single expression.
    #[arg(long)]
    no_echo: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => {
            // Help and version go to stdout; a failed print has nowhere to be reported.
            let _ = error.print();
            return ExitCode::from(usage_exit_code(&error));
        }
    };

    let result = match &args.script {
        Some(path) => run_file(path, &args),
        None => run_prompt(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::from(exit_code(&error))
        }
    }
}

/// Installs a stderr subscriber when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn exit_code(error: &anyhow::Error) -> u8 {
    if error.is::<ScanError>() || error.is::<SyntaxError>() {
        65
    } else if error.is::<RuntimeError>() {
        70
    } else if error.is::<std::io::Error>() {
        74
    } else {
        1
    }
}

/// Exit code for a command line clap rejected, or 0 for `--help`/`--version`.
fn usage_exit_code(error: &clap::Error) -> u8 {
    use clap::error::ErrorKind;

    match error.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => 64,
    }
}

fn run_file(path: &Path, args: &Args) -> anyhow::Result<()> {
    info!(path = %path.display(), "running script");
    let source = std::fs::read_to_string(path)?;
    let mut printer = StdOutPrinter;
    let mut interpreter = Interpreter::new(&mut printer);
    run(&source, &mut interpreter, args.print_ast, false)
}

fn run(
    source: &str,
    interpreter: &mut Interpreter,
    print_ast: bool,
    echo: bool,
) -> anyhow::Result<()> {
    let tokens = Scanner::new(source).scan_tokens()?;
    debug!(count = tokens.len(), "scanned tokens");
    let statements = Parser::new(tokens).parse()?;

    if print_ast {
        println!("{}", print_program(&statements));
    }

    match statements.as_slice() {
        [Statement::Expression(stmt)] if echo => {
            let value = interpreter.evaluate(&stmt.expr)?;
            println!("{value}");
        }
        _ => interpreter.interpret(&statements)?,
    }

    Ok(())
}

fn run_prompt(args: &Args) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut printer = StdOutPrinter;
    // Globals persist from one line to the next.
    let mut interpreter = Interpreter::new(&mut printer);

    loop {
        match editor.readline(">>> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.as_str())?;
                if let Err(error) = run(&line, &mut interpreter, args.print_ast, !args.no_echo) {
                    eprintln!("{error}");
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(()),
            Err(error) => return Err(error.into()),
        }
    }
}
