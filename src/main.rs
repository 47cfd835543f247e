//! CLI driver (§6): `interpreter [file [arg…]]`. With no file, runs an interactive
//! REPL; with a file, binds `*ARGV*` and evaluates `(load-file "file")`.
//!
//! Grounded on the teacher's `src/main.rs` `clap`-derive + `rustyline::Editor` REPL
//! loop shape, trimmed of sandbox/help/highlighter wiring (§12).

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};

use mal_rs::config::{HOST_LANGUAGE, HISTORY_FILE_NAME, PROMPT, VERSION, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use mal_rs::env::Environment;
use mal_rs::error::EvalError;
use mal_rs::printer::pr_str;
use mal_rs::value::Value;
use mal_rs::{new_root_env, rep};

/// A tree-walking interpreter for the MAL Lisp dialect.
#[derive(Parser, Debug)]
#[command(name = "mal-rs")]
#[command(version = VERSION)]
#[command(about = "A tree-walking interpreter for the MAL Lisp dialect")]
struct CliArgs {
    /// Script file to run. With no file, starts an interactive REPL.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Arguments passed through to the script as `*ARGV*`.
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
}

fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let env = match new_root_env() {
        Ok(env) => env,
        Err(e) => {
            eprintln!("Error: failed to initialize interpreter: {e}");
            return ExitCode::FAILURE;
        }
    };

    env.set(
        Rc::from("*host-language*"),
        Value::string(HOST_LANGUAGE),
    );

    match cli.file {
        Some(path) => run_file(&path, cli.args, &env),
        None => {
            env.set(Rc::from("*ARGV*"), Value::list(vec![]));
            run_repl(&env);
            ExitCode::SUCCESS
        }
    }
}

fn run_file(path: &PathBuf, script_args: Vec<String>, env: &Rc<Environment>) -> ExitCode {
    let argv = Value::list(script_args.into_iter().map(Value::string).collect());
    env.set(Rc::from("*ARGV*"), argv);

    let load_call = format!("(load-file {:?})", path.display().to_string());
    match rep(&load_call, env) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", print_error(e));
            ExitCode::FAILURE
        }
    }
}

fn run_repl(env: &Rc<Environment>) {
    println!("{WELCOME_MESSAGE}");
    println!("{WELCOME_SUBTITLE}");

    let config = Config::builder().auto_add_history(true).build();
    let mut rl = match DefaultEditor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Error: failed to initialize line editor: {e}");
            return;
        }
    };

    let history_path = history_file_path();
    if let Some(path) = &history_path {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                match rep(&line, env) {
                    Ok(value) => println!("{}", pr_str(&value, true)),
                    Err(e) => eprintln!("Error: {}", print_error(e)),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {e}");
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        if let Err(e) = rl.save_history(path) {
            eprintln!("Error: failed to save history: {e}");
        }
    }
}

fn history_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(HISTORY_FILE_NAME))
}

/// Host errors print their message; a user `throw` prints the thrown value's
/// readable form (§7) — `EvalError`'s `Display` already does both via `Value`'s own
/// `Display`.
fn print_error(e: EvalError) -> String {
    e.to_string()
}
