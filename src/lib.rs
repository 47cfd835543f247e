//! `mal-rs`: a tree-walking interpreter for the MAL Lisp dialect (§1).
//!
//! The binary (`src/main.rs`) is a thin REPL/file-mode driver; everything else
//! lives here so integration tests can drive the interpreter directly.

pub mod config;
pub mod core;
pub mod env;
pub mod error;
pub mod eval;
pub mod printer;
pub mod reader;
pub mod stdlib;
pub mod value;

use std::rc::Rc;

use env::Environment;
use error::EvalError;
use value::Value;

/// Build a root environment with the core namespace and the bootstrapped root
/// names (`not`, `load-file`, `cond`, `or`) loaded, and register it as the `eval`
/// builtin's target (§6).
pub fn new_root_env() -> Result<Rc<Environment>, EvalError> {
    let env = Environment::root();
    core::register_all(&env);
    eval::set_root_env(env.clone());
    stdlib::load_bootstrap(&env)?;
    Ok(env)
}

/// Read and evaluate one form, the building block both the REPL and file-mode
/// driver use (§6).
pub fn rep(input: &str, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let ast = reader::read_str(input)?;
    eval::eval(ast, env.clone())
}
