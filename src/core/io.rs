//! Printing and reader/IO primitives (§4.8): `pr-str str prn println read-string
//! slurp readline time-ms`.

use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::env::Environment;
use crate::error::EvalError;
use crate::printer::pr_str;
use crate::reader::read_str;
use crate::value::Value;

use super::util::as_str;

fn join_printed(args: &[Value], readable: bool, sep: &str) -> String {
    args.iter()
        .map(|v| pr_str(v, readable))
        .collect::<Vec<_>>()
        .join(sep)
}

fn builtin_pr_str(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::string(join_printed(args, true, " ")))
}

fn builtin_str(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::string(join_printed(args, false, "")))
}

fn builtin_prn(args: &[Value]) -> Result<Value, EvalError> {
    println!("{}", join_printed(args, true, " "));
    Ok(Value::Nil)
}

fn builtin_println(args: &[Value]) -> Result<Value, EvalError> {
    println!("{}", join_printed(args, false, " "));
    Ok(Value::Nil)
}

fn builtin_read_string(args: &[Value]) -> Result<Value, EvalError> {
    let s = as_str("read-string", args.first().ok_or_else(|| {
        EvalError::arity_error("read-string", "1", args.len())
    })?)?;
    Ok(read_str(&s)?)
}

fn builtin_slurp(args: &[Value]) -> Result<Value, EvalError> {
    let path = as_str(
        "slurp",
        args.first()
            .ok_or_else(|| EvalError::arity_error("slurp", "1", args.len()))?,
    )?;
    std::fs::read_to_string(&*path)
        .map(Value::string)
        .map_err(|e| EvalError::runtime_error("slurp", format!("{}: {}", path, e)))
}

/// `readline prompt` (§4.8, §9 Open Question): writes the prompt, reads one line
/// from stdin, returns its trimmed contents or `Nil` at end-of-stream — distinct
/// from the empty-string result of an immediate blank line.
fn builtin_readline(args: &[Value]) -> Result<Value, EvalError> {
    let prompt = as_str(
        "readline",
        args.first()
            .ok_or_else(|| EvalError::arity_error("readline", "1", args.len()))?,
    )?;
    print!("{}", prompt);
    io::stdout()
        .flush()
        .map_err(|e| EvalError::runtime_error("readline", e.to_string()))?;
    let mut line = String::new();
    let n = io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| EvalError::runtime_error("readline", e.to_string()))?;
    if n == 0 {
        return Ok(Value::Nil);
    }
    Ok(Value::string(line.trim_end_matches(['\n', '\r']).to_string()))
}

fn builtin_time_ms(_args: &[Value]) -> Result<Value, EvalError> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| EvalError::runtime_error("time-ms", e.to_string()))?
        .as_millis();
    Ok(Value::Int(millis as i64))
}

pub fn register(env: &Rc<Environment>) {
    env.set(Rc::from("pr-str"), Value::native("pr-str", builtin_pr_str));
    env.set(Rc::from("str"), Value::native("str", builtin_str));
    env.set(Rc::from("prn"), Value::native("prn", builtin_prn));
    env.set(Rc::from("println"), Value::native("println", builtin_println));
    env.set(Rc::from("read-string"), Value::native("read-string", builtin_read_string));
    env.set(Rc::from("slurp"), Value::native("slurp", builtin_slurp));
    env.set(Rc::from("readline"), Value::native("readline", builtin_readline));
    env.set(Rc::from("time-ms"), Value::native("time-ms", builtin_time_ms));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pr_str_joins_readable_with_spaces() {
        let args = [Value::string("a"), Value::Int(1)];
        assert_eq!(builtin_pr_str(&args).unwrap(), Value::string("\"a\" 1"));
    }

    #[test]
    fn str_joins_unreadable_with_no_separator() {
        let args = [Value::string("a"), Value::Int(1)];
        assert_eq!(builtin_str(&args).unwrap(), Value::string("a1"));
    }

    #[test]
    fn read_string_parses_one_form() {
        assert_eq!(
            builtin_read_string(&[Value::string("(+ 1 2)")]).unwrap(),
            Value::list(vec![Value::symbol("+"), Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn slurp_missing_file_errors() {
        assert!(builtin_slurp(&[Value::string("/nonexistent/path/xyz")]).is_err());
    }

    #[test]
    fn time_ms_returns_a_positive_int() {
        let result = builtin_time_ms(&[]).unwrap();
        assert!(matches!(result, Value::Int(n) if n > 0));
    }
}
