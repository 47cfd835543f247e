//! The evaluator: special forms, the tail-call trampoline (§4.5), macro expansion
//! (§4.6), quasiquotation (§4.7), and `try*`/`catch*` error handling (§7).
//!
//! The main loop is grounded on the teacher's `eval_with_macros` trampoline shape in
//! `src/eval.rs` (loop + `continue` for tail positions) and on
//! `original_source/jvzgo/src/stepA_mal/stepA_mal.go`'s `EVAL` for the exact special
//! form semantics.

use std::cell::RefCell;
use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{ClosureData, SeqKind, Value};

thread_local! {
    /// Holds the REPL's root environment so the `eval` builtin can evaluate forms
    /// against global scope regardless of its own lexical position. Grounded on the
    /// teacher's `thread_local! static SANDBOX` pattern (`src/sandbox.rs`).
    static ROOT_ENV: RefCell<Option<Rc<Environment>>> = const { RefCell::new(None) };
}

pub fn set_root_env(env: Rc<Environment>) {
    ROOT_ENV.with(|r| *r.borrow_mut() = Some(env));
}

/// Used by the `eval` builtin (§6: "invokes the interpreter's EVAL with the root
/// environment").
pub fn root_eval(ast: Value) -> Result<Value, EvalError> {
    let env = ROOT_ENV
        .with(|r| r.borrow().clone())
        .expect("root environment not initialized");
    eval(ast, env)
}

/// Call a callable value with already-evaluated arguments. Used by builtins
/// (`apply`, `map`, `swap!`) that need to invoke an arbitrary function value; does
/// not itself tail-call-optimize (matching classic MAL, where only the main EVAL
/// loop gets TCO).
pub fn apply(f: &Value, args: &[Value]) -> Result<Value, EvalError> {
    match f {
        Value::NativeFn(nf, _) => (nf.func)(args),
        Value::Closure(c) => {
            let env = Environment::child(&c.env, &c.params, args)?;
            eval(c.body.clone(), env)
        }
        _ => Err(EvalError::NotCallable),
    }
}

fn symbol_name(v: &Value) -> Result<Rc<str>, EvalError> {
    match v {
        Value::Symbol(s) => Ok(s.clone()),
        other => Err(EvalError::type_error("(binding)", "symbol", other)),
    }
}

fn as_seq(v: &Value) -> Result<Rc<Vec<Value>>, EvalError> {
    match v {
        Value::Seq(_, items, _) => Ok(items.clone()),
        other => Err(EvalError::type_error("(binding)", "list or vector", other)),
    }
}

fn parse_params(v: &Value) -> Result<Vec<Rc<str>>, EvalError> {
    let items = as_seq(v)?;
    items.iter().map(symbol_name).collect()
}

/// `eval_ast` (§4.5): evaluation of any value that is not itself a non-macro list
/// application. Symbols look themselves up; vectors and maps have every element
/// evaluated; everything else evaluates to itself.
fn eval_ast(ast: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    match ast {
        Value::Symbol(s) => env.get(s),
        Value::Seq(SeqKind::Vector, items, meta) => {
            let evaluated = items
                .iter()
                .map(|v| eval(v.clone(), env.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Seq(SeqKind::Vector, Rc::new(evaluated), meta.clone()))
        }
        Value::Map(entries, meta) => {
            let mut out = crate::value::MalMap::new();
            for (k, v) in entries.iter() {
                out.insert(k.clone(), eval(v.clone(), env.clone())?);
            }
            Ok(Value::Map(Rc::new(out), meta.clone()))
        }
        other => Ok(other.clone()),
    }
}

/// The public entry point. Runs as a single loop so that `let*`, `do`, `if`,
/// quasiquote expansion, and user-function application can rewrite `(ast, env)` and
/// continue instead of recursing (§4.5, §9 "tail-call optimization").
pub fn eval(mut ast: Value, mut env: Rc<Environment>) -> Result<Value, EvalError> {
    loop {
        if !matches!(ast, Value::Seq(SeqKind::List, _, _)) {
            return eval_ast(&ast, &env);
        }

        ast = macroexpand(ast, &env)?;

        let items = match &ast {
            Value::Seq(SeqKind::List, items, _) => items.clone(),
            _ => return eval_ast(&ast, &env),
        };

        if items.is_empty() {
            return Ok(ast);
        }

        if let Value::Symbol(head) = &items[0] {
            match &**head {
                "def!" => {
                    if items.len() != 3 {
                        return Err(EvalError::arity_error("def!", "2", items.len() - 1));
                    }
                    let name = symbol_name(&items[1])?;
                    let val = eval(items[2].clone(), env.clone())?;
                    env.set(name, val.clone());
                    return Ok(val);
                }
                "let*" => {
                    if items.len() != 3 {
                        return Err(EvalError::arity_error("let*", "2", items.len() - 1));
                    }
                    let bindings = as_seq(&items[1])?;
                    if bindings.len() % 2 != 0 {
                        return Err(EvalError::runtime_error(
                            "let*",
                            "odd number of binding forms",
                        ));
                    }
                    let child = Environment::with_outer(env.clone());
                    let mut i = 0;
                    while i < bindings.len() {
                        let name = symbol_name(&bindings[i])?;
                        let val = eval(bindings[i + 1].clone(), child.clone())?;
                        child.set(name, val);
                        i += 2;
                    }
                    ast = items[2].clone();
                    env = child;
                    continue;
                }
                "do" => {
                    if items.len() == 1 {
                        return Ok(Value::Nil);
                    }
                    for e in &items[1..items.len() - 1] {
                        eval(e.clone(), env.clone())?;
                    }
                    ast = items[items.len() - 1].clone();
                    continue;
                }
                "if" => {
                    if items.len() < 3 || items.len() > 4 {
                        return Err(EvalError::arity_error("if", "2 or 3", items.len() - 1));
                    }
                    let cond = eval(items[1].clone(), env.clone())?;
                    if cond.is_truthy() {
                        ast = items[2].clone();
                        continue;
                    } else if let Some(else_branch) = items.get(3) {
                        ast = else_branch.clone();
                        continue;
                    } else {
                        return Ok(Value::Nil);
                    }
                }
                "fn*" => {
                    if items.len() != 3 {
                        return Err(EvalError::arity_error("fn*", "2", items.len() - 1));
                    }
                    let params = parse_params(&items[1])?;
                    return Ok(Value::Closure(Rc::new(ClosureData {
                        params,
                        body: items[2].clone(),
                        env: env.clone(),
                        is_macro: false,
                        meta: Value::Nil,
                    })));
                }
                "quote" => {
                    if items.len() != 2 {
                        return Err(EvalError::arity_error("quote", "1", items.len() - 1));
                    }
                    return Ok(items[1].clone());
                }
                "quasiquote" => {
                    if items.len() != 2 {
                        return Err(EvalError::arity_error("quasiquote", "1", items.len() - 1));
                    }
                    ast = quasiquote(&items[1])?;
                    continue;
                }
                "defmacro!" => {
                    if items.len() != 3 {
                        return Err(EvalError::arity_error("defmacro!", "2", items.len() - 1));
                    }
                    let name = symbol_name(&items[1])?;
                    let val = eval(items[2].clone(), env.clone())?;
                    let Value::Closure(c) = &val else {
                        return Err(EvalError::type_error("defmacro!", "function", &val));
                    };
                    let macro_val = Value::Closure(Rc::new(ClosureData {
                        params: c.params.clone(),
                        body: c.body.clone(),
                        env: c.env.clone(),
                        is_macro: true,
                        meta: c.meta.clone(),
                    }));
                    env.set(name, macro_val.clone());
                    return Ok(macro_val);
                }
                "macroexpand" => {
                    if items.len() != 2 {
                        return Err(EvalError::arity_error("macroexpand", "1", items.len() - 1));
                    }
                    return macroexpand(items[1].clone(), &env);
                }
                "try*" => {
                    return eval_try(&items, &env);
                }
                _ => {}
            }
        }

        let func = eval(items[0].clone(), env.clone())?;
        let mut arg_vals = Vec::with_capacity(items.len() - 1);
        for a in &items[1..] {
            arg_vals.push(eval(a.clone(), env.clone())?);
        }
        match func {
            Value::Closure(c) => {
                let new_env = Environment::child(&c.env, &c.params, &arg_vals)?;
                ast = c.body.clone();
                env = new_env;
                continue;
            }
            Value::NativeFn(nf, _) => return (nf.func)(&arg_vals),
            _ => return Err(EvalError::NotCallable),
        }
    }
}

fn eval_try(items: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if items.len() != 3 {
        return Err(EvalError::arity_error("try*", "2", items.len() - 1));
    }
    let catch_items = as_seq(&items[2])?;
    if catch_items.len() != 3 {
        return Err(EvalError::runtime_error(
            "try*",
            "catch* clause must have the shape (catch* sym handler)",
        ));
    }
    if !matches!(&catch_items[0], Value::Symbol(s) if &**s == "catch*") {
        return Err(EvalError::runtime_error(
            "try*",
            "second form must begin with catch*",
        ));
    }
    match eval(items[1].clone(), env.clone()) {
        Ok(v) => Ok(v),
        Err(e) => {
            let bound = e.into_caught_value();
            let catch_sym = symbol_name(&catch_items[1])?;
            let child = Environment::with_outer(env.clone());
            child.set(catch_sym, bound);
            eval(catch_items[2].clone(), child)
        }
    }
}

/// §4.6: `ast` is a macro call when it is a non-empty list whose head symbol
/// resolves to a macro closure.
pub fn is_macro_call(ast: &Value, env: &Rc<Environment>) -> bool {
    let Value::Seq(SeqKind::List, items, _) = ast else {
        return false;
    };
    let Some(Value::Symbol(s)) = items.first() else {
        return false;
    };
    matches!(env.get(s), Ok(Value::Closure(c)) if c.is_macro)
}

/// Repeatedly expand while `ast` is a macro call, invoking the macro with its raw
/// (unevaluated) arguments (§4.6). A pure rewrite: never evaluates the expansion.
pub fn macroexpand(mut ast: Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    while is_macro_call(&ast, env) {
        let items = match &ast {
            Value::Seq(SeqKind::List, items, _) => items.clone(),
            _ => unreachable!("is_macro_call only returns true for a list"),
        };
        let name = match &items[0] {
            Value::Symbol(s) => s.clone(),
            _ => unreachable!("is_macro_call checked the head is a symbol"),
        };
        let closure = match env.get(&name)? {
            Value::Closure(c) => c,
            _ => unreachable!("is_macro_call checked the head resolves to a closure"),
        };
        ast = apply(&Value::Closure(closure), &items[1..])?;
    }
    Ok(ast)
}

fn is_pair(v: &Value) -> bool {
    v.is_nonempty_seq()
}

fn head_symbol_is(v: &Value, name: &str) -> bool {
    matches!(v, Value::Seq(_, items, _) if matches!(items.first(), Some(Value::Symbol(s)) if &**s == name))
}

/// The quasiquote templating algorithm (§4.7), grounded on
/// `original_source/jvzgo/src/stepA_mal/stepA_mal.go`'s `quasiquote`. `unquote` and
/// `splice-unquote` each require exactly one operand (§4.7); a malformed template is
/// a host error, not a panic.
pub fn quasiquote(ast: &Value) -> Result<Value, EvalError> {
    if !is_pair(ast) {
        return Ok(Value::list(vec![Value::symbol("quote"), ast.clone()]));
    }
    let items = ast.seq_items().expect("is_pair guarantees a Seq");
    if head_symbol_is(ast, "unquote") {
        if items.len() != 2 {
            return Err(EvalError::arity_error("unquote", "1", items.len() - 1));
        }
        return Ok(items[1].clone());
    }
    let rest = Value::list(items[1..].to_vec());
    if is_pair(&items[0]) && head_symbol_is(&items[0], "splice-unquote") {
        let splice_items = items[0].seq_items().expect("checked above");
        if splice_items.len() != 2 {
            return Err(EvalError::arity_error(
                "splice-unquote",
                "1",
                splice_items.len() - 1,
            ));
        }
        return Ok(Value::list(vec![
            Value::symbol("concat"),
            splice_items[1].clone(),
            quasiquote(&rest)?,
        ]));
    }
    Ok(Value::list(vec![
        Value::symbol("cons"),
        quasiquote(&items[0])?,
        quasiquote(&rest)?,
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core;
    use crate::reader::read_str;

    fn run(src: &str) -> Result<Value, EvalError> {
        let env = Environment::root();
        core::register_all(&env);
        crate::stdlib::load_bootstrap(&env).unwrap();
        let ast = read_str(src).unwrap();
        eval(ast, env)
    }

    #[test]
    fn arithmetic_application() {
        assert_eq!(run("(+ 1 2)").unwrap(), Value::Int(3));
    }

    #[test]
    fn def_and_closure_call() {
        assert_eq!(
            run("(do (def! sq (fn* (x) (* x x))) (sq 7))").unwrap(),
            Value::Int(49)
        );
    }

    #[test]
    fn let_star_binds_in_child_env() {
        assert_eq!(run("(let* (a 1 b 2) (+ a b))").unwrap(), Value::Int(3));
    }

    #[test]
    fn if_picks_branch() {
        assert_eq!(run("(if (= 1 2) :yes :no)").unwrap(), Value::keyword("no"));
        assert_eq!(run("(if true 1)").unwrap(), Value::Int(1));
        assert_eq!(run("(if false 1)").unwrap(), Value::Nil);
    }

    #[test]
    fn quote_returns_unevaluated() {
        assert_eq!(run("(quote (1 2 3))").unwrap(), read_str("(1 2 3)").unwrap());
    }

    #[test]
    fn malformed_unquote_is_an_error_not_a_panic() {
        assert!(run("`(unquote)").is_err());
        assert!(run("`(unquote 1 2)").is_err());
    }

    #[test]
    fn malformed_splice_unquote_is_an_error_not_a_panic() {
        assert!(run("`(a (splice-unquote))").is_err());
    }

    #[test]
    fn macro_expansion_rewrites_and_evaluates() {
        assert_eq!(
            run("(do (defmacro! unless (fn* (p a b) `(if ~p ~b ~a))) (unless false 1 2))")
                .unwrap(),
            Value::Int(1)
        );
    }

    #[test]
    fn macroexpand_is_a_pure_rewrite() {
        let env = Environment::root();
        core::register_all(&env);
        crate::stdlib::load_bootstrap(&env).unwrap();
        eval(
            read_str("(defmacro! one (fn* () 1))").unwrap(),
            env.clone(),
        )
        .unwrap();
        let expanded = eval(read_str("(macroexpand (one))").unwrap(), env).unwrap();
        assert_eq!(expanded, Value::Int(1));
    }

    #[test]
    fn try_catch_round_trip_with_thrown_value() {
        assert_eq!(
            run("(try* (throw {:k 1}) (catch* e (get e :k)))").unwrap(),
            Value::Int(1)
        );
    }

    #[test]
    fn try_catch_wraps_host_errors_as_strings() {
        let result = run("(try* (nonexistent-fn) (catch* e e))").unwrap();
        assert!(matches!(result, Value::Str(_)));
    }

    #[test]
    fn tail_recursion_does_not_overflow_stack() {
        let result = run(
            "(do (def! count-up (fn* (n limit) (if (= n limit) n (count-up (+ n 1) limit)))) (count-up 0 100000))",
        )
        .unwrap();
        assert_eq!(result, Value::Int(100000));
    }

    #[test]
    fn quasiquote_unquote_and_splice() {
        assert_eq!(run("(let* (x 5) `~x)").unwrap(), Value::Int(5));
        assert_eq!(
            run("(let* (xs (list 1 2)) `(a ~@xs b))").unwrap(),
            read_str("(a 1 2 b)").unwrap()
        );
    }

    #[test]
    fn swap_matches_definition() {
        assert_eq!(
            run("(do (def! a (atom 0)) (swap! a (fn* (x) (+ x 10))) (deref a))").unwrap(),
            Value::Int(10)
        );
    }
}
