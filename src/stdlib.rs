//! The language-bootstrapped root names (§6, §8, §11): `not`, `load-file`, `cond`,
//! `or`. Each is plain MAL source text evaluated once into the root environment at
//! startup, in the manner of the teacher's `include_str!`-based stdlib loading in
//! `src/main.rs` — except these four forms are short enough to live inline rather
//! than in a separate `.lisp` asset.
//!
//! `or`'s body is not given by the distilled specification; it is supplemented here
//! verbatim from the original MAL source (§11), since the distilled spec names the
//! root binding but omits the definition.

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::eval::eval;
use crate::reader::read_str;

const BOOTSTRAP_FORMS: &[&str] = &[
    "(def! not (fn* (a) (if a false true)))",
    r#"(def! load-file (fn* (f) (eval (read-string (str "(do " (slurp f) "\nnil)")))))"#,
    r#"(defmacro! cond (fn* (& xs)
         (if (> (count xs) 0)
           (list 'if (first xs)
                 (if (> (count xs) 1) (nth xs 1) (throw "odd number of forms to cond"))
                 (cons 'cond (rest (rest xs)))))))"#,
    r#"(defmacro! or (fn* (& xs)
         (if (empty? xs)
           nil
           (if (= 1 (count xs))
             (first xs)
             `(let* (or_FIXME ~(first xs))
                (if or_FIXME or_FIXME (or ~@(rest xs))))))))"#,
];

/// Evaluate each bootstrap form into `env`. Per §8, all four MUST evaluate without
/// error; any failure here is a defect in this crate, not user input, so the caller
/// treats it as fatal at startup.
pub fn load_bootstrap(env: &Rc<Environment>) -> Result<(), EvalError> {
    for src in BOOTSTRAP_FORMS {
        let ast = read_str(src)?;
        eval(ast, env.clone())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn bootstrap_loads_without_error() {
        let env = Environment::root();
        crate::core::register_all(&env);
        load_bootstrap(&env).unwrap();
        assert_eq!(env.get("not").is_ok(), true);
        assert_eq!(env.get("load-file").is_ok(), true);
        assert_eq!(env.get("cond").is_ok(), true);
        assert_eq!(env.get("or").is_ok(), true);
    }

    #[test]
    fn not_negates_truthiness() {
        let env = Environment::root();
        crate::core::register_all(&env);
        load_bootstrap(&env).unwrap();
        assert_eq!(eval(read_str("(not false)").unwrap(), env.clone()).unwrap(), Value::Bool(true));
        assert_eq!(eval(read_str("(not 1)").unwrap(), env).unwrap(), Value::Bool(false));
    }

    #[test]
    fn cond_evaluates_first_true_clause() {
        let env = Environment::root();
        crate::core::register_all(&env);
        load_bootstrap(&env).unwrap();
        let result = eval(
            read_str("(cond false 1 (= 1 1) 2 true 3)").unwrap(),
            env,
        )
        .unwrap();
        assert_eq!(result, Value::Int(2));
    }

    #[test]
    fn or_short_circuits_on_first_truthy() {
        let env = Environment::root();
        crate::core::register_all(&env);
        load_bootstrap(&env).unwrap();
        assert_eq!(
            eval(read_str("(or false nil 3 4)").unwrap(), env).unwrap(),
            Value::Int(3)
        );
    }
}
