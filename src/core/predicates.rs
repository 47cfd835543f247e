//! Type predicates (§4.8): `nil? true? false? symbol? keyword? string? number? fn?
//! macro? list? vector? map? sequential?`.

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;

use super::util::require_arity;

macro_rules! predicate_fn {
    ($fn_name:ident, $name:literal, $test:expr) => {
        fn $fn_name(args: &[Value]) -> Result<Value, EvalError> {
            require_arity($name, args, 1)?;
            let test: fn(&Value) -> bool = $test;
            Ok(Value::Bool(test(&args[0])))
        }
    };
}

predicate_fn!(builtin_nil_p, "nil?", |v| matches!(v, Value::Nil));
predicate_fn!(builtin_true_p, "true?", |v| matches!(v, Value::Bool(true)));
predicate_fn!(builtin_false_p, "false?", |v| matches!(v, Value::Bool(false)));
predicate_fn!(builtin_symbol_p, "symbol?", |v| matches!(v, Value::Symbol(_)));
predicate_fn!(builtin_keyword_p, "keyword?", |v| matches!(v, Value::Keyword(_)));
predicate_fn!(builtin_string_p, "string?", |v| matches!(v, Value::Str(_)));
predicate_fn!(builtin_number_p, "number?", |v| matches!(v, Value::Int(_)));
predicate_fn!(builtin_fn_p, "fn?", |v| matches!(v, Value::NativeFn(_, _))
    || matches!(v, Value::Closure(c) if !c.is_macro));
predicate_fn!(builtin_macro_p, "macro?", |v| matches!(v, Value::Closure(c) if c.is_macro));
predicate_fn!(builtin_list_p, "list?", Value::is_list);
predicate_fn!(builtin_vector_p, "vector?", Value::is_vector);
predicate_fn!(builtin_map_p, "map?", |v| matches!(v, Value::Map(_, _)));
predicate_fn!(builtin_sequential_p, "sequential?", Value::is_sequential);
predicate_fn!(builtin_atom_p, "atom?", |v| matches!(v, Value::Atom(_, _)));

pub fn register(env: &Rc<Environment>) {
    env.set(Rc::from("nil?"), Value::native("nil?", builtin_nil_p));
    env.set(Rc::from("true?"), Value::native("true?", builtin_true_p));
    env.set(Rc::from("false?"), Value::native("false?", builtin_false_p));
    env.set(Rc::from("symbol?"), Value::native("symbol?", builtin_symbol_p));
    env.set(Rc::from("keyword?"), Value::native("keyword?", builtin_keyword_p));
    env.set(Rc::from("string?"), Value::native("string?", builtin_string_p));
    env.set(Rc::from("number?"), Value::native("number?", builtin_number_p));
    env.set(Rc::from("fn?"), Value::native("fn?", builtin_fn_p));
    env.set(Rc::from("macro?"), Value::native("macro?", builtin_macro_p));
    env.set(Rc::from("list?"), Value::native("list?", builtin_list_p));
    env.set(Rc::from("vector?"), Value::native("vector?", builtin_vector_p));
    env.set(Rc::from("map?"), Value::native("map?", builtin_map_p));
    env.set(Rc::from("sequential?"), Value::native("sequential?", builtin_sequential_p));
    env.set(Rc::from("atom?"), Value::native("atom?", builtin_atom_p));
}
