//! Sequence construction and inspection (§4.8): `list vector hash-map cons concat
//! conj empty? count nth first rest seq`.

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{MalMap, MapKey, SeqKind, Value};

use super::util::{as_int, as_seq_items, require_arity};

fn builtin_list(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::list(args.to_vec()))
}

fn builtin_vector(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::vector(args.to_vec()))
}

fn builtin_hash_map(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() % 2 != 0 {
        return Err(EvalError::runtime_error(
            "hash-map",
            "odd number of map items",
        ));
    }
    let mut map = MalMap::new();
    for pair in args.chunks(2) {
        map.insert(MapKey::from_value(&pair[0])?, pair[1].clone());
    }
    Ok(Value::map(map))
}

/// `cons x xs` (§4.8); `xs` must be sequential.
fn builtin_cons(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("cons", args, 2)?;
    let rest = as_seq_items("cons", &args[1])?;
    let mut items = Vec::with_capacity(rest.len() + 1);
    items.push(args[0].clone());
    items.extend(rest.iter().cloned());
    Ok(Value::list(items))
}

/// `concat …seqs` (§4.8); always returns a list regardless of the operand kinds.
fn builtin_concat(args: &[Value]) -> Result<Value, EvalError> {
    let mut items = Vec::new();
    for a in args {
        items.extend(as_seq_items("concat", a)?.iter().cloned());
    }
    Ok(Value::list(items))
}

/// `conj` (§4.8, §8 testable property): lists prepend each remaining arg in
/// reverse order, vectors append in order, `Nil` yields a list of the args.
fn builtin_conj(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("conj", "at least 1", 0));
    }
    match &args[0] {
        Value::Nil => Ok(Value::list(args[1..].to_vec())),
        Value::Seq(SeqKind::List, items, _) => {
            let mut out = (**items).clone();
            for a in &args[1..] {
                out.insert(0, a.clone());
            }
            Ok(Value::list(out))
        }
        Value::Seq(SeqKind::Vector, items, _) => {
            let mut out = (**items).clone();
            out.extend(args[1..].iter().cloned());
            Ok(Value::vector(out))
        }
        other => Err(EvalError::type_error("conj", "list, vector or nil", other)),
    }
}

fn builtin_empty_p(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("empty?", args, 1)?;
    let empty = match &args[0] {
        Value::Nil => true,
        Value::Seq(_, items, _) => items.is_empty(),
        other => return Err(EvalError::type_error("empty?", "list, vector or nil", other)),
    };
    Ok(Value::Bool(empty))
}

/// `count` (§4.8): `Nil` counts as `0`.
fn builtin_count(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("count", args, 1)?;
    let n = match &args[0] {
        Value::Nil => 0,
        Value::Seq(_, items, _) => items.len(),
        other => return Err(EvalError::type_error("count", "list, vector or nil", other)),
    };
    Ok(Value::Int(n as i64))
}

/// `nth seq i` (§4.8): out-of-range index is an error, not `Nil`.
fn builtin_nth(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("nth", args, 2)?;
    let items = as_seq_items("nth", &args[0])?;
    let i = as_int("nth", &args[1])?;
    if i < 0 {
        return Err(EvalError::runtime_error("nth", "index out of range"));
    }
    items
        .get(i as usize)
        .cloned()
        .ok_or_else(|| EvalError::runtime_error("nth", "index out of range"))
}

/// `first` (§4.8): `Nil` or an empty sequence both yield `Nil`.
fn builtin_first(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("first", args, 1)?;
    match &args[0] {
        Value::Nil => Ok(Value::Nil),
        Value::Seq(_, items, _) => Ok(items.first().cloned().unwrap_or(Value::Nil)),
        other => Err(EvalError::type_error("first", "list, vector or nil", other)),
    }
}

/// `rest` (§4.8, §9 Open Question: `rest` of a single-element list is `()`, not a
/// different value — the general "tail as list" rule already gives that for free).
fn builtin_rest(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("rest", args, 1)?;
    match &args[0] {
        Value::Nil => Ok(Value::list(vec![])),
        Value::Seq(_, items, _) => {
            if items.is_empty() {
                Ok(Value::list(vec![]))
            } else {
                Ok(Value::list(items[1..].to_vec()))
            }
        }
        other => Err(EvalError::type_error("rest", "list, vector or nil", other)),
    }
}

/// `seq` (§4.8): `Nil`/empty yields `Nil`; a string yields a list of
/// single-character strings; any other sequential yields a list of its elements.
fn builtin_seq(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("seq", args, 1)?;
    match &args[0] {
        Value::Nil => Ok(Value::Nil),
        Value::Str(s) => {
            if s.is_empty() {
                Ok(Value::Nil)
            } else {
                Ok(Value::list(
                    s.chars().map(|c| Value::string(c.to_string())).collect(),
                ))
            }
        }
        Value::Seq(_, items, _) => {
            if items.is_empty() {
                Ok(Value::Nil)
            } else {
                Ok(Value::list((**items).clone()))
            }
        }
        other => Err(EvalError::type_error(
            "seq",
            "list, vector, string or nil",
            other,
        )),
    }
}

pub fn register(env: &Rc<Environment>) {
    env.set(Rc::from("list"), Value::native("list", builtin_list));
    env.set(Rc::from("vector"), Value::native("vector", builtin_vector));
    env.set(Rc::from("hash-map"), Value::native("hash-map", builtin_hash_map));
    env.set(Rc::from("cons"), Value::native("cons", builtin_cons));
    env.set(Rc::from("concat"), Value::native("concat", builtin_concat));
    env.set(Rc::from("conj"), Value::native("conj", builtin_conj));
    env.set(Rc::from("empty?"), Value::native("empty?", builtin_empty_p));
    env.set(Rc::from("count"), Value::native("count", builtin_count));
    env.set(Rc::from("nth"), Value::native("nth", builtin_nth));
    env.set(Rc::from("first"), Value::native("first", builtin_first));
    env.set(Rc::from("rest"), Value::native("rest", builtin_rest));
    env.set(Rc::from("seq"), Value::native("seq", builtin_seq));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conj_list_prepends_reversed() {
        let list = Value::list(vec![Value::Int(1)]);
        assert_eq!(
            builtin_conj(&[list, Value::Int(2), Value::Int(3)]).unwrap(),
            Value::list(vec![Value::Int(3), Value::Int(2), Value::Int(1)])
        );
    }

    #[test]
    fn conj_vector_appends_in_order() {
        let vector = Value::vector(vec![Value::Int(1)]);
        assert_eq!(
            builtin_conj(&[vector, Value::Int(2), Value::Int(3)]).unwrap(),
            Value::vector(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn nth_out_of_range_errors() {
        let list = Value::list(vec![Value::Int(1)]);
        assert!(builtin_nth(&[list, Value::Int(5)]).is_err());
    }

    #[test]
    fn first_and_rest_on_nil() {
        assert_eq!(builtin_first(&[Value::Nil]).unwrap(), Value::Nil);
        assert_eq!(builtin_rest(&[Value::Nil]).unwrap(), Value::list(vec![]));
    }

    #[test]
    fn rest_of_single_element_list_is_empty() {
        let list = Value::list(vec![Value::Int(1)]);
        assert_eq!(builtin_rest(&[list]).unwrap(), Value::list(vec![]));
    }

    #[test]
    fn count_of_nil_is_zero() {
        assert_eq!(builtin_count(&[Value::Nil]).unwrap(), Value::Int(0));
    }

    #[test]
    fn seq_splits_string_into_chars() {
        assert_eq!(
            builtin_seq(&[Value::string("ab")]).unwrap(),
            Value::list(vec![Value::string("a"), Value::string("b")])
        );
        assert_eq!(builtin_seq(&[Value::string("")]).unwrap(), Value::Nil);
    }

    #[test]
    fn concat_flattens_into_a_list() {
        let a = Value::list(vec![Value::Int(1)]);
        let b = Value::vector(vec![Value::Int(2), Value::Int(3)]);
        assert_eq!(
            builtin_concat(&[a, b]).unwrap(),
            Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }
}
