//! Map operations (§4.8): `assoc dissoc get contains? keys vals`. All copy-on-write
//! per §3 invariant 5 — none of these mutate the receiver.

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{MalMap, MapKey, Value};

use super::util::{as_map, require_arity, require_min_arity};

fn builtin_assoc(args: &[Value]) -> Result<Value, EvalError> {
    require_min_arity("assoc", args, 1)?;
    let mut map = (*as_map("assoc", &args[0])?).clone();
    let kvs = &args[1..];
    if kvs.len() % 2 != 0 {
        return Err(EvalError::runtime_error("assoc", "odd number of map items"));
    }
    for pair in kvs.chunks(2) {
        map.insert(MapKey::from_value(&pair[0])?, pair[1].clone());
    }
    Ok(Value::map(map))
}

fn builtin_dissoc(args: &[Value]) -> Result<Value, EvalError> {
    require_min_arity("dissoc", args, 1)?;
    let mut map = (*as_map("dissoc", &args[0])?).clone();
    for k in &args[1..] {
        let key = MapKey::from_value(k)?;
        map.remove(&key);
    }
    Ok(Value::map(map))
}

/// `get m k` (§4.8): `Nil` map or missing key both yield `Nil`.
fn builtin_get(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("get", args, 2)?;
    match &args[0] {
        Value::Nil => Ok(Value::Nil),
        Value::Map(m, _) => {
            let key = MapKey::from_value(&args[1])?;
            Ok(m.get(&key).cloned().unwrap_or(Value::Nil))
        }
        other => Err(EvalError::type_error("get", "map or nil", other)),
    }
}

fn builtin_contains_p(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("contains?", args, 2)?;
    let map = as_map("contains?", &args[0])?;
    let key = MapKey::from_value(&args[1])?;
    Ok(Value::Bool(map.contains_key(&key)))
}

fn builtin_keys(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("keys", args, 1)?;
    let map = as_map("keys", &args[0])?;
    Ok(Value::list(map.keys().map(MapKey::to_value).collect()))
}

fn builtin_vals(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("vals", args, 1)?;
    let map = as_map("vals", &args[0])?;
    Ok(Value::list(map.values().cloned().collect()))
}

pub fn register(env: &Rc<Environment>) {
    env.set(Rc::from("assoc"), Value::native("assoc", builtin_assoc));
    env.set(Rc::from("dissoc"), Value::native("dissoc", builtin_dissoc));
    env.set(Rc::from("get"), Value::native("get", builtin_get));
    env.set(Rc::from("contains?"), Value::native("contains?", builtin_contains_p));
    env.set(Rc::from("keys"), Value::native("keys", builtin_keys));
    env.set(Rc::from("vals"), Value::native("vals", builtin_vals));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(pairs: &[(&str, i64)]) -> Value {
        let mut m = MalMap::new();
        for (k, v) in pairs {
            m.insert(MapKey::Keyword(Rc::from(*k)), Value::Int(*v));
        }
        Value::map(m)
    }

    #[test]
    fn assoc_is_copy_on_write() {
        let original = map_of(&[("a", 1)]);
        let updated = builtin_assoc(&[original.clone(), Value::keyword("b"), Value::Int(2)]).unwrap();
        assert_eq!(
            builtin_get(&[original, Value::keyword("b")]).unwrap(),
            Value::Nil
        );
        assert_eq!(
            builtin_get(&[updated, Value::keyword("b")]).unwrap(),
            Value::Int(2)
        );
    }

    #[test]
    fn get_missing_key_is_nil() {
        let m = map_of(&[("a", 1)]);
        assert_eq!(builtin_get(&[m, Value::keyword("nope")]).unwrap(), Value::Nil);
    }

    #[test]
    fn get_on_nil_is_nil() {
        assert_eq!(builtin_get(&[Value::Nil, Value::keyword("a")]).unwrap(), Value::Nil);
    }

    #[test]
    fn dissoc_removes_key() {
        let m = map_of(&[("a", 1), ("b", 2)]);
        let updated = builtin_dissoc(&[m, Value::keyword("a")]).unwrap();
        assert_eq!(
            builtin_contains_p(&[updated, Value::keyword("a")]).unwrap(),
            Value::Bool(false)
        );
    }
}
