//! Lexical environment chain (§4.4).
//!
//! Each node owns a mapping from name to value and an optional link to an outer
//! node. Lookups walk outward; `child` builds a fresh node from a parameter list and
//! an argument list, honoring the `&`-rest convention.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::EvalError;
use crate::value::Value;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<Rc<str>, Value>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    pub fn root() -> Rc<Environment> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    pub fn with_outer(outer: Rc<Environment>) -> Rc<Environment> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// Insert or replace `name` in this node (§4.4 `set`).
    pub fn set(&self, name: Rc<str>, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Walk outward for the first node binding `name` (§4.4 `find`).
    pub fn find(self: &Rc<Self>, name: &str) -> Option<Rc<Environment>> {
        if self.bindings.borrow().contains_key(name) {
            Some(Rc::clone(self))
        } else {
            self.outer.as_ref().and_then(|o| o.find(name))
        }
    }

    /// `find` then retrieve, failing with the canonical `"unknown key: X"` message
    /// (§4.4 `get`, grounded on jvzgo's `env.Get`).
    pub fn get(self: &Rc<Self>, name: &str) -> Result<Value, EvalError> {
        match self.find(name) {
            Some(node) => Ok(node.bindings.borrow().get(name).cloned().unwrap()),
            None => Err(EvalError::UndefinedSymbol(name.to_string())),
        }
    }

    /// Build a child node binding `binds` to `exprs` positionally, honoring `&rest`
    /// (§4.4 `child`). A bind symbol with no corresponding expr is simply left
    /// unbound rather than defaulted to Nil (see DESIGN.md Open Question note).
    pub fn child(
        parent: &Rc<Environment>,
        binds: &[Rc<str>],
        exprs: &[Value],
    ) -> Result<Rc<Environment>, EvalError> {
        let env = Environment::with_outer(Rc::clone(parent));
        let mut i = 0;
        while i < binds.len() {
            if &*binds[i] == "&" {
                let rest_name = binds.get(i + 1).ok_or_else(|| {
                    EvalError::runtime_error("fn*", "expected a binding name after '&'")
                })?;
                let rest_vals = exprs.get(i..).unwrap_or(&[]).to_vec();
                env.set(Rc::clone(rest_name), Value::list(rest_vals));
                i = binds.len();
                break;
            }
            if let Some(val) = exprs.get(i) {
                env.set(Rc::clone(&binds[i]), val.clone());
            }
            i += 1;
        }
        Ok(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip() {
        let env = Environment::root();
        env.set(Rc::from("x"), Value::Int(42));
        assert_eq!(env.get("x").unwrap(), Value::Int(42));
    }

    #[test]
    fn get_unknown_key_errors() {
        let env = Environment::root();
        let err = env.get("nope").unwrap_err();
        assert!(matches!(err, EvalError::UndefinedSymbol(ref s) if s == "nope"));
    }

    #[test]
    fn child_sees_outer_bindings() {
        let outer = Environment::root();
        outer.set(Rc::from("x"), Value::Int(1));
        let inner = Environment::with_outer(outer);
        inner.set(Rc::from("y"), Value::Int(2));
        assert_eq!(inner.get("x").unwrap(), Value::Int(1));
        assert_eq!(inner.get("y").unwrap(), Value::Int(2));
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let outer = Environment::root();
        outer.set(Rc::from("x"), Value::Int(1));
        let inner = Environment::with_outer(outer);
        inner.set(Rc::from("x"), Value::Int(2));
        assert_eq!(inner.get("x").unwrap(), Value::Int(2));
    }

    #[test]
    fn child_binds_variadic_rest() {
        let root = Environment::root();
        let binds: Vec<Rc<str>> = vec![Rc::from("a"), Rc::from("&"), Rc::from("rest")];
        let exprs = vec![Value::Int(1), Value::Int(2), Value::Int(3)];
        let env = Environment::child(&root, &binds, &exprs).unwrap();
        assert_eq!(env.get("a").unwrap(), Value::Int(1));
        assert_eq!(
            env.get("rest").unwrap(),
            Value::list(vec![Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn child_variadic_rest_can_be_empty() {
        let root = Environment::root();
        let binds: Vec<Rc<str>> = vec![Rc::from("&"), Rc::from("rest")];
        let env = Environment::child(&root, &binds, &[]).unwrap();
        assert_eq!(env.get("rest").unwrap(), Value::list(vec![]));
    }

    #[test]
    fn child_missing_positional_arg_is_unbound_not_nil() {
        let root = Environment::root();
        let binds: Vec<Rc<str>> = vec![Rc::from("a"), Rc::from("b")];
        let exprs = vec![Value::Int(1)];
        let env = Environment::child(&root, &binds, &exprs).unwrap();
        assert_eq!(env.get("a").unwrap(), Value::Int(1));
        assert!(env.get("b").is_err());
    }

    #[test]
    fn child_excess_args_without_rest_are_ignored() {
        let root = Environment::root();
        let binds: Vec<Rc<str>> = vec![Rc::from("a")];
        let exprs = vec![Value::Int(1), Value::Int(2), Value::Int(3)];
        let env = Environment::child(&root, &binds, &exprs).unwrap();
        assert_eq!(env.get("a").unwrap(), Value::Int(1));
    }
}
