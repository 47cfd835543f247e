//! The value domain: a closed tagged union covering every runtime and AST value.
//!
//! Lists, vectors, maps and atoms share a reference-counted backing store so that
//! `cons`, `rest`, `assoc` and friends clone a handle rather than the underlying
//! storage. Every non-primitive carrier holds an optional metadata value, defaulting
//! to `Nil`.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::printer;

/// Keys permitted inside a `Map`. Function values cannot be used as keys (§9 open
/// question: rejected with a type error in the reader/builtins rather than accepted
/// with unspecified identity).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Nil,
    Bool(bool),
    Int(i64),
    Str(Rc<str>),
    Symbol(Rc<str>),
    Keyword(Rc<str>),
}

impl MapKey {
    pub fn from_value(v: &Value) -> Result<MapKey, EvalError> {
        match v {
            Value::Nil => Ok(MapKey::Nil),
            Value::Bool(b) => Ok(MapKey::Bool(*b)),
            Value::Int(i) => Ok(MapKey::Int(*i)),
            Value::Str(s) => Ok(MapKey::Str(s.clone())),
            Value::Symbol(s) => Ok(MapKey::Symbol(s.clone())),
            Value::Keyword(s) => Ok(MapKey::Keyword(s.clone())),
            other => Err(EvalError::type_error(
                "hash-map key",
                "nil, bool, int, string, symbol or keyword",
                other,
            )),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            MapKey::Nil => Value::Nil,
            MapKey::Bool(b) => Value::Bool(*b),
            MapKey::Int(i) => Value::Int(*i),
            MapKey::Str(s) => Value::Str(s.clone()),
            MapKey::Symbol(s) => Value::Symbol(s.clone()),
            MapKey::Keyword(s) => Value::Keyword(s.clone()),
        }
    }
}

pub type MalMap = HashMap<MapKey, Value>;

/// A host-implemented primitive. Carries its registered name (for error messages and
/// for the `#<function>` printer) and a plain function pointer — no captured state,
/// matching the teacher's `Value::BuiltIn(fn(&[Value]) -> Result<Value, EvalError>)`
/// native-function shape.
#[derive(Clone, Copy)]
pub struct NativeFn {
    pub name: &'static str,
    pub func: fn(&[Value]) -> Result<Value, EvalError>,
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

/// A user-defined function or macro (§3, §9 "macro-is-a-closure-with-a-flag").
#[derive(Debug)]
pub struct ClosureData {
    pub params: Vec<Rc<str>>,
    pub body: Value,
    pub env: Rc<Environment>,
    pub is_macro: bool,
    pub meta: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqKind {
    List,
    Vector,
}

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Str(Rc<str>),
    Symbol(Rc<str>),
    Keyword(Rc<str>),
    Seq(SeqKind, Rc<Vec<Value>>, Rc<Value>),
    Map(Rc<MalMap>, Rc<Value>),
    Atom(Rc<RefCell<Value>>, Rc<Value>),
    NativeFn(NativeFn, Rc<Value>),
    Closure(Rc<ClosureData>),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::Seq(SeqKind::List, Rc::new(items), Rc::new(Value::Nil))
    }

    pub fn vector(items: Vec<Value>) -> Value {
        Value::Seq(SeqKind::Vector, Rc::new(items), Rc::new(Value::Nil))
    }

    pub fn map(entries: MalMap) -> Value {
        Value::Map(Rc::new(entries), Rc::new(Value::Nil))
    }

    pub fn symbol(s: impl Into<Rc<str>>) -> Value {
        Value::Symbol(s.into())
    }

    pub fn keyword(s: impl Into<Rc<str>>) -> Value {
        Value::Keyword(s.into())
    }

    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::Str(s.into())
    }

    pub fn native(name: &'static str, func: fn(&[Value]) -> Result<Value, EvalError>) -> Value {
        Value::NativeFn(NativeFn { name, func }, Rc::new(Value::Nil))
    }

    pub fn atom(v: Value) -> Value {
        Value::Atom(Rc::new(RefCell::new(v)), Rc::new(Value::Nil))
    }

    /// Every value but `Nil` and `Bool(false)` is truthy (GLOSSARY: "Truthy").
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::Seq(SeqKind::List, _, _))
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Value::Seq(SeqKind::Vector, _, _))
    }

    pub fn is_sequential(&self) -> bool {
        matches!(self, Value::Seq(_, _, _))
    }

    pub fn is_nonempty_seq(&self) -> bool {
        matches!(self, Value::Seq(_, items, _) if !items.is_empty())
    }

    pub fn seq_items(&self) -> Option<&Rc<Vec<Value>>> {
        match self {
            Value::Seq(_, items, _) => Some(items),
            _ => None,
        }
    }

    pub fn meta(&self) -> Value {
        match self {
            Value::Seq(_, _, meta) | Value::Map(_, meta) | Value::Atom(_, meta) | Value::NativeFn(_, meta) => {
                (**meta).clone()
            }
            Value::Closure(c) => c.meta.clone(),
            _ => Value::Nil,
        }
    }

    /// Shallow copy with replaced metadata (§3 invariant 6: non-mutating).
    pub fn with_meta(&self, meta: Value) -> Value {
        match self {
            Value::Seq(kind, items, _) => Value::Seq(*kind, items.clone(), Rc::new(meta)),
            Value::Map(entries, _) => Value::Map(entries.clone(), Rc::new(meta)),
            Value::Atom(cell, _) => Value::Atom(cell.clone(), Rc::new(meta)),
            Value::NativeFn(nf, _) => Value::NativeFn(*nf, Rc::new(meta)),
            Value::Closure(c) => Value::Closure(Rc::new(ClosureData {
                params: c.params.clone(),
                body: c.body.clone(),
                env: c.env.clone(),
                is_macro: c.is_macro,
                meta,
            })),
            other => other.clone(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Keyword(_) => "keyword",
            Value::Seq(SeqKind::List, _, _) => "list",
            Value::Seq(SeqKind::Vector, _, _) => "vector",
            Value::Map(_, _) => "map",
            Value::Atom(_, _) => "atom",
            Value::NativeFn(_, _) => "function",
            Value::Closure(c) if c.is_macro => "macro",
            Value::Closure(_) => "function",
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::NativeFn(_, _) | Value::Closure(_))
    }
}

/// Structural equality (§4.1). List/vector kinds are ignored; functions compare by
/// identity only.
pub fn mal_eq(a: &Value, b: &Value) -> bool {
    use Value::*;
    match (a, b) {
        (Nil, Nil) => true,
        (Bool(x), Bool(y)) => x == y,
        (Int(x), Int(y)) => x == y,
        (Str(x), Str(y)) => x == y,
        (Symbol(x), Symbol(y)) => x == y,
        (Keyword(x), Keyword(y)) => x == y,
        (Seq(_, x, _), Seq(_, y, _)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(p, q)| mal_eq(p, q))
        }
        (Map(x, _), Map(y, _)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|v2| mal_eq(v, v2)))
        }
        (Atom(x, _), Atom(y, _)) => mal_eq(&x.borrow(), &y.borrow()),
        (NativeFn(x, _), NativeFn(y, _)) => x.func as usize == y.func as usize,
        (Closure(x), Closure(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        mal_eq(self, other)
    }
}

/// Ordering over `Int` only; used by `< <= > >=`, which reject non-Int operands
/// before ever calling this.
pub fn mal_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", printer::pr_str(self, true))
    }
}
