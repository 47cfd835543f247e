//! Control built-ins (§4.8, §7): `throw`. Carries an arbitrary value through the
//! error channel to the nearest `try*`/`catch*` or the REPL top level.

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;

use super::util::require_arity;

fn builtin_throw(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("throw", args, 1)?;
    Err(EvalError::Thrown(args[0].clone()))
}

pub fn register(env: &Rc<Environment>) {
    env.set(Rc::from("throw"), Value::native("throw", builtin_throw));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throw_carries_the_value_through_the_error_channel() {
        let err = builtin_throw(&[Value::keyword("boom")]).unwrap_err();
        assert_eq!(err.into_caught_value(), Value::keyword("boom"));
    }
}
