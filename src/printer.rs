//! Render any value to text in two modes (§4.3): READABLE re-escapes strings so that
//! the printout, fed back through the reader, yields an equal value; UNREADABLE
//! prints strings raw.

use crate::value::{SeqKind, Value};

pub fn pr_str(value: &Value, readable: bool) -> String {
    let mut out = String::new();
    write_value(&mut out, value, readable);
    out
}

fn write_value(out: &mut String, value: &Value, readable: bool) {
    match value {
        Value::Nil => out.push_str("nil"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Symbol(s) => out.push_str(s),
        Value::Keyword(s) => {
            out.push(':');
            out.push_str(s);
        }
        Value::Str(s) => {
            if readable {
                write_escaped_string(out, s);
            } else {
                out.push_str(s);
            }
        }
        Value::Seq(SeqKind::List, items, _) => write_seq(out, items, '(', ')', readable),
        Value::Seq(SeqKind::Vector, items, _) => write_seq(out, items, '[', ']', readable),
        Value::Map(entries, _) => {
            out.push('{');
            let mut first = true;
            for (k, v) in entries.iter() {
                if !first {
                    out.push(' ');
                }
                first = false;
                write_value(out, &k.to_value(), readable);
                out.push(' ');
                write_value(out, v, readable);
            }
            out.push('}');
        }
        Value::Atom(cell, _) => {
            out.push_str("(atom ");
            write_value(out, &cell.borrow(), readable);
            out.push(')');
        }
        Value::NativeFn(_, _) => out.push_str("#<function>"),
        Value::Closure(c) if c.is_macro => out.push_str("#<macro>"),
        Value::Closure(_) => out.push_str("#<function>"),
    }
}

fn write_seq(out: &mut String, items: &[Value], open: char, close: char, readable: bool) {
    out.push(open);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write_value(out, item, readable);
    }
    out.push(close);
}

fn write_escaped_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_string_escapes() {
        let v = Value::string("a\n\"b\"\\c");
        assert_eq!(pr_str(&v, true), "\"a\\n\\\"b\\\"\\\\c\"");
    }

    #[test]
    fn unreadable_string_is_raw() {
        let v = Value::string("a\nb");
        assert_eq!(pr_str(&v, false), "a\nb");
    }

    #[test]
    fn list_and_vector_delimiters() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2)]);
        let vector = Value::vector(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(pr_str(&list, true), "(1 2)");
        assert_eq!(pr_str(&vector, true), "[1 2]");
    }

    #[test]
    fn keyword_prefixed_with_colon() {
        assert_eq!(pr_str(&Value::keyword("kw"), true), ":kw");
    }

    #[test]
    fn atom_renders_contents() {
        let atom = Value::atom(Value::Int(5));
        assert_eq!(pr_str(&atom, true), "(atom 5)");
    }
}
