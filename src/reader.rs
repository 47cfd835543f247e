//! Tokenize and parse s-expressions (§4.2), including reader macros for quoting,
//! unquoting, deref and metadata.
//!
//! The tokenizer is built from small `nom` combinators in the same style as the
//! teacher's `src/parser.rs`; the priority ordering and the "special character"
//! class come from `original_source/jvzgo/src/reader/reader.go`'s `tokenPattern`.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{char, one_of};
use nom::combinator::recognize;
use nom::IResult;
use nom::Parser;

use crate::error::ReaderError;
use crate::value::{MapKey, MalMap, Value};

const SPECIAL_CHARS: &str = "[]{}()'\"`;";

fn is_ws_or_comma(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn tok_whitespace(input: &str) -> IResult<&str, ()> {
    let (input, _) = take_while1(is_ws_or_comma)(input)?;
    Ok((input, ()))
}

fn tok_comment(input: &str) -> IResult<&str, ()> {
    let (input, _) = char(';')(input)?;
    let (input, _) = take_while(|c| c != '\n')(input)?;
    Ok((input, ()))
}

fn tok_splice_unquote(input: &str) -> IResult<&str, &str> {
    tag("~@")(input)
}

fn tok_special(input: &str) -> IResult<&str, &str> {
    recognize(one_of("[]{}()'`~^@")).parse(input)
}

/// A quoted string token, taken verbatim including its delimiting quotes and any
/// escape sequences; decoding happens later in `read_atom`.
fn tok_string(input: &str) -> IResult<&str, &str> {
    let (rest, _) = char('"')(input)?;
    let bytes = rest.as_bytes();
    let mut i = 0;
    let mut closed = false;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => i += 2,
            b'"' => {
                i += 1;
                closed = true;
                break;
            }
            _ => i += 1,
        }
    }
    if !closed {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Eof,
        )));
    }
    let total = 1 + i;
    Ok((&input[total..], &input[..total]))
}

fn tok_atom(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !is_ws_or_comma(c) && !SPECIAL_CHARS.contains(c))(input)
}

fn one_token(input: &str) -> IResult<&str, Option<&str>> {
    alt((
        |i| tok_whitespace(i).map(|(r, _)| (r, None)),
        |i| tok_comment(i).map(|(r, _)| (r, None)),
        |i| tok_splice_unquote(i).map(|(r, t)| (r, Some(t))),
        |i| tok_special(i).map(|(r, t)| (r, Some(t))),
        |i| tok_string(i).map(|(r, t)| (r, Some(t))),
        |i| tok_atom(i).map(|(r, t)| (r, Some(t))),
    ))
    .parse(input)
}

fn tokenize(input: &str) -> Result<Vec<String>, ReaderError> {
    let mut tokens = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        match one_token(rest) {
            Ok((next, tok)) => {
                if let Some(t) = tok {
                    tokens.push(t.to_string());
                }
                rest = next;
            }
            Err(_) => return Err(ReaderError::UnterminatedString),
        }
    }
    Ok(tokens)
}

struct Reader {
    tokens: Vec<String>,
    pos: usize,
}

impl Reader {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(|s| s.as_str())
    }

    fn next(&mut self) -> Option<String> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }
}

/// Parse exactly one form from `input`. Input with no forms to read (blank or
/// comment-only) yields `Nil` (§4.2).
pub fn read_str(input: &str) -> Result<Value, ReaderError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Ok(Value::Nil);
    }
    let mut reader = Reader { tokens, pos: 0 };
    read_form(&mut reader)
}

fn wrap(name: &str, form: Value) -> Value {
    Value::list(vec![Value::symbol(name), form])
}

fn read_form(r: &mut Reader) -> Result<Value, ReaderError> {
    match r.peek() {
        None => Err(ReaderError::UnexpectedEof),
        Some("(") => read_seq(r, ')', crate::value::SeqKind::List),
        Some("[") => read_seq(r, ']', crate::value::SeqKind::Vector),
        Some("{") => read_map(r),
        Some(")") => Err(ReaderError::UnexpectedCloseDelim(')')),
        Some("]") => Err(ReaderError::UnexpectedCloseDelim(']')),
        Some("}") => Err(ReaderError::UnexpectedCloseDelim('}')),
        Some("'") => {
            r.next();
            Ok(wrap("quote", read_form(r)?))
        }
        Some("`") => {
            r.next();
            Ok(wrap("quasiquote", read_form(r)?))
        }
        Some("~@") => {
            r.next();
            Ok(wrap("splice-unquote", read_form(r)?))
        }
        Some("~") => {
            r.next();
            Ok(wrap("unquote", read_form(r)?))
        }
        Some("@") => {
            r.next();
            Ok(wrap("deref", read_form(r)?))
        }
        Some("^") => {
            r.next();
            let meta = read_form(r)?;
            let target = read_form(r)?;
            Ok(Value::list(vec![Value::symbol("with-meta"), target, meta]))
        }
        _ => read_atom(r),
    }
}

fn read_seq(r: &mut Reader, close: char, kind: crate::value::SeqKind) -> Result<Value, ReaderError> {
    r.next();
    let mut items = Vec::new();
    loop {
        match r.peek() {
            None => return Err(ReaderError::ExpectedClose(close)),
            Some(t) if t.len() == 1 && t.chars().next() == Some(close) => {
                r.next();
                break;
            }
            _ => items.push(read_form(r)?),
        }
    }
    Ok(match kind {
        crate::value::SeqKind::List => Value::list(items),
        crate::value::SeqKind::Vector => Value::vector(items),
    })
}

fn read_map(r: &mut Reader) -> Result<Value, ReaderError> {
    r.next();
    let mut flat = Vec::new();
    loop {
        match r.peek() {
            None => return Err(ReaderError::ExpectedClose('}')),
            Some("}") => {
                r.next();
                break;
            }
            _ => flat.push(read_form(r)?),
        }
    }
    if flat.len() % 2 != 0 {
        return Err(ReaderError::OddMapItems);
    }
    let mut map: MalMap = MalMap::new();
    for pair in flat.chunks(2) {
        let key = MapKey::from_value(&pair[0]).map_err(|_| ReaderError::BadMapKey)?;
        map.insert(key, pair[1].clone());
    }
    Ok(Value::map(map))
}

fn decode_string(token: &str) -> Result<String, ReaderError> {
    let inner = &token[1..token.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => out.push(other),
                None => return Err(ReaderError::UnterminatedString),
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

fn read_atom(r: &mut Reader) -> Result<Value, ReaderError> {
    let tok = r.next().ok_or(ReaderError::UnexpectedEof)?;
    if tok.starts_with('"') {
        return Ok(Value::string(decode_string(&tok)?));
    }
    if let Some(rest) = tok.strip_prefix(':') {
        return Ok(Value::keyword(rest));
    }
    if is_int_literal(&tok) {
        return tok
            .parse()
            .map(Value::Int)
            .map_err(|_| ReaderError::IntOverflow(tok));
    }
    match tok.as_str() {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        "nil" => Ok(Value::Nil),
        _ => Ok(Value::symbol(tok)),
    }
}

fn is_int_literal(tok: &str) -> bool {
    let body = tok.strip_prefix('-').unwrap_or(tok);
    !body.is_empty() && body.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SeqKind;

    #[test]
    fn reads_int_and_symbol() {
        assert_eq!(read_str("42").unwrap(), Value::Int(42));
        assert_eq!(read_str("-7").unwrap(), Value::Int(-7));
        assert_eq!(read_str("abc").unwrap(), Value::symbol("abc"));
    }

    #[test]
    fn oversized_int_literal_is_a_reader_error_not_a_panic() {
        assert!(read_str("99999999999999999999").is_err());
    }

    #[test]
    fn reads_keyword_and_string() {
        assert_eq!(read_str(":kw").unwrap(), Value::keyword("kw"));
        assert_eq!(read_str("\"hi\\nthere\"").unwrap(), Value::string("hi\nthere"));
    }

    #[test]
    fn unterminated_string_is_error() {
        assert!(matches!(
            read_str("\"abc"),
            Err(ReaderError::UnterminatedString)
        ));
    }

    #[test]
    fn reads_list_and_vector() {
        let l = read_str("(1 2 3)").unwrap();
        assert!(matches!(l, Value::Seq(SeqKind::List, _, _)));
        let v = read_str("[1 2 3]").unwrap();
        assert!(matches!(v, Value::Seq(SeqKind::Vector, _, _)));
    }

    #[test]
    fn unbalanced_list_is_error() {
        assert!(matches!(
            read_str("(1 2"),
            Err(ReaderError::ExpectedClose(')'))
        ));
    }

    #[test]
    fn odd_map_items_is_error() {
        assert!(matches!(
            read_str("{:a 1 :b}"),
            Err(ReaderError::OddMapItems)
        ));
    }

    #[test]
    fn reader_macros_expand() {
        assert_eq!(
            read_str("'a").unwrap(),
            Value::list(vec![Value::symbol("quote"), Value::symbol("a")])
        );
        assert_eq!(
            read_str("`a").unwrap(),
            Value::list(vec![Value::symbol("quasiquote"), Value::symbol("a")])
        );
        assert_eq!(
            read_str("~a").unwrap(),
            Value::list(vec![Value::symbol("unquote"), Value::symbol("a")])
        );
        assert_eq!(
            read_str("~@a").unwrap(),
            Value::list(vec![Value::symbol("splice-unquote"), Value::symbol("a")])
        );
        assert_eq!(
            read_str("@a").unwrap(),
            Value::list(vec![Value::symbol("deref"), Value::symbol("a")])
        );
    }

    #[test]
    fn metadata_reader_macro_swaps_argument_order() {
        assert_eq!(
            read_str("^{:a 1} x").unwrap(),
            Value::list(vec![
                Value::symbol("with-meta"),
                Value::symbol("x"),
                read_str("{:a 1}").unwrap(),
            ])
        );
    }

    #[test]
    fn blank_input_yields_nil() {
        assert_eq!(read_str("   ; just a comment\n").unwrap(), Value::Nil);
        assert_eq!(read_str("").unwrap(), Value::Nil);
    }

    #[test]
    fn skips_commas_as_whitespace() {
        assert_eq!(
            read_str("(1, 2, 3)").unwrap(),
            Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }
}
