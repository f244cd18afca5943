use std::fmt::Write as _;

use crate::Value;

const PLACEHOLDER: char = '?';

/// Inlines `vars` into `sql`, one per `?` in order. Placeholders without a
/// matching value stay as they are. The result is for logs, never for execution.
#[must_use]
pub fn explain_sql(sql: &str, escaper: char, vars: &[Value]) -> String {
    let mut rendered = String::with_capacity(sql.len());
    let mut vars = vars.iter();

    for ch in sql.chars() {
        if ch == PLACEHOLDER
            && let Some(value) = vars.next()
        {
            render_literal(&mut rendered, escaper, value, true);
            continue;
        }
        rendered.push(ch);
    }

    rendered
}

fn render_literal(out: &mut String, escaper: char, value: &Value, resolve_valuer: bool) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(value) => write!(out, "{value}").expect("writing to String should not fail"),
        Value::Integer(value) => {
            write!(out, "{value}").expect("writing to String should not fail");
        }
        Value::Float(value) => write!(out, "{value}").expect("writing to String should not fail"),
        Value::String(value) => push_quoted(out, escaper, value),
        Value::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) if !text.chars().any(char::is_control) => push_quoted(out, escaper, text),
            _ => out.push_str("<binary>"),
        },
        Value::Uuid(value) => push_quoted(out, escaper, &value.to_string()),
        Value::Valuer(valuer) if resolve_valuer => match valuer.driver_value() {
            Ok(inner) => render_literal(out, escaper, &inner, false),
            Err(_) => out.push_str("<invalid value>"),
        },
        Value::Valuer(_) => out.push_str("<value>"),
    }
}

fn push_quoted(out: &mut String, escaper: char, text: &str) {
    out.push(escaper);
    for ch in text.chars() {
        if ch == escaper {
            out.push(escaper);
        }
        out.push(ch);
    }
    out.push(escaper);
}
