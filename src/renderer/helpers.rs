//! Built-in helpers callable as `{{name arg1 arg2}}`.
//!
//! Arguments are split on whitespace and each one is evaluated as an
//! expression in the calling scope. There is no quoting beyond single-word
//! string literals such as `"exists"`.

use std::borrow::Cow;

use log::trace;
use serde_json::Value;

use super::scope::{is_truthy, join_elements, lookup, Scope};

const DEFAULT_JOIN_SEPARATOR: &str = "_";

struct Arg<'s> {
    raw: &'s str,
    value: Option<Cow<'s, Value>>,
}

impl Arg<'_> {
    fn value(&self) -> Option<&Value> {
        self.value.as_deref()
    }
}

/// An expression is a helper call when it contains whitespace or parentheses.
pub(super) fn is_helper_call(expr: &str) -> bool {
    expr.contains(|c: char| c.is_whitespace() || c == '(' || c == ')')
}

/// Evaluates a helper call. Unknown helpers resolve to `None`.
pub(super) fn call(expr: &str, scope: &Scope<'_>) -> Option<Value> {
    let mut tokens = strip_parens(expr).split_whitespace();
    let name = tokens.next()?;
    let args: Vec<Arg<'_>> = tokens.map(|raw| Arg { raw, value: scope.eval(raw) }).collect();

    match name {
        "capitalize" => Some(Value::String(capitalize(args.first().and_then(Arg::value)))),
        "join" => Some(Value::String(join(&args))),
        "eq" => {
            let left = args.first().and_then(Arg::value);
            let right = args.get(1).and_then(Arg::value);
            Some(Value::Bool(strict_eq(left, right)))
        }
        "json" => json(args.first()?, scope),
        "unless" => Some(Value::Bool(!is_truthy(args.first().and_then(Arg::value)))),
        _ => {
            trace!("unknown helper '{name}'");
            None
        }
    }
}

/// `(eq a b)` is evaluated as `eq a b`.
fn strip_parens(expr: &str) -> &str {
    expr.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .map_or(expr, str::trim)
}

fn capitalize(value: Option<&Value>) -> String {
    let Some(Value::String(text)) = value else {
        return String::new();
    };
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// Numbers compare by value, so `1` equals `1.0`.
fn strict_eq(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

// The separator is the token's string value when it resolves to one, the
// raw token otherwise.
fn join(args: &[Arg<'_>]) -> String {
    let Some(Value::Array(items)) = args.first().and_then(Arg::value) else {
        return String::new();
    };
    let separator = args.get(1).map_or(DEFAULT_JOIN_SEPARATOR, |arg| match arg.value() {
        Some(Value::String(text)) => text.as_str(),
        _ => arg.raw,
    });
    join_elements(items, separator)
}

// `json this` dumps the scope's `this` field, or the whole scope data when
// there is none, instead of resolving `this` as a loop variable. An
// unresolved argument is dumped as the empty string.
fn json(arg: &Arg<'_>, scope: &Scope<'_>) -> Option<Value> {
    let dumped = if arg.raw == "this" {
        let data = scope.data();
        serde_json::to_string_pretty(lookup(data, "this").unwrap_or(data))
    } else {
        match arg.value() {
            Some(value) => serde_json::to_string_pretty(value),
            None => serde_json::to_string_pretty(&Value::String(String::new())),
        }
    };
    dumped.ok().map(Value::String)
}
