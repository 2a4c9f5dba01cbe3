//! Evaluation scopes and value conversions for the rendering engine.

use std::borrow::Cow;

use serde_json::{json, Value};

use super::helpers;

/// How `{{this}}` is printed inside a loop body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThisStyle {
    /// Sequence elements: compact JSON.
    Compact,
    /// Mapping values: JSON with a 2-space indent.
    Pretty,
}

#[derive(Debug)]
struct LoopFrame<'a> {
    item: &'a Value,
    index: usize,
    key: &'a str,
    last: bool,
    style: ThisStyle,
}

impl LoopFrame<'_> {
    fn dump_item(&self) -> String {
        let dumped = match self.style {
            ThisStyle::Compact => serde_json::to_string(self.item),
            ThisStyle::Pretty => serde_json::to_string_pretty(self.item),
        };
        dumped.unwrap_or_default()
    }
}

/// The data visible to expressions at one point of a render.
///
/// The root scope wraps the caller's context. `each` blocks create child
/// scopes for their bodies; a child never sees its parent's fields.
#[derive(Debug)]
pub struct Scope<'a> {
    data: Cow<'a, Value>,
    frame: Option<LoopFrame<'a>>,
}

impl<'a> Scope<'a> {
    pub fn root(context: &'a Value) -> Self {
        Self { data: Cow::Borrowed(context), frame: None }
    }

    /// Scope for element `index` of a sequence holding `len` elements.
    /// Dotted paths resolve against the element itself.
    pub fn item(item: &'a Value, index: usize, len: usize) -> Self {
        let key = item
            .as_object()
            .and_then(|fields| fields.keys().next())
            .map_or("", String::as_str);
        Self {
            data: Cow::Borrowed(item),
            frame: Some(LoopFrame {
                item,
                index,
                key,
                last: index + 1 == len,
                style: ThisStyle::Compact,
            }),
        }
    }

    /// Scope for entry `index` of a keyed mapping holding `len` entries.
    /// Dotted paths resolve against `{key, value, this}`.
    pub fn entry(key: &'a str, value: &'a Value, index: usize, len: usize) -> Self {
        Self {
            data: Cow::Owned(json!({ "key": key, "value": value, "this": value })),
            frame: Some(LoopFrame {
                item: value,
                index,
                key,
                last: index + 1 == len,
                style: ThisStyle::Pretty,
            }),
        }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Evaluates a trimmed expression. `None` means the reference did not resolve.
    pub fn eval(&self, expr: &str) -> Option<Cow<'_, Value>> {
        if helpers::is_helper_call(expr) {
            return helpers::call(expr, self).map(Cow::Owned);
        }
        if let Some(literal) = string_literal(expr) {
            return Some(Cow::Owned(Value::String(literal.to_owned())));
        }
        if let Some(frame) = &self.frame {
            match expr {
                "this" => return Some(Cow::Borrowed(frame.item)),
                "@index" => return Some(Cow::Owned(Value::from(frame.index))),
                "@key" => return Some(Cow::Owned(Value::from(frame.key))),
                "@last" => return Some(Cow::Owned(Value::Bool(frame.last))),
                _ => {}
            }
        }
        lookup(&self.data, expr).map(Cow::Borrowed)
    }

    /// Text for an inline `{{expr}}` marker.
    pub fn render_inline(&self, expr: &str) -> String {
        if let (Some(frame), "this") = (&self.frame, expr) {
            return frame.dump_item();
        }
        self.eval(expr).map(|value| to_text(&value)).unwrap_or_default()
    }

    pub fn is_truthy(&self, expr: &str) -> bool {
        is_truthy(self.eval(expr).as_deref())
    }
}

fn string_literal(expr: &str) -> Option<&str> {
    expr.strip_prefix('"')?.strip_suffix('"')
}

/// Walks a dotted path field by field. A missing segment, or a scalar reached
/// before the path is exhausted, yields `None`.
pub fn lookup<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(root, |value, segment| match value {
        Value::Object(fields) => fields.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    })
}

/// Dynamic truthiness: unresolved, `null`, `false`, `0` and `""` are false.
/// Lists and records are true even when empty.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Converts a resolved value into the text an inline marker produces.
///
/// Strings are inserted raw, lists are comma-joined (null elements become
/// empty), records are dumped as compact JSON.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_owned(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) => join_elements(items, ","),
        Value::Object(_) => value.to_string(),
    }
}

pub(crate) fn join_elements(items: &[Value], separator: &str) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::Null => String::new(),
            other => to_text(other),
        })
        .collect::<Vec<_>>()
        .join(separator)
}
