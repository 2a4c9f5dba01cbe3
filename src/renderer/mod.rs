//! Directive-based template rendering.
//!
//! A render runs four global passes over the whole template, always in this
//! order:
//!
//! 1. `{{#each path}}...{{/each}}` blocks
//! 2. `{{#if cond}}...{{else}}...{{/if}}` blocks
//! 3. `{{#unless cond}}...{{/unless}}` blocks
//! 4. inline `{{expr}}` markers
//!
//! Every pass pairs an open marker with the first close marker of the same
//! kind that follows it. An `each` body is rendered on its own, per element,
//! through all four passes with the element as its scope, so an `if` inside
//! an `each` sees the element. An `each` inside an `if` is expanded under the
//! enclosing scope before the `if` pass decides which branch survives.
//!
//! Nothing here fails: unresolved paths, unknown helpers and unmatched
//! markers all render as empty text.

mod helpers;
mod scope;

pub use scope::{is_truthy, lookup, to_text, Scope};

use std::sync::LazyLock;

use log::trace;
use regex::{Captures, Regex};
use serde_json::Value;

// An `each` block, or a stray slot delimiter in literal text.
static EACH_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{#each\s+([^}]+)\}\}(.*?)\{\{/each\}\}|[\x{FDD0}\x{FDD1}]")
        .expect("each block pattern")
});

static IF_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{#if\s+([^}]+)\}\}(.*?)\{\{/if\}\}").expect("if block pattern")
});

static UNLESS_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{#unless\s+([^}]+)\}\}(.*?)\{\{/unless\}\}")
        .expect("unless block pattern")
});

// An inline marker, or the stand-in for an already rendered `each`
// expansion. Both are replaced in one scan so inserted values are never
// mistaken for stand-ins.
static INLINE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^}]+)\}\}|\x{FDD0}(\d+)\x{FDD1}").expect("inline marker pattern")
});

const SLOT_OPEN: char = '\u{FDD0}';
const SLOT_CLOSE: char = '\u{FDD1}';

/// Divider between the two branches of an `if` block.
pub const ELSE_MARKER: &str = "{{else}}";

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `String` - Rendered text; unresolved references render as empty text
    fn render(&self, template: &str, context: &Value) -> String;
}

/// Renderer for the `each`/`if`/`unless`/inline directive syntax.
///
/// Holds no state; templates are re-scanned on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectiveRenderer;

impl DirectiveRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for DirectiveRenderer {
    fn render(&self, template: &str, context: &Value) -> String {
        render_scoped(template, &Scope::root(context))
    }
}

/// Renders `template` against `context` with the default renderer.
pub fn render(template: &str, context: &Value) -> String {
    DirectiveRenderer.render(template, context)
}

fn render_scoped(template: &str, scope: &Scope<'_>) -> String {
    let mut expansions = Vec::new();
    let expanded = EACH_BLOCK.replace_all(template, |caps: &Captures<'_>| {
        let expansion = match (caps.get(1), caps.get(2)) {
            (Some(path), Some(body)) => expand_each(path.as_str().trim(), body.as_str(), scope),
            // Literal delimiters are parked in slots too, so every one left in
            // the text belongs to a slot.
            _ => caps[0].to_owned(),
        };
        expansions.push(expansion);
        format!("{SLOT_OPEN}{}{SLOT_CLOSE}", expansions.len() - 1)
    });

    let branched = IF_BLOCK.replace_all(&expanded, |caps: &Captures<'_>| {
        let taken = scope.is_truthy(caps[1].trim());
        let mut branches = caps[2].split(ELSE_MARKER);
        let then = branches.next().unwrap_or_default();
        // Only the text between the first and second marker is the else branch.
        let branch = match branches.next() {
            Some(otherwise) if !taken => otherwise,
            _ if taken => then,
            _ => "",
        };
        branch.to_owned()
    });

    let kept = UNLESS_BLOCK.replace_all(&branched, |caps: &Captures<'_>| {
        if scope.is_truthy(caps[1].trim()) {
            String::new()
        } else {
            caps[2].to_owned()
        }
    });

    substitute(&kept, scope, &expansions)
}

fn expand_each(path: &str, body: &str, scope: &Scope<'_>) -> String {
    match scope.eval(path).as_deref() {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| render_scoped(body, &Scope::item(item, index, items.len())))
            .collect(),
        Some(Value::Object(entries)) => entries
            .iter()
            .enumerate()
            .map(|(index, (key, value))| {
                render_scoped(body, &Scope::entry(key, value, index, entries.len()))
            })
            .collect(),
        _ => {
            trace!("each '{path}' is neither a list nor a mapping");
            String::new()
        }
    }
}

fn substitute(text: &str, scope: &Scope<'_>, expansions: &[String]) -> String {
    INLINE_MARKER
        .replace_all(text, |caps: &Captures<'_>| match (caps.get(1), caps.get(2)) {
            (Some(expr), _) => scope.render_inline(expr.as_str().trim()),
            (None, Some(slot)) => slot
                .as_str()
                .parse::<usize>()
                .ok()
                .and_then(|index| expansions.get(index))
                .cloned()
                .unwrap_or_else(|| caps[0].to_owned()),
            (None, None) => caps[0].to_owned(),
        })
        .into_owned()
}
