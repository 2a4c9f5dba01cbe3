//! Placeholder resolution for endpoint paths.
//!
//! An endpoint path such as `/users/{{user_id}}/orders` carries placeholder
//! tokens. Each token is resolved either to a named test-data collection that
//! the generated script samples at run time, or to the kind of synthetic value
//! it should generate when no collection fits.

use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use serde_json::Value;

/// Named test-data collections in their declared order.
pub type TestData = IndexMap<String, Vec<Value>>;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern"));

static ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [r"^(.+)_id$", r"^(.+)_id[0-9]+$", r"^(.+)_id_[0-9]+$"]
        .map(|pattern| Regex::new(pattern).expect("id pattern"))
});

static NAME_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [r"^(.+)_name$", r"^(.+)_names$"].map(|pattern| Regex::new(pattern).expect("name pattern"))
});

/// Synthetic value generators available in the generated test-data module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntheticKind {
    Uuid,
    Email,
    Date,
    Timestamp,
    Number,
    /// Free text, emitted as `string`.
    Text,
}

impl SyntheticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SyntheticKind::Uuid => "uuid",
            SyntheticKind::Email => "email",
            SyntheticKind::Date => "date",
            SyntheticKind::Timestamp => "timestamp",
            SyntheticKind::Number => "number",
            SyntheticKind::Text => "string",
        }
    }
}

impl fmt::Display for SyntheticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Checked in order; the first hint found in the lower-cased token wins.
// `timestamp` contains `time`, so such tokens classify as `Date`.
const KIND_HINTS: [(&[&str], SyntheticKind); 6] = [
    (&["uuid", "guid"], SyntheticKind::Uuid),
    (&["email"], SyntheticKind::Email),
    (&["date", "time"], SyntheticKind::Date),
    (&["timestamp"], SyntheticKind::Timestamp),
    (&["id", "number", "count"], SyntheticKind::Number),
    (&["name", "title", "description"], SyntheticKind::Text),
];

/// How the generated script obtains a value for one placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionPlan {
    /// Draw a random element of the named collection on every call.
    Lookup(String),
    /// Call the synthetic generator of the given kind.
    Synthesize(SyntheticKind),
}

impl ResolutionPlan {
    /// JavaScript expression producing the value at run time.
    pub fn value_expression(&self) -> String {
        match self {
            ResolutionPlan::Lookup(collection) => format!("getRandomData({collection})"),
            ResolutionPlan::Synthesize(kind) => format!("generateRandomData('{kind}')"),
        }
    }
}

/// Decides where the value for `token` comes from.
///
/// # Arguments
/// * `token` - Placeholder name without braces
/// * `collections` - Test-data collections, in declared order
///
/// # Returns
/// * `ResolutionPlan::Lookup` when a collection matches, by priority: exact
///   name, `_id` patterns, `_name` patterns, substring match
/// * `ResolutionPlan::Synthesize` otherwise, classified from the token name
pub fn resolve_token(token: &str, collections: &TestData) -> ResolutionPlan {
    match find_collection(token, collections) {
        Some(name) => ResolutionPlan::Lookup(name.to_owned()),
        None => ResolutionPlan::Synthesize(classify_token(token)),
    }
}

/// The collection name chosen for `token`; the token itself when nothing matches.
pub fn collection_name<'a>(token: &'a str, collections: &'a TestData) -> &'a str {
    find_collection(token, collections).unwrap_or(token)
}

fn existing<'c>(collections: &'c TestData, name: &str) -> Option<&'c str> {
    collections.get_key_value(name).map(|(key, _)| key.as_str())
}

fn find_collection<'c>(token: &str, collections: &'c TestData) -> Option<&'c str> {
    if let Some(name) = existing(collections, token) {
        return Some(name);
    }

    for pattern in ID_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(token) {
            let base = &caps[1];
            let candidates = [format!("{base}_id"), format!("{base}s"), base.to_owned()];
            if let Some(name) = candidates.iter().find_map(|c| existing(collections, c)) {
                return Some(name);
            }
        }
    }

    for pattern in NAME_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(token) {
            let base = &caps[1];
            let candidates = [format!("{base}s"), format!("{base}_names"), base.to_owned()];
            if let Some(name) = candidates.iter().find_map(|c| existing(collections, c)) {
                return Some(name);
            }
        }
    }

    collections
        .keys()
        .find(|key| key.contains(token) || token.contains(key.as_str()))
        .map(String::as_str)
}

/// Picks a synthetic generator from hints in the token name, defaulting to text.
pub fn classify_token(token: &str) -> SyntheticKind {
    let lowered = token.to_lowercase();
    KIND_HINTS
        .iter()
        .find(|(hints, _)| hints.iter().any(|hint| lowered.contains(hint)))
        .map_or(SyntheticKind::Text, |(_, kind)| *kind)
}

/// Every placeholder occurrence in `path`, in order, repeats included.
pub fn extract_tokens(path: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(path)
        .filter_map(|caps| caps.get(1))
        .map(|token| token.as_str())
        .collect()
}

/// Resolution of all placeholders of one endpoint path.
///
/// Each distinct token is resolved once; repeated occurrences share the plan.
#[derive(Debug, Clone)]
pub struct PathPlan<'p> {
    occurrences: Vec<&'p str>,
    plans: IndexMap<&'p str, ResolutionPlan>,
}

impl<'p> PathPlan<'p> {
    pub fn new(path: &'p str, collections: &TestData) -> Self {
        let occurrences = extract_tokens(path);
        let mut plans = IndexMap::new();
        for token in &occurrences {
            plans.entry(*token).or_insert_with(|| {
                let plan = resolve_token(token, collections);
                debug!("Placeholder '{token}' in '{path}' resolved to {plan:?}");
                plan
            });
        }
        Self { occurrences, plans }
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    pub fn plan(&self, token: &str) -> Option<&ResolutionPlan> {
        self.plans.get(token)
    }

    /// Distinct tokens with their plans, in first-appearance order.
    pub fn plans(&self) -> impl Iterator<Item = (&'p str, &ResolutionPlan)> + '_ {
        self.plans.iter().map(|(token, plan)| (*token, plan))
    }

    /// Collections sampled by this path, in first-appearance order.
    pub fn collections(&self) -> impl Iterator<Item = &str> + '_ {
        self.plans.values().filter_map(|plan| match plan {
            ResolutionPlan::Lookup(collection) => Some(collection.as_str()),
            ResolutionPlan::Synthesize(_) => None,
        })
    }

    /// One `url.replace` statement per occurrence, since each call replaces
    /// only the first remaining occurrence.
    pub fn statements(&self) -> Vec<String> {
        self.occurrences
            .iter()
            .filter_map(|token| self.plans.get(token).map(|plan| (token, plan)))
            .map(|(token, plan)| {
                format!("url = url.replace('{{{{{token}}}}}', {});", plan.value_expression())
            })
            .collect()
    }
}
