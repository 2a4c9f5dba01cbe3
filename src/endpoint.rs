//! Per-endpoint code plans for the generated API module.
//!
//! The API template cannot compute anything on its own, so every endpoint is
//! handed to it as a record carrying the derived pieces: the k6 call, the URL
//! substitution statements produced by the placeholder resolver and the
//! assertion limits.

use crate::config::Endpoint;
use crate::placeholder::{PathPlan, TestData};
use indexmap::IndexSet;
use serde_json::Value;

const STATEMENT_INDENT: &str = "        ";

/// Name of the k6 `http` function for an HTTP method.
pub fn k6_http_function(method: &str) -> &'static str {
    match method.to_uppercase().as_str() {
        "POST" => "post",
        "PUT" => "put",
        "PATCH" => "patch",
        "DELETE" => "del",
        "HEAD" => "head",
        "OPTIONS" => "options",
        _ => "get",
    }
}

#[derive(Debug, Clone)]
pub struct EndpointPlan<'c> {
    endpoint: &'c Endpoint,
    path: PathPlan<'c>,
}

impl<'c> EndpointPlan<'c> {
    pub fn new(endpoint: &'c Endpoint, test_data: &TestData) -> Self {
        Self { endpoint, path: PathPlan::new(&endpoint.path, test_data) }
    }

    pub fn path(&self) -> &PathPlan<'c> {
        &self.path
    }

    pub fn http_function(&self) -> &'static str {
        k6_http_function(&self.endpoint.method)
    }

    /// Statements rewriting `url` before the request, one per line.
    pub fn url_setup(&self) -> String {
        self.path
            .statements()
            .iter()
            .map(|statement| format!("{STATEMENT_INDENT}{statement}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The `http.*(...)` call expression; `get` and `head` take no body.
    pub fn request_call(&self) -> String {
        let function = self.http_function();
        match (function, &self.endpoint.body) {
            ("get" | "head", _) => format!("http.{function}(url, params)"),
            (_, Some(body)) => format!("http.{function}(url, JSON.stringify({body}), params)"),
            (_, None) => format!("http.{function}(url, null, params)"),
        }
    }

    /// The endpoint's own fields plus the derived ones the API template uses.
    pub fn to_context(&self) -> Value {
        let mut record = match serde_json::to_value(self.endpoint) {
            Ok(Value::Object(fields)) => fields,
            _ => serde_json::Map::new(),
        };
        let headers = Value::Object(
            self.endpoint.headers.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        );
        let required = Value::from(self.endpoint.required_fields());

        record.insert("httpMethod".into(), self.http_function().into());
        record.insert("hasPathVariables".into(), (!self.path.is_empty()).into());
        record.insert("urlSetup".into(), self.url_setup().into());
        record.insert("requestCall".into(), self.request_call().into());
        record.insert("headersJson".into(), headers.to_string().into());
        record.insert("expectedStatus".into(), self.endpoint.expected_status().into());
        record.insert("maxResponseTime".into(), self.endpoint.max_response_time().into());
        record.insert("requiredFieldsJson".into(), required.to_string().into());
        Value::Object(record)
    }
}

/// Distinct collections sampled by any of the plans, in first-appearance order.
pub fn data_imports<'a>(plans: &'a [EndpointPlan<'_>]) -> Vec<&'a str> {
    plans
        .iter()
        .flat_map(|plan| plan.path().collections())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
