//! Configuration handling for k6gen.
//! This module loads the JSON or YAML project description, validates it
//! against an embedded schema and maps it onto the typed model the processor
//! renders from.

use crate::constants::{
    DEFAULT_RESPONSE_TIME_MS, DEFAULT_STATUS, DEFAULT_TIMEOUT_MS, HTTP_METHODS,
    OUTPUT_DIR_SUFFIX, YAML_EXTENSIONS,
};
use crate::error::{Error, Result};
use crate::placeholder::TestData;
use cruet::Inflector;
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

/// Format of a configuration file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let is_yaml = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| YAML_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
        if is_yaml {
            ConfigFormat::Yaml
        } else {
            ConfigFormat::Json
        }
    }
}

/// Full project description.
///
/// Field names follow the camelCase keys of the input file. Keys the model
/// does not know are kept in `extra` so templates can still reach them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub project: Project,
    pub application: Application,
    pub test_scenarios: Vec<Scenario>,
    pub api_endpoints: Vec<Endpoint>,
    #[serde(default)]
    pub test_data: TestData,
    #[serde(default = "default_test_types")]
    pub test_types: IndexMap<String, TestType>,
    #[serde(default)]
    pub framework: Framework,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub base_url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    /// Endpoint names, called in this order
    pub business_ops: Vec<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub method: String,
    /// May embed `{{token}}` placeholders
    pub path: String,
    #[serde(default)]
    pub headers: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertions: Option<Assertions>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assertions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(default)]
    pub json_fields: IndexMap<String, Value>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Load profile: virtual users and run duration (`30s`, `5m`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestType {
    pub vus: u64,
    pub duration: String,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Framework {
    pub log_level: String,
    pub html_reporting: bool,
    /// 1-based index into `testScenarios`
    pub default_scenario: u32,
}

impl Default for Framework {
    fn default() -> Self {
        Self { log_level: "INFO".to_string(), html_reporting: true, default_scenario: 1 }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_test_types() -> IndexMap<String, TestType> {
    IndexMap::from([(
        "smoke".to_string(),
        TestType { vus: 1, duration: "30s".to_string(), extra: IndexMap::new() },
    )])
}

impl Endpoint {
    pub fn expected_status(&self) -> u64 {
        self.assertions.as_ref().and_then(|a| a.status).unwrap_or(DEFAULT_STATUS)
    }

    pub fn max_response_time(&self) -> u64 {
        self.assertions
            .as_ref()
            .and_then(|a| a.response_time)
            .unwrap_or(DEFAULT_RESPONSE_TIME_MS)
    }

    /// JSON fields the response must contain (`"field": "exists"` entries).
    pub fn required_fields(&self) -> Vec<&str> {
        self.assertions
            .iter()
            .flat_map(|a| a.json_fields.iter())
            .filter(|(_, expected)| expected.as_str() == Some("exists"))
            .map(|(field, _)| field.as_str())
            .collect()
    }
}

impl Config {
    /// Validates a parsed document and maps it onto the typed model.
    ///
    /// # Errors
    /// * `Error::ValidationError` if the document violates the schema
    /// * `Error::JsonError` if it cannot be mapped onto the model
    pub fn from_value(value: Value) -> Result<Self> {
        validate_schema(&value)?;
        let config: Config = serde_json::from_value(value)?;
        for warning in config.lint() {
            warn!("{warning}");
        }
        Ok(config)
    }

    /// Soft problems that do not stop generation.
    pub fn lint(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut seen = IndexSet::new();

        for endpoint in &self.api_endpoints {
            if !seen.insert(endpoint.name.as_str()) {
                warnings.push(format!("Endpoint '{}' is defined more than once", endpoint.name));
            }
            if !HTTP_METHODS.contains(&endpoint.method.to_uppercase().as_str()) {
                warnings.push(format!(
                    "Endpoint '{}' uses method '{}', expected one of: {}",
                    endpoint.name,
                    endpoint.method,
                    HTTP_METHODS.join(", ")
                ));
            }
        }

        for scenario in &self.test_scenarios {
            for op in &scenario.business_ops {
                if !seen.contains(op.as_str()) {
                    warnings.push(format!(
                        "Scenario '{}' references unknown endpoint '{op}'",
                        scenario.name
                    ));
                }
            }
        }

        warnings
    }

    pub fn endpoint(&self, name: &str) -> Option<&Endpoint> {
        self.api_endpoints.iter().find(|endpoint| endpoint.name == name)
    }

    /// Endpoints of a scenario in `businessOps` order; unknown names are skipped.
    pub fn scenario_endpoints(&self, scenario: &Scenario) -> Vec<&Endpoint> {
        scenario
            .business_ops
            .iter()
            .filter_map(|name| {
                let endpoint = self.endpoint(name);
                if endpoint.is_none() {
                    debug!("Skipping unknown endpoint '{name}' in scenario '{}'", scenario.name);
                }
                endpoint
            })
            .collect()
    }

    /// Project name in kebab case, e.g. `Shop API` becomes `shop-api`.
    pub fn project_slug(&self) -> String {
        self.project.name.to_kebab_case()
    }

    pub fn output_dir_name(&self) -> String {
        format!("{}{OUTPUT_DIR_SUFFIX}", self.project_slug())
    }

    /// The configuration as a render context.
    pub fn context(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Parses configuration content in the given format.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<Value> {
    match format {
        ConfigFormat::Json => Ok(serde_json::from_str(content)?),
        ConfigFormat::Yaml => Ok(serde_yaml::from_str(content)?),
    }
}

/// Loads, validates and maps a configuration file.
///
/// # Arguments
/// * `path` - `.json`, `.yml` or `.yaml` file
///
/// # Errors
/// * `Error::ConfigError` if the file does not exist
/// * `Error::ValidationError` if required fields are missing or mistyped
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::ConfigError(format!(
            "configuration file not found: {}",
            path.display()
        )));
    }

    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    let value = parse_config(&content, ConfigFormat::from_path(path))?;
    Config::from_value(value)
}

/// Checks the document against the configuration schema, reporting every
/// violation at once.
pub fn validate_schema(value: &Value) -> Result<()> {
    let schema = config_schema();
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| Error::ConfigError(format!("invalid configuration schema: {e}")))?;

    let messages: Vec<String> = validator.iter_errors(value).map(|e| e.to_string()).collect();
    if messages.is_empty() {
        Ok(())
    } else {
        Err(Error::ValidationError(messages.join("; ")))
    }
}

fn config_schema() -> Value {
    json!({
        "type": "object",
        "required": ["project", "application", "testScenarios", "apiEndpoints"],
        "properties": {
            "project": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": { "type": "string", "minLength": 1 },
                    "version": { "type": "string" },
                    "description": { "type": "string" }
                }
            },
            "application": {
                "type": "object",
                "required": ["baseUrl"],
                "properties": {
                    "baseUrl": { "type": "string" },
                    "timeout": { "type": "integer", "minimum": 0 }
                }
            },
            "testScenarios": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["name", "businessOps"],
                    "properties": {
                        "name": { "type": "string", "minLength": 1 },
                        "description": { "type": "string" },
                        "weight": { "type": "integer", "minimum": 0 },
                        "businessOps": { "type": "array", "items": { "type": "string" } }
                    }
                }
            },
            "apiEndpoints": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["name", "method", "path"],
                    "properties": {
                        "name": { "type": "string", "minLength": 1 },
                        "method": { "type": "string" },
                        "path": { "type": "string" },
                        "headers": { "type": "object" },
                        "assertions": {
                            "type": "object",
                            "properties": {
                                "status": { "type": "integer" },
                                "responseTime": { "type": "integer", "minimum": 0 },
                                "jsonFields": { "type": "object" }
                            }
                        }
                    }
                }
            },
            "testData": {
                "type": "object",
                "additionalProperties": { "type": "array" }
            },
            "testTypes": {
                "type": "object",
                "additionalProperties": {
                    "type": "object",
                    "required": ["vus", "duration"],
                    "properties": {
                        "vus": { "type": "integer", "minimum": 1 },
                        "duration": { "type": "string" }
                    }
                }
            },
            "framework": {
                "type": "object",
                "properties": {
                    "logLevel": { "enum": ["DEBUG", "INFO", "WARN", "ERROR"] },
                    "htmlReporting": { "type": "boolean" },
                    "defaultScenario": { "type": "integer", "minimum": 1 }
                }
            }
        }
    })
}
