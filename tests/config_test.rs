use std::fs;

use k6gen::config::{load_config, parse_config, validate_schema, Config, ConfigFormat};
use k6gen::error::Error;
use serde_json::{json, Value};
use tempfile::TempDir;

fn shop_config() -> Value {
    json!({
        "project": { "name": "Shop API", "version": "1.2.0", "description": "Shop load tests" },
        "application": { "baseUrl": "https://shop.test" },
        "testScenarios": [
            { "name": "browse", "description": "Browse", "businessOps": ["getUser", "listOrders"] }
        ],
        "apiEndpoints": [
            {
                "name": "getUser",
                "method": "GET",
                "path": "/users/{{user_id}}",
                "assertions": { "status": 200, "jsonFields": { "id": "exists", "name": "Ann" } }
            },
            { "name": "listOrders", "method": "GET", "path": "/orders" }
        ],
        "testData": { "users": [1, 2, 3] },
        "owner": "qa-team"
    })
}

#[test]
fn test_load_json_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shop.json");
    fs::write(&path, shop_config().to_string()).unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.project.name, "Shop API");
    assert_eq!(config.application.base_url, "https://shop.test");
    assert_eq!(config.api_endpoints.len(), 2);
    assert_eq!(config.test_data["users"], vec![json!(1), json!(2), json!(3)]);
}

#[test]
fn test_load_yaml_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shop.yml");
    let yaml = r#"
project:
  name: shop
application:
  baseUrl: https://shop.test
  timeout: 5000
testScenarios:
  - name: browse
    businessOps: [health]
apiEndpoints:
  - name: health
    method: GET
    path: /health
testTypes:
  load:
    vus: 10
    duration: 5m
"#;
    fs::write(&path, yaml).unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.application.timeout, 5000);
    assert_eq!(config.test_types["load"].vus, 10);
    assert_eq!(config.test_types["load"].duration, "5m");
    assert!(!config.test_types.contains_key("smoke"));
}

#[test]
fn test_defaults() {
    let config = Config::from_value(shop_config()).unwrap();

    assert_eq!(config.application.timeout, 30000);
    assert_eq!(config.framework.log_level, "INFO");
    assert!(config.framework.html_reporting);
    assert_eq!(config.framework.default_scenario, 1);
    assert_eq!(config.test_types.len(), 1);
    assert_eq!(config.test_types["smoke"].vus, 1);
    assert_eq!(config.test_types["smoke"].duration, "30s");
}

#[test]
fn test_endpoint_assertion_defaults() {
    let config = Config::from_value(shop_config()).unwrap();

    let get_user = config.endpoint("getUser").unwrap();
    assert_eq!(get_user.expected_status(), 200);
    assert_eq!(get_user.max_response_time(), 1000);
    assert_eq!(get_user.required_fields(), vec!["id"]);

    let list_orders = config.endpoint("listOrders").unwrap();
    assert!(list_orders.required_fields().is_empty());
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = load_config(dir.path().join("absent.json"));
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_invalid_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"project\": ").unwrap();
    assert!(matches!(load_config(&path), Err(Error::JsonError(_))));
}

#[test]
fn test_invalid_yaml() {
    let result = parse_config("project: [unclosed", ConfigFormat::Yaml);
    assert!(matches!(result, Err(Error::YamlError(_))));
}

#[test]
fn test_validation_reports_every_violation() {
    let mut value = shop_config();
    let object = value.as_object_mut().unwrap();
    object.remove("apiEndpoints");
    object.insert("testData".to_string(), json!({ "users": "not a list" }));

    match validate_schema(&value) {
        Err(Error::ValidationError(message)) => {
            assert!(message.contains("apiEndpoints"), "{message}");
            assert!(message.contains("; "), "{message}");
        }
        other => panic!("Expected ValidationError, got {other:?}"),
    }
}

#[test]
fn test_test_type_requires_vus() {
    let mut value = shop_config();
    value["testTypes"] = json!({ "smoke": { "duration": "30s" } });
    assert!(matches!(Config::from_value(value), Err(Error::ValidationError(_))));
}

#[test_log::test]
fn test_lint_warnings_are_not_fatal() {
    let mut value = shop_config();
    value["apiEndpoints"] = json!([
        { "name": "getUser", "method": "FETCH", "path": "/users" },
        { "name": "getUser", "method": "GET", "path": "/users/1" }
    ]);
    value["testScenarios"] = json!([{ "name": "browse", "businessOps": ["getUser", "missing"] }]);

    let config = Config::from_value(value).unwrap();
    let warnings = config.lint();
    assert_eq!(warnings.len(), 3, "{warnings:?}");
    assert!(warnings.iter().any(|w| w.contains("FETCH")));
    assert!(warnings.iter().any(|w| w.contains("more than once")));
    assert!(warnings.iter().any(|w| w.contains("'missing'")));
}

#[test]
fn test_scenario_endpoints_keep_order_and_skip_unknown() {
    let mut value = shop_config();
    value["testScenarios"] =
        json!([{ "name": "browse", "businessOps": ["listOrders", "nope", "getUser"] }]);
    let config = Config::from_value(value).unwrap();

    let names: Vec<&str> = config
        .scenario_endpoints(&config.test_scenarios[0])
        .iter()
        .map(|endpoint| endpoint.name.as_str())
        .collect();
    assert_eq!(names, vec!["listOrders", "getUser"]);
}

#[test]
fn test_project_slug_and_output_dir() {
    let config = Config::from_value(shop_config()).unwrap();
    assert_eq!(config.project_slug(), "shop-api");
    assert_eq!(config.output_dir_name(), "shop-api-k6-framework");
}

#[test]
fn test_context_keeps_unknown_fields_and_order() {
    let config = Config::from_value(shop_config()).unwrap();
    let context = config.context().unwrap();

    assert_eq!(context["owner"], "qa-team");
    assert_eq!(context["apiEndpoints"][0]["name"], "getUser");
    assert_eq!(context["testScenarios"][0]["businessOps"][1], "listOrders");
    assert_eq!(context["application"]["baseUrl"], "https://shop.test");
}
