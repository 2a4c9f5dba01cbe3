use std::fs;
use std::path::PathBuf;

use k6gen::config::Config;
use k6gen::error::Error;
use k6gen::loader::{template_names, EmbeddedLoader, LocalLoader};
use k6gen::processor::{ensure_output_dir, write_file, GeneratedFile, Processor};
use k6gen::renderer::DirectiveRenderer;
use serde_json::{json, Value};
use tempfile::TempDir;

fn shop_config() -> Config {
    Config::from_value(json!({
        "project": { "name": "Shop API", "version": "1.2.0", "description": "Shop load tests" },
        "application": { "baseUrl": "https://shop.test", "timeout": 10000 },
        "testScenarios": [
            { "name": "browse", "description": "Look around", "businessOps": ["getUser", "createOrder"] },
            { "name": "checkout", "businessOps": ["getOrder"] }
        ],
        "apiEndpoints": [
            { "name": "getUser", "method": "GET", "path": "/users/{{user_id}}" },
            {
                "name": "createOrder",
                "method": "POST",
                "path": "/orders",
                "body": { "item": "book" },
                "assertions": { "status": 201 }
            },
            { "name": "getOrder", "method": "GET", "path": "/orders/{{order_uuid}}" }
        ],
        "testData": { "users": [1, 2] },
        "testTypes": { "smoke": { "vus": 1, "duration": "30s" }, "load": { "vus": 20, "duration": "5m" } }
    }))
    .unwrap()
}

fn file<'a>(files: &'a [GeneratedFile], target: &str) -> &'a str {
    files
        .iter()
        .find(|file| file.target == PathBuf::from(target))
        .map(|file| file.content.as_str())
        .unwrap_or_else(|| panic!("{target} was not generated"))
}

#[test_log::test]
fn test_generate_file_list() {
    let config = shop_config();
    let engine = DirectiveRenderer::new();
    let loader = EmbeddedLoader::new();
    let files = Processor::new(&engine, &loader, &config).unwrap().generate().unwrap();

    let targets: Vec<PathBuf> = files.iter().map(|file| file.target.clone()).collect();
    let expected: Vec<PathBuf> = [
        "config/config.js",
        "tests/api/apis.js",
        "tests/business_ops/browse.js",
        "tests/business_ops/checkout.js",
        "data/testData.js",
        "utils/debug-helper.js",
        "utils/assert-helper.js",
        "utils/data-helper.js",
        "controller.js",
        "package.json",
        "README.md",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    assert_eq!(targets, expected);
}

#[test]
fn test_config_keeps_path_placeholders() {
    let config = shop_config();
    let files = Processor::new(&DirectiveRenderer, &EmbeddedLoader, &config)
        .unwrap()
        .generate()
        .unwrap();
    let config_js = file(&files, "config/config.js");

    assert!(config_js.contains("getUser_ENDPOINT: '/users/{{user_id}}',"), "{config_js}");
    assert!(config_js.contains("BASE_URL: 'https://shop.test',"));
    assert!(config_js.contains("static timeout = '10000ms';"));
    assert!(config_js.contains("const scenarios = ['browse', 'checkout'];"));
    assert!(config_js.contains("static getOrderDuration = new Trend('getOrder_transaction', true);"));
}

#[test]
fn test_api_module_resolves_placeholders() {
    let config = shop_config();
    let files = Processor::new(&DirectiveRenderer, &EmbeddedLoader, &config)
        .unwrap()
        .generate()
        .unwrap();
    let apis = file(&files, "tests/api/apis.js");

    assert!(apis.contains(
        "import { users, getRandomData, generateRandomData } from '../../data/testData.js';"
    ));
    assert!(apis.contains("url = url.replace('{{user_id}}', getRandomData(users));"), "{apis}");
    assert!(apis.contains("url = url.replace('{{order_uuid}}', generateRandomData('uuid'));"));
    assert!(apis.contains("const response = http.get(url, params);"));
    assert!(apis.contains("http.post(url, JSON.stringify({\"item\":\"book\"}), params)"));
    assert!(apis.contains("status: 201,"));
    assert!(apis.contains("export function createOrder() {"));
}

#[test]
fn test_business_ops_follow_scenario_order() {
    let config = shop_config();
    let processor = Processor::new(&DirectiveRenderer, &EmbeddedLoader, &config).unwrap();
    let files = processor.business_ops().unwrap();
    let browse = &files[0].content;

    assert!(browse.contains("import { getUser, createOrder } from '../api/apis.js';"), "{browse}");
    assert!(browse.contains("export function browse() {"));
    assert!(browse.contains("browse: Look around"));
    let first = browse.find("getUser();").unwrap();
    let second = browse.find("createOrder();").unwrap();
    assert!(first < second);
    assert_eq!(browse.matches("sleep(").count(), 1);
}

#[test]
fn test_test_data_and_manifest() {
    let config = shop_config();
    let processor = Processor::new(&DirectiveRenderer, &EmbeddedLoader, &config).unwrap();

    let data = processor.test_data().unwrap();
    assert!(data.content.contains("export const users = [\n  1,\n  2\n];"));

    let manifest: Value = serde_json::from_str(&processor.package_manifest().unwrap().content).unwrap();
    assert_eq!(manifest["name"], "shop-api");
    assert_eq!(manifest["version"], "1.2.0");
    assert_eq!(manifest["scripts"]["test:load"], "k6 run -e TEST_TYPE=load controller.js");
}

#[test]
fn test_data_helper_maps_every_collection() {
    let mut config = shop_config();
    config.test_data.insert("products".to_string(), vec![json!("book")]);
    let processor = Processor::new(&DirectiveRenderer, &EmbeddedLoader, &config).unwrap();

    let helpers = processor.utilities().unwrap();
    assert_eq!(helpers[2].target, PathBuf::from("utils/data-helper.js"));
    let content = &helpers[2].content;
    assert!(content.contains("import { users, products } from '../data/testData.js';"), "{content}");
    assert!(content.contains("    users: users,\n    products: products,\n};"));
    assert!(content.contains("export function loadTestData(dataType) {"));
}

#[test]
fn test_controller_and_readme() {
    let config = shop_config();
    let processor = Processor::new(&DirectiveRenderer, &EmbeddedLoader, &config).unwrap();

    let controller = processor.controller().unwrap().content;
    assert!(controller.contains("import { checkout } from './tests/business_ops/checkout.js';"));
    assert!(controller.contains("export function runbrowse() {"));
    assert!(controller.contains("const HTML_REPORTING = true;"));

    let readme = processor.readme().unwrap().content;
    assert!(readme.starts_with("# Shop API k6 tests"));
    assert!(readme.contains("- **browse**: `getUser->createOrder`"));
    assert!(readme.contains("| load | 20 | 5m |"));
    assert!(readme.contains("| getUser | GET | `/users/{{user_id}}` |"));
}

#[test]
fn test_local_templates_override_bundled_ones() {
    let dir = TempDir::new().unwrap();
    for name in template_names() {
        fs::write(dir.path().join(name), "{{project.name}}:{{packageName}}").unwrap();
    }
    let config = shop_config();
    let loader = LocalLoader::new(dir.path());
    let files = Processor::new(&DirectiveRenderer, &loader, &config).unwrap().generate().unwrap();

    assert_eq!(files.len(), 11);
    assert!(files.iter().all(|file| file.content == "Shop API:shop-api"));
}

#[test]
fn test_missing_local_template_fails() {
    let dir = TempDir::new().unwrap();
    let config = shop_config();
    let loader = LocalLoader::new(dir.path());
    let result = Processor::new(&DirectiveRenderer, &loader, &config).unwrap().generate();
    assert!(matches!(result, Err(Error::TemplateError(_))));
}

#[test]
fn test_ensure_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    // Test non-existent directory
    let new_dir = path.join("new_dir");
    assert!(ensure_output_dir(&new_dir, false).is_ok());

    // Test existing directory without force
    assert!(matches!(
        ensure_output_dir(path, false),
        Err(Error::OutputDirectoryExistsError { .. })
    ));

    // Test existing directory with force
    assert!(ensure_output_dir(path, true).is_ok());
}

#[test]
fn test_write_file_creates_parents() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("tests/business_ops/browse.js");

    write_file("export function browse() {}", &target).unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "export function browse() {}");
}
