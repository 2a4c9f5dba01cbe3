//! Common constants used throughout k6gen.

/// Extensions read as YAML; anything else is read as JSON
pub const YAML_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Methods the generated API module knows how to call
pub const HTTP_METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "PATCH"];

/// Suffix appended to the project slug when no output directory is given
pub const OUTPUT_DIR_SUFFIX: &str = "-k6-framework";

pub const DEFAULT_STATUS: u64 = 200;
pub const DEFAULT_RESPONSE_TIME_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;

/// Bundled template names
pub mod templates {
    pub const CONFIG: &str = "config.template.js";
    pub const BUSINESS_OP: &str = "business-op.template.js";
    pub const APIS: &str = "apis.template.js";
    pub const TEST_DATA: &str = "test-data.template.js";
    pub const CONTROLLER: &str = "controller.template.js";
    pub const DEBUG_HELPER: &str = "debug-helper.template.js";
    pub const ASSERT_HELPER: &str = "assert-helper.template.js";
    pub const DATA_HELPER: &str = "data-helper.template.js";
    pub const PACKAGE: &str = "package.template.json";
    pub const README: &str = "readme.template.md";
}

/// Paths of the generated files, relative to the output directory
pub mod outputs {
    pub const CONFIG: &str = "config/config.js";
    pub const APIS: &str = "tests/api/apis.js";
    pub const BUSINESS_OPS_DIR: &str = "tests/business_ops";
    pub const TEST_DATA: &str = "data/testData.js";
    pub const CONTROLLER: &str = "controller.js";
    pub const DEBUG_HELPER: &str = "utils/debug-helper.js";
    pub const ASSERT_HELPER: &str = "utils/assert-helper.js";
    pub const DATA_HELPER: &str = "utils/data-helper.js";
    pub const PACKAGE: &str = "package.json";
    pub const README: &str = "README.md";
    pub const REPORTS_DIR: &str = "reports";
}
