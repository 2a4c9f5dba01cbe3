//! k6gen scaffolds k6 load-testing projects.
//! It reads a declarative project description, plans how every endpoint path
//! placeholder gets its runtime value, and renders the project files from a
//! set of directive templates.

/// Command-line interface module for the k6gen application
pub mod cli;

/// Project description loading and validation
/// Supports JSON and YAML formats (.json, .yml, .yaml)
pub mod config;

/// Common constants: template names and output paths
pub mod constants;

/// Per-endpoint code plans consumed by the API template
pub mod endpoint;

/// Error types and handling for the k6gen application
pub mod error;

/// Bundled and local template loading
pub mod loader;

/// Logger setup from an explicit verbosity value
pub mod logger;

/// Placeholder-to-test-data resolution for endpoint paths
pub mod placeholder;

/// Generation orchestration
/// Combines all components to produce the project files
pub mod processor;

/// Directive template rendering engine
/// Handles `each`, `if`/`else`, `unless` blocks, inline expressions and helpers
pub mod renderer;
