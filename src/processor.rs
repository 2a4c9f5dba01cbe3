//! Core generation orchestration.
//! Combines the configuration, the template loader, the rendering engine and
//! the placeholder resolver into the files of a k6 project.

use log::debug;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    config::{Config, Scenario},
    constants::{outputs, templates},
    endpoint::{data_imports, EndpointPlan},
    error::{Error, Result},
    loader::TemplateLoader,
    renderer::TemplateRenderer,
};

/// One generated file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub target: PathBuf,
    pub content: String,
}

pub struct Processor<'a> {
    engine: &'a dyn TemplateRenderer,
    loader: &'a dyn TemplateLoader,
    config: &'a Config,
    /// Configuration fields plus `packageName`
    context: Value,
}

impl<'a> Processor<'a> {
    pub fn new(
        engine: &'a dyn TemplateRenderer,
        loader: &'a dyn TemplateLoader,
        config: &'a Config,
    ) -> Result<Self> {
        let package_name = Value::from(config.project_slug());
        let context = extend_context(&config.context()?, [("packageName", package_name)]);
        Ok(Self { engine, loader, config, context })
    }

    /// Renders every file of the project, in a stable order.
    pub fn generate(&self) -> Result<Vec<GeneratedFile>> {
        debug!("Generating project '{}'", self.config.project.name);
        let mut files = vec![self.config_file()?, self.api_module()?];
        files.extend(self.business_ops()?);
        files.push(self.test_data()?);
        files.extend(self.utilities()?);
        files.push(self.controller()?);
        files.push(self.package_manifest()?);
        files.push(self.readme()?);
        Ok(files)
    }

    pub fn config_file(&self) -> Result<GeneratedFile> {
        self.render(templates::CONFIG, &self.context, outputs::CONFIG)
    }

    /// The API module; path placeholders are planned by the resolver.
    pub fn api_module(&self) -> Result<GeneratedFile> {
        let plans: Vec<EndpointPlan<'_>> = self
            .config
            .api_endpoints
            .iter()
            .map(|endpoint| EndpointPlan::new(endpoint, &self.config.test_data))
            .collect();
        let apis: Vec<Value> = plans.iter().map(EndpointPlan::to_context).collect();
        let imports = data_imports(&plans).join(", ");

        let context = extend_context(
            &self.context,
            [("apis", Value::from(apis)), ("dataImports", Value::from(imports))],
        );
        self.render(templates::APIS, &context, outputs::APIS)
    }

    /// One module per scenario, calling its endpoints in order.
    pub fn business_ops(&self) -> Result<Vec<GeneratedFile>> {
        self.config
            .test_scenarios
            .iter()
            .map(|scenario| self.business_op(scenario))
            .collect()
    }

    fn business_op(&self, scenario: &Scenario) -> Result<GeneratedFile> {
        let apis = self.config.scenario_endpoints(scenario);
        let context = extend_context(
            &self.context,
            [("scenario", serde_json::to_value(scenario)?), ("apis", serde_json::to_value(apis)?)],
        );
        let target = Path::new(outputs::BUSINESS_OPS_DIR).join(format!("{}.js", scenario.name));
        self.render(templates::BUSINESS_OP, &context, target)
    }

    pub fn test_data(&self) -> Result<GeneratedFile> {
        self.render(templates::TEST_DATA, &self.context, outputs::TEST_DATA)
    }

    /// Logging, assertion and test-data helpers for the generated scripts.
    pub fn utilities(&self) -> Result<Vec<GeneratedFile>> {
        Ok(vec![
            self.render(templates::DEBUG_HELPER, &self.context, outputs::DEBUG_HELPER)?,
            self.render(templates::ASSERT_HELPER, &self.context, outputs::ASSERT_HELPER)?,
            self.render(templates::DATA_HELPER, &self.context, outputs::DATA_HELPER)?,
        ])
    }

    pub fn controller(&self) -> Result<GeneratedFile> {
        self.render(templates::CONTROLLER, &self.context, outputs::CONTROLLER)
    }

    pub fn package_manifest(&self) -> Result<GeneratedFile> {
        self.render(templates::PACKAGE, &self.context, outputs::PACKAGE)
    }

    pub fn readme(&self) -> Result<GeneratedFile> {
        self.render(templates::README, &self.context, outputs::README)
    }

    fn render<T: Into<PathBuf>>(
        &self,
        template_name: &str,
        context: &Value,
        target: T,
    ) -> Result<GeneratedFile> {
        let template = self.loader.load(template_name)?;
        let target = target.into();
        debug!("Rendering '{}' from '{template_name}'", target.display());
        let content = self.engine.render(&template, context);
        Ok(GeneratedFile { target, content })
    }
}

/// Copy of an object context with extra top-level fields.
fn extend_context<'k, I>(base: &Value, fields: I) -> Value
where
    I: IntoIterator<Item = (&'k str, Value)>,
{
    let mut object = base.as_object().cloned().unwrap_or_default();
    for (key, value) in fields {
        object.insert(key.to_string(), value);
    }
    Value::Object(object)
}

/// Ensures the output directory is safe to write to.
///
/// # Arguments
/// * `output_dir` - Target directory path for generated output
/// * `force` - Whether to overwrite an existing directory
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if the directory exists and force is false
pub fn ensure_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() && !force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }
    Ok(output_dir.to_path_buf())
}

/// Writes `content` to `dest_path`, creating parent directories.
pub fn write_file<P: AsRef<Path>>(content: &str, dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    let base_path = std::env::current_dir().unwrap_or_default();
    let abs_path = if dest_path.is_absolute() {
        dest_path.to_path_buf()
    } else {
        base_path.join(dest_path)
    };

    if let Some(parent) = abs_path.parent() {
        fs::create_dir_all(parent).map_err(Error::IoError)?;
    }
    fs::write(abs_path, content).map_err(Error::IoError)
}
