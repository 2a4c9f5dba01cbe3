//! Template loading for k6gen.
//! Templates either come bundled with the binary or from a local directory
//! holding files with the same names.
use crate::constants::templates;
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

const BUNDLED_TEMPLATES: [(&str, &str); 10] = [
    (templates::CONFIG, include_str!("../templates/config.template.js")),
    (templates::BUSINESS_OP, include_str!("../templates/business-op.template.js")),
    (templates::APIS, include_str!("../templates/apis.template.js")),
    (templates::TEST_DATA, include_str!("../templates/test-data.template.js")),
    (templates::CONTROLLER, include_str!("../templates/controller.template.js")),
    (templates::DEBUG_HELPER, include_str!("../templates/debug-helper.template.js")),
    (templates::ASSERT_HELPER, include_str!("../templates/assert-helper.template.js")),
    (templates::DATA_HELPER, include_str!("../templates/data-helper.template.js")),
    (templates::PACKAGE, include_str!("../templates/package.template.json")),
    (templates::README, include_str!("../templates/readme.template.md")),
];

/// Names of every template a generation run needs.
pub fn template_names() -> impl Iterator<Item = &'static str> {
    BUNDLED_TEMPLATES.iter().map(|(name, _)| *name)
}

/// Represents where templates are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Templates compiled into the binary
    Embedded,
    /// Directory overriding the bundled templates
    FileSystem(PathBuf),
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateSource::Embedded => write!(f, "bundled templates"),
            TemplateSource::FileSystem(path) => {
                write!(f, "templates from local path: '{}'", path.display())
            }
        }
    }
}

impl TemplateSource {
    /// `None` selects the bundled templates.
    pub fn from_dir(dir: Option<PathBuf>) -> Self {
        dir.map_or(TemplateSource::Embedded, TemplateSource::FileSystem)
    }

    pub fn into_loader(self) -> Box<dyn TemplateLoader> {
        match self {
            TemplateSource::Embedded => Box::new(EmbeddedLoader::new()),
            TemplateSource::FileSystem(path) => Box::new(LocalLoader::new(path)),
        }
    }
}

/// Trait for loading templates by name.
pub trait TemplateLoader {
    /// Returns the content of the named template.
    ///
    /// # Errors
    /// * `Error::TemplateError` if the template does not exist
    fn load(&self, name: &str) -> Result<String>;
}

/// Loader serving the templates bundled with the binary.
#[derive(Debug, Default)]
pub struct EmbeddedLoader;

impl EmbeddedLoader {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateLoader for EmbeddedLoader {
    fn load(&self, name: &str) -> Result<String> {
        BUNDLED_TEMPLATES
            .iter()
            .find(|(bundled, _)| *bundled == name)
            .map(|(_, content)| content.to_string())
            .ok_or_else(|| Error::TemplateError(format!("no bundled template named '{name}'")))
    }
}

/// Loader for templates from the local filesystem.
#[derive(Debug)]
pub struct LocalLoader<P: AsRef<Path>> {
    root: P,
}

impl<P: AsRef<Path>> LocalLoader<P> {
    /// Creates a new LocalLoader instance.
    pub fn new(root: P) -> Self {
        Self { root }
    }
}

impl<P: AsRef<Path>> TemplateLoader for LocalLoader<P> {
    fn load(&self, name: &str) -> Result<String> {
        let path = self.root.as_ref().join(name);
        if !path.is_file() {
            return Err(Error::TemplateError(format!(
                "template '{}' does not exist",
                path.display()
            )));
        }

        debug!("Loading template '{}'", path.display());
        fs::read_to_string(&path).map_err(Error::IoError)
    }
}
