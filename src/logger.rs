//! Logger setup for the k6gen binary.
//! The verbosity is passed in as a value; the library itself only talks to the
//! `log` facade.

use log::LevelFilter;

/// Verbosity requested on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggerConfig {
    pub verbose: bool,
    pub quiet: bool,
}

impl LoggerConfig {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// `--verbose` wins over `--quiet`.
    pub fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Info
        }
    }
}

pub fn init_logger(config: LoggerConfig) {
    env_logger::Builder::new()
        .filter_level(config.level())
        .format_target(false)
        .init();
}
