//! Command-line interface implementation for k6gen.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for k6gen.
#[derive(Parser, Debug)]
#[command(author, version, about = "k6gen: scaffold k6 load-testing projects from a JSON description", long_about = None)]
pub struct Args {
    /// Path to the project description (.json, .yml or .yaml)
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Directory where the project will be created.
    /// Defaults to '<project-name>-k6-framework' in the current directory.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory with templates overriding the bundled ones
    #[arg(short, long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Force overwrite of existing output directory
    #[arg(short, long)]
    pub force: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                if let Err(err) = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help()
                {
                    eprintln!("{err}");
                }
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
