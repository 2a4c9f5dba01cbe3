//! k6gen's main application entry point and orchestration logic.
//! Handles command-line argument parsing, configuration loading, generation
//! and writing of the project files.

use std::path::PathBuf;

use k6gen::{
    cli::{get_args, Args},
    config::load_config,
    constants::outputs::REPORTS_DIR,
    error::{default_error_handler, Error, Result},
    loader::TemplateSource,
    logger::{init_logger, LoggerConfig},
    processor::{ensure_output_dir, write_file, Processor},
    renderer::DirectiveRenderer,
};
use log::info;

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(LoggerConfig::new(args.verbose, args.quiet));

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads and validates the project description
/// 2. Checks the output directory
/// 3. Selects bundled or local templates
/// 4. Renders every project file
/// 5. Writes the files and the empty reports directory
fn run(args: Args) -> Result<()> {
    let config = load_config(&args.config)?;

    let output_dir = args.output_dir.unwrap_or_else(|| PathBuf::from(config.output_dir_name()));
    let output_root = ensure_output_dir(output_dir, args.force)?;

    let template_source = TemplateSource::from_dir(args.templates);
    info!("Using {template_source}");
    let loader = template_source.into_loader();
    let engine = DirectiveRenderer::new();

    let processor = Processor::new(&engine, &*loader, &config)?;
    for file in processor.generate()? {
        let target = output_root.join(&file.target);
        write_file(&file.content, &target)?;
        println!("Generated: '{}'", target.display());
    }
    std::fs::create_dir_all(output_root.join(REPORTS_DIR)).map_err(Error::IoError)?;

    println!(
        "k6 project '{}' generated successfully in {}.",
        config.project.name,
        output_root.display()
    );
    println!("Run it with: cd {} && k6 run controller.js", output_root.display());
    Ok(())
}
