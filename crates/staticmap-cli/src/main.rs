//! staticmap CLI entry point.

use std::process;

use clap::Parser;
use log::{debug, error, info};

use staticmap_cli::{Args, error_adapter::ErrorAdapter};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    // Exits with usage on stderr if --config-file is missing
    let args = Args::parse();

    staticmap_cli::logger_builder(&args).init();

    info!(debug = args.debug; "Starting staticmap");
    debug!(args:?; "Parsed arguments");

    match staticmap_cli::run(&args) {
        Ok(path) => {
            info!(path = path.display().to_string(); "Completed successfully");
        }
        Err(err) => {
            let reporter = if args.disable_color {
                miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor())
            } else {
                miette::GraphicalReportHandler::new()
            };

            let mut writer = String::new();
            reporter
                .render_report(&mut writer, &ErrorAdapter(&err))
                .expect("Writing to String buffer is infallible");

            error!("Failed\n{writer}");
            process::exit(1);
        }
    }
}
