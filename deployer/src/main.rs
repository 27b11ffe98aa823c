//! Extension deployer - Entry Point
//!
//! Uploads a packaged extension to the configured projects, waits for the
//! platform to process it and marks it trusted.

use std::env;
use std::process;

use extdeploy::app::options::{CliArgs, USAGE};
use extdeploy::app::run::run;
use extdeploy::logs::init_logging;
use extdeploy::utils::version_info;

use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match CliArgs::parse(&args) {
        Ok(cli) => cli,
        Err(e) => {
            println!("{e}");
            println!();
            println!("{USAGE}");
            process::exit(1);
        }
    };

    if cli.show_help {
        println!("{USAGE}");
        return;
    }

    // Print version and exit
    if cli.show_version {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{version}"),
            Err(e) => println!("Failed to render version info: {e}"),
        }
        return;
    }

    // Initialize logging
    if let Err(e) = init_logging(&cli.log_options()) {
        println!("Failed to initialize logging: {e}");
    }

    match run(&cli).await {
        Ok(summary) => {
            summary.print();
            process::exit(summary.exit_code(cli.strict));
        }
        Err(e) => {
            error!("Deployment aborted: {e}");
            println!("{e}");
            process::exit(1);
        }
    }
}
