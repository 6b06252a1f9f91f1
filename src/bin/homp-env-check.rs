use std::process::ExitCode;

use clap::Parser;
use homp_api::config::Config;

/// Validate the environment before a build or deploy.
///
/// Exits non-zero and lists every missing or malformed variable when the
/// environment would not let the API start.
#[derive(Parser)]
#[command(name = "homp-env-check")]
#[command(about = "Validate HOMP environment variables", long_about = None)]
struct Cli {
    /// Print nothing on success
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match Config::from_env() {
        Ok(config) => {
            if !cli.quiet {
                println!(
                    "✓ Environment valid (mode: {}, port: {}, bucket: {})",
                    config.environment, config.server.port, config.storage.bucket
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}
