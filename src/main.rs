use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::process;

use test_env_provisioner::logging::init_logging;
use test_env_provisioner::{EnvironmentProvisioner, DEFAULT_ENV_DIR, PINNED_PACKAGE, PINNED_VERSION};

#[derive(Parser)]
#[command(name = "provision-test-env")]
#[command(version = "0.1.0")]
#[command(about = "Provision an isolated, version-pinned npm test environment", long_about = None)]
struct Cli {
    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_ENV_DIR,
        help = "Target directory for the isolated environment"
    )]
    dir: PathBuf,

    #[arg(short, long, help = "Enable verbose output")]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("{} {}", "⚠".yellow(), e);
    }

    if cli.verbose {
        eprintln!(
            "{} Ensuring {} in {}",
            "ℹ".blue(),
            format!("{PINNED_PACKAGE}@{PINNED_VERSION}").cyan(),
            cli.dir.display()
        );
    }

    let provisioner = EnvironmentProvisioner::new(cli.dir);
    match provisioner.ensure_ready() {
        Ok(bin_path) => {
            println!(
                "{} Test environment ready: {}",
                "✓".green().bold(),
                bin_path.display().to_string().cyan()
            );
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}
