use clap::Parser as ClapParser;
use shaderbake::driver::{Cli, ShaderDriver};
use shaderbake::{error, logger};
use std::process::exit;

/// The main entry point for the application.
///
/// Parses command-line arguments and runs the shader driver.
fn main() {
    if !run() {
        exit(1);
    }
}

/// Runs the shader driver.
///
/// This function resolves the compiler, clears the previous output and
/// compiles every shader under the source directory.
///
/// # Returns
///
/// `true` if every shader compiled.
fn run() -> bool {
    let config = Cli::parse().into_config();
    logger::init(config.verbosity);

    let driver = ShaderDriver::from_config(config);
    match driver.run() {
        Ok(_) => true,
        Err(e) => {
            error::report(&e);
            false
        }
    }
}
