use crate::error::ShellError;
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::process;

pub fn print_usage() {
    println!("Usage: smallsh [-hvp]");
    println!("   -h   Print this help message");
    println!("   -v   Enable verbose mode");
    println!("   -p   Do not print a command prompt");
    process::exit(1);
}

/// Reports an error the shell cannot recover from and exits.
pub fn fatal(err: &ShellError) -> ! {
    eprintln!("smallsh: {}", err);
    process::exit(1);
}

/// Sends diagnostics to stderr: debug level when verbose, warnings otherwise.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    // Only fails if a logger is already set.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}
