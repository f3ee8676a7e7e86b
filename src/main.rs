mod builtins;
mod error;
mod exec;
mod jobs;
mod parser;
mod shell;
mod signals;
mod utils;

use std::env;

fn main() {
    // Parse command-line arguments.
    let mut emit_prompt = true;
    let mut verbose = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-h" => utils::print_usage(),
            "-v" => verbose = true,
            "-p" => emit_prompt = false,
            _ => {}
        }
    }

    utils::init_logging(verbose);

    // Install signal handlers.
    if let Err(e) = signals::install_signal_handlers() {
        utils::fatal(&e);
    }

    // Run the main shell loop with the options.
    shell::run_shell(emit_prompt);
}
