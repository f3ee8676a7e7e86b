/*
 * mystop.rs - Foreground child that tries to suspend itself
 *
 * usage: mystop <n>
 * Sleeps for <n> seconds and sends SIGTSTP to itself, as if Ctrl-Z had been
 * pressed. A foreground child of smallsh ignores SIGTSTP, so this exits 0
 * instead of stopping.
 */

use nix::sys::signal::{self, Signal};
use nix::unistd::getpid;
use std::env;
use std::process;
use std::thread;
use std::time::Duration;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <n>", args[0]);
        process::exit(0);
    }
    let secs = args[1].parse::<u64>().unwrap_or_else(|_| {
        eprintln!("Error: <n> must be a non-negative integer");
        process::exit(1);
    });

    thread::sleep(Duration::from_secs(secs));

    if let Err(err) = signal::kill(getpid(), Signal::SIGTSTP) {
        eprintln!("kill (tstp) error: {}", err);
    }
    process::exit(0);
}
