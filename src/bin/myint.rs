/*
 * myint.rs - Foreground child that interrupts itself
 *
 * usage: myint <n>
 * Sleeps for <n> seconds and sends SIGINT to itself, as if Ctrl-C had been
 * pressed. Under smallsh a foreground myint dies from it; a background one
 * ignores it and exits 0.
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

    if let Err(err) = signal::kill(getpid(), Signal::SIGINT) {
        eprintln!("kill (int) error: {}", err);
    }
    process::exit(0);
}
