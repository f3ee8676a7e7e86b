/*
 * myspin.rs - Long-running child for exercising smallsh
 *
 * usage: myspin <n>
 * Sleeps for <n> seconds in 1-second chunks, then exits 0.
 * Useful as a background job that outlives a few prompts.
 */

use std::env;
use std::process;
use std::thread;
use std::time::Duration;

fn main() {
    let secs = seconds_arg();
    for _ in 0..secs {
        thread::sleep(Duration::from_secs(1));
    }
    process::exit(0);
}

fn seconds_arg() -> u64 {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <n>", args[0]);
        process::exit(0);
    }
    args[1].parse::<u64>().unwrap_or_else(|_| {
        eprintln!("Error: <n> must be a non-negative integer");
        process::exit(1);
    })
}
