/*
 * myexit.rs - Exit with a chosen status
 *
 * usage: myexit <n>
 * Exits immediately with status <n>, for checking the `status` built-in.
 */

use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <n>", args[0]);
        process::exit(0);
    }
    let code = args[1].parse::<i32>().unwrap_or_else(|_| {
        eprintln!("Error: <n> must be an integer");
        process::exit(1);
    });
    process::exit(code);
}
