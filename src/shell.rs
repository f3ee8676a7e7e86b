use crate::builtins::{exit_shell, handle_builtin};
use crate::exec::execute_command;
use crate::jobs::{JobList, Status};
use crate::parser::parse_command_line;
use crate::signals::foreground_only;
use crate::utils::fatal;
use log::debug;
use nix::unistd::getpid;
use std::io::{self, BufRead, Write};

/// Global prompt string.
pub static PROMPT: &str = ": ";

/// Runs the main shell loop: reports finished background jobs, prints the
/// prompt (if enabled), reads a line, and runs it as a built-in or an
/// external command. End of input behaves like `exit`.
pub fn run_shell(emit_prompt: bool) -> ! {
    let shell_pid = getpid();
    let mut job_list = JobList::new();
    let mut last_status = Status::default();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut buf = Vec::new();

    loop {
        for done in job_list.reap_completed() {
            println!("{}", done);
        }
        if emit_prompt {
            print!("{}", PROMPT);
        }
        let _ = io::stdout().flush();

        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => {
                debug!("end of input");
                exit_shell(&mut job_list);
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                exit_shell(&mut job_list);
            }
        }
        let cmdline = String::from_utf8_lossy(&buf);

        let cmd = match parse_command_line(&cmdline, shell_pid, foreground_only()) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };
        debug!("parsed {:?}", cmd);

        if handle_builtin(&cmd, &mut job_list, &last_status) {
            continue;
        }
        if let Err(e) = execute_command(cmd, &mut job_list, &mut last_status) {
            if e.is_fatal() {
                fatal(&e);
            }
            eprintln!("{}", e);
        }
    }
}
