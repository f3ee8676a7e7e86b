use crate::error::{RedirectKind, ShellError};
use crate::jobs::{wait_for, JobList, Status};
use crate::parser::Command;
use crate::signals;
use log::debug;
use nix::libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::sys::signal::Signal;
use nix::unistd::{dup2, execvp, fork, ForkResult};
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;

/// Where background commands read from and write to unless told otherwise.
pub const NULL_DEVICE: &str = "/dev/null";

/// Exit status of a child whose program could not be executed.
pub const EXEC_FAILURE: i32 = 1;

/// The files a child's stdin/stdout are replaced with. `None` leaves the
/// shell's own descriptor in place.
#[derive(Debug, Default)]
pub struct Redirections {
    pub stdin: Option<File>,
    pub stdout: Option<File>,
}

impl Redirections {
    /// Opens the redirection targets of `cmd`. Background commands get the
    /// null device for any side left unspecified.
    pub fn resolve(cmd: &Command) -> Result<Self, ShellError> {
        let default = cmd.background.then_some(NULL_DEVICE);
        let stdin = match cmd.infile.as_deref().or(default) {
            Some(path) => Some(open_input(path)?),
            None => None,
        };
        let stdout = match cmd.outfile.as_deref().or(default) {
            Some(path) => Some(open_output(path)?),
            None => None,
        };
        Ok(Redirections { stdin, stdout })
    }

    /// Points stdin/stdout at the opened files. Child side only.
    fn apply(&self) -> nix::Result<()> {
        if let Some(file) = &self.stdin {
            dup2(file.as_raw_fd(), STDIN_FILENO)?;
        }
        if let Some(file) = &self.stdout {
            dup2(file.as_raw_fd(), STDOUT_FILENO)?;
        }
        Ok(())
    }
}

fn open_input(path: &str) -> Result<File, ShellError> {
    File::open(path).map_err(|source| ShellError::RedirectOpen {
        path: path.to_string(),
        kind: RedirectKind::Input,
        source,
    })
}

fn open_output(path: &str) -> Result<File, ShellError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o666)
        .open(path)
        .map_err(|source| ShellError::RedirectOpen {
            path: path.to_string(),
            kind: RedirectKind::Output,
            source,
        })
}

/// Executes an external command:
/// - Resolves redirections up front; a target that cannot be opened
///   abandons the command and leaves `last_status` alone.
/// - Forks once. The child sets its signal dispositions, redirects and execs.
/// - Foreground: waits for the child and records its status in `last_status`,
///   announcing an interrupt right away.
/// - Background: tracks the child in `job_list` and prints its pid.
///
/// Only a failed fork or wait is returned as an error; the caller treats
/// those as fatal.
pub fn execute_command(
    cmd: Command,
    job_list: &mut JobList,
    last_status: &mut Status,
) -> Result<(), ShellError> {
    let redirections = match Redirections::resolve(&cmd) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(());
        }
    };
    let argv = match to_c_strings(&cmd.argv) {
        Ok(argv) => argv,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(());
        }
    };

    // Anything still buffered would otherwise be written twice.
    let _ = io::stdout().flush();

    match unsafe { fork() } {
        Ok(ForkResult::Child) => run_child(&cmd, &redirections, &argv),
        Ok(ForkResult::Parent { child }) => {
            drop(redirections);
            debug!(
                "spawned pid {} ({}) in the {}",
                child,
                cmd.cmdline(),
                if cmd.background { "background" } else { "foreground" }
            );
            if cmd.background {
                job_list.add_job(child, cmd.cmdline());
                println!("background pid is {}", child);
                return Ok(());
            }

            let status = wait_for(child)?;
            debug!("foreground pid {} finished: {}", child, status);
            *last_status = status;
            if status == Status::Signaled(Signal::SIGINT as i32) {
                println!("{}", status);
                for done in job_list.reap_completed() {
                    println!("{}", done.interrupted_announcement());
                }
            }
            Ok(())
        }
        Err(e) => Err(ShellError::Spawn(e)),
    }
}

/// Leaves the child without running the parent's exit handlers.
fn child_exit(status: i32) -> ! {
    unsafe { nix::libc::_exit(status) }
}

/// The child side of the fork. Never returns.
fn run_child(cmd: &Command, redirections: &Redirections, argv: &[CString]) -> ! {
    if let Err(e) = signals::prepare_child(cmd.background) {
        eprintln!("sigaction: {}", e);
        child_exit(EXEC_FAILURE);
    }
    if let Err(e) = redirections.apply() {
        eprintln!("dup2: {}", e);
        child_exit(EXEC_FAILURE);
    }
    // execvp only returns on failure.
    if let Err(e) = execvp(&argv[0], argv) {
        eprintln!("{}: {}", cmd.name(), e.desc());
    }
    child_exit(EXEC_FAILURE)
}

fn to_c_strings(words: &[String]) -> Result<Vec<CString>, ShellError> {
    words
        .iter()
        .map(|word| {
            CString::new(word.as_bytes()).map_err(|_| ShellError::InvalidArgument(word.clone()))
        })
        .collect()
}
