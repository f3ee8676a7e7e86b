use crate::error::ShellError;
use crate::jobs::{JobList, Status};
use crate::parser::Command;
use log::debug;
use std::path::PathBuf;

/// Checks if the command is a built-in command and, if so, executes it.
/// Supported built-ins are "exit", "cd" and "status".
/// Returns true if the command was built-in and handled; false otherwise.
pub fn handle_builtin(cmd: &Command, job_list: &mut JobList, last_status: &Status) -> bool {
    match cmd.name() {
        "exit" => exit_shell(job_list),
        "cd" => {
            if let Err(e) = change_dir(cmd.argv.get(1).map(String::as_str)) {
                eprintln!("{}", e);
            }
            true
        }
        "status" => {
            println!("{}", last_status);
            true
        }
        _ => false,
    }
}

/// Kills and reaps every background job, then exits successfully.
pub fn exit_shell(job_list: &mut JobList) -> ! {
    if !job_list.is_empty() {
        debug!("exiting with {} background job(s) outstanding", job_list.len());
        job_list.terminate_all();
    }
    std::process::exit(0);
}

/// Changes the working directory to `target`, or to the home directory.
pub fn change_dir(target: Option<&str>) -> Result<(), ShellError> {
    let path = match target {
        Some(dir) => PathBuf::from(dir),
        None => dirs_next::home_dir().ok_or(ShellError::NoHomeDirectory)?,
    };
    std::env::set_current_dir(&path).map_err(|source| ShellError::ChangeDir {
        path: path.display().to_string(),
        source,
    })?;
    debug!("cwd is now {}", path.display());
    Ok(())
}
