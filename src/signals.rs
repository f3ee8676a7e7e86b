use crate::error::ShellError;
use nix::libc::STDOUT_FILENO;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd::write;
use signal_hook::consts::SIGTSTP;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set while a trailing `&` is being ignored.
static FOREGROUND_ONLY: AtomicBool = AtomicBool::new(false);

const ENTER_MSG: &[u8] = b"\nEntering foreground-only mode (& is now ignored)\n: ";
const EXIT_MSG: &[u8] = b"\nExiting foreground-only mode\n: ";

/// Installs the shell's own dispositions:
/// - SIGINT (Ctrl-C) is ignored, so only foreground children die from it.
/// - SIGTSTP (Ctrl-Z) flips foreground-only mode and announces the change.
pub fn install_signal_handlers() -> Result<(), ShellError> {
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    unsafe { sigaction(Signal::SIGINT, &ignore) }
        .map_err(|e| ShellError::Signal(io::Error::from(e)))?;

    // Runs at an arbitrary point of the main loop: only an atomic swap and a
    // raw write(2) to stdout, no allocation and no locks.
    unsafe {
        signal_hook::low_level::register(SIGTSTP, || {
            let msg = toggle_foreground_only();
            let _ = write(STDOUT_FILENO, msg);
        })
    }
    .map_err(ShellError::Signal)?;
    Ok(())
}

/// Whether new commands are currently forced into the foreground.
pub fn foreground_only() -> bool {
    FOREGROUND_ONLY.load(Ordering::SeqCst)
}

/// Flips foreground-only mode and returns the matching announcement.
pub fn toggle_foreground_only() -> &'static [u8] {
    if FOREGROUND_ONLY.fetch_xor(true, Ordering::SeqCst) {
        EXIT_MSG
    } else {
        ENTER_MSG
    }
}

/// Sets the dispositions a child runs with. Called in the child between
/// fork and exec.
///
/// SIGPIPE goes back to the default the Rust runtime took away from us. A
/// foreground child additionally dies from Ctrl-C and ignores Ctrl-Z, so it
/// can neither be suspended nor re-toggle the shell's mode. A background
/// child keeps the shell's dispositions.
pub fn prepare_child(background: bool) -> nix::Result<()> {
    let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::all());
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    unsafe {
        sigaction(Signal::SIGPIPE, &default)?;
        if !background {
            sigaction(Signal::SIGINT, &default)?;
            sigaction(Signal::SIGTSTP, &ignore)?;
        }
    }
    Ok(())
}
