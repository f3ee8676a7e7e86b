//! Error types for the shell.
//!
//! Only a few of these are fatal (see [`ShellError::is_fatal`]); the rest are
//! reported on one line and the read loop carries on.

use crate::parser::{MAX_ARGS, MAX_LINE};
use std::io;
use thiserror::Error;

/// Which side of a command a redirection target was meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    Input,
    Output,
}

impl std::fmt::Display for RedirectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RedirectKind::Input => write!(f, "read"),
            RedirectKind::Output => write!(f, "write"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("input line longer than {} characters", MAX_LINE)]
    LineTooLong,

    #[error("too many arguments (limit is {})", MAX_ARGS)]
    TooManyArgs,

    /// A word contained an interior NUL byte and cannot be passed to exec.
    #[error("invalid argument: {0:?}")]
    InvalidArgument(String),

    #[error("cannot open {path} to {kind}: {source}")]
    RedirectOpen {
        path: String,
        kind: RedirectKind,
        #[source]
        source: io::Error,
    },

    /// The OS refused to create a process at all.
    #[error("fork: {0}")]
    Spawn(#[source] nix::Error),

    #[error("waitpid: {0}")]
    Wait(#[source] nix::Error),

    #[error("cd: cannot determine home directory")]
    NoHomeDirectory,

    #[error("cd: {path}: {source}")]
    ChangeDir {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot install signal disposition: {0}")]
    Signal(#[source] io::Error),
}

impl ShellError {
    /// Whether the shell can keep reading input after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ShellError::Spawn(_) | ShellError::Wait(_) | ShellError::Signal(_)
        )
    }
}
