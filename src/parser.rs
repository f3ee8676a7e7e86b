use crate::error::ShellError;
use nix::unistd::Pid;

/// Longest accepted input line, not counting the newline.
pub const MAX_LINE: usize = 2048;
/// Most words a single command line may produce.
pub const MAX_ARGS: usize = 512;

/// Represents a parsed command.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Command {
    /// Command and its arguments. Never empty once produced by the parser.
    pub argv: Vec<String>,
    /// Input redirection file, if any.
    pub infile: Option<String>,
    /// Output redirection file, if any.
    pub outfile: Option<String>,
    /// Run without waiting for the child.
    pub background: bool,
}

impl Command {
    /// Creates a foreground command with no redirections.
    pub fn new(argv: Vec<String>) -> Self {
        Command {
            argv,
            ..Default::default()
        }
    }

    /// The program (or built-in) name.
    pub fn name(&self) -> &str {
        &self.argv[0]
    }

    /// The words joined back together, for diagnostics.
    pub fn cmdline(&self) -> String {
        self.argv.join(" ")
    }
}

/// Parses one input line into a `Command`.
///
/// - `$$` is replaced by `shell_pid` before the line is split; a lone `$`
///   stays as it is.
/// - Words are separated by spaces. Blank lines and lines starting with `#`
///   give `Ok(None)`.
/// - A trailing `&` is always dropped, but only marks the command as
///   background when `foreground_only` is false.
/// - A trailing `< file` and/or `> file` (in either order) become the
///   redirections.
pub fn parse_command_line(
    line: &str,
    shell_pid: Pid,
    foreground_only: bool,
) -> Result<Option<Command>, ShellError> {
    let line = line.trim_end_matches(['\n', '\r']);
    if line.chars().count() > MAX_LINE {
        return Err(ShellError::LineTooLong);
    }
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let expanded = expand_pid(line, shell_pid);
    let argv: Vec<String> = expanded
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect();
    if argv.len() > MAX_ARGS {
        return Err(ShellError::TooManyArgs);
    }

    let mut cmd = Command::new(argv);
    if cmd.argv.last().map(String::as_str) == Some("&") {
        cmd.argv.pop();
        cmd.background = !foreground_only;
    }
    // At most one of each direction; a second pass picks up the other one.
    if strip_redirection(&mut cmd) {
        strip_redirection(&mut cmd);
    }

    if cmd.argv.is_empty() {
        return Ok(None);
    }
    Ok(Some(cmd))
}

/// Replaces every `$$` with the decimal shell pid.
fn expand_pid(line: &str, shell_pid: Pid) -> String {
    if line.contains("$$") {
        line.replace("$$", &shell_pid.to_string())
    } else {
        line.to_string()
    }
}

/// Moves a trailing `< path` or `> path` pair out of `argv`.
///
/// The program name itself is never consumed, and a direction that is
/// already set is left alone. Returns true if a pair was removed.
fn strip_redirection(cmd: &mut Command) -> bool {
    let len = cmd.argv.len();
    if len < 3 {
        return false;
    }
    let target = match cmd.argv[len - 2].as_str() {
        "<" if cmd.infile.is_none() => &mut cmd.infile,
        ">" if cmd.outfile.is_none() => &mut cmd.outfile,
        _ => return false,
    };
    let path = cmd.argv.pop();
    cmd.argv.pop();
    *target = path;
    true
}
