use crate::error::ShellError;
use log::{debug, warn};
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use std::fmt;

/// How a process ended, as reported by the `status` built-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Exited(i32),
    Signaled(i32),
}

impl Status {
    /// Translates a wait result. Returns `None` while the process has not
    /// terminated (still alive, stopped or continued).
    pub fn from_wait(status: WaitStatus) -> Option<Status> {
        match status {
            WaitStatus::Exited(_, code) => Some(Status::Exited(code)),
            WaitStatus::Signaled(_, sig, _) => Some(Status::Signaled(sig as i32)),
            _ => None,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Exited(0)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Exited(code) => write!(f, "exit value {}", code),
            Status::Signaled(sig) => write!(f, "terminated by signal {}", sig),
        }
    }
}

/// Waits for `pid` to terminate, retrying when a signal handler interrupts
/// the wait.
pub fn wait_for(pid: Pid) -> Result<Status, ShellError> {
    loop {
        match waitpid(pid, None) {
            Ok(ws) => {
                if let Some(status) = Status::from_wait(ws) {
                    return Ok(status);
                }
            }
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(ShellError::Wait(e)),
        }
    }
}

/// A background child that has not been reaped yet.
#[derive(Debug)]
pub struct Job {
    pub pid: Pid,
    pub cmdline: String,
}

/// A background child observed to have terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub pid: Pid,
    pub status: Status,
}

impl Completion {
    /// The shorter form used right after a foreground child was interrupted.
    pub fn interrupted_announcement(&self) -> String {
        match self.status {
            Status::Signaled(_) => self.status.to_string(),
            Status::Exited(_) => self.to_string(),
        }
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "background pid {} is done: {}", self.pid, self.status)
    }
}

/// Background children in the order they were started.
#[derive(Debug, Default)]
pub struct JobList {
    jobs: Vec<Job>,
}

impl JobList {
    /// Creates a new, empty job list.
    pub fn new() -> Self {
        JobList { jobs: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Starts tracking a background child.
    pub fn add_job(&mut self, pid: Pid, cmdline: String) {
        debug!("tracking background pid {} ({})", pid, cmdline);
        self.jobs.push(Job { pid, cmdline });
    }

    /// Polls every tracked child without blocking and drops the ones that
    /// have terminated, returning them in job-list order.
    pub fn reap_completed(&mut self) -> Vec<Completion> {
        let mut done = Vec::new();
        self.jobs.retain(|job| {
            match waitpid(job.pid, Some(WaitPidFlag::WNOHANG)) {
                Ok(ws) => match Status::from_wait(ws) {
                    Some(status) => {
                        debug!("reaped background pid {} ({}): {}", job.pid, job.cmdline, status);
                        done.push(Completion { pid: job.pid, status });
                        false
                    }
                    None => true,
                },
                Err(Errno::EINTR) => true,
                Err(e) => {
                    // Nothing left to wait for; keeping it would warn forever.
                    warn!("dropping background pid {}: waitpid: {}", job.pid, e);
                    false
                }
            }
        });
        done
    }

    /// Sends every tracked child SIGTERM and waits for each to go away.
    /// Used on the way out of the shell; this is the only blocking reap.
    pub fn terminate_all(&mut self) {
        for job in self.jobs.drain(..) {
            debug!("terminating background pid {} ({})", job.pid, job.cmdline);
            if let Err(e) = kill(job.pid, Signal::SIGTERM) {
                warn!("kill {}: {}", job.pid, e);
            }
            // A stopped child only acts on SIGTERM once it runs again.
            let _ = kill(job.pid, Signal::SIGCONT);
            match wait_for(job.pid) {
                Ok(status) => debug!("background pid {} ended: {}", job.pid, status),
                Err(e) => warn!("{}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use std::thread;
    use std::time::{Duration, Instant};

    fn spawn(program: &str, args: &[&str]) -> Pid {
        let child = Command::new(program).args(args).spawn().unwrap();
        Pid::from_raw(child.id() as i32)
    }

    fn reap_until(list: &mut JobList, want: usize) -> Vec<Completion> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut done = Vec::new();
        while done.len() < want && Instant::now() < deadline {
            done.extend(list.reap_completed());
            thread::sleep(Duration::from_millis(20));
        }
        done
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::default().to_string(), "exit value 0");
        assert_eq!(Status::Exited(2).to_string(), "exit value 2");
        assert_eq!(Status::Signaled(2).to_string(), "terminated by signal 2");
    }

    #[test]
    fn test_status_from_wait() {
        let pid = Pid::from_raw(10);
        assert_eq!(
            Status::from_wait(WaitStatus::Exited(pid, 3)),
            Some(Status::Exited(3))
        );
        assert_eq!(
            Status::from_wait(WaitStatus::Signaled(pid, Signal::SIGINT, false)),
            Some(Status::Signaled(2))
        );
        assert_eq!(Status::from_wait(WaitStatus::StillAlive), None);
        assert_eq!(
            Status::from_wait(WaitStatus::Stopped(pid, Signal::SIGTSTP)),
            None
        );
    }

    #[test]
    fn test_completion_announcements() {
        let pid = Pid::from_raw(4242);
        let exited = Completion { pid, status: Status::Exited(0) };
        let killed = Completion { pid, status: Status::Signaled(15) };
        assert_eq!(exited.to_string(), "background pid 4242 is done: exit value 0");
        assert_eq!(
            killed.to_string(),
            "background pid 4242 is done: terminated by signal 15"
        );
        assert_eq!(
            exited.interrupted_announcement(),
            "background pid 4242 is done: exit value 0"
        );
        assert_eq!(killed.interrupted_announcement(), "terminated by signal 15");
    }

    #[test]
    fn test_reap_leaves_running_jobs() {
        let mut list = JobList::new();
        let fast = spawn("true", &[]);
        let slow = spawn("sleep", &["30"]);
        list.add_job(fast, "true".into());
        list.add_job(slow, "sleep 30".into());
        assert_eq!(list.len(), 2);

        let done = reap_until(&mut list, 1);
        assert_eq!(done, vec![Completion { pid: fast, status: Status::Exited(0) }]);
        assert_eq!(list.len(), 1);
        assert_eq!(kill(slow, None), Ok(()));

        list.terminate_all();
        assert!(list.is_empty());
        assert_eq!(kill(slow, None), Err(Errno::ESRCH));
    }

    #[test]
    fn test_reap_reports_signal_termination() {
        let mut list = JobList::new();
        let pid = spawn("sleep", &["30"]);
        list.add_job(pid, "sleep 30".into());
        kill(pid, Signal::SIGKILL).unwrap();

        let done = reap_until(&mut list, 1);
        assert_eq!(done, vec![Completion { pid, status: Status::Signaled(9) }]);
        assert!(list.is_empty());
    }

    #[test]
    fn test_terminate_all_handles_stopped_child() {
        let mut list = JobList::new();
        let pid = spawn("sleep", &["30"]);
        list.add_job(pid, "sleep 30".into());
        kill(pid, Signal::SIGSTOP).unwrap();

        list.terminate_all();
        assert!(list.is_empty());
        assert_eq!(kill(pid, None), Err(Errno::ESRCH));
    }
}
