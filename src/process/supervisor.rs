use std::ffi::OsStr;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use super::decode::ChunkDecoder;

/// How long readers may keep draining after the process group was killed.
const KILL_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Combined output of both channels, shared by the two reader tasks.
type SharedBuffer = Arc<Mutex<String>>;

/// How the external process ended. Exactly one variant is produced per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Process exited on its own with this code.
    Exited(i32),
    /// Process ended without an exit code (killed by a signal, or its status
    /// could not be collected).
    Terminated(String),
    /// Deadline elapsed and the process was killed.
    TimedOut(Duration),
    /// Process never started.
    LaunchFailed(String),
}

/// Terminal result of one supervised run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub termination: Termination,
    /// Everything read from stdout and stderr, in arrival order per channel.
    pub captured: String,
}

impl ProcessOutcome {
    pub fn launch_failed(message: impl Into<String>) -> Self {
        Self {
            termination: Termination::LaunchFailed(message.into()),
            captured: String::new(),
        }
    }

    /// True iff the process exited with code exactly 0.
    pub fn succeeded(&self) -> bool {
        matches!(self.termination, Termination::Exited(0))
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self.termination {
            Termination::Exited(code) => Some(code),
            _ => None,
        }
    }

    pub fn launch_error(&self) -> Option<&str> {
        match &self.termination {
            Termination::LaunchFailed(message) => Some(message),
            _ => None,
        }
    }
}

/// Launches an external process and collects its output until it ends.
#[derive(Debug, Clone, Default)]
pub struct ProcessSupervisor {
    deadline: Option<Duration>,
}

impl ProcessSupervisor {
    pub fn new(deadline: Option<Duration>) -> Self {
        Self { deadline }
    }

    /// Run `program` with `args` to completion.
    ///
    /// Never returns an error: launch failures, non-zero exits and deadline
    /// kills are all reported through the returned [`ProcessOutcome`].
    pub async fn run<S: AsRef<OsStr>>(&self, program: impl AsRef<OsStr>, args: &[S]) -> ProcessOutcome {
        let program = program.as_ref();
        let started = Instant::now();

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so a deadline kill also reaches descendants that
        // inherited the output pipes.
        #[cfg(unix)]
        command.process_group(0);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(program = %program.to_string_lossy(), error = %e, "Failed to launch process");
                return ProcessOutcome::launch_failed(e.to_string());
            }
        };

        let pid = child.id();
        info!(
            program = %program.to_string_lossy(),
            pid = ?pid,
            args = args.len(),
            "Process started"
        );

        let buffer: SharedBuffer = Arc::new(Mutex::new(String::new()));
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(tokio::spawn(drain_channel(stdout, "stdout", Arc::clone(&buffer))));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(tokio::spawn(drain_channel(stderr, "stderr", Arc::clone(&buffer))));
        }

        // One deadline covers both the exit and draining the output pipes.
        let deadline = self.deadline.map(|limit| (limit, started + limit));

        let mut termination = match deadline {
            Some((limit, at)) => match tokio::time::timeout_at(at, child.wait()).await {
                Ok(status) => termination_from(status),
                Err(_) => {
                    warn!(pid = ?pid, deadline_secs = limit.as_secs(), "Deadline elapsed, killing process");
                    kill_process_group(pid);
                    if let Err(e) = child.kill().await {
                        warn!(error = %e, "Failed to kill process");
                    }
                    Termination::TimedOut(limit)
                }
            },
            None => termination_from(child.wait().await),
        };

        let drain_until = match (&termination, deadline) {
            (Termination::TimedOut(_), _) => Some(Instant::now() + KILL_DRAIN_GRACE),
            (_, Some((_, at))) => Some(at),
            (_, None) => None,
        };
        let drained = join_readers(readers, drain_until).await;

        if let (false, Some((limit, _))) = (drained, deadline) {
            if !matches!(termination, Termination::TimedOut(_)) {
                warn!(pid = ?pid, deadline_secs = limit.as_secs(), "Output still open at deadline, killing process group");
                kill_process_group(pid);
                termination = Termination::TimedOut(limit);
            }
        }

        let captured = std::mem::take(&mut *buffer.lock().await);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &termination {
            Termination::Exited(0) => info!(elapsed_ms, bytes = captured.len(), "Process exited successfully"),
            Termination::Exited(code) => warn!(exit_code = code, elapsed_ms, "Process exited with non-zero code"),
            other => warn!(termination = ?other, elapsed_ms, "Process did not exit normally"),
        }

        ProcessOutcome { termination, captured }
    }
}

fn termination_from(status: io::Result<ExitStatus>) -> Termination {
    match status {
        Ok(status) => match status.code() {
            Some(code) => Termination::Exited(code),
            None => Termination::Terminated(status.to_string()),
        },
        Err(e) => Termination::Terminated(format!("failed to collect exit status: {}", e)),
    }
}

/// Append one channel's chunks to the shared buffer as they arrive.
async fn drain_channel<R>(reader: R, channel: &'static str, buffer: SharedBuffer)
where
    R: AsyncRead + Unpin,
{
    let mut chunks = ReaderStream::new(reader);
    let mut decoder = ChunkDecoder::default();

    while let Some(chunk) = chunks.next().await {
        match chunk {
            Ok(bytes) => {
                debug!(channel, len = bytes.len(), "Output chunk");
                let text = decoder.decode(&bytes);
                if !text.is_empty() {
                    buffer.lock().await.push_str(&text);
                }
            }
            Err(e) => {
                warn!(channel, error = %e, "Error reading process output");
                break;
            }
        }
    }

    let tail = decoder.finish();
    if !tail.is_empty() {
        buffer.lock().await.push_str(&tail);
    }
}

/// Wait for both readers, aborting any still running at `until`. Returns
/// false if a reader had to be aborted.
async fn join_readers(readers: Vec<JoinHandle<()>>, until: Option<Instant>) -> bool {
    let mut drained = true;
    for reader in readers {
        let abort = reader.abort_handle();
        let joined = match until {
            Some(at) => match tokio::time::timeout_at(at, reader).await {
                Ok(joined) => joined,
                Err(_) => {
                    debug!("Output reader still blocked at deadline, aborting");
                    abort.abort();
                    drained = false;
                    continue;
                }
            },
            None => reader.await,
        };
        if let Err(e) = joined {
            warn!(error = %e, "Output reader task failed");
        }
    }
    drained
}

/// SIGKILL the child's process group. The group may already be gone.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pid) = pid else { return };
    if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        debug!(pid, error = %e, "Failed to kill process group");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}
