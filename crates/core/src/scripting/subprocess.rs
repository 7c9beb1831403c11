//! Subprocess supervision.
//!
//! Provides [`run_command`], which spawns a prepared
//! [`tokio::process::Command`] in its own process group, captures stdout and
//! stderr independently, and enforces the deadline and caller cancellation by
//! killing the whole group.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::executor::{ScriptError, ScriptInput, ScriptOutput, Termination};

/// Maximum stdout or stderr size kept per stream (10 MiB).
///
/// Bytes past the limit are read and discarded so the child never blocks on
/// a full pipe.
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// How long to wait for the output readers after the child is gone.
///
/// Grandchildren that inherited the pipes can keep them open after the
/// direct child exits.
const IO_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

const READ_CHUNK_SIZE: usize = 8192;

/// Spawn `cmd`, capture its output, and enforce the configured timeout.
///
/// The caller sets the program and arguments. Stdin is closed; the working
/// directory from [`ScriptInput`] is applied here. Dropping the returned
/// future kills the process group as well.
pub async fn run_command(
    cmd: &mut Command,
    input: ScriptInput,
    cancel: &CancellationToken,
) -> Result<ScriptOutput, ScriptError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // New process group with the child as leader, so pipelines and
    // background jobs it starts can be killed together.
    #[cfg(unix)]
    cmd.process_group(0);

    if let Some(dir) = &input.working_directory {
        cmd.current_dir(dir);
    }

    let start = Instant::now();

    let mut child = cmd.spawn().map_err(ScriptError::Spawn)?;
    let mut group = ProcessGroup::new(child.id());

    let stdout_task = tokio::spawn(read_stream(child.stdout.take()));
    let stderr_task = tokio::spawn(read_stream(child.stderr.take()));

    let termination = tokio::select! {
        status = child.wait() => {
            let status = status.map_err(ScriptError::Io)?;
            match status.code() {
                Some(code) => Termination::Exited(code),
                None => Termination::Signaled(signal_of(&status)),
            }
        }
        () = tokio::time::sleep(input.timeout) => {
            group.kill();
            let _ = child.kill().await;
            Termination::TimedOut
        }
        () = cancel.cancelled() => {
            group.kill();
            let _ = child.kill().await;
            Termination::Cancelled
        }
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    group.release();

    let stdout = drain(stdout_task).await;
    let stderr = drain(stderr_task).await;

    Ok(ScriptOutput {
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        termination,
        duration_ms,
    })
}

/// Read an entire output stream, keeping at most [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    let Some(mut reader) = handle else {
        return buf;
    };
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let room = MAX_OUTPUT_BYTES.saturating_sub(buf.len());
                buf.extend_from_slice(&chunk[..n.min(room)]);
            }
        }
    }
    buf
}

/// Wait for a reader task, aborting it if the pipe stays open too long.
async fn drain(mut handle: JoinHandle<Vec<u8>>) -> Vec<u8> {
    match tokio::time::timeout(IO_DRAIN_TIMEOUT, &mut handle).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(_join_err)) => Vec::new(),
        Err(_elapsed) => {
            handle.abort();
            Vec::new()
        }
    }
}

#[cfg(unix)]
fn signal_of(status: &std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().unwrap_or(0)
}

#[cfg(not(unix))]
fn signal_of(_: &std::process::ExitStatus) -> i32 {
    0
}

/// Process group led by the spawned child.
///
/// Killed with `SIGKILL` on [`ProcessGroup::kill`] or when dropped while
/// still armed (the supervising future was dropped mid-run).
struct ProcessGroup {
    pgid: Option<u32>,
}

impl ProcessGroup {
    fn new(pid: Option<u32>) -> Self {
        Self { pgid: pid }
    }

    fn kill(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            kill_group(pgid);
        }
    }

    /// Stop tracking the group once the leader has been reaped.
    fn release(&mut self) {
        self.pgid = None;
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(unix)]
fn kill_group(pgid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pgid) else {
        return;
    };
    // SAFETY: killpg has no memory-safety preconditions; a stale group id
    // only yields ESRCH.
    let result = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if result == -1 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::ESRCH) {
            tracing::warn!(pgid, error = %err, "Failed to kill process group");
        }
    }
}

#[cfg(not(unix))]
fn kill_group(_: u32) {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
