//! Child process transport.
//!
//! The client side of the process pipe: the worker executable is spawned with
//! piped stdin/stdout and inherited stderr, so its logs reach the user's
//! terminal while the pipes carry protocol frames.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

use super::{TransportError, TransportResult};

/// A spawned worker process and its protocol pipes.
///
/// The child is spawned with `kill_on_drop`, so dropping the transport (or
/// the `Child` taken from it) on any path terminates the worker.
pub struct ChildTransport {
    pub child: Child,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
}

impl ChildTransport {
    /// Spawn `path` with `args` and take its stdin/stdout.
    pub fn spawn(path: &Path, args: &[String]) -> TransportResult<Self> {
        info!("Spawning worker: {}", path.display());

        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TransportError::spawn(path, e))?;

        let stdin = child.stdin.take().ok_or_else(|| missing_pipe(path, "stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| missing_pipe(path, "stdout"))?;

        debug!(pid = child.id(), "Worker started");

        Ok(Self {
            child,
            stdin,
            stdout,
        })
    }
}

fn missing_pipe(path: &Path, which: &str) -> TransportError {
    TransportError::spawn(
        PathBuf::from(path),
        std::io::Error::other(format!("worker {which} was not piped")),
    )
}

/// Wait for an already-disconnected worker to exit, killing it after `grace`.
pub(crate) async fn reap(mut child: Child, grace: Duration) -> TransportResult<()> {
    match tokio::time::timeout(grace, child.wait()).await {
        Ok(Ok(status)) => {
            debug!(%status, "Worker exited");
            Ok(())
        }
        Ok(Err(e)) => Err(e.into()),
        Err(_) => {
            warn!("Worker did not exit within {:?}, killing it", grace);
            child.kill().await?;
            Ok(())
        }
    }
}
