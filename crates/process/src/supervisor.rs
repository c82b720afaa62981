//! The process supervisor implementation

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::{CommandSpec, ExitOutcome, LineSink, OutputLine, ProcessRunner, StreamKind};
use storeship_errors::{Error, ProcessError};

/// Spawns one external process at a time and supervises it to completion.
///
/// Output is never buffered to completion first: each line is handed to
/// the sink the moment it is read, while the process is still running.
/// There is no timeout: an unresponsive child blocks the calling task
/// until it exits or the cancellation token fires.
pub struct Supervisor {
    cancel: CancellationToken,
}

impl Supervisor {
    /// Supervisor without external cancellation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
        }
    }

    /// Supervisor honoring a caller-owned cancellation token: on cancel
    /// the child is killed and the run resolves `Error::Cancelled`.
    #[must_use]
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self { cancel }
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

async fn stream_lines<R>(pipe: Option<R>, stream: StreamKind, sink: &dyn LineSink)
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else { return };
    let mut lines = BufReader::new(pipe).lines();
    while let Ok(Some(text)) = lines.next_line().await {
        sink.line(OutputLine { stream, text });
    }
}

#[async_trait]
impl ProcessRunner for Supervisor {
    async fn run(&self, spec: CommandSpec, sink: &dyn LineSink) -> Result<ExitOutcome, Error> {
        let command_label = spec.display();

        let mut cmd = Command::new(spec.program());
        cmd.args(spec.get_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = spec.get_current_dir() {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|e| ProcessError::LaunchFailed {
            command: command_label.clone(),
            message: e.to_string(),
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Both pipes are drained concurrently so neither can fill up and
        // stall the child; per-stream line order is preserved.
        let drain = async {
            tokio::join!(
                stream_lines(stdout, StreamKind::Stdout, sink),
                stream_lines(stderr, StreamKind::Stderr, sink),
            );
        };

        tokio::select! {
            () = drain => {}
            () = self.cancel.cancelled() => {
                let _ = child.kill().await;
                return Err(Error::Cancelled);
            }
        }

        let status = tokio::select! {
            status = child.wait() => status?,
            () = self.cancel.cancelled() => {
                let _ = child.kill().await;
                return Err(Error::Cancelled);
            }
        };

        match status.code() {
            Some(code) => Ok(ExitOutcome { code }),
            None => Err(ProcessError::Terminated {
                command: command_label,
            }
            .into()),
        }
    }
}
