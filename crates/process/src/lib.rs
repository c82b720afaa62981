#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Process supervision for storeship
//!
//! A pure process-lifecycle primitive: spawn an external executable,
//! deliver its output line-by-line to a caller-supplied sink as it is
//! produced, and resolve with the exit code once the process terminates.
//! This crate knows nothing about log broadcast or platform semantics.

pub mod command;
pub mod supervisor;

pub use command::CommandSpec;
pub use supervisor::Supervisor;

use async_trait::async_trait;
use storeship_errors::Error;

/// Which stream a captured line came from.
///
/// Order is preserved per stream; interleaving across the two streams is
/// not guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

/// One line of captured output, delivered as soon as it is read.
#[derive(Debug, Clone)]
pub struct OutputLine {
    pub stream: StreamKind,
    pub text: String,
}

/// Sink receiving output lines incrementally during a run.
pub trait LineSink: Send + Sync {
    fn line(&self, line: OutputLine);
}

impl<F> LineSink for F
where
    F: Fn(OutputLine) + Send + Sync,
{
    fn line(&self, line: OutputLine) {
        self(line);
    }
}

/// Terminal outcome of a supervised process.
#[derive(Debug, Clone, Copy)]
pub struct ExitOutcome {
    pub code: i32,
}

impl ExitOutcome {
    #[must_use]
    pub fn success(self) -> bool {
        self.code == 0
    }
}

/// The seam between adapters and process execution.
///
/// Production code uses [`Supervisor`]; tests substitute a fake runner to
/// script output lines and exit codes without spawning anything.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the command to completion, streaming output to `sink`.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::LaunchFailed` when the executable cannot be
    /// started at all, `ProcessError::Terminated` when the process dies
    /// without an exit code, and `Error::Cancelled` when the run is
    /// aborted through the cancellation token. A non-zero exit code is NOT
    /// an error at this layer; it is reported in the [`ExitOutcome`].
    async fn run(&self, spec: CommandSpec, sink: &dyn LineSink) -> Result<ExitOutcome, Error>;
}
