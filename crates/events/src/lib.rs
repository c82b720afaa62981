#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in storeship
//!
//! All user-visible progress goes through this crate: components emit
//! [`LogEvent`] records through the [`LogSink`] capability, and the
//! [`LogHub`] fans each record out to every currently-connected subscriber.
//! Delivery is at-most-once and best-effort: no retry, no durability, and
//! no replay for late joiners.
//!
//! The hub is an injected value, not process-wide state: whoever owns the
//! application wiring builds one hub, activates it, and hands clones to the
//! components that emit. Emitting through a hub that was never activated
//! fails with `ConfigError::HubNotActive` rather than silently dropping the
//! event; callers that consider logging non-essential use the swallow-errors
//! [`LogSink::notify`] helpers so a missing transport never changes the
//! outcome of the operation being described.

pub mod event;
pub mod hub;

pub use event::{EventLevel, EventSource, LogEvent};
pub use hub::{LogHub, LogSubscriber};

use storeship_errors::Error;

/// Default broadcast buffer capacity used when none is configured.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// The one-method logging capability injected into orchestration code.
///
/// Object-safe on purpose: adapters hold an `Arc<dyn LogSink>` so tests can
/// substitute a recording sink without any transport.
pub trait LogSink: Send + Sync {
    /// Deliver one event to whatever transport backs this sink.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HubNotActive` when the backing hub has no
    /// transport attached yet.
    fn emit(&self, event: LogEvent) -> Result<(), Error>;

    /// Best-effort emission. Failures are swallowed: log delivery must
    /// never change the outcome of the operation it describes.
    fn notify(&self, event: LogEvent) {
        let _ = self.emit(event);
    }

    /// Emit an info-level event, best effort.
    fn notify_info(&self, source: EventSource, message: String) {
        self.notify(LogEvent::info(source, message));
    }

    /// Emit an error-level event, best effort.
    fn notify_error(&self, source: EventSource, message: String) {
        self.notify(LogEvent::error(source, message));
    }
}
