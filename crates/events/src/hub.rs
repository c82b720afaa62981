//! The fan-out broadcast hub

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast;

use crate::{LogEvent, LogSink};
use storeship_errors::{ConfigError, Error};

/// Fan-out hub with an explicit two-phase lifecycle.
///
/// A freshly-built hub has no transport attached; emitting through it fails
/// with `ConfigError::HubNotActive`. Once [`LogHub::activate`] attaches the
/// broadcast channel, every emission is delivered to all
/// currently-connected subscribers in one global, time-ordered stream.
/// Emissions from concurrent submissions are serialized at the channel
/// boundary, which is the only cross-submission ordering guarantee.
///
/// Cloning is cheap; clones share the same channel.
#[derive(Clone, Default)]
pub struct LogHub {
    shared: Arc<RwLock<Option<broadcast::Sender<LogEvent>>>>,
}

impl LogHub {
    /// Create a hub with no transport attached yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hub that is active from the start.
    #[must_use]
    pub fn active(capacity: usize) -> Self {
        let hub = Self::new();
        hub.activate(capacity);
        hub
    }

    /// Attach the broadcast transport. Activating an already-active hub is
    /// a no-op: replacing the channel would silently detach subscribers.
    pub fn activate(&self, capacity: usize) {
        let mut guard = self
            .shared
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            let (tx, _rx) = broadcast::channel(capacity);
            *guard = Some(tx);
        }
    }

    /// Whether a transport is attached.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.shared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Connect a subscriber. A subscriber only observes events emitted
    /// after it connected; there is no replay.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HubNotActive` before [`LogHub::activate`].
    pub fn subscribe(&self) -> Result<LogSubscriber, Error> {
        let guard = self.shared.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(tx) => Ok(LogSubscriber { rx: tx.subscribe() }),
            None => Err(ConfigError::HubNotActive.into()),
        }
    }
}

impl LogSink for LogHub {
    fn emit(&self, event: LogEvent) -> Result<(), Error> {
        let guard = self.shared.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(tx) => {
                // A send error only means there are no subscribers right
                // now; delivery is best-effort so that is not a failure.
                let _ = tx.send(event);
                Ok(())
            }
            None => Err(ConfigError::HubNotActive.into()),
        }
    }
}

/// Receiving side of the hub.
pub struct LogSubscriber {
    rx: broadcast::Receiver<LogEvent>,
}

impl LogSubscriber {
    /// Receive the next event, or `None` once the hub is gone.
    ///
    /// A subscriber that falls behind the channel capacity loses the
    /// overwritten events and resumes with the oldest retained one:
    /// at-most-once delivery, never duplicated.
    pub async fn recv(&mut self) -> Option<LogEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking receive used by render loops that drain on shutdown.
    pub fn try_recv(&mut self) -> Option<LogEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(
                    broadcast::error::TryRecvError::Empty
                    | broadcast::error::TryRecvError::Closed,
                ) => return None,
            }
        }
    }
}
