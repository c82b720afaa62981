//! The event record and its metadata

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::Level;
use uuid::Uuid;

/// One progress record, created at the moment of emission.
///
/// Events have no retention: once broadcast they are not stored anywhere.
/// `message` carries the human-readable text verbatim; provenance lives in
/// `source` so relayed external-tool output stays untouched.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    /// Unique identifier for this specific event.
    pub event_id: Uuid,
    /// Timestamp captured at emission time.
    pub timestamp: DateTime<Utc>,
    /// Severity used for routing to logging systems.
    pub level: EventLevel,
    /// Component (or external tool) that originated the event.
    pub source: EventSource,
    /// Human-readable message text.
    pub message: String,
}

impl LogEvent {
    /// Create a new event stamped with the current time.
    #[must_use]
    pub fn new(level: EventLevel, source: EventSource, message: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            level,
            source,
            message: message.into(),
        }
    }

    /// Create an info-level event.
    #[must_use]
    pub fn info(source: EventSource, message: impl Into<String>) -> Self {
        Self::new(EventLevel::Info, source, message)
    }

    /// Create a warn-level event.
    #[must_use]
    pub fn warning(source: EventSource, message: impl Into<String>) -> Self {
        Self::new(EventLevel::Warn, source, message)
    }

    /// Create an error-level event.
    #[must_use]
    pub fn error(source: EventSource, message: impl Into<String>) -> Self {
        Self::new(EventLevel::Error, source, message)
    }

    /// Convert the event level into a tracing level for downstream logging.
    #[must_use]
    pub fn tracing_level(&self) -> Level {
        self.level.into()
    }
}

/// Lightweight severity levels used by the event system.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<EventLevel> for Level {
    fn from(level: EventLevel) -> Self {
        match level {
            EventLevel::Debug => Level::DEBUG,
            EventLevel::Info => Level::INFO,
            EventLevel::Warn => Level::WARN,
            EventLevel::Error => Level::ERROR,
        }
    }
}

/// Component/tool that originated the event.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub struct EventSource(Cow<'static, str>);

impl EventSource {
    pub const OPS: Self = Self::const_str("ops");
    pub const PLAYSTORE: Self = Self::const_str("playstore");
    pub const APPSTORE: Self = Self::const_str("appstore");
    pub const PROCESS: Self = Self::const_str("process");
    /// Output relayed from the external upload tool.
    pub const ALTOOL: Self = Self::const_str("altool");

    const fn const_str(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    /// Create a source value from any stringy input.
    #[must_use]
    pub fn from_dynamic(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    /// Borrow the underlying identifier used for logging/telemetry.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for EventSource {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}
