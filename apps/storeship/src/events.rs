//! Live event rendering and tracing integration

use storeship_events::{EventLevel, LogEvent, LogSubscriber};
use tracing::{debug, error, info, warn};

/// Mirror an event into the tracing infrastructure at its own level.
pub fn log_event_with_tracing(event: &LogEvent) {
    let source = event.source.as_str();
    match event.level {
        EventLevel::Debug => debug!(source = source, "{}", event.message),
        EventLevel::Info => info!(source = source, "{}", event.message),
        EventLevel::Warn => warn!(source = source, "{}", event.message),
        EventLevel::Error => error!(source = source, "{}", event.message),
    }
}

/// Renders the live log stream until the hub goes away.
pub struct EventRenderer {
    json: bool,
}

impl EventRenderer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn render(&self, event: &LogEvent) {
        log_event_with_tracing(event);

        if self.json {
            if let Ok(line) = serde_json::to_string(event) {
                println!("{line}");
            }
        } else {
            println!(
                "[{}] [{}] {}",
                event.timestamp.format("%H:%M:%S%.3f"),
                event.source.as_str(),
                event.message
            );
        }
    }

    /// Consume the subscriber until the hub is dropped, rendering each
    /// event as it arrives.
    pub async fn run(self, mut subscriber: LogSubscriber) {
        while let Some(event) = subscriber.recv().await {
            self.render(&event);
        }
    }
}
