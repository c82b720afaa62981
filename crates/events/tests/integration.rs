//! Integration tests for the event hub

use storeship_errors::{ConfigError, Error};
use storeship_events::{EventLevel, EventSource, LogEvent, LogHub, LogSink};

#[test]
fn emit_before_activation_fails_loudly() {
    let hub = LogHub::new();
    let err = hub
        .emit(LogEvent::info(EventSource::OPS, "too early"))
        .unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::HubNotActive)));
}

#[test]
fn subscribe_before_activation_fails() {
    let hub = LogHub::new();
    assert!(hub.subscribe().is_err());
}

#[test]
fn notify_swallows_inactive_hub() {
    let hub = LogHub::new();
    // Must not panic or surface the failure.
    hub.notify(LogEvent::warning(EventSource::OPS, "dropped"));
    assert!(!hub.is_active());
}

#[tokio::test]
async fn all_subscribers_observe_same_order() {
    let hub = LogHub::active(16);
    let mut first = hub.subscribe().unwrap();
    let mut second = hub.subscribe().unwrap();

    for n in 0..3 {
        hub.emit(LogEvent::info(EventSource::PLAYSTORE, format!("step {n}")))
            .unwrap();
    }

    for subscriber in [&mut first, &mut second] {
        for n in 0..3 {
            let event = subscriber.recv().await.unwrap();
            assert_eq!(event.message, format!("step {n}"));
        }
    }
}

#[tokio::test]
async fn late_joiner_sees_only_later_events() {
    let hub = LogHub::active(16);
    let mut early = hub.subscribe().unwrap();

    hub.emit(LogEvent::info(EventSource::OPS, "before")).unwrap();

    let mut late = hub.subscribe().unwrap();
    hub.emit(LogEvent::info(EventSource::OPS, "after")).unwrap();

    assert_eq!(early.recv().await.unwrap().message, "before");
    assert_eq!(early.recv().await.unwrap().message, "after");
    assert_eq!(late.recv().await.unwrap().message, "after");
}

#[tokio::test]
async fn emit_without_subscribers_is_best_effort() {
    let hub = LogHub::active(4);
    // No subscriber connected; emission still succeeds.
    hub.emit(LogEvent::info(EventSource::APPSTORE, "nobody listening"))
        .unwrap();
}

#[test]
fn event_serializes_with_camel_case_fields() {
    let event = LogEvent::new(EventLevel::Error, EventSource::ALTOOL, "boom");
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["message"], "boom");
    assert_eq!(json["source"], "altool");
    assert_eq!(json["level"], "error");
    assert!(json.get("timestamp").is_some());
    assert!(json.get("eventId").is_some());
}
