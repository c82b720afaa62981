//! The Android-path adapter

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::transaction::EditTransaction;
use crate::transport::EditTransport;
use storeship_errors::Error;
use storeship_events::{EventSource, LogSink};
use storeship_types::{PlayStoreRequest, SubmissionResult};

/// Client-side view of one server-side edit session.
///
/// Created when the first step succeeds and updated in place as later
/// steps complete. Never stored anywhere: an uncommitted session simply
/// goes out of scope and expires on the remote side.
#[derive(Debug)]
pub struct EditSession {
    pub edit_id: String,
    pub package_name: String,
    pub version_code: Option<i64>,
}

/// Threads one submission request through the edit transaction.
pub struct PlayStorePublisher {
    transaction: EditTransaction,
    sink: Arc<dyn LogSink>,
}

impl PlayStorePublisher {
    #[must_use]
    pub fn new(
        transport: Arc<dyn EditTransport>,
        sink: Arc<dyn LogSink>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            transaction: EditTransaction::with_cancellation(transport, Arc::clone(&sink), cancel),
            sink,
        }
    }

    /// Run the full begin → upload → track → commit sequence.
    ///
    /// The first failing step aborts the sequence; a session opened by a
    /// completed first step is left to expire on the remote side.
    ///
    /// # Errors
    ///
    /// Propagates the failing step's error unchanged.
    pub async fn publish(&self, request: &PlayStoreRequest) -> Result<SubmissionResult, Error> {
        self.sink.notify_info(
            EventSource::PLAYSTORE,
            format!(
                "Starting submission for {} to track '{}'",
                request.package_name, request.track
            ),
        );

        let edit_id = self.transaction.begin_edit(&request.package_name).await?;
        let mut session = EditSession {
            edit_id,
            package_name: request.package_name.clone(),
            version_code: None,
        };

        let version_code = self
            .transaction
            .upload_artifact(&session.edit_id, &session.package_name, &request.artifact_path)
            .await?;
        session.version_code = Some(version_code);

        self.transaction
            .set_track_release(
                &session.edit_id,
                &session.package_name,
                &request.track,
                version_code,
                request.release_notes.as_deref(),
            )
            .await?;
        self.transaction
            .commit(&session.edit_id, &session.package_name)
            .await?;

        self.sink.notify_info(
            EventSource::PLAYSTORE,
            "Submission completed successfully".to_string(),
        );

        Ok(SubmissionResult::PlayStore {
            success: true,
            version_code,
            track: request.track.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use storeship_errors::RemoteError;
    use storeship_events::{LogEvent, LogHub};
    use storeship_types::{ServiceAccountKey, TrackReleaseBody};

    /// Records the call sequence and can be told to fail at one step.
    struct MockTransport {
        calls: Mutex<Vec<String>>,
        fail_at: Option<&'static str>,
        cancel_after_insert: Option<CancellationToken>,
    }

    impl MockTransport {
        fn ok() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at: None,
                cancel_after_insert: None,
            }
        }

        fn failing_at(step: &'static str) -> Self {
            Self {
                fail_at: Some(step),
                ..Self::ok()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, step: &str) -> Result<(), Error> {
            self.calls.lock().unwrap().push(step.to_string());
            if self.fail_at == Some(step) {
                return Err(RemoteError::HttpError {
                    status: 500,
                    message: format!("{step} rejected"),
                }
                .into());
            }
            Ok(())
        }
    }

    #[async_trait]
    impl EditTransport for MockTransport {
        async fn insert_edit(&self, _package_name: &str) -> Result<String, Error> {
            self.record("insert")?;
            if let Some(token) = &self.cancel_after_insert {
                token.cancel();
            }
            Ok("E1".to_string())
        }

        async fn upload_bundle(
            &self,
            _package_name: &str,
            edit_id: &str,
            _artifact: &Path,
        ) -> Result<i64, Error> {
            assert_eq!(edit_id, "E1");
            self.record("upload")?;
            Ok(42)
        }

        async fn update_track(
            &self,
            _package_name: &str,
            edit_id: &str,
            body: &TrackReleaseBody,
        ) -> Result<(), Error> {
            assert_eq!(edit_id, "E1");
            self.record(&format!("track:{}", body.track))
        }

        async fn commit_edit(&self, _package_name: &str, edit_id: &str) -> Result<(), Error> {
            assert_eq!(edit_id, "E1");
            self.record("commit")
        }
    }

    fn request() -> PlayStoreRequest {
        PlayStoreRequest {
            package_name: "com.app.demo".to_string(),
            track: "internal".to_string(),
            artifact_path: PathBuf::from("/tmp/app.aab"),
            credentials: test_credentials(),
            release_notes: None,
        }
    }

    fn test_credentials() -> ServiceAccountKey {
        serde_json::from_str(
            r#"{"client_email": "ci@example.com", "private_key": "unused"}"#,
        )
        .unwrap()
    }

    fn publisher(transport: Arc<MockTransport>, hub: &LogHub) -> PlayStorePublisher {
        PlayStorePublisher::new(transport, Arc::new(hub.clone()), CancellationToken::new())
    }

    #[tokio::test]
    async fn successful_submission_runs_steps_in_order_exactly_once() {
        let transport = Arc::new(MockTransport::ok());
        let hub = LogHub::active(64);

        let result = publisher(Arc::clone(&transport), &hub)
            .publish(&request())
            .await
            .unwrap();

        assert_eq!(
            transport.calls(),
            ["insert", "upload", "track:internal", "commit"]
        );
        match result {
            SubmissionResult::PlayStore {
                success,
                version_code,
                track,
            } => {
                assert!(success);
                assert_eq!(version_code, 42);
                assert_eq!(track, "internal");
            }
            SubmissionResult::AppStore { .. } => panic!("wrong platform tag"),
        }
    }

    #[tokio::test]
    async fn upload_failure_stops_before_track_and_commit() {
        let transport = Arc::new(MockTransport::failing_at("upload"));
        let hub = LogHub::active(64);

        let err = publisher(Arc::clone(&transport), &hub)
            .publish(&request())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Remote(RemoteError::HttpError { status: 500, .. })
        ));
        assert_eq!(transport.calls(), ["insert", "upload"]);
    }

    #[tokio::test]
    async fn commit_is_never_reached_when_an_earlier_step_fails() {
        for step in ["insert", "upload", "track:internal"] {
            let transport = Arc::new(MockTransport::failing_at(step));
            let hub = LogHub::active(64);

            publisher(Arc::clone(&transport), &hub)
                .publish(&request())
                .await
                .unwrap_err();

            assert!(
                !transport.calls().iter().any(|call| call == "commit"),
                "commit ran despite {step} failing"
            );
        }
    }

    #[tokio::test]
    async fn cancellation_between_steps_stops_the_sequence() {
        let token = CancellationToken::new();
        let transport = Arc::new(MockTransport {
            cancel_after_insert: Some(token.clone()),
            ..MockTransport::ok()
        });
        let hub = LogHub::active(64);
        let publisher = PlayStorePublisher::new(
            Arc::clone(&transport) as Arc<dyn EditTransport>,
            Arc::new(hub.clone()),
            token,
        );

        let err = publisher.publish(&request()).await.unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert_eq!(transport.calls(), ["insert"]);
    }

    #[tokio::test]
    async fn each_step_emits_start_and_outcome_events() {
        let transport = Arc::new(MockTransport::ok());
        let hub = LogHub::active(64);
        let mut subscriber = hub.subscribe().unwrap();

        publisher(transport, &hub).publish(&request()).await.unwrap();

        let mut messages = Vec::new();
        while let Some(LogEvent { message, .. }) = subscriber.try_recv() {
            messages.push(message);
        }

        assert_eq!(
            messages,
            [
                "Starting submission for com.app.demo to track 'internal'",
                "Creating new edit session...",
                "Edit session created: E1",
                "Uploading app bundle...",
                "Upload successful. Version code: 42",
                "Updating track 'internal'...",
                "Track 'internal' set to version 42",
                "Committing edit...",
                "Edit committed: E1",
                "Submission completed successfully",
            ]
        );
    }

    #[tokio::test]
    async fn inactive_hub_never_changes_the_outcome() {
        let transport = Arc::new(MockTransport::ok());
        let hub = LogHub::new();

        let result = publisher(Arc::clone(&transport), &hub)
            .publish(&request())
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(
            transport.calls(),
            ["insert", "upload", "track:internal", "commit"]
        );
    }
}
