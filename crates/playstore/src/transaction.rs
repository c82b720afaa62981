//! The ordered edit transaction

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::transport::EditTransport;
use storeship_errors::Error;
use storeship_events::{EventSource, LogSink};
use storeship_types::{TrackRelease, TrackReleaseBody};

/// Drives the four remote calls of one edit transaction.
///
/// Holds no cross-call state: the caller threads the edit id and version
/// code between steps. Each step emits one start event and one outcome
/// event; emission failures never affect the step's result.
///
/// The cancellation token is checked before every step, so an abort
/// between steps never reaches the remote system. A call already in
/// flight is waited out.
pub struct EditTransaction {
    transport: Arc<dyn EditTransport>,
    sink: Arc<dyn LogSink>,
    cancel: CancellationToken,
}

impl EditTransaction {
    #[must_use]
    pub fn new(transport: Arc<dyn EditTransport>, sink: Arc<dyn LogSink>) -> Self {
        Self::with_cancellation(transport, sink, CancellationToken::new())
    }

    #[must_use]
    pub fn with_cancellation(
        transport: Arc<dyn EditTransport>,
        sink: Arc<dyn LogSink>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            transport,
            sink,
            cancel,
        }
    }

    fn ensure_live(&self) -> Result<(), Error> {
        if self.cancel.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    fn info(&self, message: String) {
        self.sink.notify_info(EventSource::PLAYSTORE, message);
    }

    fn fail(&self, message: String) {
        self.sink.notify_error(EventSource::PLAYSTORE, message);
    }

    /// Step 1: open a new edit session.
    ///
    /// # Errors
    ///
    /// `AuthenticationFailed` when the remote system rejects the supplied
    /// identity, any other remote failure otherwise.
    pub async fn begin_edit(&self, package_name: &str) -> Result<String, Error> {
        self.ensure_live()?;
        self.info("Creating new edit session...".to_string());
        match self.transport.insert_edit(package_name).await {
            Ok(edit_id) => {
                self.info(format!("Edit session created: {edit_id}"));
                Ok(edit_id)
            }
            Err(err) => {
                self.fail(format!("Failed to create edit session: {err}"));
                Err(err)
            }
        }
    }

    /// Step 2: upload the build artifact. Only valid with an edit id
    /// returned by [`EditTransaction::begin_edit`] in the same logical
    /// session.
    ///
    /// # Errors
    ///
    /// Any remote failure aborts the transaction.
    pub async fn upload_artifact(
        &self,
        edit_id: &str,
        package_name: &str,
        artifact: &Path,
    ) -> Result<i64, Error> {
        self.ensure_live()?;
        self.info("Uploading app bundle...".to_string());
        match self
            .transport
            .upload_bundle(package_name, edit_id, artifact)
            .await
        {
            Ok(version_code) => {
                self.info(format!("Upload successful. Version code: {version_code}"));
                Ok(version_code)
            }
            Err(err) => {
                self.fail(format!("Upload failed: {err}"));
                Err(err)
            }
        }
    }

    /// Step 3: assign the uploaded version to a release track.
    ///
    /// # Errors
    ///
    /// Any remote failure (including an invalid track name) aborts the
    /// transaction.
    pub async fn set_track_release(
        &self,
        edit_id: &str,
        package_name: &str,
        track: &str,
        version_code: i64,
        release_notes: Option<&str>,
    ) -> Result<(), Error> {
        self.ensure_live()?;
        self.info(format!("Updating track '{track}'..."));
        let body = TrackReleaseBody {
            track: track.to_string(),
            releases: vec![TrackRelease::completed(version_code, release_notes)],
        };
        match self
            .transport
            .update_track(package_name, edit_id, &body)
            .await
        {
            Ok(()) => {
                self.info(format!("Track '{track}' set to version {version_code}"));
                Ok(())
            }
            Err(err) => {
                self.fail(format!("Track update failed: {err}"));
                Err(err)
            }
        }
    }

    /// Step 4: commit. Never reached unless steps 1-3 all succeeded.
    ///
    /// # Errors
    ///
    /// Any remote failure (e.g. a racing commit) aborts the transaction;
    /// the edit is left for the remote system's expiry policy.
    pub async fn commit(&self, edit_id: &str, package_name: &str) -> Result<(), Error> {
        self.ensure_live()?;
        self.info("Committing edit...".to_string());
        match self.transport.commit_edit(package_name, edit_id).await {
            Ok(()) => {
                self.info(format!("Edit committed: {edit_id}"));
                Ok(())
            }
            Err(err) => {
                self.fail(format!("Commit failed: {err}"));
                Err(err)
            }
        }
    }
}
