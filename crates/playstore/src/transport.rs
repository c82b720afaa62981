//! The seam between the transaction and the remote system

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tokio_util::io::ReaderStream;

use crate::auth;
use storeship_errors::{Error, RemoteError};
use storeship_types::{ServiceAccountKey, TrackReleaseBody};

/// The four remote calls that make up one edit transaction.
///
/// Implementations carry the authenticated channel; they hold no
/// transaction state, so edit ids are always passed in by the caller.
#[async_trait]
pub trait EditTransport: Send + Sync {
    /// Open a new edit session, returning its opaque id.
    async fn insert_edit(&self, package_name: &str) -> Result<String, Error>;

    /// Upload the build artifact into the edit, returning the version
    /// code the remote system assigned to it.
    async fn upload_bundle(
        &self,
        package_name: &str,
        edit_id: &str,
        artifact: &Path,
    ) -> Result<i64, Error>;

    /// Assign the uploaded version to a release track.
    async fn update_track(
        &self,
        package_name: &str,
        edit_id: &str,
        body: &TrackReleaseBody,
    ) -> Result<(), Error>;

    /// Make the edit durable. Atomic from the remote system's view.
    async fn commit_edit(&self, package_name: &str, edit_id: &str) -> Result<(), Error>;
}

#[derive(Debug, Deserialize)]
struct EditResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleResponse {
    version_code: i64,
}

/// Production transport over HTTP.
///
/// The bearer token is acquired lazily on the first call, so a credential
/// rejection surfaces exactly where the transaction begins. No retries,
/// no overall request timeout: a failed call fails the submission and an
/// unresponsive remote blocks the task until cancellation.
pub struct HttpEditTransport {
    client: reqwest::Client,
    api_base: String,
    upload_base: String,
    credentials: Option<ServiceAccountKey>,
    token: OnceCell<String>,
}

impl HttpEditTransport {
    /// Transport that authenticates with the supplied service account.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        api_base: impl Into<String>,
        upload_base: impl Into<String>,
        credentials: ServiceAccountKey,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            upload_base: upload_base.into(),
            credentials: Some(credentials),
            token: OnceCell::new(),
        }
    }

    /// Transport with a pre-issued access token. Used when token
    /// management happens elsewhere (and by the transport tests).
    #[must_use]
    pub fn with_access_token(
        client: reqwest::Client,
        api_base: impl Into<String>,
        upload_base: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            upload_base: upload_base.into(),
            credentials: None,
            token: OnceCell::new_with(Some(token.into())),
        }
    }

    async fn bearer_token(&self) -> Result<&str, Error> {
        self.token
            .get_or_try_init(|| async {
                match &self.credentials {
                    Some(key) => auth::fetch_access_token(&self.client, key).await,
                    None => Err(RemoteError::AuthenticationFailed {
                        message: "no credentials supplied".to_string(),
                    }
                    .into()),
                }
            })
            .await
            .map(String::as_str)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(RemoteError::AuthenticationFailed {
                message: format!("{status}: {message}"),
            }
            .into())
        } else {
            Err(RemoteError::HttpError {
                status: status.as_u16(),
                message,
            }
            .into())
        }
    }
}

fn request_failed(err: &reqwest::Error) -> Error {
    RemoteError::RequestFailed {
        message: err.to_string(),
    }
    .into()
}

fn malformed(err: &reqwest::Error) -> Error {
    RemoteError::MalformedResponse {
        message: err.to_string(),
    }
    .into()
}

#[async_trait]
impl EditTransport for HttpEditTransport {
    async fn insert_edit(&self, package_name: &str) -> Result<String, Error> {
        let token = self.bearer_token().await?;
        let url = format!("{}/applications/{package_name}/edits", self.api_base);

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| request_failed(&e))?;
        let response = Self::check_status(response).await?;

        let edit: EditResponse = response.json().await.map_err(|e| malformed(&e))?;
        Ok(edit.id)
    }

    async fn upload_bundle(
        &self,
        package_name: &str,
        edit_id: &str,
        artifact: &Path,
    ) -> Result<i64, Error> {
        let token = self.bearer_token().await?;
        let url = format!(
            "{}/applications/{package_name}/edits/{edit_id}/bundles?uploadType=media",
            self.upload_base
        );

        let file = tokio::fs::File::open(artifact)
            .await
            .map_err(|e| Error::io_with_path(&e, artifact))?;
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await
            .map_err(|e| request_failed(&e))?;
        let response = Self::check_status(response).await?;

        let bundle: BundleResponse = response.json().await.map_err(|e| malformed(&e))?;
        Ok(bundle.version_code)
    }

    async fn update_track(
        &self,
        package_name: &str,
        edit_id: &str,
        body: &TrackReleaseBody,
    ) -> Result<(), Error> {
        let token = self.bearer_token().await?;
        let url = format!(
            "{}/applications/{package_name}/edits/{edit_id}/tracks/{}",
            self.api_base, body.track
        );

        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| request_failed(&e))?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn commit_edit(&self, package_name: &str, edit_id: &str) -> Result<(), Error> {
        let token = self.bearer_token().await?;
        let url = format!(
            "{}/applications/{package_name}/edits/{edit_id}:commit",
            self.api_base
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| request_failed(&e))?;
        Self::check_status(response).await?;
        Ok(())
    }
}
