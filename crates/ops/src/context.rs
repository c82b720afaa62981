//! Operations context for dependency injection

use reqwest::Client;
use tokio_util::sync::CancellationToken;

use storeship_config::Config;
use storeship_errors::{Error, RemoteError};
use storeship_events::LogHub;

/// Everything a submission needs, injected once at startup.
///
/// Cheap to clone: each concurrent submission gets its own copy and runs
/// as an independent task with no coordination between submissions.
#[derive(Clone)]
pub struct OpsCtx {
    /// Event hub shared by every component that emits progress
    pub hub: LogHub,
    /// HTTP client reused across submissions
    pub http: Client,
    /// System configuration
    pub config: Config,
    /// Cancellation token checked between transaction steps and honored
    /// by the process supervisor
    pub cancel: CancellationToken,
}

/// Builder for [`OpsCtx`]
#[derive(Default)]
pub struct OpsCtxBuilder {
    hub: Option<LogHub>,
    http: Option<Client>,
    config: Option<Config>,
    cancel: Option<CancellationToken>,
}

impl OpsCtxBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_hub(mut self, hub: LogHub) -> Self {
        self.hub = Some(hub);
        self
    }

    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Build the context. A hub that was not supplied starts inactive;
    /// whoever owns the wiring decides when to activate it.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let http = match self.http {
            Some(client) => client,
            // No overall request timeout: a submission in flight is only
            // ever interrupted through the cancellation token.
            None => Client::builder().build().map_err(|e| {
                Error::Remote(RemoteError::RequestFailed {
                    message: e.to_string(),
                })
            })?,
        };

        Ok(OpsCtx {
            hub: self.hub.unwrap_or_default(),
            http,
            config: self.config.unwrap_or_default(),
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}
