//! Service-account authentication against the remote token endpoint
//!
//! The remote API authenticates with an OAuth2 bearer token obtained by
//! exchanging a signed RS256 assertion. Credential rejection here is an
//! `AuthenticationFailed`, which callers observe on the first transaction
//! step.

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use storeship_errors::{Error, RemoteError};
use storeship_types::ServiceAccountKey;

const PUBLISHER_SCOPE: &str = "https://www.googleapis.com/auth/androidpublisher";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Sign the assertion and exchange it for an access token.
///
/// # Errors
///
/// `AuthenticationFailed` when the key material is unusable or the token
/// endpoint rejects the assertion; `RequestFailed`/`MalformedResponse`
/// for transport-class problems.
pub async fn fetch_access_token(
    client: &reqwest::Client,
    key: &ServiceAccountKey,
) -> Result<String, Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        iss: &key.client_email,
        scope: PUBLISHER_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };

    let signer = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
        RemoteError::AuthenticationFailed {
            message: format!("unusable private key: {e}"),
        }
    })?;
    let assertion =
        encode(&Header::new(Algorithm::RS256), &claims, &signer).map_err(|e| {
            RemoteError::AuthenticationFailed {
                message: format!("failed to sign assertion: {e}"),
            }
        })?;

    let response = client
        .post(&key.token_uri)
        .form(&[
            ("grant_type", JWT_BEARER_GRANT),
            ("assertion", assertion.as_str()),
        ])
        .send()
        .await
        .map_err(|e| RemoteError::RequestFailed {
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RemoteError::AuthenticationFailed {
            message: format!("token endpoint returned {status}: {body}"),
        }
        .into());
    }

    let token: TokenResponse =
        response
            .json()
            .await
            .map_err(|e| RemoteError::MalformedResponse {
                message: e.to_string(),
            })?;
    Ok(token.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_with(private_key: &str) -> ServiceAccountKey {
        serde_json::from_str(&format!(
            r#"{{"client_email": "ci@example.com", "private_key": {}}}"#,
            serde_json::to_string(private_key).unwrap()
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn garbage_key_material_fails_before_any_request() {
        let client = reqwest::Client::new();
        let key = key_with("not a pem at all");

        let err = fetch_access_token(&client, &key).await.unwrap_err();

        assert!(err.is_authentication());
    }
}
