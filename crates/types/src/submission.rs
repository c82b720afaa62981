//! Submission request and result types

use crate::credentials::{AppStoreKey, ServiceAccountKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use storeship_errors::SubmitError;

/// Target release platform tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Android => write!(f, "android"),
            Self::Ios => write!(f, "ios"),
        }
    }
}

impl FromStr for Platform {
    type Err = SubmitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            other => Err(SubmitError::UnknownPlatform {
                name: other.to_string(),
            }),
        }
    }
}

/// Remote-transaction submission request (Android path).
#[derive(Debug, Clone)]
pub struct PlayStoreRequest {
    pub package_name: String,
    pub track: String,
    pub artifact_path: PathBuf,
    pub credentials: ServiceAccountKey,
    pub release_notes: Option<String>,
}

/// Local-tool submission request (iOS path).
#[derive(Debug, Clone)]
pub struct AppStoreRequest {
    pub artifact_path: PathBuf,
    pub credentials: AppStoreKey,
}

/// A submission request, immutable once constructed.
#[derive(Debug, Clone)]
pub enum SubmissionRequest {
    PlayStore(PlayStoreRequest),
    AppStore(AppStoreRequest),
}

impl SubmissionRequest {
    #[must_use]
    pub fn platform(&self) -> Platform {
        match self {
            Self::PlayStore(_) => Platform::Android,
            Self::AppStore(_) => Platform::Ios,
        }
    }

    #[must_use]
    pub fn artifact_path(&self) -> &std::path::Path {
        match self {
            Self::PlayStore(req) => &req.artifact_path,
            Self::AppStore(req) => &req.artifact_path,
        }
    }
}

/// One localized text entry inside a track release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalizedText {
    pub language: String,
    pub text: String,
}

/// A single release entry inside the track update wire body.
///
/// Version codes are serialized as strings and the status is always
/// `completed`, the remote API's convention for a full (non-staged)
/// rollout of the uploaded build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRelease {
    pub version_codes: Vec<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<Vec<LocalizedText>>,
}

impl TrackRelease {
    /// Build a completed release for one uploaded version code, with
    /// optional `en-US` release notes.
    #[must_use]
    pub fn completed(version_code: i64, release_notes: Option<&str>) -> Self {
        Self {
            version_codes: vec![version_code.to_string()],
            status: "completed".to_string(),
            release_notes: release_notes.map(|text| {
                vec![LocalizedText {
                    language: "en-US".to_string(),
                    text: text.to_string(),
                }]
            }),
        }
    }
}

/// Wire body for the track update call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackReleaseBody {
    pub track: String,
    pub releases: Vec<TrackRelease>,
}

/// Terminal outcome of one submission, tagged by platform.
///
/// The local upload tool returns no structured payload, so the App Store
/// variant carries only the success flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "snake_case")]
pub enum SubmissionResult {
    PlayStore {
        success: bool,
        version_code: i64,
        track: String,
    },
    AppStore {
        success: bool,
    },
}

impl SubmissionResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::PlayStore { success, .. } | Self::AppStore { success } => *success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_case_insensitively() {
        assert_eq!("Android".parse::<Platform>().unwrap(), Platform::Android);
        assert_eq!("ios".parse::<Platform>().unwrap(), Platform::Ios);
        assert!("windows".parse::<Platform>().is_err());
    }

    #[test]
    fn track_release_serializes_version_codes_as_strings() {
        let body = TrackReleaseBody {
            track: "internal".to_string(),
            releases: vec![TrackRelease::completed(42, Some("Bug fixes"))],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["track"], "internal");
        assert_eq!(json["releases"][0]["versionCodes"][0], "42");
        assert_eq!(json["releases"][0]["status"], "completed");
        assert_eq!(json["releases"][0]["releaseNotes"][0]["language"], "en-US");
    }

    #[test]
    fn release_notes_omitted_when_absent() {
        let release = TrackRelease::completed(7, None);
        let json = serde_json::to_value(&release).unwrap();
        assert!(json.get("releaseNotes").is_none());
    }
}
