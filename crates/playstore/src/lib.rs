#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Remote edit transaction for the Android-style release platform
//!
//! Publishing a build is one strictly-ordered remote transaction:
//! begin edit, upload the bundle, assign the uploaded version to a release
//! track, commit. Step N runs only if step N-1 succeeded; any failure
//! aborts the whole sequence with no retry and no rollback. An edit
//! session left open after a mid-sequence failure is abandoned to the
//! remote system's own expiry policy.
//!
//! The remote system is reached through the [`EditTransport`] seam;
//! [`HttpEditTransport`] is the production implementation, tests use
//! mocks.

pub mod auth;
pub mod publisher;
pub mod transaction;
pub mod transport;

pub use publisher::{EditSession, PlayStorePublisher};
pub use transaction::EditTransaction;
pub use transport::{EditTransport, HttpEditTransport};
