#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Local upload adapter for the iOS-style release platform
//!
//! The external upload tool reads its API key from a conventional
//! filesystem location and reports progress only through its output
//! stream and exit code. This crate stages the key, invokes the tool
//! through the process supervisor with its exact argument contract, and
//! relays every output line to the event hub.

pub mod staging;
pub mod upload;

pub use staging::{default_key_dir, stage_private_key, staged_key_path};
pub use upload::AppStoreUploader;
