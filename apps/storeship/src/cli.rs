//! Command line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// storeship - automated mobile app store submissions
#[derive(Parser)]
#[command(name = "storeship")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Automated mobile app store submissions")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format (result and one event per line)
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit an Android app bundle to a release track
    Android {
        /// Application package name (e.g. com.example.app)
        #[arg(short = 'p', long, value_name = "PACKAGE")]
        package_name: String,

        /// Path to the built .aab artifact
        #[arg(short = 'f', long, value_name = "PATH")]
        artifact: PathBuf,

        /// Path to the service-account JSON credential file
        #[arg(short = 'k', long, value_name = "PATH")]
        key: PathBuf,

        /// Release track (internal, alpha, beta, production);
        /// defaults to the configured track
        #[arg(short = 't', long, value_name = "TRACK")]
        track: Option<String>,

        /// Release notes attached to the rollout
        #[arg(short = 'c', long, value_name = "TEXT")]
        release_notes: Option<String>,
    },

    /// Upload an iOS build through the local upload tool
    Ios {
        /// Path to the built .ipa artifact
        #[arg(short = 'f', long, value_name = "PATH")]
        artifact: PathBuf,

        /// API key issuer identifier
        #[arg(long, value_name = "ID")]
        issuer_id: String,

        /// API key identifier
        #[arg(long, value_name = "ID")]
        key_id: String,

        /// Path to the private key .p8 file
        #[arg(short = 'k', long, value_name = "PATH")]
        key: PathBuf,
    },
}
