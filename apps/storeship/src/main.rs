//! storeship - automated mobile app store submissions
//!
//! This is the CLI application that wires the event hub, configuration,
//! and cancellation together and submits builds through the ops crate.

mod cli;
mod error;
mod events;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use clap::Parser;
use std::process;
use storeship_config::Config;
use storeship_events::LogHub;
use storeship_ops::OpsCtxBuilder;
use storeship_types::{
    AppStoreKey, AppStoreRequest, PlayStoreRequest, ServiceAccountKey, SubmissionRequest,
    SubmissionResult,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("submission failed: {e}");
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // Configuration precedence: file, then environment, then CLI flags.
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env();

    // One hub for the whole process; activated before anything can emit.
    let hub = LogHub::active(config.events.channel_capacity);
    let subscriber = hub.subscribe()?;
    let renderer = events::EventRenderer::new(cli.global.json);
    let display = tokio::spawn(renderer.run(subscriber));

    // Ctrl-C aborts the in-flight submission through the token.
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let request = build_request(&cli.command, &config).await?;
    debug!(
        platform = %request.platform(),
        artifact = %request.artifact_path().display(),
        "submission request built"
    );

    let ctx = OpsCtxBuilder::new()
        .with_hub(hub.clone())
        .with_config(config)
        .with_cancellation(cancel)
        .build()?;

    let result = storeship_ops::submit(&ctx, request).await;

    // Dropping every hub clone closes the stream; the renderer drains
    // whatever is still buffered and then finishes.
    drop(ctx);
    drop(hub);
    let _ = display.await;

    let outcome = result?;
    render_outcome(&outcome, cli.global.json)?;
    Ok(())
}

async fn build_request(command: &Commands, config: &Config) -> Result<SubmissionRequest, CliError> {
    match command {
        Commands::Android {
            package_name,
            artifact,
            key,
            track,
            release_notes,
        } => {
            let raw = read_credential_file(key).await?;
            let credentials: ServiceAccountKey =
                serde_json::from_str(&raw).map_err(|e| CliError::CredentialFile {
                    path: key.display().to_string(),
                    message: e.to_string(),
                })?;

            Ok(SubmissionRequest::PlayStore(PlayStoreRequest {
                package_name: package_name.clone(),
                track: track
                    .clone()
                    .unwrap_or_else(|| config.playstore.default_track.clone()),
                artifact_path: artifact.clone(),
                credentials,
                release_notes: release_notes.clone(),
            }))
        }
        Commands::Ios {
            artifact,
            issuer_id,
            key_id,
            key,
        } => {
            let private_key_pem = read_credential_file(key).await?;

            Ok(SubmissionRequest::AppStore(AppStoreRequest {
                artifact_path: artifact.clone(),
                credentials: AppStoreKey {
                    issuer_id: issuer_id.clone(),
                    key_id: key_id.clone(),
                    private_key_pem,
                },
            }))
        }
    }
}

async fn read_credential_file(path: &std::path::Path) -> Result<String, CliError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CliError::CredentialFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

fn render_outcome(outcome: &SubmissionResult, json: bool) -> Result<(), CliError> {
    if json {
        let rendered =
            serde_json::to_string_pretty(outcome).map_err(storeship_errors::Error::from)?;
        println!("{rendered}");
        return Ok(());
    }

    match outcome {
        SubmissionResult::PlayStore {
            version_code,
            track,
            ..
        } => println!("Submission successful: version {version_code} on track '{track}'"),
        SubmissionResult::AppStore { .. } => println!("Upload successful"),
    }
    Ok(())
}

fn init_tracing(json_mode: bool, debug: bool) {
    // The event stream is the user-facing output; tracing stays quiet on
    // stderr unless --debug or RUST_LOG asks for more.
    let default_filter = if debug { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    if json_mode {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
