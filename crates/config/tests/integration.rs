//! Integration tests for config

use std::io::Write;
use std::sync::Mutex;

use storeship_config::Config;
use tempfile::NamedTempFile;

// Mutex to ensure env var tests don't run concurrently
static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

#[tokio::test]
async fn load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[playstore]
api_base_url = "http://127.0.0.1:9999/androidpublisher/v3"
default_track = "beta"

[events]
channel_capacity = 32
"#
    )
    .unwrap();

    let config = Config::load(temp_file.path()).await.unwrap();
    assert_eq!(
        config.playstore.api_base_url,
        "http://127.0.0.1:9999/androidpublisher/v3"
    );
    assert_eq!(config.playstore.default_track, "beta");
    assert_eq!(config.events.channel_capacity, 32);
    // Unset sections keep defaults.
    assert!(config.appstore.key_dir.is_none());
}

#[tokio::test]
async fn env_overrides_file_values() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap();

    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "[playstore]\ndefault_track = \"beta\"").unwrap();

    std::env::set_var("STORESHIP_DEFAULT_TRACK", "production");
    std::env::set_var("STORESHIP_KEY_DIR", "/ci/keys");

    let mut config = Config::load(temp_file.path()).await.unwrap();
    config.merge_env();

    std::env::remove_var("STORESHIP_DEFAULT_TRACK");
    std::env::remove_var("STORESHIP_KEY_DIR");

    assert_eq!(config.playstore.default_track, "production");
    assert_eq!(
        config.appstore.key_dir.as_deref(),
        Some(std::path::Path::new("/ci/keys"))
    );
}

#[tokio::test]
async fn empty_env_values_are_ignored() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap();

    std::env::set_var("STORESHIP_DEFAULT_TRACK", "");

    let mut config = Config::default();
    config.merge_env();

    std::env::remove_var("STORESHIP_DEFAULT_TRACK");

    assert_eq!(config.playstore.default_track, "internal");
}
