//! Environment overrides for credentials.
//!
//! Kept in its own test binary because it mutates process environment.

use note_speech::settings::{update_setting, API_KEY_ENV, VOICE_ID_ENV};
use note_speech::{EnvOverrideStore, JsonSettingsStore, SettingKey, Settings, SettingsStore};

#[tokio::test]
async fn test_env_key_is_used_but_never_written_to_settings_file() {
    std::env::set_var(API_KEY_ENV, "sk_from_env");
    std::env::remove_var(VOICE_ID_ENV);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".note-speech/data.json");
    let file = JsonSettingsStore::new(&path);
    file.save(&Settings::new("sk_stored", "")).await.unwrap();

    assert_eq!(
        Settings::new("sk_stored", "voice-0").with_env_overrides(),
        Settings::new("sk_from_env", "voice-0")
    );

    let store = EnvOverrideStore::from_env(JsonSettingsStore::new(&path));
    assert_eq!(store.overridden().collect::<Vec<_>>(), vec![SettingKey::ApiKey]);
    assert_eq!(store.load().await.unwrap(), Settings::new("sk_from_env", ""));

    let updated = update_setting(&store, SettingKey::VoiceId, "voice-3").await.unwrap();
    assert_eq!(updated, Settings::new("sk_from_env", "voice-3"));

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(!raw.contains("sk_from_env"), "{raw}");
    assert_eq!(file.load().await.unwrap(), Settings::new("sk_stored", "voice-3"));

    std::env::remove_var(API_KEY_ENV);
}
