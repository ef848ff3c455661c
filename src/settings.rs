//! 设置模块：ElevenLabs 凭据的加载、合并与持久化。
//!
//! Settings and their persistence.
//!
//! Settings are a flat record of two credentials. Stores load them by merging
//! whatever was persisted over [`Settings::default`] and save the whole record
//! after every edit.

use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const API_KEY_ENV: &str = "ELEVENLABS_API_KEY";
pub const VOICE_ID_ENV: &str = "ELEVENLABS_VOICE_ID";

/// Credentials needed to call the synthesis service.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "elevenlabsApiKey", deserialize_with = "null_as_default")]
    pub api_key: String,
    #[serde(rename = "elevenlabsVoiceId", deserialize_with = "null_as_default")]
    pub voice_id: String,
}

fn null_as_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Settings {
    pub fn new(api_key: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            voice_id: voice_id.into(),
        }
    }

    /// Merge a persisted record over the defaults. `null` (nothing persisted
    /// yet) yields the defaults; absent or `null` fields keep their default;
    /// unknown fields are ignored.
    pub fn merged_over_defaults(persisted: serde_json::Value) -> Result<Self> {
        if persisted.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(persisted)?)
    }

    pub fn get(&self, key: SettingKey) -> &str {
        match key {
            SettingKey::ApiKey => &self.api_key,
            SettingKey::VoiceId => &self.voice_id,
        }
    }

    pub fn set(&mut self, key: SettingKey, value: impl Into<String>) {
        let value = value.into();
        match key {
            SettingKey::ApiKey => self.api_key = value,
            SettingKey::VoiceId => self.voice_id = value,
        }
    }

    /// Fields that are still empty.
    pub fn missing(&self) -> Vec<SettingKey> {
        SettingKey::ALL
            .into_iter()
            .filter(|key| self.get(*key).is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Fails with [`Error::Configuration`] naming every empty field.
    pub fn ensure_complete(&self) -> Result<()> {
        let missing = self.missing();
        if missing.is_empty() {
            return Ok(());
        }
        let fields = missing
            .iter()
            .map(|key| key.field_name())
            .collect::<Vec<_>>()
            .join(", ");
        Err(Error::configuration_with_context(
            "ElevenLabs API key and voice ID must both be configured",
            ErrorContext::new()
                .for_setting(fields)
                .at_stage("settings"),
        ))
    }

    /// Replace a field when `value` is present and non-empty.
    pub fn overlay(mut self, key: SettingKey, value: Option<String>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.set(key, value);
        }
        self
    }

    /// Apply `ELEVENLABS_API_KEY` / `ELEVENLABS_VOICE_ID` when set.
    pub fn with_env_overrides(self) -> Self {
        self.overlay(SettingKey::ApiKey, std::env::var(API_KEY_ENV).ok())
            .overlay(SettingKey::VoiceId, std::env::var(VOICE_ID_ENV).ok())
    }
}

fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return "<not set>".to_string();
    }
    if count <= 8 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &mask(&self.api_key))
            .field("voice_id", &self.voice_id)
            .finish()
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let voice = if self.voice_id.is_empty() {
            "<not set>"
        } else {
            self.voice_id.as_str()
        };
        writeln!(f, "{}: {}", SettingKey::ApiKey.label(), mask(&self.api_key))?;
        write!(f, "{}: {}", SettingKey::VoiceId.label(), voice)
    }
}

/// Addressable settings fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    ApiKey,
    VoiceId,
}

impl SettingKey {
    pub const ALL: [SettingKey; 2] = [SettingKey::ApiKey, SettingKey::VoiceId];

    /// Name in the persisted record.
    pub fn field_name(&self) -> &'static str {
        match self {
            SettingKey::ApiKey => "elevenlabsApiKey",
            SettingKey::VoiceId => "elevenlabsVoiceId",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SettingKey::ApiKey => "ElevenLabs API Key",
            SettingKey::VoiceId => "ElevenLabs Voice ID",
        }
    }
}

impl FromStr for SettingKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "api-key" | "api_key" | "elevenlabsApiKey" => Ok(SettingKey::ApiKey),
            "voice-id" | "voice_id" | "elevenlabsVoiceId" => Ok(SettingKey::VoiceId),
            other => Err(Error::validation_with_context(
                format!("Unknown setting '{}'", other),
                ErrorContext::new().with_details("expected one of: api-key, voice-id"),
            )),
        }
    }
}

/// Persistent storage for [`Settings`].
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<Settings>;
    async fn save(&self, settings: &Settings) -> Result<()>;
}

#[async_trait]
impl<T: SettingsStore + ?Sized> SettingsStore for Arc<T> {
    async fn load(&self) -> Result<Settings> {
        (**self).load().await
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        (**self).save(settings).await
    }
}

/// Load, change one field, save immediately.
pub async fn update_setting(
    store: &dyn SettingsStore,
    key: SettingKey,
    value: impl Into<String>,
) -> Result<Settings> {
    let mut settings = store.load().await?;
    settings.set(key, value);
    store.save(&settings).await?;
    tracing::debug!(field = key.field_name(), "setting updated");
    Ok(settings)
}

/// Wraps a store and lays fixed values over what it loads.
///
/// Overrides are never persisted: on save, a field still equal to its
/// override gets the inner store's value back before the record is written.
pub struct EnvOverrideStore<S> {
    inner: S,
    overrides: Vec<(SettingKey, String)>,
}

impl<S: SettingsStore> EnvOverrideStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            overrides: Vec::new(),
        }
    }

    /// Overrides from `ELEVENLABS_API_KEY` / `ELEVENLABS_VOICE_ID`.
    pub fn from_env(inner: S) -> Self {
        Self::new(inner)
            .with_optional(SettingKey::ApiKey, std::env::var(API_KEY_ENV).ok())
            .with_optional(SettingKey::VoiceId, std::env::var(VOICE_ID_ENV).ok())
    }

    pub fn with_override(self, key: SettingKey, value: impl Into<String>) -> Self {
        self.with_optional(key, Some(value.into()))
    }

    fn with_optional(mut self, key: SettingKey, value: Option<String>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.overrides.retain(|(k, _)| *k != key);
            self.overrides.push((key, value));
        }
        self
    }

    pub fn overridden(&self) -> impl Iterator<Item = SettingKey> + '_ {
        self.overrides.iter().map(|(key, _)| *key)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: SettingsStore> SettingsStore for EnvOverrideStore<S> {
    async fn load(&self) -> Result<Settings> {
        let stored = self.inner.load().await?;
        Ok(self
            .overrides
            .iter()
            .fold(stored, |settings, (key, value)| {
                settings.overlay(*key, Some(value.clone()))
            }))
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        let mut record = settings.clone();
        if !self.overrides.is_empty() {
            let stored = self.inner.load().await?;
            for (key, value) in &self.overrides {
                if record.get(*key) == value.as_str() {
                    record.set(*key, stored.get(*key));
                }
            }
        }
        self.inner.save(&record).await
    }
}

/// Settings persisted as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn load(&self) -> Result<Settings> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no persisted settings, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Settings::default());
        }
        let persisted: serde_json::Value = serde_json::from_str(&raw)?;
        Settings::merged_over_defaults(persisted)
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        // Write-then-rename so a crash never leaves a truncated record.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// In-memory store, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<Settings> {
        Ok(self.settings.lock().await.clone())
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        *self.settings.lock().await = settings.clone();
        Ok(())
    }
}
