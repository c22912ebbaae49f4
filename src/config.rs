// config.rs - plugin configuration and locale handling
use crate::error::BridgeError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_SIGNAL: &str = "onSpeechEvent";
pub const DEFAULT_UTTERANCE_ID: &str = "SpeechBridgeUtterance";
const FALLBACK_LOCALE: &str = "en-US";

/// Plugin configuration, read from `plugins.speech-bridge` in the host config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Name of the outbound signal.
    pub signal: String,
    pub utterance_id: String,
    /// Overrides the system default locale for recognition and synthesis.
    pub locale: Option<String>,
    pub language_model: LanguageModel,
    /// Grammar for phrase-based recognizers (SAPI).
    pub phrases: Vec<String>,
    pub listen_timeout_ms: u64,
    pub request_permission_on_init: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            signal: DEFAULT_SIGNAL.to_string(),
            utterance_id: DEFAULT_UTTERANCE_ID.to_string(),
            locale: None,
            language_model: LanguageModel::FreeForm,
            phrases: ["yes", "no", "start", "stop", "help", "open the door"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            listen_timeout_ms: 10_000,
            request_permission_on_init: true,
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.signal.trim().is_empty() {
            return Err(BridgeError::Config("signal name cannot be empty".to_string()));
        }
        if self.utterance_id.trim().is_empty() {
            return Err(BridgeError::Config("utterance id cannot be empty".to_string()));
        }
        if self.listen_timeout_ms == 0 {
            return Err(BridgeError::Config("listen timeout must be positive".to_string()));
        }
        Ok(())
    }

    /// Configured locale, or the system default when none is set.
    pub fn locale(&self) -> Locale {
        match self.locale.as_deref().and_then(Locale::parse) {
            Some(locale) => locale,
            None => Locale::system_default(),
        }
    }

    pub fn listen_timeout(&self) -> Duration {
        Duration::from_millis(self.listen_timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageModel {
    FreeForm,
    WebSearch,
}

/// BCP 47 style language tag, e.g. `en-US`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(String);

impl Locale {
    /// Accepts `en-US`, `en_US`, or POSIX forms such as `en_US.UTF-8@euro`.
    /// Returns `None` for empty values and the `C`/`POSIX` locales.
    pub fn parse(raw: &str) -> Option<Self> {
        let tag = raw
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .trim()
            .replace('_', "-");
        if tag.is_empty() || tag == "C" || tag == "POSIX" {
            return None;
        }
        Some(Locale(tag))
    }

    pub fn system_default() -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find_map(|value| Locale::parse(&value))
            .unwrap_or_else(|| Locale(FALLBACK_LOCALE.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
