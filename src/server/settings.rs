use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

#[derive(Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServiceSettings {
    /// OpenAI-compatible chat completions endpoint.
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,

    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_base_ms: u64,
    pub temperature: f32,

    /// Serve synthetic jokes without calling the backend.
    pub stub: bool,

    pub bind_addr: String,
    pub static_dir: Option<PathBuf>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:1234/v1/chat/completions".into(),
            model: "local-model".into(),
            api_key: None,
            timeout_ms: 20_000,
            retries: 2,
            backoff_base_ms: 500,
            temperature: 0.7,
            stub: false,
            bind_addr: "0.0.0.0:3000".into(),
            static_dir: None,
        }
    }
}

// Keeps the credential out of logs.
impl fmt::Debug for ServiceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceSettings")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .field("retries", &self.retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .field("temperature", &self.temperature)
            .field("stub", &self.stub)
            .field("bind_addr", &self.bind_addr)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

impl ServiceSettings {
    /// Apply `JOKE_*` overrides from `lookup` (the process environment in production).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = text("JOKE_API_URL") {
            self.api_url = v;
        }
        if let Some(v) = text("JOKE_MODEL") {
            self.model = v;
        }
        if let Some(v) = text("JOKE_API_KEY") {
            self.api_key = Some(v);
        }
        if let Some(v) = text("JOKE_BIND") {
            self.bind_addr = v;
        }
        if let Some(v) = text("JOKE_STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(v));
        }

        parse_into(&text, "JOKE_TIMEOUT_MS", &mut self.timeout_ms);
        parse_into(&text, "JOKE_RETRIES", &mut self.retries);
        parse_into(&text, "JOKE_BACKOFF_MS", &mut self.backoff_base_ms);
        parse_into(&text, "JOKE_TEMPERATURE", &mut self.temperature);

        if let Some(v) = text("JOKE_STUB") {
            match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.stub = true,
                "0" | "false" | "no" | "off" => self.stub = false,
                _ => warn!(key = "JOKE_STUB", value = %v, "ignoring unparseable setting"),
            }
        }
    }
}

fn parse_into<T, F>(text: &F, key: &str, slot: &mut T)
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = text(key) {
        match raw.trim().parse() {
            Ok(value) => *slot = value,
            Err(_) => warn!(key, value = %raw, "ignoring unparseable setting"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_defaults() {
        let mut settings = ServiceSettings::default();
        settings.apply_env(env(&[
            ("JOKE_MODEL", "gpt-4o-mini"),
            ("JOKE_API_KEY", "sk-test"),
            ("JOKE_TIMEOUT_MS", "1500"),
            ("JOKE_RETRIES", "4"),
            ("JOKE_STUB", "true"),
        ]));

        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.api_key.as_deref(), Some("sk-test"));
        assert_eq!(settings.timeout_ms, 1500);
        assert_eq!(settings.retries, 4);
        assert!(settings.stub);
        assert_eq!(settings.backoff_base_ms, 500);
    }

    #[test]
    fn bad_values_keep_previous_setting() {
        let mut settings = ServiceSettings::default();
        settings.apply_env(env(&[("JOKE_RETRIES", "many"), ("JOKE_STUB", "maybe"), ("JOKE_MODEL", "  ")]));
        assert_eq!(settings.retries, 2);
        assert!(!settings.stub);
        assert_eq!(settings.model, "local-model");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: ServiceSettings = serde_json::from_str(r#"{"retries": 5, "stub": true}"#).unwrap();
        assert_eq!(settings.retries, 5);
        assert!(settings.stub);
        assert_eq!(settings.timeout_ms, 20_000);
    }

    #[test]
    fn debug_redacts_api_key() {
        let settings = ServiceSettings {
            api_key: Some("sk-secret".into()),
            ..ServiceSettings::default()
        };
        let printed = format!("{:?}", settings);
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
