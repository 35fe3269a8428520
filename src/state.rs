use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{warn, Level};

use crate::answer::{AnswerEngine, GenerationSettings};
use crate::docs::PageIndex;

/// Assistant parameters. `context_size` and `top_k` can be changed at runtime
/// with the `config` command.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    pub data_dir: PathBuf,
    pub base_url: String,
    pub model: String,
    /// Character budget for page bodies in the assembled context.
    pub context_size: usize,
    /// Ranked pages kept per question.
    pub top_k: usize,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    pub log_level: Level,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("crawled_data"),
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2:latest".to_string(),
            context_size: 8000,
            top_k: 5,
            temperature: 0.1,
            max_tokens: 2048,
            request_timeout: Duration::from_secs(300),
            log_level: Level::INFO,
        }
    }
}

impl AssistantConfig {
    /// Defaults overridden by environment variables (and `.env`, if loaded).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("ASSISTANT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("OLLAMA_BASE_URL") {
            config.base_url = url;
        }
        if let Some(model) = lookup("OLLAMA_MODEL").filter(|m| !m.is_empty()) {
            config.model = model;
        }
        parse_into(&lookup, "ASSISTANT_CONTEXT_SIZE", &mut config.context_size);
        parse_into(&lookup, "ASSISTANT_TOP_K", &mut config.top_k);
        if config.top_k == 0 {
            warn!(key = "ASSISTANT_TOP_K", "top_k must be at least 1, keeping default");
            config.top_k = Self::default().top_k;
        }
        parse_into(&lookup, "ASSISTANT_TEMPERATURE", &mut config.temperature);
        parse_into(&lookup, "ASSISTANT_MAX_TOKENS", &mut config.max_tokens);
        parse_into(&lookup, "ASSISTANT_LOG_LEVEL", &mut config.log_level);

        let mut timeout_secs = config.request_timeout.as_secs();
        parse_into(&lookup, "ASSISTANT_TIMEOUT_SECS", &mut timeout_secs);
        config.request_timeout = Duration::from_secs(timeout_secs);

        config
    }

    pub fn generation(&self) -> GenerationSettings {
        GenerationSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Change a runtime-tunable parameter. Returns an error message for the user
    /// on unknown names or invalid values.
    pub fn set(&mut self, param: &str, value: &str) -> Result<(), String> {
        let parsed = value
            .parse::<usize>()
            .map_err(|_| format!("`{}` is not a whole number", value))?;
        match param {
            "context_size" => self.context_size = parsed,
            "top_k" if parsed == 0 => return Err("`top_k` must be at least 1".to_string()),
            "top_k" => self.top_k = parsed,
            _ => {
                return Err(format!(
                    "Unknown param `{}`. Valid: `context_size`, `top_k`",
                    param
                ))
            }
        }
        Ok(())
    }
}

fn parse_into<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *slot = value,
        Err(_) => warn!(key, value = %raw, "Ignoring unparseable setting"),
    }
}

/// Everything a shell command needs.
pub struct AppState {
    pub index: Arc<PageIndex>,
    pub engine: AnswerEngine,
    pub config: AssistantConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AssistantConfig::from_lookup(lookup(&[]));
        assert_eq!(config, AssistantConfig::default());
        assert_eq!(config.context_size, 8000);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.data_dir, PathBuf::from("crawled_data"));
    }

    #[test]
    fn test_env_overrides() {
        let config = AssistantConfig::from_lookup(lookup(&[
            ("ASSISTANT_DATA_DIR", "/srv/crawl"),
            ("OLLAMA_MODEL", "mistral"),
            ("ASSISTANT_CONTEXT_SIZE", "12000"),
            ("ASSISTANT_TOP_K", " 3 "),
            ("ASSISTANT_TEMPERATURE", "0.4"),
            ("ASSISTANT_LOG_LEVEL", "debug"),
            ("ASSISTANT_TIMEOUT_SECS", "30"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/srv/crawl"));
        assert_eq!(config.model, "mistral");
        assert_eq!(config.context_size, 12000);
        assert_eq!(config.top_k, 3);
        assert!((config.temperature - 0.4).abs() < f32::EPSILON);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_bad_numbers_keep_defaults() {
        let config = AssistantConfig::from_lookup(lookup(&[
            ("ASSISTANT_CONTEXT_SIZE", "lots"),
            ("ASSISTANT_TOP_K", "-1"),
        ]));
        assert_eq!(config.context_size, 8000);
        assert_eq!(config.top_k, 5);
    }

    #[test]
    fn test_zero_top_k_keeps_default() {
        let config = AssistantConfig::from_lookup(lookup(&[("ASSISTANT_TOP_K", "0")]));
        assert_eq!(config.top_k, 5);
    }

    #[test]
    fn test_runtime_set() {
        let mut config = AssistantConfig::default();
        config.set("context_size", "4000").unwrap();
        config.set("top_k", "2").unwrap();
        assert_eq!(config.context_size, 4000);
        assert_eq!(config.top_k, 2);

        assert!(config.set("top_k", "0").is_err());
        assert!(config.set("top_k", "many").is_err());
        assert!(config.set("model", "3").unwrap_err().contains("Unknown param"));
        assert_eq!(config.top_k, 2);
    }

    #[test]
    fn test_generation_settings() {
        let settings = AssistantConfig::default().generation();
        assert_eq!(settings.model, "llama3.2:latest");
        assert_eq!(settings.max_tokens, 2048);
    }
}
