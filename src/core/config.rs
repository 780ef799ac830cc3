use crate::core::LLMError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

include!(concat!(env!("OUT_DIR"), "/config_embedded.rs"));

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub model: String,
    pub max_tokens: u32,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub base_url: String,
    #[serde(default = "default_true")]
    pub stream: bool,
    #[serde(default)]
    pub show_thinking: bool,
    pub system_prompt: Option<String>,
    pub temperature: Option<f32>,
    pub top_k: Option<i32>,
    pub top_p: Option<f32>,
    pub stop_sequences: Option<Vec<String>>,
    /// Enables reasoning mode with this token budget
    pub thinking_budget: Option<u32>,
}

const fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("Invalid default config")
    }
}

impl Config {
    /// Loads `config.toml` from the working directory, falling back to the embedded default.
    pub fn load() -> Result<Self, LLMError> {
        let config_path = Path::new(CONFIG_FILE);
        if config_path.exists() {
            Self::load_from(config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, LLMError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| LLMError::ConfigError(format!("Failed to read config file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| LLMError::ConfigError(format!("Failed to parse config file: {e}")))
    }

    /// Resolves the API key: an explicit key wins, then `.env`, then the process environment.
    pub fn resolve_api_key(&self, explicit: Option<String>) -> Result<String, LLMError> {
        resolve_api_key_with(explicit, &self.api_key_env, |name| {
            dotenv::var(name).or_else(|_| std::env::var(name)).ok()
        })
    }
}

pub(crate) fn resolve_api_key_with<F>(
    explicit: Option<String>,
    var_name: &str,
    lookup: F,
) -> Result<String, LLMError>
where
    F: FnOnce(&str) -> Option<String>,
{
    explicit
        .filter(|key| !key.trim().is_empty())
        .or_else(|| lookup(var_name).filter(|key| !key.trim().is_empty()))
        .ok_or_else(|| {
            LLMError::ConfigError(format!(
                "No API key given and {var_name} is not set in .env or environment"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_parses() {
        let config = Config::default();
        assert!(!config.model.is_empty());
        assert!(config.max_tokens > 0);
        assert_eq!(config.api_key_env, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
model = "claude-2.1"
max_tokens = 300
api_key_env = "MY_KEY"
base_url = "http://localhost:9999"
thinking_budget = 1024
stop_sequences = ["END"]
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.model, "claude-2.1");
        assert_eq!(config.max_tokens, 300);
        assert_eq!(config.thinking_budget, Some(1024));
        assert_eq!(config.stop_sequences, Some(vec!["END".to_string()]));
        assert!(config.stream);
        assert!(!config.show_thinking);
        assert_eq!(config.temperature, None);
    }

    #[test]
    fn test_load_from_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = 12").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_explicit_key_takes_precedence() {
        let key = resolve_api_key_with(Some("explicit".into()), "VAR", |_| Some("env".into()));
        assert_eq!(key.unwrap(), "explicit");
    }

    #[test]
    fn test_key_falls_back_to_environment() {
        let key = resolve_api_key_with(None, "VAR", |name| {
            assert_eq!(name, "VAR");
            Some("env".into())
        });
        assert_eq!(key.unwrap(), "env");

        let key = resolve_api_key_with(Some("  ".into()), "VAR", |_| Some("env".into()));
        assert_eq!(key.unwrap(), "env");
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let err = resolve_api_key_with(None, "VAR", |_| None).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("VAR"));
    }
}
