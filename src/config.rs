use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

const MIN_TIME_PER_QUESTION: u32 = 5;
const MAX_TIME_PER_QUESTION: u32 = 600;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Seconds allowed per question before it is advanced automatically.
    #[serde(default = "default_time_per_question")]
    pub time_per_question: u32,
    /// Remaining seconds at which the countdown turns to the warning colour.
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: u32,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_question_source")]
    pub question_source: String,
    #[serde(default = "default_shuffle_options")]
    pub shuffle_options: bool,
}

fn default_time_per_question() -> u32 {
    30
}
fn default_warning_threshold() -> u32 {
    5
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_question_source() -> String {
    "bundled".to_string()
}
fn default_shuffle_options() -> bool {
    false
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_per_question: default_time_per_question(),
            warning_threshold: default_warning_threshold(),
            theme: default_theme(),
            question_source: default_question_source(),
            shuffle_options: default_shuffle_options(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cloze")
            .join("config.toml")
    }

    /// Clamp values loaded from disk or the command line into usable ranges.
    pub fn validate(&mut self) {
        self.time_per_question = self
            .time_per_question
            .clamp(MIN_TIME_PER_QUESTION, MAX_TIME_PER_QUESTION);
        self.warning_threshold = self.warning_threshold.min(self.time_per_question);
        if self.question_source.trim().is_empty() {
            self.question_source = default_question_source();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.time_per_question, 30);
        assert_eq!(config.warning_threshold, 5);
        assert_eq!(config.question_source, "bundled");
        assert!(!config.shuffle_options);
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
time_per_question = 45
question_source = "https://example.com/quiz.json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.time_per_question, 45);
        assert_eq!(config.question_source, "https://example.com/quiz.json");
        assert_eq!(config.theme, "terminal-default");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.time_per_question, deserialized.time_per_question);
        assert_eq!(config.question_source, deserialized.question_source);
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config::default();
        config.time_per_question = 0;
        config.warning_threshold = 99;
        config.question_source = "  ".to_string();
        config.validate();
        assert_eq!(config.time_per_question, 5);
        assert_eq!(config.warning_threshold, 5);
        assert_eq!(config.question_source, "bundled");

        config.time_per_question = 100_000;
        config.validate();
        assert_eq!(config.time_per_question, 600);
    }
}
