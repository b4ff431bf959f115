pub mod remote;

use std::path::PathBuf;

use rust_embed::Embed;
use thiserror::Error;

use crate::quiz::{QuizData, QuizError};

pub use remote::{FileSource, HttpSource};

#[derive(Embed)]
#[folder = "assets/questions/"]
struct QuestionAssets;

pub const DEFAULT_BUNDLE: &str = "default";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("question server answered with HTTP {0}")]
    Status(u16),
    #[cfg(feature = "network")]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("network support is not compiled into this build")]
    NetworkDisabled,
    #[error("no bundled quiz named {0:?}")]
    MissingBundle(String),
    #[error("invalid quiz data: {0}")]
    Invalid(#[from] QuizError),
}

/// Where questions come from. Called once per load, off the UI thread.
pub trait QuestionSource: Send {
    fn fetch(&self) -> Result<QuizData, FetchError>;

    fn describe(&self) -> String;
}

/// Quiz files compiled into the binary.
pub struct BundledSource {
    name: String,
}

impl BundledSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn available() -> Vec<String> {
        QuestionAssets::iter()
            .filter_map(|f| f.strip_suffix(".json").map(|n| n.to_string()))
            .collect()
    }
}

impl QuestionSource for BundledSource {
    fn fetch(&self) -> Result<QuizData, FetchError> {
        let file = QuestionAssets::get(&format!("{}.json", self.name))
            .ok_or_else(|| FetchError::MissingBundle(self.name.clone()))?;
        let content = String::from_utf8_lossy(file.data.as_ref());
        Ok(QuizData::from_json(&content)?)
    }

    fn describe(&self) -> String {
        format!("bundled:{}", self.name)
    }
}

/// Pick a source from a config/CLI value: `bundled`, `bundled:<name>`,
/// an `http(s)://` URL, or a path to a JSON file.
pub fn resolve_source(value: &str) -> Box<dyn QuestionSource> {
    let value = value.trim();
    if value.is_empty() || value == "bundled" {
        Box::new(BundledSource::new(DEFAULT_BUNDLE))
    } else if let Some(name) = value.strip_prefix("bundled:") {
        Box::new(BundledSource::new(name))
    } else if value.starts_with("http://") || value.starts_with("https://") {
        Box::new(HttpSource::new(value))
    } else {
        Box::new(FileSource::new(PathBuf::from(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bundle_loads_and_validates() {
        let quiz = BundledSource::new(DEFAULT_BUNDLE).fetch().unwrap();
        assert!(!quiz.is_empty());
        assert!(quiz.validate().is_ok());
    }

    #[test]
    fn test_default_bundle_listed() {
        assert!(BundledSource::available().contains(&DEFAULT_BUNDLE.to_string()));
    }

    #[test]
    fn test_missing_bundle() {
        let err = BundledSource::new("nope").fetch().unwrap_err();
        assert!(matches!(err, FetchError::MissingBundle(name) if name == "nope"));
    }

    #[test]
    fn test_resolve_source() {
        assert_eq!(resolve_source("bundled").describe(), "bundled:default");
        assert_eq!(resolve_source("").describe(), "bundled:default");
        assert_eq!(resolve_source("bundled:animals").describe(), "bundled:animals");
        assert_eq!(
            resolve_source("https://example.com/q.json").describe(),
            "https://example.com/q.json"
        );
        assert_eq!(resolve_source("./quiz.json").describe(), "./quiz.json");
    }
}
