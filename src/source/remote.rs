use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::quiz::QuizData;
use crate::source::{FetchError, QuestionSource};

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl QuestionSource for FileSource {
    fn fetch(&self) -> Result<QuizData, FetchError> {
        debug!(path = %self.path.display(), "reading quiz file");
        let content = fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(QuizData::from_json(&content)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }
}

impl QuestionSource for HttpSource {
    fn fetch(&self) -> Result<QuizData, FetchError> {
        debug!(url = %self.url, "fetching quiz");
        let body = fetch_url(&self.url)?;
        Ok(QuizData::from_json(&body)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(feature = "network")]
fn fetch_url(url: &str) -> Result<String, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;
    let response = client.get(url).send()?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }
    Ok(response.text()?)
}

#[cfg(not(feature = "network"))]
fn fetch_url(_url: &str) -> Result<String, FetchError> {
    Err(FetchError::NetworkDisabled)
}
