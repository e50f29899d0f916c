use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to create directory {path:?}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Download failed: {url}: {reason}")]
    Transfer { url: String, reason: String },

    #[error("Extraction failed: {path:?}: {reason}")]
    Extraction { path: PathBuf, reason: String },
}

impl FetchError {
    pub fn transfer<S: Into<String>>(url: &str, reason: S) -> Self {
        FetchError::Transfer {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub fn extraction<S: Into<String>>(path: &std::path::Path, reason: S) -> Self {
        FetchError::Extraction {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
