//! Environment and credential helpers

use std::path::PathBuf;
use tracing::{debug, warn};

/// Number of leading characters shown when a secret is printed
const VISIBLE_SECRET_CHARS: usize = 10;

/// Outcome of looking for a `.env` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotenvStatus {
    Loaded(PathBuf),
    NotFound,
    Unreadable(String),
}

impl DotenvStatus {
    fn from_result(result: dotenvy::Result<PathBuf>) -> Self {
        match result {
            Ok(path) => Self::Loaded(path),
            Err(e) if e.not_found() => Self::NotFound,
            Err(e) => Self::Unreadable(e.to_string()),
        }
    }

    /// Report the outcome
    ///
    /// `.env` is read before tracing is set up so that it can carry
    /// `RUST_LOG`; call this once the subscriber is installed.
    pub fn log(&self) {
        match self {
            Self::Loaded(path) => debug!("Loaded environment from {}", path.display()),
            Self::NotFound => debug!("No .env file found"),
            Self::Unreadable(e) => warn!("Ignoring unreadable .env file: {e}"),
        }
    }
}

/// Load variables from a `.env` file in the working directory, if present
///
/// Variables already set in the process environment win.
pub fn load_dotenv() -> DotenvStatus {
    DotenvStatus::from_result(dotenvy::dotenv())
}

/// Read an environment variable, treating blank values as unset
pub fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Render a secret for logs: the first ten characters followed by a mask
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(VISIBLE_SECRET_CHARS).collect();
    format!("{visible}********")
}
