use std::fmt::{self, Display, Formatter};

use strum::IntoStaticStr;
use thiserror::Error;

/// Custom error type for early exit.
#[derive(Debug)]
pub struct SilentExit {
    pub code: u8,
}

impl Display for SilentExit {
    fn fmt(&self, _: &mut Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl std::error::Error for SilentExit {}

/// Everything that can go wrong while fetching subtitles.
///
/// Only [`SubFetchError::Auth`] stops a run; the other variants are recorded
/// in the run statistics against the item that failed.
#[derive(Debug, Error, IntoStaticStr)]
pub enum SubFetchError {
    #[error("cannot probe file: {0}")]
    #[strum(serialize = "probe")]
    Probe(String),

    #[error("search failed: {0}")]
    #[strum(serialize = "search")]
    Search(String),

    #[error("download failed: {0}")]
    #[strum(serialize = "download")]
    Download(String),

    #[error("cannot log in: {0}")]
    #[strum(serialize = "auth")]
    Auth(String),
}

impl SubFetchError {
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_the_variant() {
        assert_eq!(SubFetchError::Probe("x".into()).kind(), "probe");
        assert_eq!(SubFetchError::Download("x".into()).kind(), "download");
    }

    #[test]
    fn display_includes_cause() {
        let err = SubFetchError::Search("HTTP 503".into());
        assert_eq!(err.to_string(), "search failed: HTTP 503");
    }
}
