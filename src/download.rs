use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::trace;
use tempfile::Builder;
use ureq::{Agent, AgentBuilder};

use crate::error::SubFetchError;
use crate::search::search_opensubtitles::describe;

/// Extension given to every downloaded subtitle.
pub const SUBTITLE_EXTENSION: &str = "srt";

/// Writes the content behind a URL to a file.
pub trait FileFetcher {
    fn fetch(&self, url: &str, directory: &Path, file_name: &str) -> Result<PathBuf, SubFetchError>;
}

/// Downloads over HTTP.
pub struct HttpFetcher {
    agent: Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            agent: AgentBuilder::new().timeout(Duration::from_secs(60)).build(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FileFetcher for HttpFetcher {
    fn fetch(&self, url: &str, directory: &Path, file_name: &str) -> Result<PathBuf, SubFetchError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| SubFetchError::Download(describe(e)))?;

        write_file(&mut response.into_reader(), directory, file_name)
    }
}

/// Streams `reader` into `directory/file_name`.
///
/// The content goes to a hidden temporary file first and is only renamed
/// into place once complete, so an interrupted transfer never leaves a
/// truncated subtitle behind.
pub fn write_file(
    reader: &mut dyn Read,
    directory: &Path,
    file_name: &str,
) -> Result<PathBuf, SubFetchError> {
    let mut partial = Builder::new()
        .prefix(".subfetch-")
        .suffix(".part")
        .tempfile_in(directory)
        .map_err(|e| SubFetchError::Download(format!("{}: {}", directory.display(), e)))?;

    let written = io::copy(reader, partial.as_file_mut())
        .map_err(|e| SubFetchError::Download(e.to_string()))?;

    let destination = directory.join(file_name);
    partial
        .persist(&destination)
        .map_err(|e| SubFetchError::Download(format!("{}: {}", destination.display(), e)))?;

    trace!("Wrote {} bytes to {:?}", written, destination);
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    /// Yields some bytes, then fails like a dropped connection.
    struct BrokenStream {
        sent: bool,
    }

    impl Read for BrokenStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"));
            }
            self.sent = true;
            let chunk = b"1\n00:00:01,000 --> 00:00:02,000\nHel";
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn complete_transfer_lands_under_final_name() {
        let dir = TempDir::new().unwrap();
        let mut body: &[u8] = b"1\n00:00:01,000 --> 00:00:02,000\nHello\n";

        let path = write_file(&mut body, dir.path(), "Movie.en.srt").unwrap();

        assert_eq!(path, dir.path().join("Movie.en.srt"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "1\n00:00:01,000 --> 00:00:02,000\nHello\n"
        );
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn interrupted_transfer_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let mut stream = BrokenStream { sent: false };

        let err = write_file(&mut stream, dir.path(), "Movie.en.srt").unwrap_err();

        assert_eq!(err.kind(), "download");
        assert!(!dir.path().join("Movie.en.srt").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_directory_is_a_download_error() {
        let dir = TempDir::new().unwrap();
        let mut body: &[u8] = b"x";

        let err = write_file(&mut body, &dir.path().join("gone"), "Movie.en.srt").unwrap_err();
        assert_eq!(err.kind(), "download");
    }
}
