pub mod result;
pub mod search_opensubtitles;

use crate::error::SubFetchError;
use crate::scoring::RemoteCandidate;

/// Remote subtitle database.
pub trait SubtitleService {
    /// Subtitles for `query` in any of the comma separated `languages`.
    fn search(&self, query: &str, languages: &str) -> Result<Vec<RemoteCandidate>, SubFetchError>;

    /// Resolves a file id into a temporary download URL.
    fn download_link(&self, file_id: u64, file_name: &str) -> Result<String, SubFetchError>;
}
