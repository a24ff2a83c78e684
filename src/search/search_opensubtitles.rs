use std::time::Duration;

use log::{debug, trace};
use serde_json::json;
use ureq::{Agent, AgentBuilder};

use super::result::{DownloadLink, LoginResponse, SubtitleSearch};
use super::SubtitleService;
use crate::error::SubFetchError;
use crate::scoring::RemoteCandidate;

const API_URL: &str = "https://api.opensubtitles.com/api/v1";
const USER_AGENT: &str = concat!("SubFetch v", env!("CARGO_PKG_VERSION"));

/// Client for the OpenSubtitles REST API.
pub struct OpenSubtitlesClient {
    agent: Agent,
    api_key: String,
    token: Option<String>,
}

impl OpenSubtitlesClient {
    pub fn new(api_key: &str) -> Self {
        let agent = AgentBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build();

        Self {
            agent,
            api_key: api_key.to_string(),
            token: None,
        }
    }

    /// Exchanges credentials for the token required by downloads.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), SubFetchError> {
        let response = self
            .agent
            .post(&format!("{}/login", API_URL))
            .set("Api-Key", &self.api_key)
            .send_json(json!({
                "username": username,
                "password": password,
            }))
            .map_err(|e| SubFetchError::Auth(describe(e)))?;

        let login: LoginResponse = response
            .into_json()
            .map_err(|e| SubFetchError::Auth(e.to_string()))?;

        match login.token {
            Some(token) if !token.is_empty() => {
                self.token = Some(token);
                Ok(())
            }
            _ => Err(SubFetchError::Auth("no token returned".to_string())),
        }
    }
}

impl SubtitleService for OpenSubtitlesClient {
    fn search(&self, query: &str, languages: &str) -> Result<Vec<RemoteCandidate>, SubFetchError> {
        let params = [("languages", languages), ("query", query)];
        let url = format!(
            "{}/subtitles?{}",
            API_URL,
            serde_urlencoded::to_string(&params).map_err(|e| SubFetchError::Search(e.to_string()))?
        );
        debug!("Searching OpenSubtitles for '{}'", query);

        let response = self
            .agent
            .get(&url)
            .set("Api-Key", &self.api_key)
            .call()
            .map_err(|e| SubFetchError::Search(describe(e)))?;

        let search: SubtitleSearch = response
            .into_json()
            .map_err(|e| SubFetchError::Search(e.to_string()))?;
        trace!("{} result(s) for '{}'", search.data.len(), query);

        Ok(search.data.into_iter().map(|r| r.into_candidate()).collect())
    }

    fn download_link(&self, file_id: u64, file_name: &str) -> Result<String, SubFetchError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| SubFetchError::Download("not logged in".to_string()))?;

        let response = self
            .agent
            .post(&format!("{}/download", API_URL))
            .set("Api-Key", &self.api_key)
            .set("Authorization", &format!("Bearer {}", token))
            .send_json(json!({
                "file_id": file_id,
                "file_name": file_name,
            }))
            .map_err(|e| SubFetchError::Download(describe(e)))?;

        let link: DownloadLink = response
            .into_json()
            .map_err(|e| SubFetchError::Download(e.to_string()))?;
        Ok(link.link)
    }
}

/// Readable message for a failed request, with the body of error responses.
pub(crate) fn describe(error: ureq::Error) -> String {
    match error {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            if body.is_empty() {
                format!("HTTP {}", code)
            } else {
                format!("HTTP {}: {}", code, body.trim())
            }
        }
        ureq::Error::Transport(transport) => transport.to_string(),
    }
}
