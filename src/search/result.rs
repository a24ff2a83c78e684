use chrono::DateTime;
use serde::Deserialize;

use crate::scoring::{FilePart, RemoteCandidate};

#[derive(Deserialize, Debug)]
pub(crate) struct LoginResponse {
    pub token: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SubtitleSearch {
    #[serde(default)]
    pub data: Vec<SubtitleResult>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SubtitleResult {
    pub attributes: SubtitleAttributes,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct SubtitleAttributes {
    pub language: Option<String>,
    pub votes: Option<f64>,
    pub ratings: Option<f64>,
    pub new_download_count: Option<f64>,
    pub from_trusted: Option<bool>,
    pub upload_date: Option<String>,
    #[serde(default)]
    pub files: Vec<SubtitleFileRef>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SubtitleFileRef {
    pub file_id: u64,
    pub cd_number: Option<u32>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct DownloadLink {
    pub link: String,
}

impl SubtitleResult {
    /// Missing numbers become 0 so scoring never has to deal with gaps.
    pub fn into_candidate(self) -> RemoteCandidate {
        let attributes = self.attributes;
        RemoteCandidate {
            language: attributes.language.unwrap_or_default(),
            votes: attributes.votes.unwrap_or(0.0),
            download_count: attributes.new_download_count.unwrap_or(0.0),
            ratings: attributes.ratings.unwrap_or(0.0),
            uploaded_at: attributes
                .upload_date
                .as_deref()
                .map(parse_upload_date)
                .unwrap_or(0.0),
            from_trusted: attributes.from_trusted.unwrap_or(false),
            files: attributes
                .files
                .into_iter()
                .map(|file| FilePart {
                    cd_number: file.cd_number.unwrap_or(0),
                    file_id: file.file_id,
                })
                .collect(),
        }
    }
}

/// Milliseconds since the Unix epoch, or 0 when the date cannot be read.
pub fn parse_upload_date(date: &str) -> f64 {
    DateTime::parse_from_rfc3339(date)
        .map(|date| date.timestamp_millis() as f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_payload_becomes_candidates() {
        let body = r#"{
            "total_pages": 1,
            "data": [{
                "id": "123",
                "type": "subtitle",
                "attributes": {
                    "language": "fr",
                    "votes": 3,
                    "ratings": 6.5,
                    "download_count": 900,
                    "new_download_count": 4,
                    "from_trusted": true,
                    "upload_date": "1970-01-01T00:00:01Z",
                    "files": [
                        {"file_id": 11, "cd_number": 1, "file_name": "a.srt"},
                        {"file_id": 12, "cd_number": 2, "file_name": "b.srt"}
                    ]
                }
            }]
        }"#;

        let search: SubtitleSearch = serde_json::from_str(body).unwrap();
        let candidate = search.data.into_iter().next().unwrap().into_candidate();

        assert_eq!(candidate.language, "fr");
        assert_eq!(candidate.votes, 3.0);
        assert_eq!(candidate.download_count, 4.0);
        assert_eq!(candidate.ratings, 6.5);
        assert_eq!(candidate.uploaded_at, 1000.0);
        assert!(candidate.from_trusted);
        assert_eq!(candidate.files.len(), 2);
        assert_eq!(candidate.files[1].file_id, 12);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let body = r#"{"data": [{"attributes": {"language": "en", "votes": null, "files": []}}]}"#;
        let search: SubtitleSearch = serde_json::from_str(body).unwrap();
        let candidate = search.data.into_iter().next().unwrap().into_candidate();

        assert_eq!(candidate.votes, 0.0);
        assert_eq!(candidate.download_count, 0.0);
        assert_eq!(candidate.ratings, 0.0);
        assert_eq!(candidate.uploaded_at, 0.0);
        assert!(!candidate.from_trusted);
    }

    #[test]
    fn unreadable_upload_date_is_zero() {
        assert_eq!(parse_upload_date("yesterday"), 0.0);
        assert_eq!(parse_upload_date("2020-01-01T00:00:00Z"), 1_577_836_800_000.0);
    }
}
