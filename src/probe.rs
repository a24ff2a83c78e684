use std::path::Path;
use std::process::Command;

use ffprobe::ffprobe;
use serde::Deserialize;

use crate::error::SubFetchError;

/// Subtitle container formats recognised on disk, as named by ffprobe.
pub const SUBTITLE_FORMATS: &[&str] = &["srt"];

/// What a probe learned about a file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Probe {
    pub streams: usize,
    pub chapters: usize,
    pub format_name: String,
}

impl Probe {
    pub fn is_video(&self) -> bool {
        self.chapters > 0 || self.streams >= 2
    }

    pub fn is_subtitle(&self) -> bool {
        SUBTITLE_FORMATS.contains(&self.format_name.as_str())
    }
}

pub trait MediaProbe {
    fn probe(&self, path: &Path) -> Result<Probe, SubFetchError>;
}

/// Probes files with the `ffprobe` binary.
#[derive(Debug, Default)]
pub struct FfprobeProbe;

#[derive(Deserialize)]
struct ChapterList {
    #[serde(default)]
    chapters: Vec<serde_json::Value>,
}

impl FfprobeProbe {
    fn count_chapters(path: &Path) -> Result<usize, SubFetchError> {
        let output = Command::new("ffprobe")
            .args(["-v", "quiet", "-print_format", "json", "-show_chapters"])
            .arg(path)
            .output()
            .map_err(|e| SubFetchError::Probe(e.to_string()))?;

        if !output.status.success() {
            return Err(SubFetchError::Probe(format!(
                "ffprobe exited with {}",
                output.status
            )));
        }

        let list: ChapterList = serde_json::from_slice(&output.stdout)
            .map_err(|e| SubFetchError::Probe(e.to_string()))?;
        Ok(list.chapters.len())
    }
}

impl MediaProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> Result<Probe, SubFetchError> {
        let metadata = ffprobe(path).map_err(|e| SubFetchError::Probe(e.to_string()))?;

        let mut probe = Probe {
            streams: metadata.streams.len(),
            chapters: 0,
            format_name: metadata.format.format_name,
        };
        // Chapters only matter when the stream count alone does not make it a video.
        if !probe.is_video() {
            probe.chapters = Self::count_chapters(path)?;
        }
        Ok(probe)
    }
}
