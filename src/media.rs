use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// A subtitle file found on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubtitleFile {
    /// File name without its extension.
    pub name: String,
    pub directory: PathBuf,
}

/// A video file found on disk, with the subtitles already sitting next to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaEntry {
    /// File name without its extension.
    pub name: String,
    pub directory: PathBuf,
    /// Language label -> subtitle present on disk for that language.
    pub subtitles: IndexMap<String, SubtitleFile>,
}

impl SubtitleFile {
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let (name, directory) = split_path(path)?;
        Some(Self::new(name, directory))
    }
}

impl MediaEntry {
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            subtitles: IndexMap::new(),
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let (name, directory) = split_path(path)?;
        Some(Self::new(name, directory))
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.subtitles.contains_key(language)
    }
}

fn split_path(path: &Path) -> Option<(String, PathBuf)> {
    let name = path.file_stem()?.to_str()?.to_string();
    let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Some((name, directory))
}
