use indexmap::IndexMap;
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::media::{MediaEntry, SubtitleFile};

pub static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_ ]").unwrap());

/// A subtitle belongs to a media file when its name contains the media name.
///
/// Exact, case-sensitive substring test on extension-less names.
pub fn matches(media_name: &str, subtitle_name: &str) -> bool {
    subtitle_name.contains(media_name)
}

/// Language label of a subtitle: its name minus the media name, keeping only
/// word characters and spaces. May be empty.
pub fn extract_language(subtitle_name: &str, media_name: &str) -> String {
    let remainder = subtitle_name.replacen(media_name, "", 1);
    NON_WORD.replace_all(&remainder, "").to_string()
}

/// Media entries found during a scan, and the subtitles that could not be
/// matched to any of them yet.
///
/// A subtitle is attached to *every* media entry whose name it contains, so
/// overlapping names such as `Show` and `Show Extended` both receive
/// `Show Extended.en`.
#[derive(Debug, Default)]
pub struct Library {
    pub medias: IndexMap<String, MediaEntry>,
    pub orphans: Vec<SubtitleFile>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a video. A second video with the same name replaces the first.
    pub fn add_media(&mut self, media: MediaEntry) {
        trace!("Registering media {:?}", media.name);
        self.medias.insert(media.name.clone(), media);
    }

    /// First pass: attach the subtitle to every known media entry it matches,
    /// or keep it as an orphan for [`Library::resolve_orphans`].
    pub fn add_subtitle(&mut self, subtitle: SubtitleFile) {
        if attach(&mut self.medias, &subtitle) == 0 {
            trace!("Queueing orphan subtitle {:?}", subtitle.name);
            self.orphans.push(subtitle);
        }
    }

    /// Second pass, once every media entry is known.
    pub fn resolve_orphans(&mut self) {
        for subtitle in &self.orphans {
            let attached = attach(&mut self.medias, subtitle);
            if attached == 0 {
                debug!("Subtitle {:?} matches no media file", subtitle.name);
            }
        }
    }
}

fn attach(medias: &mut IndexMap<String, MediaEntry>, subtitle: &SubtitleFile) -> usize {
    let mut count = 0;
    for media in medias.values_mut() {
        if !matches(&media.name, &subtitle.name) {
            continue;
        }
        let language = extract_language(&subtitle.name, &media.name);
        debug!(
            "Found {:?} subtitle {:?} in {:?} for {:?}",
            language, subtitle.name, subtitle.directory, media.name
        );
        media.subtitles.insert(language, subtitle.clone());
        count += 1;
    }
    count
}
