use std::collections::HashSet;

use clap::ValueEnum;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::Display;

/// One downloadable file of a subtitle release.
#[derive(Clone, Debug, PartialEq)]
pub struct FilePart {
    pub cd_number: u32,
    pub file_id: u64,
}

/// A subtitle returned by a remote search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemoteCandidate {
    pub language: String,
    pub votes: f64,
    pub download_count: f64,
    pub ratings: f64,
    /// Upload time in milliseconds since the Unix epoch.
    pub uploaded_at: f64,
    pub from_trusted: bool,
    pub files: Vec<FilePart>,
}

/// How competing candidates for the same language are ranked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ScoringStrategy {
    /// votes + downloads + votes + ratings, trusted uploaders always win.
    #[default]
    TrustEngagement,
    /// votes + downloads + upload time.
    RecencyEngagement,
}

impl ScoringStrategy {
    pub fn score(self, candidate: &RemoteCandidate) -> f64 {
        match self {
            // Votes are counted twice on purpose, see DESIGN.md.
            ScoringStrategy::TrustEngagement => {
                if candidate.from_trusted {
                    return f64::INFINITY;
                }
                candidate.votes + candidate.download_count + candidate.votes + candidate.ratings
            }
            ScoringStrategy::RecencyEngagement => {
                candidate.votes + candidate.download_count + candidate.uploaded_at
            }
        }
    }
}

/// Picks at most one candidate per language, skipping languages already
/// present on disk.
///
/// A later candidate replaces the current winner only with a strictly
/// higher score, so ties keep the first one seen. Languages come out in
/// order of first appearance.
pub fn select_best(
    candidates: Vec<RemoteCandidate>,
    already_present: &HashSet<String>,
    strategy: ScoringStrategy,
) -> IndexMap<String, RemoteCandidate> {
    let mut best: IndexMap<String, (f64, RemoteCandidate)> = IndexMap::new();

    for candidate in candidates {
        if already_present.contains(&candidate.language) {
            continue;
        }

        let score = strategy.score(&candidate);
        let previous = best
            .get(&candidate.language)
            .map(|(score, _)| *score)
            .unwrap_or(f64::NEG_INFINITY);

        if score > previous {
            best.insert(candidate.language.clone(), (score, candidate));
        }
    }

    best.into_iter()
        .map(|(language, (_, candidate))| (language, candidate))
        .collect()
}

/// The part to download for a multi-CD release: the highest `cd_number`,
/// first one on ties.
///
/// Only this single part is fetched; the other parts of a multi-CD release
/// are ignored.
pub fn pick_file_part(files: &[FilePart]) -> Option<&FilePart> {
    files
        .iter()
        .reduce(|best, part| if part.cd_number > best.cd_number { part } else { best })
}
