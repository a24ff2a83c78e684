use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, trace, warn};

use crate::download::{FileFetcher, SUBTITLE_EXTENSION};
use crate::error::SubFetchError;
use crate::matcher::Library;
use crate::media::{MediaEntry, SubtitleFile};
use crate::probe::MediaProbe;
use crate::scoring::{pick_file_part, select_best, RemoteCandidate, ScoringStrategy};
use crate::search::SubtitleService;
use crate::stats::RunStatistics;

/// Settings of one fetch run.
#[derive(Clone, Debug)]
pub struct FetchOptions {
    pub directory: PathBuf,
    pub languages: Vec<String>,
    pub strategy: ScoringStrategy,
    pub dry_run: bool,
}

/// Finds videos missing subtitles and downloads the best match per language.
///
/// Everything runs in sequence: the whole tree is scanned and orphans are
/// resolved before the first search, and each download finishes before the
/// next one starts.
pub struct SubFetcher<'a> {
    probe: &'a dyn MediaProbe,
    service: &'a dyn SubtitleService,
    fetcher: &'a dyn FileFetcher,
    options: FetchOptions,
}

impl<'a> SubFetcher<'a> {
    pub fn new(
        probe: &'a dyn MediaProbe,
        service: &'a dyn SubtitleService,
        fetcher: &'a dyn FileFetcher,
        mut options: FetchOptions,
    ) -> Self {
        let mut seen = HashSet::new();
        options.languages.retain(|language| seen.insert(language.clone()));

        Self {
            probe,
            service,
            fetcher,
            options,
        }
    }

    pub fn run(&self) -> RunStatistics {
        let mut stats = RunStatistics::new(&self.options.languages);
        let library = self.collect_library(&mut stats);

        info!(
            "Downloading subtitles for: {}...",
            self.options.languages.join(",")
        );
        self.download_missing(&library, &mut stats);

        stats
    }

    /// Scans the directory tree and matches every subtitle found to its media.
    pub fn collect_library(&self, stats: &mut RunStatistics) -> Library {
        let timer = Instant::now();
        let mut library = Library::new();

        debug!("Fetching media files...");
        self.visit_dirs(&self.options.directory, &mut library, stats);
        debug!("Fetching existing subtitles...");
        library.resolve_orphans();

        for media in library.medias.values() {
            for language in &self.options.languages {
                if media.has_language(language) {
                    stats.add_present(language);
                }
            }
        }

        info!(
            "Found {} media files in {:?}",
            library.medias.len(),
            timer.elapsed()
        );
        library
    }

    fn visit_dirs(&self, dir: &Path, library: &mut Library, stats: &mut RunStatistics) {
        let mut paths: Vec<PathBuf> = match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok().map(|entry| entry.path()))
                .collect(),
            Err(e) => {
                warn!("Cannot read directory {:?}: {}", dir, e);
                stats.record_error(
                    dir.display().to_string(),
                    SubFetchError::Probe(e.to_string()),
                );
                return;
            }
        };
        paths.sort();

        for path in paths {
            if path.is_dir() {
                self.visit_dirs(&path, library, stats);
            } else {
                self.register_file(&path, library, stats);
            }
        }
    }

    fn register_file(&self, path: &Path, library: &mut Library, stats: &mut RunStatistics) {
        let probe = match self.probe.probe(path) {
            Ok(probe) => probe,
            Err(e) => {
                let name = file_name(path);
                warn!("Skipping {:?}: {}", name, e);
                stats.record_error(name, e);
                return;
            }
        };

        if probe.is_video() {
            if let Some(media) = MediaEntry::from_path(path) {
                library.add_media(media);
            }
        } else if probe.is_subtitle() {
            if let Some(subtitle) = SubtitleFile::from_path(path) {
                library.add_subtitle(subtitle);
            }
        } else {
            trace!("Ignoring {:?}", path);
        }
    }

    fn download_missing(&self, library: &Library, stats: &mut RunStatistics) {
        let languages = self.options.languages.join(",");
        let pb = get_progress_bar(library.medias.len());

        for media in library.medias.values() {
            pb.set_message(media.name.clone());
            self.download_for_media(media, &languages, stats, &pb);
            pb.inc(1);
        }

        pb.finish_and_clear();
    }

    fn download_for_media(
        &self,
        media: &MediaEntry,
        languages: &str,
        stats: &mut RunStatistics,
        pb: &ProgressBar,
    ) {
        let candidates = match self.service.search(&media.name, languages) {
            Ok(candidates) => candidates,
            Err(e) => {
                pb.suspend(|| warn!("Search failed for {:?}: {}", media.name, e));
                stats.record_error(media.name.clone(), e);
                return;
            }
        };

        let present: HashSet<String> = media.subtitles.keys().cloned().collect();
        let best = select_best(candidates, &present, self.options.strategy);

        for (language, candidate) in best {
            let sub_name = format!("{}.{}", media.name, language);

            if self.options.dry_run {
                pb.suspend(|| info!("Would download {} subtitle", sub_name));
                continue;
            }

            match self.download(media, &sub_name, &candidate) {
                Ok(path) => {
                    stats.add_downloaded(&language);
                    pb.suspend(|| debug!("Downloaded {} subtitle to {:?}", sub_name, path));
                }
                Err(e) => {
                    pb.suspend(|| warn!("Cannot download {}: {}", sub_name, e));
                    stats.record_error(sub_name, e);
                }
            }
        }
    }

    fn download(
        &self,
        media: &MediaEntry,
        sub_name: &str,
        candidate: &RemoteCandidate,
    ) -> Result<PathBuf, SubFetchError> {
        let part = pick_file_part(&candidate.files)
            .ok_or_else(|| SubFetchError::Download("candidate has no files".to_string()))?;

        let link = self.service.download_link(part.file_id, sub_name)?;
        let file_name = format!("{}.{}", sub_name, SUBTITLE_EXTENSION);
        self.fetcher.fetch(&link, &media.directory, &file_name)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn get_progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .progress_chars("#>-")
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {msg} {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}
