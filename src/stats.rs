use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;

use crate::error::SubFetchError;

/// Subtitle counts for one language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LanguageCount {
    pub present: usize,
    pub downloaded: usize,
}

/// What happened during one run.
#[derive(Debug, Default)]
pub struct RunStatistics {
    pub languages: IndexMap<String, LanguageCount>,
    /// Failing file, media, or subtitle name -> last error seen for it.
    pub errors: IndexMap<String, SubFetchError>,
}

impl RunStatistics {
    pub fn new(languages: &[String]) -> Self {
        Self {
            languages: languages
                .iter()
                .map(|language| (language.clone(), LanguageCount::default()))
                .collect(),
            errors: IndexMap::new(),
        }
    }

    /// Counts a subtitle already on disk. Languages that were not requested
    /// are ignored.
    pub fn add_present(&mut self, language: &str) {
        if let Some(count) = self.languages.get_mut(language) {
            count.present += 1;
        }
    }

    pub fn add_downloaded(&mut self, language: &str) {
        self.languages
            .entry(language.to_string())
            .or_default()
            .downloaded += 1;
    }

    pub fn record_error(&mut self, name: impl Into<String>, error: SubFetchError) {
        self.errors.insert(name.into(), error);
    }

    #[cfg(test)]
    pub fn present(&self, language: &str) -> usize {
        self.languages.get(language).map_or(0, |c| c.present)
    }

    #[cfg(test)]
    pub fn downloaded(&self, language: &str) -> usize {
        self.languages.get(language).map_or(0, |c| c.downloaded)
    }
}

impl Display for RunStatistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<12} {:>8} {:>11}", "language", "present", "downloaded")?;
        for (language, count) in &self.languages {
            let label = if language.is_empty() { "(none)" } else { language };
            writeln!(f, "{:<12} {:>8} {:>11}", label, count.present, count.downloaded)?;
        }

        if !self.errors.is_empty() {
            writeln!(f, "\n{} error(s):", self.errors.len())?;
            for (name, error) in &self.errors {
                writeln!(f, "  - [{}] {}: {}", error.kind(), name, error)?;
            }
        }
        Ok(())
    }
}
