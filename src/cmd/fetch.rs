use std::env;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use log::{error, info, LevelFilter};

use crate::cmd::{profile, Fetch, Run};
use crate::download::HttpFetcher;
use crate::error::SilentExit;
use crate::probe::FfprobeProbe;
use crate::search::search_opensubtitles::OpenSubtitlesClient;
use crate::sub_fetch::{FetchOptions, SubFetcher};

const DEFAULT_LANGUAGES: &str = "en";

impl Run for Fetch {
    fn run(&mut self) -> Result<()> {
        self.setup_profile()?;
        init_logger(self.verbose);

        let options = self.fetch_options()?;
        let (username, password, api_key) = self.credentials()?;

        info!("Logging on OpenSubtitles...");
        let mut client = OpenSubtitlesClient::new(&api_key);
        if let Err(e) = client.login(&username, &password) {
            error!(
                "Cannot login on OpenSubtitles, please check API key, username and password ({})",
                e
            );
            return Err(SilentExit { code: 1 }.into());
        }
        info!("Logged in!");

        let global_timer = Instant::now();
        let probe = FfprobeProbe;
        let fetcher = HttpFetcher::new();
        let stats = SubFetcher::new(&probe, &client, &fetcher, options).run();

        println!("\n{}", stats);
        println!("Subtitles fetched in {:?}", global_timer.elapsed());
        Ok(())
    }
}

impl Fetch {
    fn setup_profile(&mut self) -> Result<()> {
        if let Some(profile_name) = &self.profile {
            let profile = profile::get_profile_by_name(profile_name)?;

            self.directory = self.directory.take().or(profile.directory);
            self.languages = self.languages.take().or(profile.languages);
            self.strategy = self.strategy.or(profile.strategy);
            self.username = self.username.take().or(profile.username);
            self.api_key = self.api_key.take().or(profile.api_key);
        }
        Ok(())
    }

    fn fetch_options(&self) -> Result<FetchOptions> {
        let directory = match &self.directory {
            Some(directory) => directory.clone(),
            None => env::current_dir().context("Could not get current directory")?,
        };
        if !directory.is_dir() {
            bail!("Videos directory does not exist: {:?}", directory);
        }

        let languages = parse_languages(self.languages.as_deref().unwrap_or(DEFAULT_LANGUAGES));
        if languages.is_empty() {
            bail!("At least one language is required");
        }

        Ok(FetchOptions {
            directory,
            languages,
            strategy: self.strategy.unwrap_or_default(),
            dry_run: self.dry_run,
        })
    }

    fn credentials(&self) -> Result<(String, String, String)> {
        let username = self.username.clone().context("Username is required (--username)")?;
        let password = self.password.clone().context("Password is required (--password)")?;
        let api_key = self.api_key.clone().context("API key is required (--api-key)")?;
        Ok((username, password, api_key))
    }
}

/// Splits a comma separated language list, dropping blanks and repeats.
pub fn parse_languages(languages: &str) -> Vec<String> {
    let mut parsed: Vec<String> = Vec::new();
    for language in languages.split(',').map(str::trim) {
        if !language.is_empty() && !parsed.iter().any(|l| l == language) {
            parsed.push(language.to_string());
        }
    }
    parsed
}

fn init_logger(verbose: bool) {
    let mut clog = colog::default_builder();
    clog.filter(
        None,
        if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
    );
    clog.init();
}
