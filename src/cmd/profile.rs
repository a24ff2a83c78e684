use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::cmd::{Create, Delete, List, Profile, ProfileCommand, Run};
use crate::scoring::ScoringStrategy;

const PROFILE_EXTENSION: &str = "sfp";

/// Options saved under a name and reused by `fetch --profile`.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct ProfileData {
    pub name: String,
    pub directory: Option<PathBuf>,
    pub languages: Option<String>,
    pub strategy: Option<ScoringStrategy>,
    pub username: Option<String>,
    pub api_key: Option<String>,
}

fn get_or_create_profiles_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().context("Could not get base directories")?;

    let profiles_dir = base_dirs
        .data_local_dir()
        .join("SubFetch")
        .join("profiles");

    if !profiles_dir.try_exists()? {
        fs::create_dir_all(&profiles_dir).context("Could not create profiles directory")?;
    }

    Ok(profiles_dir)
}

fn profile_path(profiles_dir: &Path, name: &str) -> PathBuf {
    profiles_dir.join(format!("{}.{}", name, PROFILE_EXTENSION))
}

pub fn get_profile_by_name(name: &str) -> Result<ProfileData> {
    read_profile(&get_or_create_profiles_dir()?, name)
}

fn read_profile(profiles_dir: &Path, name: &str) -> Result<ProfileData> {
    let path = profile_path(profiles_dir, name);
    if !path.exists() {
        bail!("Profile not found: {}", name);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Could not read profile {:?}", path))?;
    let profile = serde_json::from_str(&content)
        .with_context(|| format!("Invalid profile {:?}", path))?;
    Ok(profile)
}

fn write_profile(profiles_dir: &Path, profile: &ProfileData) -> Result<PathBuf> {
    let path = profile_path(profiles_dir, &profile.name);
    if path.exists() {
        bail!("Profile with name {} already exists", profile.name);
    }

    fs::write(&path, serde_json::to_string_pretty(profile)?)?;
    Ok(path)
}

fn list_profiles(profiles_dir: &Path) -> Result<Vec<String>> {
    let mut profiles = fs::read_dir(profiles_dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            if path.extension()?.to_str()? == PROFILE_EXTENSION {
                Some(path.file_stem()?.to_str()?.to_string())
            } else {
                None
            }
        })
        .collect::<Vec<String>>();
    profiles.sort();
    Ok(profiles)
}

impl Run for Profile {
    fn run(&mut self) -> Result<()> {
        self.cmd.run()
    }
}

impl Run for ProfileCommand {
    fn run(&mut self) -> Result<()> {
        match self {
            ProfileCommand::Create(cmd) => cmd.run(),
            ProfileCommand::Delete(cmd) => cmd.run(),
            ProfileCommand::List(cmd) => cmd.run(),
        }
    }
}

impl Run for Create {
    fn run(&mut self) -> Result<()> {
        let profile = ProfileData {
            name: self.name.clone(),
            directory: self.directory.clone(),
            languages: self.languages.clone(),
            strategy: self.strategy,
            username: self.username.clone(),
            api_key: self.api_key.clone(),
        };

        write_profile(&get_or_create_profiles_dir()?, &profile)?;
        println!("Profile {:?} successfully created", self.name);

        Ok(())
    }
}

impl Run for Delete {
    fn run(&mut self) -> Result<()> {
        let profile_path = profile_path(&get_or_create_profiles_dir()?, &self.name);
        if !profile_path.exists() {
            bail!("Profile not found: {}", self.name);
        }

        loop {
            println!(
                "Are you sure you want to delete the profile {:?}? (y/n)",
                self.name
            );
            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;

            match input.trim() {
                "y" | "Y" => {
                    fs::remove_file(&profile_path)?;
                    println!("Profile {:?} successfully deleted", self.name);
                    return Ok(());
                }
                "n" | "N" => {
                    println!("Abort deletion");
                    return Ok(());
                }
                _ => print!("\x1b[1A\x1b[2K"), // clear the line
            }
        }
    }
}

impl Run for List {
    fn run(&mut self) -> Result<()> {
        let profiles = list_profiles(&get_or_create_profiles_dir()?)?;

        if profiles.is_empty() {
            println!("No profiles found!");
        } else {
            println!("Profiles:");
            for profile in profiles {
                println!("  - {}", profile);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn sample(name: &str) -> ProfileData {
        ProfileData {
            name: name.to_string(),
            directory: Some(PathBuf::from("/media/tv")),
            languages: Some("en,fr".to_string()),
            strategy: Some(ScoringStrategy::RecencyEngagement),
            username: Some("alice".to_string()),
            api_key: None,
        }
    }

    #[test]
    fn written_profile_reads_back() {
        let dir = TempDir::new().unwrap();
        write_profile(dir.path(), &sample("tv")).unwrap();
        assert_eq!(read_profile(dir.path(), "tv").unwrap(), sample("tv"));
    }

    #[test]
    fn strategy_is_stored_in_kebab_case() {
        let dir = TempDir::new().unwrap();
        let path = write_profile(dir.path(), &sample("tv")).unwrap();
        let raw = fs::read_to_string(path).unwrap();
        assert!(raw.contains("\"recency-engagement\""));
        assert!(!raw.contains("password"));
    }

    #[test]
    fn duplicate_profile_is_rejected() {
        let dir = TempDir::new().unwrap();
        write_profile(dir.path(), &sample("tv")).unwrap();
        assert!(write_profile(dir.path(), &sample("tv")).is_err());
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = read_profile(dir.path(), "nope").unwrap_err();
        assert_eq!(err.to_string(), "Profile not found: nope");
    }

    #[test]
    fn list_only_shows_profile_files() {
        let dir = TempDir::new().unwrap();
        write_profile(dir.path(), &sample("movies")).unwrap();
        write_profile(dir.path(), &sample("anime")).unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        assert_eq!(list_profiles(dir.path()).unwrap(), ["anime", "movies"]);
    }
}
