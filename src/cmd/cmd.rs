use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::scoring::ScoringStrategy;

#[derive(Parser, Debug)]
#[clap(about, author, version)]
pub enum Cmd {
    Fetch(Fetch),
    Profile(Profile),
}

/// Download missing subtitles for every video in a directory tree.
#[derive(Parser, Debug)]
#[clap(author)]
pub struct Fetch {
    /// Videos directory [default: current directory].
    #[clap(short, long, value_hint = ValueHint::DirPath)]
    pub directory: Option<PathBuf>,
    /// Languages, comma separated [default: en].
    #[clap(short, long)]
    pub languages: Option<String>,
    /// OpenSubtitles username.
    #[clap(short, long, env = "SUBFETCH_USERNAME")]
    pub username: Option<String>,
    /// OpenSubtitles password.
    #[clap(short, long, env = "SUBFETCH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// OpenSubtitles API key.
    #[clap(short, long, env = "SUBFETCH_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    /// How to pick between subtitles of the same language.
    #[clap(short, long, value_enum)]
    pub strategy: Option<ScoringStrategy>,
    /// Search and select subtitles without downloading them.
    #[clap(long)]
    pub dry_run: bool,
    /// Print debug logs.
    #[clap(short, long)]
    pub verbose: bool,
    /// Saved profile supplying any option not given here.
    #[clap(long)]
    pub profile: Option<String>,
}

/// Manage saved fetch profiles.
#[derive(Parser, Debug)]
#[clap(author)]
pub struct Profile {
    #[clap(subcommand)]
    pub cmd: ProfileCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    Create(Create),
    Delete(Delete),
    List(List),
}

/// Save a new profile. Passwords are never stored.
#[derive(Parser, Debug)]
pub struct Create {
    pub name: String,
    #[clap(short, long, value_hint = ValueHint::DirPath)]
    pub directory: Option<PathBuf>,
    #[clap(short, long)]
    pub languages: Option<String>,
    #[clap(short, long, value_enum)]
    pub strategy: Option<ScoringStrategy>,
    #[clap(short, long)]
    pub username: Option<String>,
    #[clap(short, long)]
    pub api_key: Option<String>,
}

/// Delete a profile.
#[derive(Parser, Debug)]
pub struct Delete {
    pub name: String,
}

/// List saved profiles.
#[derive(Parser, Debug)]
pub struct List {}
