mod cmd;
mod fetch;
mod profile;

use anyhow::Result;

pub use crate::cmd::cmd::*;

pub trait Run {
    fn run(&mut self) -> Result<()>;
}

impl Run for Cmd {
    fn run(&mut self) -> Result<()> {
        match self {
            Cmd::Fetch(cmd) => cmd.run(),
            Cmd::Profile(cmd) => cmd.run(),
        }
    }
}
