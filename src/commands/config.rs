// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - inspect the effective configuration

use super::{print_json, Globals};
use crate::config::default_path;
use anyhow::Result;

/// Config subcommands
#[derive(Debug, Clone, Copy, clap::Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the default configuration file path
    Path,
}

/// Run the config command
pub fn run(action: ConfigAction, globals: &Globals) -> Result<()> {
    match action {
        ConfigAction::Show => {
            if globals.json {
                print_json(&globals.config)
            } else {
                print!("{}", globals.config.to_toml()?);
                Ok(())
            }
        }
        ConfigAction::Path => {
            match default_path() {
                Some(path) => println!("{}", path.display()),
                None => anyhow::bail!("No home directory to derive a config path from"),
            }
            Ok(())
        }
    }
}
