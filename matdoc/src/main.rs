// matdoc - structured documentation for MATLAB source trees.
// Copyright (C) 2025 matdoc contributors.
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <http://www.gnu.org/licenses/>.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use matdoc::settings::{EncodingChoice, Settings};

use crate::{lookup::Lookup, show::Show, tokens::Tokens};

mod lookup;
mod show;
mod tokens;

/// Structured documentation for MATLAB source trees.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    options: Options,

    #[command(subcommand)]
    command: Command,
}

/// Options that apply to every subcommand.
#[derive(Args, Clone, Debug)]
struct Options {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Source root, overriding the configuration file.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Source encoding, overriding the configuration file.  `detect` guesses
    /// each file's encoding from its contents.
    #[arg(long, global = true, value_parser = EncodingChoice::from_label)]
    encoding: Option<EncodingChoice>,
}

impl Options {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(config) => Settings::from_file(config)?,
            None => Settings::default(),
        };
        if let Some(root) = &self.root {
            settings.root = root.clone();
        }
        if let Some(encoding) = self.encoding {
            settings.encoding = encoding;
        }
        Ok(settings)
    }
}

#[derive(Subcommand, Clone, Debug)]
enum Command {
    Show(Show),
    Tokens(Tokens),
    Resolve(Lookup),
}

impl Command {
    fn run(self, settings: Settings) -> Result<()> {
        match self {
            Command::Show(show) => show.run(settings),
            Command::Tokens(tokens) => tokens.run(settings),
            Command::Resolve(lookup) => lookup.run(settings),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let settings = cli.options.settings()?;
    cli.command.run(settings)
}
