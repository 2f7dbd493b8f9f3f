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

use std::{
    ffi::OsStr,
    io::{stdout, Write},
    path::Path,
};

use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use log::warn;
use matdoc::{
    app::load_application,
    model::{Documented, Entity},
    parse::parse_source,
    resolve::Resolver,
    settings::Settings,
    source::SourceFile,
};
use serde::Serialize;

/// Show the documentation model of a file or of a name in the source tree.
#[derive(Args, Clone, Debug)]
pub struct Show {
    /// A `.m` or `.mlapp` file, or a name such as `pkg.Cls` or
    /// `target.+pkg`.
    #[arg(required = true)]
    input: String,

    /// Module to resolve names relative to.
    #[arg(long)]
    within: Option<String>,

    /// Also show the public members of a module.
    #[arg(long)]
    members: bool,

    /// Output format.
    #[arg(long, short = 'f', default_value_t, value_enum)]
    format: ShowFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum ShowFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// Newline-delimited JSON.
    Ndjson,
}

impl Show {
    pub fn run(self, settings: Settings) -> Result<()> {
        let path = Path::new(&self.input);
        if path.is_file() {
            let entity = load_file(path, &settings)?;
            return self.write(&entity);
        }

        let resolver = Resolver::new(settings);
        let entity = resolver
            .resolve(&self.input, self.within.as_deref())
            .ok_or_else(|| anyhow!("{}: not found", self.input))?;
        self.write(&entity)?;
        if self.members
            && let Entity::Module(module) = &entity
        {
            for name in module.all(&resolver) {
                if let Some(member) = module.get(&resolver, &name) {
                    self.write(&member)?;
                }
            }
        }
        Ok(())
    }

    fn write<T>(&self, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let mut writer = stdout().lock();
        match self.format {
            ShowFormat::Json => serde_json::to_writer_pretty(&mut writer, value)?,
            ShowFormat::Ndjson => serde_json::to_writer(&mut writer, value)?,
        };
        writeln!(writer)?;
        Ok(())
    }
}

/// Parses the single file `path`, outside of any module.
fn load_file(path: &Path, settings: &Settings) -> Result<Entity> {
    let name = path
        .file_stem()
        .and_then(OsStr::to_str)
        .ok_or_else(|| anyhow!("{}: file name is not valid UTF-8", path.display()))?;
    if path.extension() == Some(OsStr::new("mlapp")) {
        let application = load_application(path, name, "")?;
        return Ok(Entity::Application(application.into()));
    }
    let source = SourceFile::for_file(path, settings.encoding.encoding())
        .map_err(|error| anyhow!("{}: {error}", path.display()))?;
    let entity = parse_source(&source, name, "", |diagnostic| {
        warn!("{diagnostic}");
        let line = diagnostic
            .location
            .lines
            .as_ref()
            .and_then(|lines| source.get_line(*lines.start() as usize));
        if let Some(line) = line {
            warn!("    {}", line.trim());
        }
    })?;
    if entity.doc().is_none() {
        warn!("{}: `{name}` has no docstring", path.display());
    }
    Ok(entity)
}
