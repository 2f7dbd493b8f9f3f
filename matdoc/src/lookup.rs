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

use anyhow::Result;
use clap::Args;
use matdoc::{
    model::Documented,
    resolve::{shortest_name, Resolver},
    settings::Settings,
};

/// Resolve names to entities in the source tree.
#[derive(Args, Clone, Debug)]
pub struct Lookup {
    /// Names to resolve, such as `pkg.Cls` or `target.+pkg.helper`.
    #[arg(required = true)]
    names: Vec<String>,

    /// Module to resolve names relative to.
    #[arg(long)]
    within: Option<String>,
}

impl Lookup {
    pub fn run(self, settings: Settings) -> Result<()> {
        let resolver = Resolver::new(settings);
        let mut missing = 0;
        for name in &self.names {
            match resolver.resolve(name, self.within.as_deref()) {
                Some(entity) => {
                    let full_name = entity.full_name();
                    println!(
                        "{name}: {} `{full_name}` (`{}`)",
                        entity.kind(),
                        shortest_name(&full_name)
                    );
                    if let Some(summary) = entity.doc().and_then(|doc| doc.lines().next()) {
                        println!("    {summary}");
                    }
                }
                None => {
                    println!("{name}: not found");
                    missing += 1;
                }
            }
        }
        for diagnostic in resolver.diagnostics() {
            eprintln!("{diagnostic}");
        }
        if missing > 0 {
            anyhow::bail!("{missing} of {} names not found", self.names.len());
        }
        Ok(())
    }
}
