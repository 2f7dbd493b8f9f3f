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
    io::{stdout, Write},
    path::PathBuf,
};

use anyhow::{anyhow, Result};
use clap::Args;
use matdoc::{
    lex::{tokenize, TokenKind},
    preprocess::{preprocess, remove_comment_header},
    settings::Settings,
    source::SourceFile,
};

/// Print the tokens of a source file, one per line.
#[derive(Args, Clone, Debug)]
pub struct Tokens {
    /// File to tokenize.
    #[arg(required = true)]
    input: PathBuf,

    /// Tokenize the file after header removal and preprocessing, as the
    /// parser sees it.
    #[arg(long)]
    preprocess: bool,

    /// Also print white space tokens.
    #[arg(long)]
    whitespace: bool,
}

impl Tokens {
    pub fn run(self, settings: Settings) -> Result<()> {
        let source = SourceFile::for_file(&self.input, settings.encoding.encoding())
            .map_err(|error| anyhow!("{}: {error}", self.input.display()))?;
        let text = match self.preprocess {
            true => preprocess(&remove_comment_header(&source.contents)),
            false => source.contents.clone(),
        };

        let mut writer = stdout().lock();
        for token in tokenize(&text) {
            if token.kind == TokenKind::Whitespace && !self.whitespace {
                continue;
            }
            let kind = format!("{:?}", token.kind);
            writeln!(writer, "{:>5}  {kind:<13} {:?}", token.line, token.text)?;
        }
        Ok(())
    }
}
