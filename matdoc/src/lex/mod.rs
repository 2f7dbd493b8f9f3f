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

//! Lexical analysis for MATLAB source.
//!
//! Lexing happens in two layers:
//!
//! 1. [segment] labels each piece of a source string with a
//!    [TokenKind].  This is where all the context-sensitive decisions live.
//!
//! 2. This module turns segments into [Token]s that also carry their line
//!    numbers, and [cursor] lets parsers walk over them.
//!
//! Lexing is total: every input produces tokens whose texts concatenate back
//! to the input.

pub mod cursor;
pub mod segment;
pub mod token;

pub use token::{Token, TokenKind};

use segment::Segmenter;

/// Iterator over the segments of a string, as `(text, kind)` pairs.
pub struct StringSegmenter<'a> {
    input: &'a str,
    segmenter: Segmenter,
}

impl<'a> StringSegmenter<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            segmenter: Segmenter::new(),
        }
    }
}

impl<'a> Iterator for StringSegmenter<'a> {
    type Item = (&'a str, TokenKind);

    fn next(&mut self) -> Option<Self::Item> {
        let (seg_len, seg_type) = self.segmenter.push(self.input)?;
        let (s, rest) = self.input.split_at(seg_len);
        self.input = rest;
        Some((s, seg_type))
    }
}

/// Splits `input` into tokens.  The first token is on line 1.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut line = 1;
    StringSegmenter::new(input)
        .map(|(text, kind)| {
            let token = Token::new(kind, text, line);
            line += text.matches('\n').count() as u32;
            token
        })
        .collect()
}
