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

//! Property and argument entries, which share one grammar:
//!
//! ```text
//! Name [(dims)] [Type] [{validators}] [= default]
//! ```

use crate::{
    lex::{Token, TokenKind},
    model::{ArgSpec, Dimension},
};

use super::{Parser, Warning};

/// One parsed entry.
#[derive(Clone, Debug, Default)]
pub(super) struct Entry<'a> {
    pub name: String,
    pub first_line: u32,
    pub last_line: u32,
    pub size: Option<Vec<Dimension>>,
    pub type_name: Option<String>,
    pub validators: Option<Vec<String>>,
    pub default: Option<String>,

    /// A comment that ends the entry's last line.
    pub trailing: Option<&'a Token>,
}

impl Entry<'_> {
    pub fn into_spec(self, docstring: Option<String>) -> ArgSpec {
        ArgSpec {
            size: self.size,
            type_name: self.type_name,
            validators: self.validators,
            default: self.default,
            docstring,
        }
    }
}

impl<'a> Parser<'a> {
    /// Parses one entry, starting at its name.  With `allow_dotted`, the name
    /// may be dotted, as for name-value arguments like `opts.Color`.  Stops
    /// at the end of the entry's line without consuming the new-line.
    pub(super) fn parse_entry(&mut self, allow_dotted: bool) -> Entry<'a> {
        let first_line = self.cursor.line();
        let name = if allow_dotted {
            self.dotted_name().unwrap_or_default()
        } else {
            self.cursor
                .advance_if(|token| token.kind == TokenKind::Name)
                .map(|token| token.text.clone())
                .unwrap_or_default()
        };
        let mut entry = Entry {
            name,
            first_line,
            ..Entry::default()
        };

        self.cursor.skip_whitespace();
        if self.cursor.peek().is_some_and(|token| token.is_punct("(")) {
            entry.size = self.parse_size(&entry.name);
            self.cursor.skip_whitespace();
        }
        if self
            .cursor
            .peek()
            .is_some_and(|token| token.kind == TokenKind::Name)
        {
            entry.type_name = self.dotted_name();
            self.cursor.skip_whitespace();
        }
        if self.cursor.match_punct("{") {
            entry.validators = Some(self.parse_validators());
            self.cursor.skip_whitespace();
        }
        if self.cursor.match_operator("=") {
            self.cursor.skip_whitespace();
            entry.default = self.parse_default();
        }

        entry.last_line = self
            .cursor
            .previous()
            .map_or(first_line, |token| token.end_line());
        self.cursor.skip_separators();
        entry.trailing = self.cursor.advance_if(|token| token.is_doc_comment());
        entry
    }

    /// Parses a size specification such as `(1,:)`.  Warns and returns
    /// `None` if it contains anything other than whole numbers and `:`.
    fn parse_size(&mut self, name: &str) -> Option<Vec<Dimension>> {
        let line = self.cursor.line();
        self.cursor.advance();
        let mut dimensions = Vec::new();
        let mut valid = true;
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                Some(token) if token.is_punct(")") => {
                    self.cursor.advance();
                    break;
                }
                None => {
                    valid = false;
                    break;
                }
                Some(token) if token.kind == TokenKind::Newline => {
                    valid = false;
                    break;
                }
                Some(token) => {
                    self.cursor.advance();
                    match token.kind {
                        TokenKind::Number => match token.text.parse() {
                            Ok(n) => dimensions.push(Dimension::Fixed(n)),
                            Err(_) => valid = false,
                        },
                        TokenKind::Operator if token.text == ":" => {
                            dimensions.push(Dimension::Any)
                        }
                        TokenKind::Punctuation if token.text == "," => (),
                        _ => valid = false,
                    }
                }
            }
        }
        if valid && !dimensions.is_empty() {
            Some(dimensions)
        } else {
            self.warn(line, Warning::InvalidSize(name.into()));
            None
        }
    }

    /// Parses validator calls up to the `}` that closes the list, whose `{`
    /// has been consumed.  Each validator is kept as source text, e.g.
    /// `mustBeInRange(x,0,1)`.
    fn parse_validators(&mut self) -> Vec<String> {
        let mut validators = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;
        while let Some(token) = self.cursor.peek() {
            if token.kind == TokenKind::Newline && depth == 0 {
                break;
            }
            self.cursor.advance();
            match token.kind {
                TokenKind::Punctuation if token.is_close_bracket() && depth == 0 => break,
                TokenKind::Punctuation if token.text == "," && depth == 0 => {
                    validators.push(std::mem::take(&mut current));
                    continue;
                }
                TokenKind::Punctuation if token.is_open_bracket() => depth += 1,
                TokenKind::Punctuation if token.is_close_bracket() => depth -= 1,
                TokenKind::Comment => continue,
                TokenKind::Newline => {
                    current.push(' ');
                    continue;
                }
                _ => (),
            }
            current.push_str(&token.text);
        }
        validators.push(current);
        validators
            .into_iter()
            .map(|validator| validator.trim().to_string())
            .filter(|validator| !validator.is_empty())
            .collect()
    }

    /// Collects the source text of a default value.  The value ends at a
    /// new-line, `;`, `,`, or comment outside brackets.  Inside brackets,
    /// new-lines are kept and comments are dropped.
    fn parse_default(&mut self) -> Option<String> {
        let mut text = String::new();
        let mut depth = 0usize;
        while let Some(token) = self.cursor.peek() {
            match token.kind {
                TokenKind::Comment if token.is_continuation() => {
                    self.cursor.skip_whitespace();
                    continue;
                }
                TokenKind::Newline | TokenKind::Comment if depth == 0 => break,
                TokenKind::Punctuation
                    if depth == 0 && matches!(token.text.as_str(), ";" | ",") =>
                {
                    break
                }
                TokenKind::Comment => (),
                TokenKind::Newline => text.push('\n'),
                TokenKind::Punctuation if token.is_open_bracket() => {
                    depth += 1;
                    text.push_str(&token.text);
                }
                TokenKind::Punctuation if token.is_close_bracket() => {
                    depth = depth.saturating_sub(1);
                    text.push_str(&token.text);
                }
                _ => text.push_str(&token.text),
            }
            self.cursor.advance();
        }
        let text = text.trim();
        (!text.is_empty()).then(|| text.into())
    }
}
