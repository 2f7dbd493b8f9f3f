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

use crate::lex::TokenKind;

use super::{
    docstring::{associate, Item},
    entry::Entry,
    Parser, Warning,
};

impl<'a> Parser<'a> {
    /// Parses the entries of a `properties` or `arguments` block, whose
    /// header line has been consumed, through the block's `end`.  Returns
    /// each entry with its docstring.
    pub(super) fn parse_entries(
        &mut self,
        block: &'static str,
        allow_dotted: bool,
    ) -> Vec<(Entry<'a>, Option<String>)> {
        let mut items = Vec::new();
        let mut entries = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            let Some(token) = self.cursor.peek() else {
                self.warn(self.cursor.line(), Warning::UnterminatedBlock(block));
                break;
            };
            match token.kind {
                TokenKind::Keyword if token.text == "end" => {
                    self.cursor.advance();
                    break;
                }
                TokenKind::Name => {
                    let entry = self.parse_entry(allow_dotted);
                    Item::push_entry(
                        &mut items,
                        entry.first_line,
                        entry.last_line,
                        entry
                            .trailing
                            .map(|token| (token.text.as_str(), token.end_line())),
                    );
                    entries.push(entry);
                }
                TokenKind::Comment => {
                    self.cursor.advance();
                    Item::push_comment(&mut items, &token.text, token.line, token.end_line());
                }
                TokenKind::Newline => {
                    self.cursor.advance();
                }
                TokenKind::Punctuation if matches!(token.text.as_str(), ";" | ",") => {
                    self.cursor.advance();
                }
                _ => {
                    self.warn(
                        token.line,
                        Warning::UnexpectedInBlock(token.to_string(), block),
                    );
                    self.cursor.skip_line();
                }
            }
        }
        entries.into_iter().zip(associate(&items)).collect()
    }
}
