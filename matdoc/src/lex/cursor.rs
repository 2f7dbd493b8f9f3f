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

use super::token::{Token, TokenKind};

/// A position within a slice of tokens.
///
/// Parsers advance a cursor by hand and back it up by saving and restoring
/// [Cursor::position].
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len());
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_nth(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + n)
    }

    /// Returns the token before the current one, if any.
    pub fn previous(&self) -> Option<&'a Token> {
        self.pos.checked_sub(1).and_then(|pos| self.tokens.get(pos))
    }

    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// The line of the current token, or of the last token at end of input.
    pub fn line(&self) -> u32 {
        self.peek()
            .or_else(|| self.tokens.last())
            .map_or(1, |token| token.line)
    }

    /// Advances past the current token if `f` accepts it.
    pub fn advance_if(&mut self, f: impl FnOnce(&Token) -> bool) -> Option<&'a Token> {
        match self.peek() {
            Some(token) if f(token) => self.advance(),
            _ => None,
        }
    }

    pub fn match_keyword(&mut self, keyword: &str) -> bool {
        self.advance_if(|token| token.is_keyword(keyword)).is_some()
    }

    pub fn match_punct(&mut self, punct: &str) -> bool {
        self.advance_if(|token| token.is_punct(punct)).is_some()
    }

    pub fn match_operator(&mut self, operator: &str) -> bool {
        self.advance_if(|token| token.is_operator(operator)).is_some()
    }

    /// Skips white space within a line.  A continuation marker and the
    /// new-line that follows it count as white space, since they join two
    /// lines into one.
    pub fn skip_whitespace(&mut self) {
        while let Some(token) = self.peek() {
            if token.kind == TokenKind::Whitespace {
                self.pos += 1;
            } else if token.is_continuation() {
                self.pos += 1;
                self.advance_if(|token| token.kind == TokenKind::Newline);
            } else {
                break;
            }
        }
    }

    /// Skips white space and new-lines, but not comments.
    pub fn skip_blank(&mut self) {
        loop {
            self.skip_whitespace();
            if self.advance_if(|token| token.kind == TokenKind::Newline).is_none() {
                break;
            }
        }
    }

    /// Skips white space and statement separators (`,` and `;`), stopping at
    /// the end of a line.
    pub fn skip_separators(&mut self) {
        loop {
            self.skip_whitespace();
            if !(self.match_punct(",") || self.match_punct(";")) {
                break;
            }
        }
    }

    /// Skips the rest of the current line, including its new-line.
    pub fn skip_line(&mut self) {
        while let Some(token) = self.advance() {
            if token.kind == TokenKind::Newline {
                break;
            }
        }
    }

    /// Returns true if the rest of the current line holds only white space
    /// and, optionally, a comment.
    pub fn at_end_of_line(&self) -> bool {
        let mut cursor = self.clone();
        cursor.skip_whitespace();
        cursor.advance_if(|token| token.is_doc_comment());
        cursor
            .peek()
            .is_none_or(|token| token.kind == TokenKind::Newline)
    }
}

#[cfg(test)]
mod tests {
    use crate::lex::{tokenize, TokenKind};

    use super::Cursor;

    #[test]
    fn continuation_is_whitespace() {
        let tokens = tokenize("a ...\n   b\nc");
        let mut cursor = Cursor::new(&tokens);
        assert_eq!(cursor.advance().map(|t| t.text.as_str()), Some("a"));
        cursor.skip_whitespace();
        assert_eq!(cursor.peek().map(|t| t.text.as_str()), Some("b"));
        cursor.advance();
        cursor.skip_whitespace();
        assert_eq!(cursor.peek().map(|t| t.kind), Some(TokenKind::Newline));
        cursor.skip_blank();
        assert_eq!(cursor.peek().map(|t| (t.text.as_str(), t.line)), Some(("c", 3)));
    }

    #[test]
    fn end_of_line() {
        let tokens = tokenize("x;  % trailing\ny");
        let mut cursor = Cursor::new(&tokens);
        cursor.advance();
        assert!(!cursor.at_end_of_line());
        cursor.skip_separators();
        assert!(cursor.at_end_of_line());
        cursor.skip_line();
        assert_eq!(cursor.peek().map(|t| t.text.as_str()), Some("y"));
        cursor.advance();
        assert!(cursor.at_end() && cursor.at_end_of_line());
    }
}
