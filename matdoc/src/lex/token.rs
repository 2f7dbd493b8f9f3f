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

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

/// The kind of a [Token].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// Reserved word, e.g. `function` or `end`.
    Keyword,

    /// Identifier.
    Name,

    /// The name declared by a `function` line.
    NameFunction,

    /// Operator, including the transpose `'`.
    Operator,

    /// Brackets, `,`, `;`, and `.` used for field access.
    Punctuation,

    /// Single- or double-quoted string, including its quotes.
    String,

    /// Numeric literal.
    Number,

    /// Line comment, block comment, or `...` continuation marker.
    Comment,

    /// Spaces and tabs.
    Whitespace,

    /// `\n` or `\r\n`.
    Newline,

    /// Any character not accepted by another kind.
    Text,
}

/// A token: a kind, the exact source text it covers, and the 1-based line on
/// which it begins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.is(TokenKind::Keyword, keyword)
    }

    pub fn is_punct(&self, punct: &str) -> bool {
        self.is(TokenKind::Punctuation, punct)
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.is(TokenKind::Operator, operator)
    }

    /// Whitespace or a new-line.
    pub fn is_blank(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Newline)
    }

    /// A `...` continuation marker, which joins this line to the next.
    pub fn is_continuation(&self) -> bool {
        self.kind == TokenKind::Comment && self.text.starts_with("...")
    }

    /// A comment that documents something, as opposed to a continuation
    /// marker.
    pub fn is_doc_comment(&self) -> bool {
        self.kind == TokenKind::Comment && !self.is_continuation()
    }

    pub fn is_open_bracket(&self) -> bool {
        self.kind == TokenKind::Punctuation && matches!(self.text.as_str(), "(" | "[" | "{")
    }

    pub fn is_close_bracket(&self) -> bool {
        self.kind == TokenKind::Punctuation && matches!(self.text.as_str(), ")" | "]" | "}")
    }

    /// The line on which this token ends.  Only block comments and new-lines
    /// span lines.
    pub fn end_line(&self) -> u32 {
        let newlines = self.text.matches('\n').count() as u32;
        if self.kind == TokenKind::Newline {
            self.line
        } else {
            self.line + newlines
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.kind {
            TokenKind::Newline => write!(f, "new-line"),
            TokenKind::Whitespace => write!(f, "white space"),
            _ => write!(f, "`{}`", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Token, TokenKind};

    #[test]
    fn continuation_is_not_documentation() {
        let token = Token::new(TokenKind::Comment, "... more", 1);
        assert!(token.is_continuation());
        assert!(!token.is_doc_comment());
        assert!(Token::new(TokenKind::Comment, "% doc", 1).is_doc_comment());
    }

    #[test]
    fn block_comment_end_line() {
        let token = Token::new(TokenKind::Comment, "%{\nA\nB\n%}", 4);
        assert_eq!(token.end_line(), 7);
        assert_eq!(Token::new(TokenKind::Newline, "\n", 4).end_line(), 4);
    }

    #[test]
    fn display() {
        assert_eq!(Token::new(TokenKind::Name, "x", 1).to_string(), "`x`");
        assert_eq!(Token::new(TokenKind::Newline, "\r\n", 1).to_string(), "new-line");
    }
}
