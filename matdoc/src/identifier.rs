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

//! MATLAB identifiers and reserved words.

pub trait IdentifierChar {
    /// Returns true if `self` may be the first character in an identifier.
    fn may_start_id(self) -> bool;

    /// Returns true if `self` may be a second or subsequent character in an
    /// identifier.
    fn may_continue_id(self) -> bool;
}

impl IdentifierChar for char {
    fn may_start_id(self) -> bool {
        self.is_ascii_alphabetic()
    }

    fn may_continue_id(self) -> bool {
        matches!(self, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_')
    }
}

/// Words that are reserved everywhere in MATLAB code.
pub const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "catch",
    "classdef",
    "continue",
    "else",
    "elseif",
    "end",
    "for",
    "function",
    "global",
    "if",
    "otherwise",
    "parfor",
    "persistent",
    "return",
    "spmd",
    "switch",
    "try",
    "while",
];

/// Words that open a block only when they begin a line, such as the member
/// blocks of a class definition.  Elsewhere they are ordinary names, e.g. a
/// call to the `properties` function.
pub const BLOCK_WORDS: &[&str] = &[
    "arguments",
    "enumeration",
    "events",
    "methods",
    "properties",
];

/// Keywords that open a block closed by `end`.
pub const BLOCK_KEYWORDS: &[&str] = &[
    "if", "while", "for", "parfor", "switch", "try", "spmd", "function",
];

pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

pub fn is_block_word(s: &str) -> bool {
    BLOCK_WORDS.contains(&s)
}

pub fn opens_block(s: &str) -> bool {
    BLOCK_KEYWORDS.contains(&s) || is_block_word(s)
}

/// Returns true if `s` is a plain MATLAB identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.may_start_id()) && chars.all(|c| c.may_continue_id())
}

/// Returns true if `s` is a dotted sequence of identifiers, such as
/// `matlab.mixin.Copyable`.
pub fn is_dotted_identifier(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_identifier)
}

#[cfg(test)]
mod tests {
    use super::{is_dotted_identifier, is_identifier, is_keyword, opens_block};

    #[test]
    fn identifiers() {
        assert!(is_identifier("x"));
        assert!(is_identifier("my_var2"));
        assert!(!is_identifier("2x"));
        assert!(!is_identifier("_x"));
        assert!(!is_identifier(""));
        assert!(is_dotted_identifier("matlab.mixin.Copyable"));
        assert!(!is_dotted_identifier("pkg..Cls"));
    }

    #[test]
    fn keywords() {
        assert!(is_keyword("end"));
        assert!(!is_keyword("properties"));
        assert!(opens_block("properties"));
        assert!(opens_block("parfor"));
        assert!(!opens_block("else"));
    }
}
