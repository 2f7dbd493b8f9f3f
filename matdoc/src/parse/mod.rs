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

//! Structural parsing.
//!
//! The parser walks the tokens of one preprocessed source unit and builds the
//! [Entity] it declares.  It recognizes declarations, that is, function
//! signatures, class headers, member blocks, attribute lists, and property
//! and argument entries, and skips everything else by tracking the balance
//! between block keywords and `end`:
//!
//! - [Parser::parse_function] handles a function signature, its docstring,
//!   its `arguments` blocks, and then skips its body.
//!
//! - [Parser::parse_class] handles a class header and then dispatches on
//!   each member block: `properties` and `methods` blocks are parsed,
//!   `events` and `enumeration` blocks are skipped.
//!
//! Anything else is a script, whose body is kept as text.
//!
//! Problems that leave a usable result, such as a class whose name differs
//! from its file's, are reported through a callback as warnings.  Problems
//! that do not, such as an unknown attribute or a function without a name,
//! are a [ParseError] for the whole unit.

use std::fmt::{Display, Formatter, Result as FmtResult};

use displaydoc::Display;
use thiserror::Error as ThisError;

use crate::{
    identifier::BLOCK_KEYWORDS,
    lex::{cursor::Cursor, tokenize, Token, TokenKind},
    message::{Diagnostic, Location},
    model::{AttrKind, AttrValue, Entity, Script},
    preprocess::{preprocess, remove_comment_header},
    source::SourceFile,
};

mod attributes;
mod block;
mod class;
mod docstring;
mod entry;
mod function;

pub use docstring::clean_comment;

/// An error that prevents parsing a source unit.
#[derive(Debug)]
pub struct ParseError {
    /// Where the error occurred.
    pub location: Location,

    /// Details of the error.
    pub details: ErrorDetails,
}

impl std::error::Error for ParseError {}

impl ParseError {
    pub fn new(location: Location, details: ErrorDetails) -> Self {
        Self { location, details }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if !self.location.is_empty() {
            write!(f, "{}: ", self.location)?;
        }
        write!(f, "{}", &self.details)
    }
}

#[derive(Display, ThisError, Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetails {
    /// Function declaration lacks a name.
    MissingFunctionName,

    /// Class declaration lacks a name.
    MissingClassName,

    /// Expected {expected} in function signature but found {found}.
    MalformedSignature {
        expected: &'static str,
        found: String,
    },

    /// Unknown {vocabulary} attribute `{name}`.
    UnknownAttribute {
        vocabulary: &'static str,
        name: String,
    },

    /// Expected {expected} in attribute list but found {found}.
    MalformedAttributes {
        expected: &'static str,
        found: String,
    },
}

/// A problem that parsing works around.
#[derive(Display, ThisError, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Declared name `{declared}` does not match expected name `{expected}`.
    NameMismatch { declared: String, expected: String },

    /// Attribute `{name}` should be {expected}, not `{value}`.
    AttributeKind {
        name: String,
        expected: AttrKind,
        value: AttrValue,
    },

    /// Unexpected {0} in class body.  Skipping to the end of the line.
    UnexpectedToken(String),

    /// Unexpected {0} in {1} block.  Skipping to the end of the line.
    UnexpectedInBlock(String, &'static str),

    /// Invalid size specification for `{0}`.
    InvalidSize(String),

    /// End of input inside {0} block.
    UnterminatedBlock(&'static str),

    /// End of input before `end` of class `{0}`.
    UnterminatedClass(String),
}

/// Describes `token` for a message, or end of input if it is `None`.
fn describe(token: Option<&Token>) -> String {
    match token {
        Some(token) => token.to_string(),
        None => String::from("end of input"),
    }
}

/// Parsing state for one source unit.
struct Parser<'a> {
    cursor: Cursor<'a>,

    /// The file being parsed, for messages.
    location: Location,

    /// Number of lines removed from the top of the file before tokenizing,
    /// so that messages report lines in the original file.
    line_offset: u32,

    /// Dotted name of the namespace that owns the unit.
    namespace: &'a str,

    warn: &'a mut dyn FnMut(Diagnostic),
}

impl<'a> Parser<'a> {
    fn line_location(&self, line: u32) -> Location {
        self.location.with_line(line + self.line_offset)
    }

    fn warn(&mut self, line: u32, warning: Warning) {
        let diagnostic = Diagnostic::warning(self.line_location(line), warning.to_string());
        (self.warn)(diagnostic);
    }

    /// Returns an error at the current token.
    fn error(&self, details: ErrorDetails) -> ParseError {
        ParseError::new(self.line_location(self.cursor.line()), details)
    }

    /// Describes the current token, for messages.
    fn found(&self) -> String {
        describe(self.cursor.peek())
    }

    /// Parses a dotted name such as `pkg.Base`, returning `None` if the
    /// current token is not a name.
    fn dotted_name(&mut self) -> Option<String> {
        let first = self.cursor.advance_if(|token| token.kind == TokenKind::Name)?;
        let mut name = first.text.clone();
        while self.cursor.peek().is_some_and(|token| token.is_punct("."))
            && self
                .cursor
                .peek_nth(1)
                .is_some_and(|token| token.kind == TokenKind::Name)
        {
            self.cursor.advance();
            name.push('.');
            name.push_str(self.cursor.advance().map_or("", |token| token.text.as_str()));
        }
        Some(name)
    }

    /// Skips the rest of a declaration's line.  Returns the text of a
    /// comment that ends the line, if any.  Leaves the cursor at the start
    /// of the next line, or on the first statement if more code follows on
    /// the same line.
    fn finish_line(&mut self) -> Option<&'a Token> {
        self.cursor.skip_separators();
        let comment = self.cursor.advance_if(|token| token.is_doc_comment());
        self.cursor
            .advance_if(|token| token.kind == TokenKind::Newline);
        comment
    }

    /// Skips a block whose opening keyword has already been consumed,
    /// through its matching `end`.  Only `end` outside brackets counts,
    /// since `end` inside brackets is an index.  End of input also ends the
    /// block.  Returns false in that case.
    fn skip_block(&mut self) -> bool {
        let mut depth = 1usize;
        let mut brackets = 0usize;
        while let Some(token) = self.cursor.advance() {
            match token.kind {
                TokenKind::Keyword if token.text == "end" && brackets == 0 => {
                    depth -= 1;
                    if depth == 0 {
                        return true;
                    }
                }
                TokenKind::Keyword
                    if BLOCK_KEYWORDS.contains(&token.text.as_str())
                        || token.text == "arguments" =>
                {
                    depth += 1
                }
                TokenKind::Punctuation if token.is_open_bracket() => brackets += 1,
                TokenKind::Punctuation if token.is_close_bracket() => {
                    brackets = brackets.saturating_sub(1)
                }
                _ => (),
            }
        }
        false
    }
}

/// The kind of unit a source file holds, judged by its first significant
/// token.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum UnitKind {
    Function,
    Class,
    Script,
}

fn classify(tokens: &[Token]) -> UnitKind {
    let first = tokens
        .iter()
        .find(|token| !token.is_blank() && token.kind != TokenKind::Comment);
    match first {
        Some(token) if token.is_keyword("function") => UnitKind::Function,
        Some(token) if token.is_keyword("classdef") => UnitKind::Class,
        _ => UnitKind::Script,
    }
}

/// Parses `source`, which should declare an entity called `name` in
/// `namespace`.  Warnings are passed to `warn`.
pub fn parse_source<F>(
    source: &SourceFile,
    name: &str,
    namespace: &str,
    mut warn: F,
) -> Result<Entity, ParseError>
where
    F: FnMut(Diagnostic),
{
    let text = source.contents.as_str();
    let raw_tokens = tokenize(text);
    let kind = classify(&raw_tokens);
    if kind == UnitKind::Script {
        return Ok(Entity::Script(
            parse_script(text, &raw_tokens, name, namespace).into(),
        ));
    }

    let body = remove_comment_header(text);
    let line_offset = text[..text.len() - body.len()].matches('\n').count() as u32;
    let tokens = tokenize(&preprocess(&body));
    let mut parser = Parser {
        cursor: Cursor::new(&tokens),
        location: source.location(),
        line_offset,
        namespace,
        warn: &mut warn,
    };
    parser.cursor.skip_blank();
    if kind == UnitKind::Class {
        Ok(Entity::Class(parser.parse_class(name)?.into()))
    } else {
        Ok(Entity::Function(parser.parse_function(Some(name))?.into()))
    }
}

/// A script's docstring is the comment block at the top of the file.
fn parse_script(text: &str, tokens: &[Token], name: &str, namespace: &str) -> Script {
    let mut cursor = Cursor::new(tokens);
    cursor.skip_blank();
    let docstring =
        docstring::comment_run(&mut cursor).and_then(|comments| docstring::clean(&comments));
    Script {
        name: name.into(),
        namespace: namespace.into(),
        docstring,
        body: text.into(),
    }
}

/// Parses `text` as if it were a file named `name`.m.
pub fn parse_str<F>(
    text: &str,
    name: &str,
    namespace: &str,
    warn: F,
) -> Result<Entity, ParseError>
where
    F: FnMut(Diagnostic),
{
    parse_source(&SourceFile::for_string(text.into()), name, namespace, warn)
}

#[cfg(test)]
mod tests;
