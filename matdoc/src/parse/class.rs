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

use log::debug;

use crate::{
    lex::TokenKind,
    model::{
        attributes::{
            CLASS_ATTRIBUTES, ENUMERATION_ATTRIBUTES, EVENT_ATTRIBUTES, METHOD_ATTRIBUTES,
            PROPERTY_ATTRIBUTES,
        },
        Class, Method, Property,
    },
};

use super::{
    docstring::{clean, comment_run},
    ErrorDetails, ParseError, Parser, Warning,
};

impl<'a> Parser<'a> {
    /// Parses a class definition from `classdef` through its `end`.  The
    /// class takes the name `expected` from its file, with a warning if the
    /// declaration says otherwise.
    pub(super) fn parse_class(&mut self, expected: &str) -> Result<Class, ParseError> {
        self.cursor.match_keyword("classdef");
        self.cursor.skip_whitespace();
        let attrs = self.parse_attributes(&CLASS_ATTRIBUTES)?;

        self.cursor.skip_whitespace();
        let line = self.cursor.line();
        let name = self
            .dotted_name()
            .ok_or_else(|| self.error(ErrorDetails::MissingClassName))?;
        if name != expected {
            self.warn(
                line,
                Warning::NameMismatch {
                    declared: name,
                    expected: expected.into(),
                },
            );
        }

        let mut class = Class::new(expected, self.namespace);
        class.attrs = attrs;
        class.location = self.line_location(line);

        self.cursor.skip_whitespace();
        if self.cursor.match_operator("<") {
            loop {
                self.cursor.skip_whitespace();
                match self.dotted_name() {
                    Some(base) => class.superclass_names.push(base),
                    None => {
                        self.warn(self.cursor.line(), Warning::UnexpectedToken(self.found()));
                        break;
                    }
                }
                self.cursor.skip_whitespace();
                if !self.cursor.match_operator("&") {
                    break;
                }
            }
        }

        let trailing = self.finish_line();
        let following = comment_run(&mut self.cursor).and_then(|comments| clean(&comments));
        class.docstring =
            following.or_else(|| trailing.and_then(|comment| clean(&[comment.text.as_str()])));

        loop {
            self.cursor.skip_blank();
            let Some(token) = self.cursor.peek() else {
                self.warn(
                    self.cursor.line(),
                    Warning::UnterminatedClass(class.name.clone()),
                );
                break;
            };
            match token.kind {
                TokenKind::Keyword => match token.text.as_str() {
                    "end" => {
                        self.cursor.advance();
                        break;
                    }
                    "properties" => self.parse_properties(&mut class)?,
                    "methods" => self.parse_methods(&mut class)?,
                    "events" | "enumeration" => self.skip_member_block()?,
                    _ => self.unexpected_in_class(),
                },
                TokenKind::Comment => {
                    self.cursor.advance();
                }
                _ => self.unexpected_in_class(),
            }
        }
        Ok(class)
    }

    fn unexpected_in_class(&mut self) {
        self.warn(self.cursor.line(), Warning::UnexpectedToken(self.found()));
        self.cursor.skip_line();
    }

    fn parse_properties(&mut self, class: &mut Class) -> Result<(), ParseError> {
        self.cursor.advance();
        self.cursor.skip_whitespace();
        let attrs = self.parse_attributes(&PROPERTY_ATTRIBUTES)?;
        self.finish_line();

        for (entry, docstring) in self.parse_entries("properties", false) {
            let property = Property {
                name: entry.name.clone(),
                class: class.name.clone(),
                namespace: class.namespace.clone(),
                attrs: attrs.clone(),
                size: entry.size,
                type_name: entry.type_name,
                validators: entry.validators,
                default: entry.default,
                docstring,
            };
            class.properties.insert(property.name.clone(), property);
        }
        Ok(())
    }

    fn parse_methods(&mut self, class: &mut Class) -> Result<(), ParseError> {
        self.cursor.advance();
        self.cursor.skip_whitespace();
        let attrs = self.parse_attributes(&METHOD_ATTRIBUTES)?;
        self.finish_line();

        loop {
            self.cursor.skip_blank();
            let Some(token) = self.cursor.peek() else {
                self.warn(self.cursor.line(), Warning::UnterminatedBlock("methods"));
                return Ok(());
            };
            if token.is_keyword("end") {
                self.cursor.advance();
                return Ok(());
            } else if token.is_keyword("function") {
                let function = self.parse_function(None)?;
                let method = Method::new(function, attrs.clone(), class.name.as_str());
                class.methods.insert(method.function.name.clone(), method);
            } else if token.kind == TokenKind::Comment {
                self.cursor.advance();
            } else {
                debug!(
                    "{}: skipping {token} in methods block",
                    self.line_location(token.line)
                );
                self.cursor.skip_line();
            }
        }
    }

    /// Checks the attributes of an `events` or `enumeration` block and
    /// skips its contents.
    fn skip_member_block(&mut self) -> Result<(), ParseError> {
        let Some(keyword) = self.cursor.advance() else {
            return Ok(());
        };
        let (vocabulary, block) = match keyword.text.as_str() {
            "events" => (&EVENT_ATTRIBUTES, "events"),
            _ => (&ENUMERATION_ATTRIBUTES, "enumeration"),
        };
        self.cursor.skip_whitespace();
        self.parse_attributes(vocabulary)?;
        if !self.skip_block() {
            self.warn(self.cursor.line(), Warning::UnterminatedBlock(block));
        }
        Ok(())
    }
}
