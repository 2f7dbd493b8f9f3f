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

use crate::{
    lex::TokenKind,
    model::{attributes::ARGUMENTS_ATTRIBUTES, AttrValue, Arguments, Function},
};

use super::{
    describe,
    docstring::{clean, comment_run},
    ErrorDetails, ParseError, Parser, Warning,
};

impl<'a> Parser<'a> {
    /// Parses a function from its `function` keyword through its `end`, or
    /// through the end of input for a file function written without `end`.
    /// If `expected` is given, warns if the function has another name.
    pub(super) fn parse_function(
        &mut self,
        expected: Option<&str>,
    ) -> Result<Function, ParseError> {
        self.cursor.match_keyword("function");

        let mut retv = Arguments::new();
        let name = loop {
            self.cursor.skip_whitespace();
            let Some(token) = self.cursor.peek() else {
                return Err(self.error(ErrorDetails::MissingFunctionName));
            };
            match token.kind {
                TokenKind::NameFunction => {
                    self.cursor.advance();
                    break token;
                }
                TokenKind::Name => retv.push(token.text.as_str()),
                TokenKind::Punctuation if matches!(token.text.as_str(), "[" | "]" | ",") => (),
                TokenKind::Operator if token.text == "=" => (),
                TokenKind::Newline | TokenKind::Comment => {
                    return Err(self.error(ErrorDetails::MissingFunctionName));
                }
                _ => {
                    return Err(self.error(ErrorDetails::MalformedSignature {
                        expected: "output arguments or a function name",
                        found: token.to_string(),
                    }));
                }
            }
            self.cursor.advance();
        };
        if let Some(expected) = expected {
            if name.text != expected {
                self.warn(
                    name.line,
                    Warning::NameMismatch {
                        declared: name.text.clone(),
                        expected: expected.into(),
                    },
                );
            }
        }

        let args = self.parse_parameters()?;

        let trailing = self.finish_line();
        let one_liner = !(self.cursor.at_end()
            || self
                .cursor
                .previous()
                .is_some_and(|token| token.kind == TokenKind::Newline));

        let mut function = Function {
            name: name.text.clone(),
            namespace: self.namespace.into(),
            docstring: None,
            args,
            retv,
        };

        if one_liner {
            // The body shares the signature's line, so a comment there
            // belongs after `end`, or on the lines that follow.
            self.skip_block();
            self.cursor.skip_separators();
            let after_end = self.cursor.advance_if(|token| token.is_doc_comment());
            self.cursor
                .advance_if(|token| token.kind == TokenKind::Newline);
            function.docstring = match after_end {
                Some(comment) => clean(&[comment.text.as_str()]),
                None => comment_run(&mut self.cursor).and_then(|comments| clean(&comments)),
            };
            return Ok(function);
        }

        let following = comment_run(&mut self.cursor).and_then(|comments| clean(&comments));
        function.docstring =
            following.or_else(|| trailing.and_then(|comment| clean(&[comment.text.as_str()])));

        loop {
            self.skip_comment_lines();
            if !self
                .cursor
                .peek()
                .is_some_and(|token| token.is_keyword("arguments"))
            {
                break;
            }
            self.parse_arguments_block(&mut function)?;
        }

        self.skip_block();
        Ok(function)
    }

    /// Parses a parameter list such as `(x, ~, varargin)`, if present.
    fn parse_parameters(&mut self) -> Result<Arguments, ParseError> {
        let mut args = Arguments::new();
        self.cursor.skip_whitespace();
        if !self.cursor.match_punct("(") {
            return Ok(args);
        }
        let mut expect_name = true;
        loop {
            self.cursor.skip_whitespace();
            let token = self.cursor.peek();
            match token {
                Some(token) if token.is_punct(")") => {
                    self.cursor.advance();
                    return Ok(args);
                }
                Some(token)
                    if expect_name && (token.kind == TokenKind::Name || token.is_operator("~")) =>
                {
                    args.push(token.text.as_str());
                    expect_name = false;
                }
                Some(token) if !expect_name && token.is_punct(",") => expect_name = true,
                _ => {
                    return Err(self.error(ErrorDetails::MalformedSignature {
                        expected: if expect_name {
                            "a parameter name"
                        } else {
                            "`,` or `)`"
                        },
                        found: describe(token),
                    }));
                }
            }
            self.cursor.advance();
        }
    }

    /// Skips blank lines and lines that hold only a comment.
    fn skip_comment_lines(&mut self) {
        loop {
            self.cursor.skip_blank();
            if self
                .cursor
                .advance_if(|token| token.kind == TokenKind::Comment)
                .is_none()
            {
                break;
            }
        }
    }

    /// Parses an `arguments` block into the function's parameters, or into
    /// its return values for an `(Output)` block.
    fn parse_arguments_block(&mut self, function: &mut Function) -> Result<(), ParseError> {
        self.cursor.advance();
        self.cursor.skip_whitespace();
        let attributes = self.parse_attributes(&ARGUMENTS_ATTRIBUTES)?;
        self.finish_line();

        let target = match attributes.get("Output") {
            Some(AttrValue::Bool(true)) => &mut function.retv,
            _ => &mut function.args,
        };
        for (entry, docstring) in self.parse_entries("arguments", true) {
            let name = entry.name.clone();
            *target.get_or_push(&name) = entry.into_spec(docstring);
        }
        Ok(())
    }
}
