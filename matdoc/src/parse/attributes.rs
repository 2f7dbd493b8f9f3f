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
    model::{AttrValue, Attributes, Vocabulary},
};

use super::{ErrorDetails, ParseError, Parser, Warning};

/// Removes the quotes from string literal `s` and undoubles the quotes
/// inside it.
pub(super) fn unquote(s: &str) -> String {
    let Some(quote) = s.chars().next() else {
        return String::new();
    };
    let inner = &s[1..];
    let inner = match inner.strip_suffix(quote) {
        Some(inner) if s.len() >= 2 => inner,
        _ => inner,
    };
    let doubled = format!("{quote}{quote}");
    inner.replace(&doubled, &quote.to_string())
}

impl<'a> Parser<'a> {
    /// Parses a parenthesized attribute list such as `(Access = private,
    /// ~Hidden)`, checking each attribute against `vocabulary`.
    pub(super) fn parse_attributes(
        &mut self,
        vocabulary: &'static Vocabulary,
    ) -> Result<Attributes, ParseError> {
        let mut attributes = Attributes::new();
        if !self.cursor.match_punct("(") {
            return Ok(attributes);
        }
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.match_punct(")") {
                return Ok(attributes);
            }

            let negated = self.cursor.match_operator("~") || self.cursor.match_operator("!");
            self.cursor.skip_whitespace();
            let line = self.cursor.line();
            let Some(name) = self.cursor.advance_if(|token| token.kind == TokenKind::Name) else {
                return Err(self.error(ErrorDetails::MalformedAttributes {
                    expected: "an attribute name",
                    found: self.found(),
                }));
            };
            let Some((canonical, kind)) = vocabulary.lookup(&name.text) else {
                return Err(ParseError::new(
                    self.line_location(line),
                    ErrorDetails::UnknownAttribute {
                        vocabulary: vocabulary.name,
                        name: name.text.clone(),
                    },
                ));
            };

            self.cursor.skip_whitespace();
            let value = if self.cursor.match_operator("=") {
                self.cursor.skip_whitespace();
                match self.parse_attr_value()? {
                    AttrValue::Bool(value) if negated => AttrValue::Bool(!value),
                    value => value,
                }
            } else {
                AttrValue::Bool(!negated)
            };
            if !kind.accepts(&value) {
                self.warn(
                    line,
                    Warning::AttributeKind {
                        name: canonical.into(),
                        expected: kind,
                        value: value.clone(),
                    },
                );
            }
            attributes.insert(canonical.into(), value);

            self.cursor.skip_whitespace();
            if !self.cursor.match_punct(",")
                && !self.cursor.peek().is_some_and(|token| token.is_punct(")"))
            {
                return Err(self.error(ErrorDetails::MalformedAttributes {
                    expected: "`,` or `)`",
                    found: self.found(),
                }));
            }
        }
    }

    fn parse_attr_value(&mut self) -> Result<AttrValue, ParseError> {
        let Some(token) = self.cursor.peek() else {
            return Err(self.value_error());
        };
        match token.kind {
            TokenKind::String => {
                let mut value = String::new();
                while let Some(token) = self
                    .cursor
                    .advance_if(|token| token.kind == TokenKind::String)
                {
                    value.push_str(&unquote(&token.text));
                    self.cursor.skip_whitespace();
                }
                Ok(AttrValue::String(value))
            }
            TokenKind::Number => {
                self.cursor.advance();
                Ok(AttrValue::Name(token.text.clone()))
            }
            TokenKind::Name => match self.dotted_name() {
                Some(name) if name == "true" => Ok(AttrValue::Bool(true)),
                Some(name) if name == "false" => Ok(AttrValue::Bool(false)),
                Some(name) => Ok(AttrValue::Name(name)),
                None => Err(self.value_error()),
            },
            TokenKind::Operator if token.text == "?" => {
                self.cursor.advance();
                match self.dotted_name() {
                    Some(name) => Ok(AttrValue::Name(format!("?{name}"))),
                    None => Err(self.error(ErrorDetails::MalformedAttributes {
                        expected: "a class name after `?`",
                        found: self.found(),
                    })),
                }
            }
            TokenKind::Punctuation if token.text == "{" => {
                self.cursor.advance();
                self.parse_attr_list()
            }
            _ => Err(self.value_error()),
        }
    }

    /// Parses the items of a `{...}` list, whose opening brace has been
    /// consumed.  Items are separated by commas or white space.  String
    /// items lose their quotes.
    fn parse_attr_list(&mut self) -> Result<AttrValue, ParseError> {
        let mut items = Vec::new();
        let mut item = String::new();
        let mut flush = |item: &mut String| {
            if !item.is_empty() {
                items.push(std::mem::take(item));
            }
        };
        loop {
            let Some(token) = self.cursor.peek() else {
                return Err(self.error(ErrorDetails::MalformedAttributes {
                    expected: "`}`",
                    found: self.found(),
                }));
            };
            match token.kind {
                TokenKind::Newline => {
                    return Err(self.error(ErrorDetails::MalformedAttributes {
                        expected: "`}`",
                        found: self.found(),
                    }));
                }
                TokenKind::Punctuation if token.text == "}" => {
                    self.cursor.advance();
                    flush(&mut item);
                    break;
                }
                TokenKind::Punctuation if token.text == "," => {
                    self.cursor.advance();
                    flush(&mut item);
                }
                TokenKind::Whitespace | TokenKind::Comment => {
                    self.cursor.skip_whitespace();
                    self.cursor.advance_if(|token| token.is_doc_comment());
                    flush(&mut item);
                }
                TokenKind::String => {
                    self.cursor.advance();
                    item.push_str(&unquote(&token.text));
                }
                _ => {
                    self.cursor.advance();
                    item.push_str(&token.text);
                }
            }
        }
        Ok(AttrValue::List(items))
    }

    fn value_error(&self) -> ParseError {
        self.error(ErrorDetails::MalformedAttributes {
            expected: "an attribute value",
            found: self.found(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::unquote;

    #[test]
    fn unquoting() {
        assert_eq!(unquote("'it''s'"), "it's");
        assert_eq!(unquote("\"say \"\"hi\"\"\""), "say \"hi\"");
        assert_eq!(unquote("''"), "");
        assert_eq!(unquote("'unterminated"), "unterminated");
    }
}
