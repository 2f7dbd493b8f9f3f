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

//! Syntax segmentation.
//!
//! Segmentation accepts MATLAB source as a UTF-8 string and labels each
//! contiguous piece of it with a [TokenKind].  Every character of the input
//! belongs to exactly one segment, so concatenating the segments reproduces
//! the input.  Characters that no rule accepts are labeled
//! [TokenKind::Text]; segmentation never fails.
//!
//! A few pieces of MATLAB syntax need context that a simple regular lexer
//! lacks:
//!
//! - `'` is the transpose operator when it directly follows an operand (an
//!   identifier, a number, a closing bracket, a `.`, or another transpose),
//!   and otherwise starts a string.  The segmenter remembers whether the
//!   previous segment was such an operand.
//!
//! - `%{` and `%}` delimit a block comment only when each is alone on its
//!   line.  Block comments nest.
//!
//! - `properties`, `methods`, `events`, `enumeration`, and `arguments` are
//!   keywords only at the beginning of a line.
//!
//! - The name declared by a `function` line is labeled
//!   [TokenKind::NameFunction], which requires looking ahead to see whether
//!   the line has output arguments.

use bitflags::bitflags;

use crate::identifier::{is_block_word, is_keyword, IdentifierChar};

use super::token::TokenKind;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    /// Ordinary code.
    General,

    /// After `function`, before the `=` that separates the output arguments
    /// from the function name.
    SignatureOutputs,

    /// After `function` (and `=`, if any), before the function name.
    SignatureName,
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Substate: u8 {
        /// Only white space precedes this point on the current line.
        const START_OF_LINE = 1;

        /// The previous segment was an operand that abuts this point, so `'`
        /// here is a transpose.
        const OPERAND = 2;

        /// The previous segment was a `.` field access, so an identifier here
        /// is a field name even if it is spelled like a keyword.
        const AFTER_DOT = 4;
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Segmenter {
    state: (State, Substate),
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter {
    /// Returns a segmenter positioned at the start of a file.
    pub fn new() -> Self {
        Self {
            state: (State::General, Substate::START_OF_LINE),
        }
    }

    fn start_of_line(&self) -> bool {
        self.state.1.contains(Substate::START_OF_LINE)
    }

    fn after_operand(&self) -> bool {
        self.state.1.contains(Substate::OPERAND)
    }

    /// Labels a prefix of `input`, which must be the entire remainder of the
    /// source.  Returns `None` at end of input, otherwise `Some((n, kind))`
    /// where `n` is the number of bytes in the segment, always at least one.
    /// The next call should pass the input that follows those bytes.
    pub fn push(&mut self, input: &str) -> Option<(usize, TokenKind)> {
        self.push_rest(input)
            .map(|(rest, kind)| (input.len() - rest.len(), kind))
    }

    fn push_rest<'a>(&mut self, input: &'a str) -> Option<(&'a str, TokenKind)> {
        let (Some(c), rest) = take(input) else {
            return None;
        };
        let result = match c {
            '\n' => self.newline(rest),
            '\r' if rest.starts_with('\n') => self.newline(&rest[1..]),
            c if c.is_whitespace() => {
                let rest = skip_spaces(rest);
                self.state.1 &= Substate::START_OF_LINE;
                (rest, TokenKind::Whitespace)
            }
            '%' => {
                let rest = if self.start_of_line() && starts_block_comment(rest) {
                    skip_block_comment(input)
                } else {
                    rest_of_line(rest)
                };
                self.state.1 = Substate::empty();
                (rest, TokenKind::Comment)
            }
            '.' => self.parse_dot(input, rest),
            '\'' if self.after_operand() => {
                self.state.1 = Substate::OPERAND;
                (rest, TokenKind::Operator)
            }
            '\'' | '"' => {
                self.state.1 = Substate::empty();
                (skip_string(c, rest), TokenKind::String)
            }
            '0'..='9' => {
                self.state.1 = Substate::OPERAND;
                (skip_number(input), TokenKind::Number)
            }
            c if c.may_start_id() => self.parse_id(input),
            ')' | ']' | '}' => {
                self.state.1 = Substate::OPERAND;
                (rest, TokenKind::Punctuation)
            }
            '(' | '[' | '{' | ',' | ';' => {
                self.state.1 = Substate::empty();
                (rest, TokenKind::Punctuation)
            }
            '=' | '<' | '>' | '~' | '&' | '|' | '+' | '-' | '*' | '/' | '\\' | '^' | ':'
            | '@' | '?' | '!' => self.parse_operator(c, rest),
            _ => {
                self.state.1 = Substate::empty();
                (rest, TokenKind::Text)
            }
        };
        Some(result)
    }

    fn newline<'a>(&mut self, rest: &'a str) -> (&'a str, TokenKind) {
        // A signature never continues past the end of its line.  Continuation
        // markers are comments, so they end it too.
        self.state = (State::General, Substate::START_OF_LINE);
        (rest, TokenKind::Newline)
    }

    fn parse_dot<'a>(&mut self, input: &'a str, rest: &'a str) -> (&'a str, TokenKind) {
        if rest.starts_with("..") {
            self.state.1 = Substate::empty();
            return (rest_of_line(rest), TokenKind::Comment);
        }
        match take(rest) {
            (Some(c), _) if c.is_ascii_digit() => {
                self.state.1 = Substate::OPERAND;
                (skip_number(input), TokenKind::Number)
            }
            (Some('\''), rest) => {
                self.state.1 = Substate::OPERAND;
                (rest, TokenKind::Operator)
            }
            (Some('*' | '/' | '\\' | '^'), rest) => {
                self.state.1 = Substate::empty();
                (rest, TokenKind::Operator)
            }
            _ => {
                self.state.1 = Substate::OPERAND | Substate::AFTER_DOT;
                (rest, TokenKind::Punctuation)
            }
        }
    }

    fn parse_operator<'a>(&mut self, c: char, rest: &'a str) -> (&'a str, TokenKind) {
        let seconds: &[char] = match c {
            '=' | '<' | '>' | '~' => &['='],
            '&' => &['&'],
            '|' => &['|'],
            _ => &[],
        };
        let rest = match take(rest) {
            (Some(c2), rest2) if seconds.contains(&c2) => rest2,
            _ => rest,
        };
        if c == '=' && self.state.0 == State::SignatureOutputs {
            self.state.0 = State::SignatureName;
        }
        self.state.1 = Substate::empty();
        (rest, TokenKind::Operator)
    }

    fn parse_id<'a>(&mut self, input: &'a str) -> (&'a str, TokenKind) {
        let mut rest = skip_id(input);
        let identifier = &input[..input.len() - rest.len()];

        let kind = if self.state.1.contains(Substate::AFTER_DOT) {
            TokenKind::Name
        } else if self.state.0 == State::SignatureName {
            // Accessor methods are declared as `get.Name` or `set.Name`.
            while let Some(after_dot) = rest.strip_prefix('.') {
                match take(after_dot) {
                    (Some(c), _) if c.may_start_id() => rest = skip_id(after_dot),
                    _ => break,
                }
            }
            self.state.0 = State::General;
            TokenKind::NameFunction
        } else if self.state.0 == State::SignatureOutputs {
            TokenKind::Name
        } else if is_keyword(identifier) {
            if identifier == "function" {
                self.state.0 = if signature_has_outputs(rest) {
                    State::SignatureOutputs
                } else {
                    State::SignatureName
                };
            }
            TokenKind::Keyword
        } else if is_block_word(identifier) && self.start_of_line() && ends_block_word(rest) {
            TokenKind::Keyword
        } else {
            TokenKind::Name
        };
        self.state.1 = Substate::OPERAND;
        (rest, kind)
    }
}

fn take(input: &str) -> (Option<char>, &str) {
    let mut iter = input.chars();
    let c = iter.next();
    (c, iter.as_str())
}

/// Skips white space up to, but not including, a line end.  A lone `\r` is
/// white space.
fn skip_spaces(mut input: &str) -> &str {
    loop {
        match take(input) {
            (Some('\n'), _) => return input,
            (Some('\r'), rest) if rest.starts_with('\n') => return input,
            (Some(c), rest) if c.is_whitespace() => input = rest,
            _ => return input,
        }
    }
}

fn skip_id(input: &str) -> &str {
    input.trim_start_matches(|c: char| c.may_continue_id())
}

/// Returns the part of `input` starting at the end of its first line, that
/// is, at the line's `\n` or `\r\n`, or the empty string if there is no line
/// end.
fn rest_of_line(input: &str) -> &str {
    match input.find('\n') {
        Some(index) if index > 0 && input.as_bytes()[index - 1] == b'\r' => &input[index - 1..],
        Some(index) => &input[index..],
        None => "",
    }
}

fn strip_newline(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line)
}

/// `input` follows a `%` at the start of a line.  Returns true if it is `{`
/// followed by nothing but white space up to the end of the line.
fn starts_block_comment(input: &str) -> bool {
    input
        .strip_prefix('{')
        .is_some_and(|rest| rest[..rest.len() - rest_of_line(rest).len()].trim().is_empty())
}

/// `input` starts with a `%{` line.  Returns the input following the line
/// that closes the (possibly nested) block comment, starting at that line's
/// new-line.
fn skip_block_comment(input: &str) -> &str {
    let mut nest = 0usize;
    let mut offset = 0;
    for line in input.split_inclusive('\n') {
        let content = strip_newline(line);
        match content.trim() {
            "%{" => nest += 1,
            "%}" => nest -= 1,
            _ => (),
        }
        if nest == 0 {
            return &input[offset + content.len()..];
        }
        offset += line.len();
    }
    ""
}

/// Skips the body of a string whose opening `quote` has already been
/// consumed.  A doubled quote stands for one quote character.  A string that
/// is not closed by the end of the line ends there.
fn skip_string(quote: char, mut input: &str) -> &str {
    loop {
        match take(input) {
            (None, _) => return input,
            (Some('\n'), _) => return input,
            (Some('\r'), rest) if rest.starts_with('\n') => return input,
            (Some(c), rest) if c == quote => match take(rest) {
                (Some(c2), rest2) if c2 == quote => input = rest2,
                _ => return rest,
            },
            (Some(_), rest) => input = rest,
        }
    }
}

fn skip_digits(input: &str) -> &str {
    input.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn skip_number(input: &str) -> &str {
    if let Some(hex) = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .filter(|hex| hex.starts_with(|c: char| c.is_ascii_hexdigit()))
    {
        return skip_imaginary(hex.trim_start_matches(|c: char| c.is_ascii_hexdigit()));
    }

    let mut rest = skip_digits(input);
    if let Some(fraction) = rest.strip_prefix('.') {
        // `1.*x` is `1 .* x`, and `1.'` is `1 .' `.
        if !fraction.starts_with(['*', '/', '\\', '^', '\'']) && !fraction.starts_with("..") {
            rest = skip_digits(fraction);
        }
    }
    if let Some(exponent) = rest.strip_prefix(['e', 'E', 'd', 'D']) {
        let exponent = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if exponent.starts_with(|c: char| c.is_ascii_digit()) {
            rest = skip_digits(exponent);
        }
    }
    skip_imaginary(rest)
}

fn skip_imaginary(input: &str) -> &str {
    match input.strip_prefix(['i', 'j']) {
        Some(rest) if !rest.starts_with(|c: char| c.may_continue_id()) => rest,
        _ => input,
    }
}

/// `input` follows `function`.  Returns true if the signature on this line
/// has an `=` outside brackets before its parameter list, meaning that it
/// declares output arguments.
fn signature_has_outputs(input: &str) -> bool {
    let mut depth = 0usize;
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' | '%' | ';' => return false,
            '.' if chars.peek() == Some(&'.') => return false,
            '[' | '{' => depth += 1,
            ']' | '}' => depth = depth.saturating_sub(1),
            '(' if depth == 0 => return false,
            '=' if chars.peek() != Some(&'=') => return true,
            _ => (),
        }
    }
    false
}

/// `input` follows a block word such as `properties` at the start of a line.
/// Returns true if what follows is consistent with opening a block: the end
/// of the line, white space, an attribute list, or a comment.  An assignment
/// such as `events = []` uses the word as a variable instead.
fn ends_block_word(input: &str) -> bool {
    let after = skip_spaces(input);
    if after.starts_with('=') && !after.starts_with("==") {
        return false;
    }
    match take(input) {
        (None, _) => true,
        (Some(c), _) => c.is_whitespace() || matches!(c, '(' | '%' | ';' | ','),
    }
}
