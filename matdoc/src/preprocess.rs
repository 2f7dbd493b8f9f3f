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

//! Source normalization before structural parsing.
//!
//! Each pass takes source text and returns rewritten source text.  The passes
//! work on tokens, so text inside strings and comments is never rewritten.

use crate::{
    identifier::{is_block_word, opens_block},
    lex::{tokenize, Token, TokenKind},
};

fn concat<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> String {
    tokens.into_iter().map(|token| token.text.as_str()).collect()
}

fn is_newline(token: &Token) -> bool {
    token.kind == TokenKind::Newline
}

/// Removes the run of blank and comment-only lines at the top of `code`.
pub fn remove_comment_header(code: &str) -> String {
    let tokens = tokenize(code);
    let mut offset = 0;
    let mut line_start = 0;
    for token in &tokens {
        match token.kind {
            TokenKind::Newline => line_start = offset + token.text.len(),
            TokenKind::Whitespace | TokenKind::Comment => (),
            _ => return code[line_start..].into(),
        }
        offset += token.text.len();
    }
    String::new()
}

/// Deletes each `...` continuation marker, together with the rest of its line
/// and the new-line that ends it, joining the two lines.
pub fn remove_line_continuations(code: &str) -> String {
    let tokens = tokenize(code);
    let mut output = String::with_capacity(code.len());
    let mut iter = tokens.iter().peekable();
    while let Some(token) = iter.next() {
        if token.is_continuation() {
            iter.next_if(|token| is_newline(token));
        } else {
            output.push_str(&token.text);
        }
    }
    output
}

/// Inserts `()` after the name in each `function` declaration that lacks a
/// parameter list.
pub fn fix_function_signatures(code: &str) -> String {
    let tokens = tokenize(code);
    let mut output = String::with_capacity(code.len());
    for (index, token) in tokens.iter().enumerate() {
        output.push_str(&token.text);
        if token.kind == TokenKind::NameFunction {
            let has_parameters = tokens[index + 1..]
                .iter()
                .find(|token| token.kind != TokenKind::Whitespace)
                .is_some_and(|token| token.is_punct("("));
            if !has_parameters {
                output.push_str("()");
            }
        }
    }
    output
}

/// Returns the index of the first token in `line` that is not white space.
fn first_significant(line: &[Token]) -> Option<usize> {
    line.iter()
        .position(|token| token.kind != TokenKind::Whitespace)
        .filter(|&index| !is_newline(&line[index]))
}

/// Rewrites method declarations in `methods` blocks that have no body, such as
/// `r = area(obj)` for a method implemented in its own file, as
/// `function r = area(obj); end`, so that every method in a class file has a
/// matching `end`.
pub fn transform_empty_class_methods(code: &str) -> String {
    let tokens = tokenize(code);
    let mut output = String::with_capacity(code.len());

    // Words that opened the blocks enclosing the current line.
    let mut stack: Vec<&str> = Vec::new();
    let mut depth = 0usize;
    for line in tokens.split_inclusive(is_newline) {
        let first = first_significant(line);
        let is_stub = stack.last() == Some(&"methods")
            && depth == 0
            && first.is_some_and(|index| {
                !matches!(line[index].kind, TokenKind::Comment | TokenKind::Keyword)
            });
        if let (true, Some(first)) = (is_stub, first) {
            let end = line
                .iter()
                .position(|token| token.is_doc_comment() || is_newline(token))
                .unwrap_or(line.len());
            let declaration = concat(&line[first..end]);
            let declaration = declaration.trim_end().trim_end_matches(';').trim_end();
            output.push_str(&concat(&line[..first]));
            output.push_str("function ");
            output.push_str(declaration);
            output.push_str("; end");
            let rest = &line[end..];
            if rest.first().is_some_and(|token| token.is_doc_comment()) {
                output.push(' ');
            }
            output.push_str(&concat(rest));
            continue;
        }

        for token in line {
            match token.kind {
                TokenKind::Keyword if token.text == "end" && depth == 0 => {
                    stack.pop();
                }
                TokenKind::Keyword if token.text == "classdef" => stack.push("classdef"),
                TokenKind::Keyword if is_block_word(&token.text) => {
                    // Member blocks only open directly inside a class, and
                    // argument blocks directly inside a function.
                    let parent = match token.text.as_str() {
                        "arguments" => "function",
                        _ => "classdef",
                    };
                    if stack.last() == Some(&parent) {
                        stack.push(token.text.as_str());
                    }
                }
                TokenKind::Keyword if opens_block(&token.text) => stack.push(token.text.as_str()),
                TokenKind::Punctuation if token.is_open_bracket() => depth += 1,
                TokenKind::Punctuation if token.is_close_bracket() => {
                    depth = depth.saturating_sub(1)
                }
                _ => (),
            }
        }
        output.push_str(&concat(line));
    }
    output
}

/// Applies the whole-file normalization passes in order: continuation
/// removal, signature fixing, then method stub rewriting.
pub fn preprocess(code: &str) -> String {
    transform_empty_class_methods(&fix_function_signatures(&remove_line_continuations(code)))
}

#[cfg(test)]
mod tests {
    use super::{
        fix_function_signatures, preprocess, remove_comment_header, remove_line_continuations,
        transform_empty_class_methods,
    };

    fn assert_lines_eq(expected: &str, actual: &str) {
        if expected != actual {
            eprintln!("Unexpected output:\n--- expected\n+++ actual");
            for result in diff::lines(expected, actual) {
                match result {
                    diff::Result::Left(left) => eprintln!("-{left}"),
                    diff::Result::Both(left, _right) => eprintln!(" {left}"),
                    diff::Result::Right(right) => eprintln!("+{right}"),
                }
            }
            panic!();
        }
    }

    #[test]
    fn comment_header() {
        assert_lines_eq(
            "function f\n% doc\n",
            &remove_comment_header("% Copyright\n%\n\n%{\nlicense\n%}\nfunction f\n% doc\n"),
        );
        assert_lines_eq("  x = 1;\n", &remove_comment_header("% c\n  x = 1;\n"));
        assert_lines_eq("", &remove_comment_header("% a\n\n% b\n"));
        assert_lines_eq("x\n", &remove_comment_header("x\n"));
    }

    #[test]
    fn line_continuations() {
        assert_lines_eq(
            "x = [1, 2,      3];\ns = 'a...b';\n% c ...\n",
            &remove_line_continuations(
                "x = [1, 2, ... first\n     3];\ns = 'a...b';\n% c ...\n",
            ),
        );
    }

    #[test]
    fn function_signatures() {
        assert_lines_eq(
            "function go()\nend\nfunction r = get.X(obj)\nend\nfunction [a] = h() % doc\n",
            &fix_function_signatures(
                "function go\nend\nfunction r = get.X(obj)\nend\nfunction [a] = h % doc\n",
            ),
        );
        assert_lines_eq(
            "function f ()\n",
            &fix_function_signatures("function f ()\n"),
        );
    }

    #[test]
    fn empty_class_methods() {
        let input = r#"classdef C
    methods
        function obj = C()
            if true
                x = y(end);
            end
        end
        r = stub(obj, x)
        % comment
        other(obj);   % doc
    end
    properties
        P = f(1)
    end
end
"#;
        let expected = r#"classdef C
    methods
        function obj = C()
            if true
                x = y(end);
            end
        end
        function r = stub(obj, x); end
        % comment
        function other(obj); end % doc
    end
    properties
        P = f(1)
    end
end
"#;
        assert_lines_eq(expected, &transform_empty_class_methods(input));
        assert_lines_eq(expected, &transform_empty_class_methods(expected));
    }

    #[test]
    fn whole_file() {
        let input = r#"classdef (Abstract) Shape
    methods (Abstract)
        a = area(obj, ...
                 units)
        draw
    end
end
"#;
        let expected = r#"classdef (Abstract) Shape
    methods (Abstract)
        function a = area(obj,                  units); end
        function draw; end
    end
end
"#;
        assert_lines_eq(expected, &preprocess(input));
    }
}
