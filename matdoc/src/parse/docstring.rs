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

//! Deciding which comments document which declarations.
//!
//! Functions and classes are documented by the comment lines that directly
//! follow their declaration line, or failing that by a comment at the end of
//! the declaration line ([comment_run]).
//!
//! Property and argument entries sit in lists, where a comment between two
//! entries could belong to either one.  [associate] settles this by
//! adjacency.

use crate::{
    lex::{cursor::Cursor, TokenKind},
    model::normalize_doc,
};

/// Collects the comment-only lines that start at the cursor, stopping at the
/// first line that holds anything else, including a blank line.  Returns
/// `None`, without moving the cursor, if there are no such lines.
pub(super) fn comment_run<'a>(cursor: &mut Cursor<'a>) -> Option<Vec<&'a str>> {
    let mut comments = Vec::new();
    loop {
        let start = cursor.position();
        cursor.skip_whitespace();
        match cursor.advance_if(|token| token.is_doc_comment()) {
            Some(comment) => {
                comments.push(comment.text.as_str());
                cursor.advance_if(|token| token.kind == TokenKind::Newline);
            }
            None => {
                cursor.set_position(start);
                break;
            }
        }
    }
    (!comments.is_empty()).then_some(comments)
}

/// Turns comment token texts into docstring text.  Line comments lose their
/// leading `%` markers, block comments lose their `%{` and `%}` lines, then
/// the indentation common to every nonblank line is removed, trailing white
/// space is trimmed, and leading and trailing blank lines are dropped.
pub fn clean_comment(comments: &[&str]) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for comment in comments {
        if comment.starts_with("%{") {
            let mut block: Vec<&str> = comment.lines().skip(1).collect();
            if block.last().is_some_and(|line| line.trim() == "%}") {
                block.pop();
            }
            lines.extend(block);
        } else {
            lines.push(comment.trim_start().trim_start_matches('%'));
        }
    }

    // Only ASCII spaces and tabs count as indentation.
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);
    let lines: Vec<&str> = lines
        .iter()
        .map(|line| match line.trim().is_empty() {
            true => "",
            false => line[indent..].trim_end(),
        })
        .collect();

    let first = lines.iter().position(|line| !line.is_empty());
    let last = lines.iter().rposition(|line| !line.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

/// Cleans `comments` into a docstring, or `None` if nothing is left.
pub(super) fn clean(comments: &[&str]) -> Option<String> {
    normalize_doc(Some(clean_comment(comments)))
}

/// A run of comment-only lines among entries.
#[derive(Clone, Debug)]
pub(super) struct CommentBlock<'a> {
    pub first_line: u32,
    pub last_line: u32,
    pub comments: Vec<&'a str>,

    /// The block begins with the trailing comment of the entry before it.
    pub after_entry: bool,
}

#[derive(Clone, Debug)]
pub(super) enum Item<'a> {
    Comment(CommentBlock<'a>),
    Entry {
        first_line: u32,
        last_line: u32,
        trailing: Option<&'a str>,
    },
}

impl<'a> Item<'a> {
    /// Adds a comment-only line to the list, merging it into the block
    /// above if it directly follows it.
    pub fn push_comment(items: &mut Vec<Item<'a>>, text: &'a str, first_line: u32, last_line: u32) {
        if let Some(Item::Comment(block)) = items.last_mut() {
            if block.last_line + 1 == first_line {
                block.comments.push(text);
                block.last_line = last_line;
                return;
            }
        }
        items.push(Item::Comment(CommentBlock {
            first_line,
            last_line,
            comments: vec![text],
            after_entry: false,
        }));
    }

    /// Adds an entry, with its trailing comment starting a block of its own
    /// so that comment lines below it can join.
    pub fn push_entry(
        items: &mut Vec<Item<'a>>,
        first_line: u32,
        last_line: u32,
        trailing: Option<(&'a str, u32)>,
    ) {
        items.push(Item::Entry {
            first_line,
            last_line,
            trailing: trailing.map(|(text, _)| text),
        });
        if let Some((text, end_line)) = trailing {
            items.push(Item::Comment(CommentBlock {
                first_line: last_line,
                last_line: end_line,
                comments: vec![text],
                after_entry: true,
            }));
        }
    }
}

/// Returns the docstring for each entry in `items`, in order.
///
/// An entry's candidates are the comment block that ends on the line above
/// it, its trailing comment (first line only), and a comment block that
/// starts on the line below it, unless that block is itself directly above
/// another entry.  The first candidate present wins, in that order.  A
/// preceding block that begins with the previous entry's trailing comment
/// does not include that comment.
pub(super) fn associate(items: &[Item<'_>]) -> Vec<Option<String>> {
    let block_at = |index: Option<usize>| match index.and_then(|index| items.get(index)) {
        Some(Item::Comment(block)) => Some(block),
        _ => None,
    };

    let mut docstrings = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let Item::Entry {
            first_line,
            last_line,
            trailing,
        } = item
        else {
            continue;
        };

        let preceding = block_at(index.checked_sub(1))
            .filter(|block| block.last_line + 1 == *first_line)
            .and_then(|block| {
                let skip = if block.after_entry { 1 } else { 0 };
                clean(&block.comments[skip.min(block.comments.len())..])
            });

        let trailing = trailing.and_then(|text| {
            clean(&[text]).and_then(|doc| doc.lines().next().map(String::from))
        });

        let following = block_at(Some(index + 1)).and_then(|block| {
            let (comments, start) = if block.after_entry {
                (&block.comments[1..], *last_line + 1)
            } else {
                (&block.comments[..], block.first_line)
            };
            let above_entry = matches!(
                items.get(index + 2),
                Some(Item::Entry { first_line, .. }) if *first_line == block.last_line + 1
            );
            if start == *last_line + 1 && !above_entry {
                clean(comments)
            } else {
                None
            }
        });

        docstrings.push(preceding.or(trailing).or(following));
    }
    docstrings
}

#[cfg(test)]
mod tests {
    use crate::lex::{cursor::Cursor, tokenize};

    use super::{associate, clean_comment, comment_run, Item};

    #[test]
    fn cleaning() {
        assert_eq!(clean_comment(&["% doc"]), "doc");
        assert_eq!(
            clean_comment(&["%   Line one", "%", "%     indented  ", "%"]),
            "Line one\n\n  indented"
        );
        assert_eq!(clean_comment(&["%{\n  Block\n    text\n%}"]), "Block\n  text");
        assert_eq!(clean_comment(&["%%", "%"]), "");
        assert_eq!(
            clean_comment(&["% \u{a0}No-break indent.", "%  Two spaces.", "% \u{a0}"]),
            "\u{a0}No-break indent.\n Two spaces."
        );
    }

    #[test]
    fn run_stops_at_blank_line() {
        let tokens = tokenize("  % one\n  % two\n\n% three\n");
        let mut cursor = Cursor::new(&tokens);
        assert_eq!(comment_run(&mut cursor), Some(vec!["% one", "% two"]));
        assert_eq!(comment_run(&mut cursor), None);
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn association() {
        // 1: % Doc for A.
        // 2: A = 1  % A trailing
        // 3:        % B doc continued
        // 4: B = 2
        // 5: C = 3
        // 6: % After C.
        // 7:
        // 8: D = 4  % D trailing
        // 9: % Not for D.
        // 10: E = 5
        let mut items = Vec::new();
        Item::push_comment(&mut items, "% Doc for A.", 1, 1);
        Item::push_entry(&mut items, 2, 2, Some(("% A trailing", 2)));
        Item::push_comment(&mut items, "% B doc continued", 3, 3);
        Item::push_entry(&mut items, 4, 4, None);
        Item::push_entry(&mut items, 5, 5, None);
        Item::push_comment(&mut items, "% After C.", 6, 6);
        Item::push_entry(&mut items, 8, 8, Some(("% D trailing", 8)));
        Item::push_comment(&mut items, "% Not for D.", 9, 9);
        Item::push_entry(&mut items, 10, 10, None);
        assert_eq!(
            associate(&items),
            vec![
                Some(String::from("Doc for A.")),
                Some(String::from("B doc continued")),
                Some(String::from("After C.")),
                Some(String::from("D trailing")),
                Some(String::from("Not for D.")),
            ]
        );
    }
}
