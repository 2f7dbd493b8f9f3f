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

//! Source files.

use std::{fs, io::Result as IoResult, iter::once, path::Path, sync::Arc};

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

use crate::message::Location;

/// The contents of a MATLAB source file, decoded to UTF-8, with its file name
/// and an index for finding lines by number.
#[derive(Clone, Debug)]
pub struct SourceFile {
    /// `None` if this source came from a string.
    pub file_name: Option<Arc<String>>,

    /// Encoding that the file was decoded from.
    pub encoding: &'static Encoding,

    /// Source text, with any byte order mark removed.
    pub contents: String,

    /// Byte offsets into `contents` of starts of lines.  The first element is
    /// 0.
    lines: Vec<usize>,
}

impl SourceFile {
    /// Reads `path` and decodes it from `encoding` or, if `encoding` is
    /// `None`, from whatever encoding the contents look like.  A byte order
    /// mark, if present, overrides either choice.
    pub fn for_file<P>(path: P, encoding: Option<&'static Encoding>) -> IoResult<Self>
    where
        P: AsRef<Path>,
    {
        let bytes = fs::read(path.as_ref())?;
        Ok(Self::for_bytes(
            &bytes,
            Some(path.as_ref().to_string_lossy().to_string()),
            encoding,
        ))
    }

    /// Decodes `bytes` the same way as [SourceFile::for_file].
    pub fn for_bytes(
        bytes: &[u8],
        file_name: Option<String>,
        encoding: Option<&'static Encoding>,
    ) -> Self {
        let encoding = encoding.unwrap_or_else(|| {
            let mut encoding_detector = EncodingDetector::new();
            encoding_detector.feed(bytes, true);
            encoding_detector.guess(None, true)
        });
        let (contents, encoding, malformed) = encoding.decode(bytes);
        if malformed {
            log::warn!(
                "{}: contains byte sequences that are invalid in {}",
                file_name.as_deref().unwrap_or("<input>"),
                encoding.name()
            );
        }
        Self::new(contents.into_owned(), file_name, encoding)
    }

    /// Creates a new `SourceFile` for `contents`, recording that `contents`
    /// was originally encoded in `encoding` and that it was read from
    /// `file_name`.
    pub fn new(contents: String, file_name: Option<String>, encoding: &'static Encoding) -> Self {
        let lines = once(0)
            .chain(contents.match_indices('\n').map(|(index, _s)| index + 1))
            .filter(|index| *index < contents.len())
            .collect::<Vec<_>>();
        Self {
            file_name: file_name.map(Arc::new),
            encoding,
            contents,
            lines,
        }
    }

    /// Returns a `SourceFile` for `contents`.
    pub fn for_string(contents: String) -> Self {
        Self::new(contents, None, UTF_8)
    }

    /// Returns the location of the whole file.
    pub fn location(&self) -> Location {
        Location {
            file_name: self.file_name.clone(),
            lines: None,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the text of 1-based line `line_number`, without its new-line.
    pub fn get_line(&self, line_number: usize) -> Option<&str> {
        let start = *self.lines.get(line_number.checked_sub(1)?)?;
        let end = self
            .lines
            .get(line_number)
            .copied()
            .unwrap_or(self.contents.len());
        let line = &self.contents[start..end];
        Some(
            line.strip_suffix("\r\n")
                .or_else(|| line.strip_suffix('\n'))
                .unwrap_or(line),
        )
    }
}

#[cfg(test)]
mod tests {
    use encoding_rs::{UTF_8, WINDOWS_1252};

    use super::SourceFile;

    #[test]
    fn lines() {
        let source = SourceFile::for_string(String::from("a\r\nbc\n\nd"));
        assert_eq!(source.line_count(), 4);
        assert_eq!(source.get_line(1), Some("a"));
        assert_eq!(source.get_line(2), Some("bc"));
        assert_eq!(source.get_line(3), Some(""));
        assert_eq!(source.get_line(4), Some("d"));
        assert_eq!(source.get_line(0), None);
        assert_eq!(source.get_line(5), None);
    }

    #[test]
    fn decoding() {
        let source = SourceFile::for_bytes(b"% caf\xe9\n", None, Some(WINDOWS_1252));
        assert_eq!(source.contents, "% café\n");

        let source = SourceFile::for_bytes(b"\xef\xbb\xbfx = 1;\n", None, Some(WINDOWS_1252));
        assert_eq!(source.encoding, UTF_8);
        assert_eq!(source.contents, "x = 1;\n");
    }
}
