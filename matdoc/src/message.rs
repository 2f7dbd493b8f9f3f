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

//! Diagnostics.

use std::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    ops::RangeInclusive,
    sync::Arc,
};

use serde::Serialize;

/// Location relevant to a diagnostic message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    /// File name, if any.
    pub file_name: Option<Arc<String>>,

    /// 1-based first and last line, if any.
    pub lines: Option<RangeInclusive<u32>>,
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if let Some(file_name) = &self.file_name {
            write!(f, "{}", file_name)?;
        }

        if let Some(lines) = &self.lines {
            if self.file_name.is_some() {
                write!(f, ":")?;
            }
            let (l1, l2) = (*lines.start(), *lines.end());
            match l2 > l1 {
                true => write!(f, "{l1}-{l2}")?,
                false => write!(f, "{l1}")?,
            }
        }
        Ok(())
    }
}

impl Location {
    /// A location that names only a file.
    pub fn for_file(file_name: impl Into<String>) -> Self {
        Self {
            file_name: Some(Arc::new(file_name.into())),
            lines: None,
        }
    }

    /// Returns a copy of this location narrowed to a single line.
    pub fn with_line(&self, line: u32) -> Self {
        self.with_lines(line, line)
    }

    /// Returns a copy of this location narrowed to lines `first` through
    /// `last`.
    pub fn with_lines(&self, first: u32, last: u32) -> Self {
        Self {
            file_name: self.file_name.clone(),
            lines: Some(first..=last.max(first)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.file_name.is_none() && self.lines.is_none()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// A message about a source file, such as a parse error or a warning about a
/// superclass that could not be found.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Location,
    pub text: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, location: Location, text: impl Into<String>) -> Self {
        Self {
            severity,
            location,
            text: text.into(),
        }
    }

    pub fn error(location: Location, text: impl Into<String>) -> Self {
        Self::new(Severity::Error, location, text)
    }

    pub fn warning(location: Location, text: impl Into<String>) -> Self {
        Self::new(Severity::Warning, location, text)
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if !self.location.is_empty() {
            write!(f, "{}: ", self.location)?;
        }
        write!(f, "{}: {}", self.severity, self.text)
    }
}

impl Debug for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagnostic, Location};

    #[test]
    fn location_display() {
        let location = Location::for_file("+pkg/f.m");
        assert_eq!(location.to_string(), "+pkg/f.m");
        assert_eq!(location.with_line(12).to_string(), "+pkg/f.m:12");
        assert_eq!(location.with_lines(3, 8).to_string(), "+pkg/f.m:3-8");
        assert_eq!(Location::default().with_line(4).to_string(), "4");
        assert!(Location::default().is_empty());
    }

    #[test]
    fn diagnostic_display() {
        let diagnostic = Diagnostic::warning(Location::for_file("A.m").with_line(2), "oops");
        assert_eq!(diagnostic.to_string(), "A.m:2: warning: oops");
        assert_eq!(
            Diagnostic::error(Location::default(), "bad").to_string(),
            "error: bad"
        );
    }
}
