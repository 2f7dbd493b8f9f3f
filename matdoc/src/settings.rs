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

use std::{
    fs,
    io::Error as IoError,
    path::{Path, PathBuf},
};

use displaydoc::Display;
use encoding_rs::{Encoding, UTF_8};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error as ThisError;

/// How to decode source files.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EncodingChoice {
    /// Always use this encoding, unless a file starts with a byte order mark.
    Fixed(&'static Encoding),

    /// Guess each file's encoding from its contents.
    Detect,
}

impl Default for EncodingChoice {
    fn default() -> Self {
        Self::Fixed(UTF_8)
    }
}

impl EncodingChoice {
    /// Parses `label`, which is either `detect` or an encoding label that
    /// `encoding_rs` understands, such as `utf-8` or `windows-1252`.
    pub fn from_label(label: &str) -> Result<Self, SettingsError> {
        if label.eq_ignore_ascii_case("detect") {
            Ok(Self::Detect)
        } else {
            Encoding::for_label_no_replacement(label.as_bytes())
                .map(Self::Fixed)
                .ok_or_else(|| SettingsError::UnknownEncoding(label.into()))
        }
    }

    /// Returns the encoding to pass to
    /// [SourceFile::for_file](crate::source::SourceFile::for_file).
    pub fn encoding(&self) -> Option<&'static Encoding> {
        match self {
            EncodingChoice::Fixed(encoding) => Some(encoding),
            EncodingChoice::Detect => None,
        }
    }
}

impl Serialize for EncodingChoice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            EncodingChoice::Fixed(encoding) => serializer.serialize_str(encoding.name()),
            EncodingChoice::Detect => serializer.serialize_str("detect"),
        }
    }
}

#[derive(ThisError, Display, Debug)]
pub enum SettingsError {
    /// {path}: {error}
    Io { path: PathBuf, error: IoError },

    /// {path}: {error}
    Toml {
        path: PathBuf,
        error: toml::de::Error,
    },

    /// {0}: unknown encoding
    UnknownEncoding(String),
}

/// Settings for one documentation build.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Directory that holds the top-level modules.
    pub root: PathBuf,

    /// How to decode source files.
    pub encoding: EncodingChoice,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            encoding: EncodingChoice::default(),
        }
    }
}

/// Settings as written in a configuration file.
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
struct RawSettings {
    root: Option<PathBuf>,
    encoding: Option<String>,
}

impl Settings {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_encoding(self, encoding: EncodingChoice) -> Self {
        Self { encoding, ..self }
    }

    /// Parses settings from the TOML in `s`.  A relative `root` is
    /// interpreted relative to `base`.
    pub fn from_toml(s: &str, base: &Path) -> Result<Self, toml::de::Error> {
        let raw: RawSettings = toml::from_str(s)?;
        let mut settings = Self::default();
        if let Some(root) = raw.root {
            settings.root = base.join(root);
        }
        if let Some(label) = raw.encoding {
            settings.encoding = EncodingChoice::from_label(&label)
                .map_err(|error| {
                    <toml::de::Error as serde::de::Error>::custom(error.to_string())
                })?;
        }
        Ok(settings)
    }

    /// Reads settings from the TOML file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|error| SettingsError::Io {
            path: path.into(),
            error,
        })?;
        let base = path.parent().unwrap_or(Path::new("."));
        Self::from_toml(&s, base).map_err(|error| SettingsError::Toml {
            path: path.into(),
            error,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use encoding_rs::{UTF_8, WINDOWS_1252};

    use super::{EncodingChoice, Settings};

    #[test]
    fn defaults() {
        let settings = Settings::from_toml("", Path::new("/docs")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.encoding.encoding(), Some(UTF_8));
    }

    #[test]
    fn from_toml() {
        let settings = Settings::from_toml(
            r#"root = "src"
encoding = "latin1"
"#,
            Path::new("/docs"),
        )
        .unwrap();
        assert_eq!(settings.root, PathBuf::from("/docs/src"));
        assert_eq!(settings.encoding, EncodingChoice::Fixed(WINDOWS_1252));

        let settings = Settings::from_toml(r#"encoding = "detect""#, Path::new("/")).unwrap();
        assert_eq!(settings.encoding.encoding(), None);
    }

    #[test]
    fn bad_toml() {
        assert!(Settings::from_toml(r#"encoding = "no-such-thing""#, Path::new("/")).is_err());
        assert!(Settings::from_toml(r#"colour = "blue""#, Path::new("/")).is_err());
    }
}
