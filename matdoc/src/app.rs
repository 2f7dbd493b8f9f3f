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

//! App Designer applications.
//!
//! An `.mlapp` file is a zip archive.  The summary and description that
//! document the app are in its `metadata/appMetadata.xml` member.

use std::{
    fs::File,
    io::{Read, Seek},
    path::Path,
};

use displaydoc::Display;
use quick_xml::{de::from_str, DeError};
use serde::Deserialize;
use thiserror::Error as ThisError;
use zip::{result::ZipError, ZipArchive};

use crate::model::{normalize_doc, Application};

/// Archive member that holds an app's metadata.
pub const METADATA: &str = "metadata/appMetadata.xml";

/// An error reading a file that is not a parse error.
#[derive(Display, ThisError, Debug)]
pub enum LoadError {
    /// I/O error: {0}
    Io(#[from] std::io::Error),

    /// Invalid application archive: {0}
    Zip(#[from] ZipError),

    /// Application archive lacks `metadata/appMetadata.xml`.
    MissingMetadata,

    /// Invalid application metadata: {0}
    Xml(#[from] DeError),
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct AppMetadata {
    #[serde(alias = "ns2:name")]
    name: String,
    #[serde(alias = "ns2:summary")]
    summary: String,
    #[serde(alias = "ns2:description")]
    description: String,
}

impl AppMetadata {
    /// The summary and description, separated by a blank line.
    fn docstring(&self) -> Option<String> {
        let parts = [self.summary.trim(), self.description.trim()];
        let text = parts
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n\n");
        normalize_doc(Some(text))
    }
}

/// Reads the application in `path`.
pub fn load_application(
    path: &Path,
    name: &str,
    namespace: &str,
) -> Result<Application, LoadError> {
    read_application(File::open(path)?, name, namespace)
}

/// Reads an application from an `.mlapp` archive in `reader`.
pub fn read_application<R>(reader: R, name: &str, namespace: &str) -> Result<Application, LoadError>
where
    R: Read + Seek,
{
    let mut archive = ZipArchive::new(reader)?;
    let mut xml = String::new();
    match archive.by_name(METADATA) {
        Ok(mut file) => {
            file.read_to_string(&mut xml)?;
        }
        Err(ZipError::FileNotFound) => return Err(LoadError::MissingMetadata),
        Err(error) => return Err(error.into()),
    }
    let metadata: AppMetadata = from_str(&xml)?;
    if !metadata.name.is_empty() && metadata.name != name {
        log::debug!("application `{name}` calls itself `{}`", metadata.name);
    }
    Ok(Application {
        name: name.into(),
        namespace: namespace.into(),
        docstring: metadata.docstring(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

    use super::{read_application, LoadError, METADATA};

    fn archive(files: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, contents) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn metadata() {
        let reader = archive(&[
            ("matlab/document.xml", "<w:document/>"),
            (
                METADATA,
                r#"<?xml version="1.0" encoding="UTF-8"?>
<appMetadata>
  <name>viewer</name>
  <summary>Views images.</summary>
  <description>Opens an image file
and shows it.</description>
  <version>1.0</version>
</appMetadata>
"#,
            ),
        ]);
        let application = read_application(reader, "viewer", "target").unwrap();
        assert_eq!(application.name, "viewer");
        assert_eq!(application.namespace, "target");
        assert_eq!(
            application.docstring.as_deref(),
            Some("Views images.\n\nOpens an image file\nand shows it.")
        );
    }

    #[test]
    fn empty_metadata() {
        let reader = archive(&[(METADATA, "<appMetadata><summary/></appMetadata>")]);
        let application = read_application(reader, "app", "").unwrap();
        assert_eq!(application.docstring, None);
    }

    #[test]
    fn missing_metadata() {
        let reader = archive(&[("matlab/document.xml", "<w:document/>")]);
        assert!(matches!(
            read_application(reader, "app", ""),
            Err(LoadError::MissingMetadata)
        ));
    }

    #[test]
    fn not_an_archive() {
        let reader = Cursor::new(b"classdef app\nend\n".to_vec());
        assert!(matches!(
            read_application(reader, "app", ""),
            Err(LoadError::Zip(_))
        ));
    }
}
