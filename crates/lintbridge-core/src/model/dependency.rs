//! Compact dependency descriptors produced by the build graph.
//!
//! Each dependency arrives as one string of `^`-separated fields:
//!
//! ```text
//! name ^ platform ^ library ^ results_dir [^ models_dir]
//! ```
//!
//! Decoding is one-way; nothing in this crate re-encodes descriptors.

use std::path::PathBuf;

use serde::Serialize;

use crate::{Error, Result};

pub const FIELD_DELIMITER: char = '^';

/// One dependency module of the project being analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyDescriptor {
    pub name: String,
    pub is_platform_target: bool,
    pub is_library: bool,
    pub results_dir: PathBuf,
    pub models_dir: Option<PathBuf>,
}

impl DependencyDescriptor {
    pub fn decode(encoded: &str) -> Result<Self> {
        let fields: Vec<&str> = encoded.split(FIELD_DELIMITER).collect();

        let (name, platform, library, results_dir, models_dir) = match fields.as_slice() {
            [name, platform, library, results] => (*name, *platform, *library, *results, None),
            [name, platform, library, results, models] => {
                (*name, *platform, *library, *results, Some(*models))
            }
            _ => {
                return Err(Error::Format {
                    kind: "dependency descriptor",
                    encoded: encoded.to_string(),
                    expected: "4 or 5",
                    found: fields.len(),
                });
            }
        };

        Ok(Self {
            name: name.to_string(),
            is_platform_target: decode_flag(platform),
            is_library: decode_flag(library),
            results_dir: PathBuf::from(results_dir),
            models_dir: models_dir.filter(|m| !m.is_empty()).map(PathBuf::from),
        })
    }
}

/// Decode every descriptor in order; the first malformed one aborts.
pub fn decode_all<'a>(encoded: impl IntoIterator<Item = &'a str>) -> Result<Vec<DependencyDescriptor>> {
    encoded
        .into_iter()
        .map(DependencyDescriptor::decode)
        .collect()
}

/// An AAR archive together with the directory it was extracted into.
///
/// Encoded as `aar_file ^ extracted_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AarDescriptor {
    pub file: PathBuf,
    pub extracted: PathBuf,
}

impl AarDescriptor {
    pub fn decode(encoded: &str) -> Result<Self> {
        match encoded.split(FIELD_DELIMITER).collect::<Vec<_>>().as_slice() {
            [file, extracted] => Ok(Self {
                file: PathBuf::from(file),
                extracted: PathBuf::from(extracted),
            }),
            fields => Err(Error::Format {
                kind: "aar descriptor",
                encoded: encoded.to_string(),
                expected: "2",
                found: fields.len(),
            }),
        }
    }
}

/// Only a case-insensitive `true` is true. No other validation happens.
fn decode_flag(field: &str) -> bool {
    field.eq_ignore_ascii_case("true")
}
