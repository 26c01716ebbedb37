//! Column-to-fragment mapping table
//!
//! The mapping file is a `;`-separated table whose header row names data
//! columns and whose single data row holds the fragment each column's
//! value is merged into. Validation is batched: every broken entry is
//! reported before the run aborts.

use std::path::Path;

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::prolog::NamespaceBindings;
use crate::xml::parse_str;

/// Sentinel marking a column that must not be converted
const NONE_SENTINEL: &str = "none";

/// One rejected mapping entry, keyed by its 1-based column index
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum MappingError {
    #[error("column {column} has an empty header")]
    EmptyHeader { column: usize },
    #[error("column {column} ({header:?}) has no mapping value")]
    EmptyFragment { column: usize, header: String },
    #[error("column {column} ({header:?}) maps to malformed markup {fragment:?}: {source}")]
    Malformed {
        column: usize,
        header: String,
        fragment: String,
        source: Error,
    },
}

/// Validated header -> fragment associations, in column order
#[derive(Clone, Debug, Default)]
pub struct MappingTable {
    entries: IndexMap<String, String>,
}

impl MappingTable {
    /// Read the raw table: headers plus the first data row.
    ///
    /// A file without a fragment row has nothing to map against and is
    /// rejected outright.
    pub fn load_raw(path: &Path) -> Result<IndexMap<String, String>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_path(path)
            .map_err(|e| csv_error(path, &e))?;

        let headers = reader.headers().map_err(|e| csv_error(path, &e))?.clone();
        let Some(record) = reader.records().next() else {
            return Err(Error::new(
                ErrorKind::MissingRow {
                    path: path.display().to_string(),
                },
                Span::empty(),
            ));
        };
        let record = record.map_err(|e| csv_error(path, &e))?;

        let mut entries = IndexMap::new();
        for (index, header) in headers.iter().enumerate() {
            entries.insert(
                header.to_string(),
                record.get(index).unwrap_or_default().to_string(),
            );
        }
        Ok(entries)
    }

    /// Validate a raw table against the template's namespace bindings.
    ///
    /// Bare tag names become `<tag>?</tag>`; when declarations exist,
    /// every fragment is wrapped with them innermost to outermost so
    /// qualified tag names parse. `none` entries are dropped, but only
    /// once the whole table has been checked. On failure the full list
    /// of offending entries is returned.
    pub fn validate(
        raw: IndexMap<String, String>,
        bindings: &NamespaceBindings,
    ) -> std::result::Result<Self, Vec<MappingError>> {
        let mut entries = raw;
        let mut errors = Vec::new();
        let mut to_delete = Vec::new();

        for (index, (header, value)) in entries.iter_mut().enumerate() {
            let column = index + 1;

            if header.trim().is_empty() {
                errors.push(MappingError::EmptyHeader { column });
                continue;
            }

            let normalized = value.trim().to_lowercase();
            if normalized.is_empty() {
                errors.push(MappingError::EmptyFragment {
                    column,
                    header: header.clone(),
                });
                continue;
            }
            if normalized == NONE_SENTINEL {
                to_delete.push(header.clone());
                continue;
            }

            if !value.contains('<') {
                *value = format!("<{normalized}>?</{normalized}>");
            }

            // Wrap from the inside out: the last declaration found in the
            // template becomes the outermost tag, mirroring its own
            // nesting. Closing tags are synthesized from the first token.
            for declaration in bindings.declarations.iter().rev() {
                let tag = declaration
                    .split(' ')
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches('<');
                *value = format!("{declaration}{value}</{tag}>");
            }

            if let Err(source) = parse_str(value) {
                errors.push(MappingError::Malformed {
                    column,
                    header: header.clone(),
                    fragment: value.clone(),
                    source,
                });
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        for header in to_delete {
            entries.shift_remove(&header);
        }
        Ok(Self { entries })
    }

    /// Load and validate in one step
    pub fn load(
        path: &Path,
        bindings: &NamespaceBindings,
    ) -> std::result::Result<Self, LoadError> {
        let raw = Self::load_raw(path).map_err(LoadError::Read)?;
        Self::validate(raw, bindings).map_err(LoadError::Invalid)
    }

    /// Fragment mapped to a column header, if any
    pub fn fragment(&self, header: &str) -> Option<&str> {
        self.entries.get(header).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Failure to produce a validated mapping table
#[derive(thiserror::Error, Clone, Debug)]
pub enum LoadError {
    #[error("{0}")]
    Read(Error),
    #[error("{} invalid mapping entr{}", .0.len(), if .0.len() == 1 { "y" } else { "ies" })]
    Invalid(Vec<MappingError>),
}

fn csv_error(path: &Path, source: &csv::Error) -> Error {
    Error::with_message(
        ErrorKind::Io {
            path: path.display().to_string(),
        },
        Span::empty(),
        format!("{}: {source}", path.display()),
    )
}
