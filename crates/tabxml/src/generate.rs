//! Run orchestration: one output document per data row
//!
//! The namespace bindings, template tree, and mapping table are built
//! once; every data row then works on a fresh clone of the template.
//! Rows are independent: a failing row is logged and skipped, the run
//! carries on.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::dispatch::dispatch_values;
use crate::error::{Error, ErrorKind, Span};
use crate::mapping::{LoadError, MappingError, MappingTable};
use crate::merge::{merge, prune_empty_leaves};
use crate::prolog::{splice_header, NamespaceBindings};
use crate::xml::{self, Element};

/// Sentinel marking a cell that must not be converted
const NONE_SENTINEL: &str = "none";

/// Options for one conversion run
#[derive(Clone, Debug)]
pub struct Options {
    /// Template file carrying the prolog and the base tree
    pub template: PathBuf,
    /// Mapping table file (`;`-separated, headers + one fragment row)
    pub mapping: PathBuf,
    /// Data file (`;`-separated, headers + one row per document)
    pub data: PathBuf,
    /// Directory the generated documents are written into; must exist
    pub out_dir: PathBuf,
    /// Header of the column whose value names each output file
    pub name_column: String,
    /// Report data columns that have no mapping entry
    pub verbose: bool,
    /// Drop first-level elements that end up empty
    pub prune_empty: bool,
}

impl Options {
    pub fn new(
        template: impl Into<PathBuf>,
        mapping: impl Into<PathBuf>,
        data: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
        name_column: impl Into<String>,
    ) -> Self {
        Self {
            template: template.into(),
            mapping: mapping.into(),
            data: data.into(),
            out_dir: out_dir.into(),
            name_column: name_column.into(),
            verbose: false,
            prune_empty: true,
        }
    }
}

/// Source of numeric suffixes for fallback file names.
///
/// Injected so tests can run with a deterministic sequence.
pub trait SuffixSource {
    fn next_suffix(&mut self) -> u32;
}

/// Random suffixes in `0..=65535`
#[derive(Debug, Default)]
pub struct RandomSuffix;

impl SuffixSource for RandomSuffix {
    fn next_suffix(&mut self) -> u32 {
        rand::rng().random_range(0..=65535)
    }
}

/// Monotonic suffixes starting at 0
#[derive(Debug, Default)]
pub struct SequentialSuffix(u32);

impl SuffixSource for SequentialSuffix {
    fn next_suffix(&mut self) -> u32 {
        let value = self.0;
        self.0 += 1;
        value
    }
}

/// Counts of processed data rows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Fatal failure before or during a run
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("template {path}: {source}")]
    Template { path: String, source: Error },
    #[error("invalid mapping table:\n{}", list_mapping_errors(.0))]
    Mapping(Vec<MappingError>),
    #[error(transparent)]
    Failure(#[from] Error),
}

fn list_mapping_errors(errors: &[MappingError]) -> String {
    let mut listing = String::new();
    for error in errors {
        let _ = writeln!(listing, "  - {error}");
    }
    listing.truncate(listing.trim_end().len());
    listing
}

/// Run a conversion with random fallback suffixes
pub fn run(options: &Options) -> Result<RunSummary, RunError> {
    run_with(options, &mut RandomSuffix)
}

/// Run a conversion with an injected suffix source
pub fn run_with(
    options: &Options,
    suffixes: &mut dyn SuffixSource,
) -> Result<RunSummary, RunError> {
    let bindings = NamespaceBindings::scan(&options.template)?;
    debug!(
        prefixes = bindings.namespaces.len(),
        declarations = bindings.declarations.len(),
        "namespace scan complete"
    );

    let template_text =
        fs::read_to_string(&options.template).map_err(|e| Error::io(&options.template, &e))?;
    let template_root = xml::parse_str(&template_text).map_err(|source| RunError::Template {
        path: options.template.display().to_string(),
        source,
    })?;

    let table = match MappingTable::load(&options.mapping, &bindings) {
        Ok(table) => table,
        Err(LoadError::Read(error)) => return Err(RunError::Failure(error)),
        Err(LoadError::Invalid(errors)) => return Err(RunError::Mapping(errors)),
    };
    debug!(entries = table.len(), "mapping table validated");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(&options.data)
        .map_err(|e| csv_error(&options.data, &e))?;
    let headers = reader
        .headers()
        .map_err(|e| csv_error(&options.data, &e))?
        .clone();

    let mut summary = RunSummary::default();
    for (index, record) in reader.records().enumerate() {
        // The header row is line 1.
        let row_number = index + 2;
        let record = match record {
            Ok(record) => record,
            Err(error) => {
                warn!("row {row_number} skipped: {error}");
                summary.skipped += 1;
                continue;
            }
        };

        let mut row = IndexMap::new();
        for (cell, header) in headers.iter().enumerate() {
            row.insert(
                header.to_string(),
                record.get(cell).unwrap_or_default().to_string(),
            );
        }

        match process_row(&template_root, &row, row_number, &table, options, suffixes) {
            Ok(path) => {
                summary.written += 1;
                debug!(path = %path.display(), "document written");
            }
            Err(error) => {
                warn!("row {row_number} skipped: {error}");
                summary.skipped += 1;
            }
        }
    }

    info!(
        written = summary.written,
        skipped = summary.skipped,
        "run complete"
    );
    Ok(summary)
}

/// Convert one data row into an output document, returning its path
fn process_row(
    template_root: &Element,
    row: &IndexMap<String, String>,
    row_number: usize,
    table: &MappingTable,
    options: &Options,
    suffixes: &mut dyn SuffixSource,
) -> crate::Result<PathBuf> {
    let mut tree = template_root.clone();
    let mut stem = String::new();

    for (column, value) in row {
        if value.trim().eq_ignore_ascii_case(NONE_SENTINEL) {
            continue;
        }
        if *column == options.name_column {
            stem = value.clone();
            continue;
        }
        match table.fragment(column) {
            Some(fragment) => {
                let filled = dispatch_values(fragment, value);
                // A cell value can break well-formedness (a stray '&' or
                // '<'); that fails this row only.
                let mini = xml::parse_str(&filled)?;
                merge(&mut tree, &mini);
            }
            None => {
                if options.verbose {
                    info!("row {row_number}: no mapping for column {column:?}");
                }
            }
        }
    }

    if options.prune_empty {
        prune_empty_leaves(&mut tree);
    }
    xml::indent(&mut tree);

    if stem.is_empty() {
        stem = format!("line_{row_number}_{}", suffixes.next_suffix());
        warn!("row {row_number} has no value in the name column; output file will be named {stem}.xml");
    }

    let tmp_path = options.out_dir.join(format!("{stem}.tmp"));
    let out_path = options.out_dir.join(format!("{stem}.xml"));

    fs::write(&tmp_path, xml::serialize(&tree)).map_err(|e| Error::io(&tmp_path, &e))?;
    let spliced = splice_header(&options.template, &tmp_path, &out_path);
    // The temp artifact goes away even when splicing failed.
    let _ = fs::remove_file(&tmp_path);
    spliced?;

    Ok(out_path)
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
