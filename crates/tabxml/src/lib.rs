//! tabxml - maps delimited metadata tables onto an XML template
//!
//! Each data row of a `;`-separated table becomes one standalone XML
//! document: a mapping table binds every column to a fragment (a path of
//! nested elements with `?` placeholders), and each row's values are
//! dispatched into their fragments and unified with a fresh copy of the
//! template tree.
//!
//! # Quick Start
//!
//! ```
//! use tabxml::{dispatch_values, merge, xml};
//! # fn main() -> Result<(), tabxml::Error> {
//! let mut tree = xml::parse_str("<record><title/></record>")?;
//! let fragment = xml::parse_str(&dispatch_values("<title>?</title>", "Dune"))?;
//! merge(&mut tree, &fragment);
//! assert_eq!(xml::serialize(&tree), "<record><title>Dune</title></record>");
//! # Ok(())
//! # }
//! ```
//!
//! Whole-file runs go through [`run`] with [`Options`] naming the
//! template, mapping, and data files.

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod xml;
pub use xml::Element;

pub mod dispatch;
pub use dispatch::dispatch_values;

pub mod prolog;
pub use prolog::{splice_header, NamespaceBindings};

pub mod mapping;
pub use mapping::{MappingError, MappingTable};

pub mod merge;
pub use merge::{merge, prune_empty_leaves};

pub mod generate;
pub use generate::{
    run, run_with, Options, RandomSuffix, RunError, RunSummary, SequentialSuffix, SuffixSource,
};
