//! adoc-corpus: turn AsciiDoc documentation sets into flat text corpora.
//!
//! A topic map describes which documents make up a documentation set and how
//! they are nested. [`topic_map`] flattens it for one distro into an ordered
//! list of logical paths, [`batch`] runs one conversion per path, and
//! [`convert`] drives the external asciidoctor process for each of them.

pub mod attributes;
pub mod batch;
pub mod cli;
pub mod config;
pub mod contract;
pub mod convert;
pub mod error;
pub mod logging;
pub mod renderer;
pub mod structure;
pub mod topic_map;

pub use error::{ConvertError, Result};
