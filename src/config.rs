use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ConvertError;

pub const DEFAULT_TARGET_FORMAT: &str = "text";
pub const DEFAULT_SOURCE_EXTENSION: &str = "adoc";
pub const DEFAULT_OUTPUT_EXTENSION: &str = "txt";
pub const DEFAULT_SCRIPTS_DIR: &str = "ruby_asciidoc";
pub const STRUCTURE_DUMPER_SCRIPT: &str = "asciidoc_structure_dumper.rb";

/// Extension scripts shipped for each target format that has one.
const DEFAULT_CONVERTER_FILES: &[(&str, &str)] = &[("text", "asciidoc_text_converter.rb")];

/// How each document is rendered. Shared by every job of a run.
#[derive(Debug, Clone)]
pub struct ConverterOptions {
    /// Backend passed to `-b`.
    pub target_format: String,
    /// Extension script passed to `-r`.
    pub extension_script: PathBuf,
    /// Optional YAML file of `-a` attributes.
    pub attributes_file: Option<PathBuf>,
}

impl ConverterOptions {
    /// Options for `target_format`, falling back to the format's default script.
    pub fn new(
        target_format: impl Into<String>,
        converter_file: Option<PathBuf>,
        scripts_dir: &Path,
        attributes_file: Option<PathBuf>,
    ) -> Result<Self, ConvertError> {
        let target_format = target_format.into();
        let extension_script = match converter_file {
            Some(file) => file,
            None => default_converter_file(&target_format, scripts_dir)?,
        };
        Ok(Self {
            target_format,
            extension_script,
            attributes_file,
        })
    }

    pub fn trace_loaded(&self) {
        info!(
            target_format = %self.target_format,
            extension_script = %self.extension_script.display(),
            attributes_file = ?self.attributes_file,
            "Converter options"
        );
    }
}

/// Default extension script for `target_format` inside `scripts_dir`.
pub fn default_converter_file(
    target_format: &str,
    scripts_dir: &Path,
) -> Result<PathBuf, ConvertError> {
    DEFAULT_CONVERTER_FILES
        .iter()
        .find(|(format, _)| *format == target_format)
        .map(|(_, file)| scripts_dir.join(file))
        .ok_or_else(|| ConvertError::UnsupportedFormat(target_format.to_string()))
}

/// Where a batch reads sources and writes results.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub source_extension: String,
    pub output_extension: String,
}

impl BatchConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            input_dir = %self.input_dir.display(),
            output_dir = %self.output_dir.display(),
            "Batch directories"
        );
        debug!(?self, "Batch config (full debug)");
    }
}
