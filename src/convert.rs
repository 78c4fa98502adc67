//! Converter invoker: one asciidoctor run per document.
//!
//! The command line mirrors what asciidoctor expects for a custom backend:
//!
//! ```text
//! asciidoctor [-a key=value ...] -r <extension.rb> -b <format> -o <dest> --trace --quiet <source>
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::attributes::{load_attributes, AttributeSet};
use crate::config::ConverterOptions;
use crate::contract::Renderer;
use crate::error::ConvertError;

/// A single source/destination pair. The shared parts of a conversion
/// (attributes, format, extension script) live on the converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl ConversionJob {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

pub struct AsciidocConverter<R> {
    renderer: R,
    executable: PathBuf,
    attributes: AttributeSet,
    target_format: String,
    extension_script: PathBuf,
}

impl<R: Renderer> AsciidocConverter<R> {
    /// Load the attributes file and run the pre-flight checks.
    pub fn new(renderer: R, options: &ConverterOptions) -> Result<Self, ConvertError> {
        let attributes = load_attributes(options.attributes_file.as_deref())?;
        Self::with_attributes(renderer, options, attributes)
    }

    /// Pre-flight checks with an already loaded attribute set.
    ///
    /// Fails with [`ConvertError::ToolNotFound`] when the renderer cannot be
    /// located and [`ConvertError::ExtensionScriptNotFound`] when the extension
    /// script is missing. Both are fatal; nothing is retried.
    pub fn with_attributes(
        renderer: R,
        options: &ConverterOptions,
        attributes: AttributeSet,
    ) -> Result<Self, ConvertError> {
        let executable = renderer.locate().inspect_err(|e| {
            error!(error = %e, "Rendering executable unavailable");
        })?;

        let extension_script = absolute(&options.extension_script)?;
        if !extension_script.is_file() {
            error!(extension_script = %extension_script.display(), "Converter file not found");
            return Err(ConvertError::ExtensionScriptNotFound(extension_script));
        }

        Ok(Self {
            renderer,
            executable,
            attributes,
            target_format: options.target_format.clone(),
            extension_script,
        })
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn target_format(&self) -> &str {
        &self.target_format
    }

    /// Full argument vector, executable first. Paths are used as given.
    pub fn command_line(&self, source: &Path, destination: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![self.executable.clone().into()];
        args.extend(self.attributes.to_flags().into_iter().map(OsString::from));
        args.push("-r".into());
        args.push(self.extension_script.clone().into());
        args.push("-b".into());
        args.push(self.target_format.clone().into());
        args.push("-o".into());
        args.push(destination.into());
        args.push("--trace".into());
        args.push("--quiet".into());
        args.push(source.into());
        args
    }

    /// Convert one document, waiting for the external tool to finish.
    pub async fn convert(&self, job: &ConversionJob) -> Result<(), ConvertError> {
        let source = absolute(&job.source)?;
        let destination = absolute(&job.destination)?;
        info!(source = %source.display(), "Processing");

        if !source.exists() {
            error!(source = %source.display(), "Source file not found");
            return Err(ConvertError::SourceNotFound(source));
        }

        if destination.exists() {
            warn!(destination = %destination.display(), "Destination file exists. It will be overwritten!");
        } else if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConvertError::io(parent, e))?;
        }

        let args = self.command_line(&source, &destination);
        let output = self.renderer.invoke(args).await?;
        if output.is_success() {
            debug!(destination = %destination.display(), "Conversion finished");
            Ok(())
        } else {
            Err(ConvertError::ConversionFailed {
                source_file: source,
                code: output.code,
                stdout: output.stdout,
                stderr: output.stderr,
            })
        }
    }
}

pub(crate) fn absolute(path: &Path) -> Result<PathBuf, ConvertError> {
    std::path::absolute(path).map_err(|e| ConvertError::io(path, e))
}
