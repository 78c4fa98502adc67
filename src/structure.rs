//! Dumps the block structure of a single AsciiDoc file with a ruby helper script.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::contract::Renderer;
use crate::convert::absolute;
use crate::error::ConvertError;

pub struct StructureDumper<R> {
    renderer: R,
    interpreter: PathBuf,
    script: PathBuf,
}

impl<R: Renderer> StructureDumper<R> {
    /// Locate the interpreter and check the dumper script exists.
    pub fn new(renderer: R, script: &Path) -> Result<Self, ConvertError> {
        let interpreter = renderer.locate().inspect_err(|e| {
            error!(error = %e, "Missing ruby executable");
        })?;
        let script = absolute(script)?;
        if !script.is_file() {
            return Err(ConvertError::ExtensionScriptNotFound(script));
        }
        Ok(Self {
            renderer,
            interpreter,
            script,
        })
    }

    pub fn command_line(&self, input: &Path) -> Vec<OsString> {
        vec![
            self.interpreter.clone().into(),
            self.script.clone().into(),
            input.into(),
        ]
    }

    /// Run the dumper on `input` and return what it printed.
    pub async fn dump(&self, input: &Path) -> Result<String, ConvertError> {
        let input = absolute(input)?;
        if !input.exists() {
            return Err(ConvertError::SourceNotFound(input));
        }
        info!(input = %input.display(), "Dumping document structure");
        let output = self.renderer.invoke(self.command_line(&input)).await?;
        if output.is_success() {
            Ok(output.stdout)
        } else {
            Err(ConvertError::ConversionFailed {
                source_file: input,
                code: output.code,
                stdout: output.stdout,
                stderr: output.stderr,
            })
        }
    }
}
