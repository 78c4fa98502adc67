use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

use crate::contract::{RenderOutput, Renderer};
use crate::error::ConvertError;

/// Default program used to render AsciiDoc.
pub const ASCIIDOCTOR: &str = "asciidoctor";
/// Default program used to run the structure dumper.
pub const RUBY: &str = "ruby";

/// Runs a real program found on the executable search path.
///
/// The program may be a bare name (`asciidoctor`), looked up in `PATH`, or a
/// path containing a separator, which is checked as given.
#[derive(Debug, Clone)]
pub struct SystemRenderer {
    program: OsString,
}

impl SystemRenderer {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn asciidoctor() -> Self {
        Self::new(ASCIIDOCTOR)
    }

    pub fn ruby() -> Self {
        Self::new(RUBY)
    }

    fn not_found(&self) -> ConvertError {
        ConvertError::ToolNotFound {
            program: self.program.to_string_lossy().into_owned(),
        }
    }
}

#[async_trait]
impl Renderer for SystemRenderer {
    fn locate(&self) -> Result<PathBuf, ConvertError> {
        let found = which::which(&self.program).map_err(|e| {
            debug!(program = ?self.program, error = %e, "Executable lookup failed");
            self.not_found()
        })?;
        let found = std::path::absolute(&found).map_err(|e| ConvertError::io(&found, e))?;
        info!(program = %found.display(), "Using external tool");
        Ok(found)
    }

    async fn invoke(&self, args: Vec<OsString>) -> Result<RenderOutput, ConvertError> {
        let Some((program, rest)) = args.split_first() else {
            return Err(self.not_found());
        };
        debug!(?args, "Spawning external tool");
        let output = Command::new(program)
            .args(rest)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ConvertError::Spawn {
                program: PathBuf::from(program),
                source,
            })?;
        Ok(RenderOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
