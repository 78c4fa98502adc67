//! # contract: the external rendering tool as an injectable capability
//!
//! The conversion work itself is done by an external program (asciidoctor for
//! documents, ruby for the structure dumper). Nothing in this crate looks for
//! that program or spawns it directly; everything goes through [`Renderer`].
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so tests can build a `MockRenderer`
//!   and assert on the exact argument vector without the tool being installed.
//! - The mock is exported under the default `test-export-mocks` feature so the
//!   integration tests in `tests/` can use it.
//!
//! ## Implementations
//! - [`crate::renderer::SystemRenderer`] searches `PATH` and runs the program
//!   with `tokio::process`.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::ConvertError;

/// What an external tool left behind after it exited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RenderOutput {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            ..Self::default()
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// An external program that can be found and executed.
///
/// `locate` is a pre-flight check: callers run it once and treat
/// [`ConvertError::ToolNotFound`] as fatal. `invoke` receives the complete
/// argument vector, program path first, and runs it to completion.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Resolve the executable to an absolute path.
    fn locate(&self) -> Result<PathBuf, ConvertError>;

    /// Run `args[0]` with `args[1..]`, capturing stdout and stderr.
    ///
    /// A non-zero exit is not an error at this level; it is reported through
    /// [`RenderOutput::code`]. Errors are reserved for failing to start the process.
    async fn invoke(&self, args: Vec<OsString>) -> Result<RenderOutput, ConvertError>;
}
