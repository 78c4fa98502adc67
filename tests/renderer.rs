#![cfg(unix)]

use adoc_corpus::contract::Renderer;
use adoc_corpus::renderer::SystemRenderer;
use adoc_corpus::ConvertError;
use serial_test::serial;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn executable(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn with_path<T>(path_var: Option<&OsStr>, f: impl FnOnce() -> T) -> T {
    let saved = std::env::var_os("PATH");
    match path_var {
        Some(path) => std::env::set_var("PATH", path),
        None => std::env::remove_var("PATH"),
    }
    let result = f();
    match saved {
        Some(path) => std::env::set_var("PATH", path),
        None => std::env::remove_var("PATH"),
    }
    result
}

#[test]
#[serial]
fn locate_picks_first_executable_on_search_path() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    fs::write(first.path().join("tool"), "not executable").unwrap();
    let expected = executable(second.path(), "tool", "exit 0");

    let path_var = std::env::join_paths([first.path(), second.path()]).unwrap();
    let (tool, other) = with_path(Some(path_var.as_os_str()), || {
        (
            SystemRenderer::new("tool").locate(),
            SystemRenderer::new("other").locate(),
        )
    });
    assert_eq!(tool.unwrap(), expected);
    assert!(matches!(other, Err(ConvertError::ToolNotFound { .. })));

    let unset = with_path(None, || SystemRenderer::new("tool").locate());
    assert!(matches!(unset, Err(ConvertError::ToolNotFound { .. })));
}

#[test]
#[serial]
fn locate_searches_path_environment() {
    let dir = tempdir().unwrap();
    let expected = executable(dir.path(), "fake-asciidoctor", "exit 0");

    let (located, missing) = with_path(Some(dir.path().as_os_str()), || {
        (
            SystemRenderer::new("fake-asciidoctor").locate(),
            SystemRenderer::new("definitely-not-installed-adoc").locate(),
        )
    });

    assert_eq!(located.unwrap(), expected);
    assert!(matches!(missing, Err(ConvertError::ToolNotFound { program }) if program == "definitely-not-installed-adoc"));
}

#[test]
#[serial]
fn locate_accepts_explicit_paths() {
    let dir = tempdir().unwrap();
    let tool = executable(dir.path(), "asciidoctor", "exit 0");

    assert_eq!(SystemRenderer::new(&tool).locate().unwrap(), tool);
    assert!(matches!(
        SystemRenderer::new(dir.path().join("missing")).locate(),
        Err(ConvertError::ToolNotFound { .. })
    ));
}

#[tokio::test]
#[serial]
async fn invoke_captures_exit_code_and_output() {
    let dir = tempdir().unwrap();
    let tool = executable(
        dir.path(),
        "tool",
        "echo \"args: $*\"\necho 'something broke' >&2\nexit 3",
    );

    let output = SystemRenderer::new(&tool)
        .invoke(vec![tool.clone().into(), "-b".into(), "text".into()])
        .await
        .unwrap();

    assert_eq!(output.code, Some(3));
    assert!(!output.is_success());
    assert_eq!(output.stdout.trim(), "args: -b text");
    assert_eq!(output.stderr.trim(), "something broke");
}

#[tokio::test]
#[serial]
async fn invoke_reports_spawn_failures() {
    let dir = tempdir().unwrap();
    let missing: OsString = dir.path().join("gone").into();

    let err = SystemRenderer::new(&missing)
        .invoke(vec![missing.clone()])
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::Spawn { .. }), "got {err:?}");
}
