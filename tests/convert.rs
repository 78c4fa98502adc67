mod common;

use adoc_corpus::attributes::AttributeSet;
use adoc_corpus::contract::{MockRenderer, RenderOutput};
use adoc_corpus::convert::{AsciidocConverter, ConversionJob};
use adoc_corpus::ConvertError;
use common::{script_path, text_options, write_file, EventCollector, ASCIIDOCTOR};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use tracing::Level;

fn located_renderer() -> MockRenderer {
    let mut renderer = MockRenderer::new();
    renderer
        .expect_locate()
        .times(1)
        .returning(|| Ok(PathBuf::from(ASCIIDOCTOR)));
    renderer
}

fn recording_renderer(output: RenderOutput) -> (MockRenderer, Arc<Mutex<Vec<Vec<OsString>>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = calls.clone();
    let mut renderer = located_renderer();
    renderer.expect_invoke().returning(move |args| {
        recorded.lock().unwrap().push(args);
        Ok(output.clone())
    });
    (renderer, calls)
}

#[tokio::test]
async fn builds_asciidoctor_command_line_in_order() {
    let tmp = tempdir().unwrap();
    let options = text_options(tmp.path());
    let source = tmp.path().join("docs/input.adoc");
    let destination = tmp.path().join("out/output.txt");
    write_file(&source, "= Title\n");

    let (renderer, calls) = recording_renderer(RenderOutput::success());
    let attributes: AttributeSet = [("product", "OpenShift"), ("version", "4")]
        .into_iter()
        .collect();
    let converter = AsciidocConverter::with_attributes(renderer, &options, attributes)
        .expect("pre-flight should pass");

    converter
        .convert(&ConversionJob::new(&source, &destination))
        .await
        .expect("conversion should succeed");

    let expected: Vec<OsString> = vec![
        ASCIIDOCTOR.into(),
        "-a".into(),
        "product=OpenShift".into(),
        "-a".into(),
        "version=4".into(),
        "-r".into(),
        script_path(tmp.path()).into(),
        "-b".into(),
        "text".into(),
        "-o".into(),
        destination.clone().into(),
        "--trace".into(),
        "--quiet".into(),
        source.clone().into(),
    ];
    assert_eq!(*calls.lock().unwrap(), vec![expected]);
    assert!(destination.parent().unwrap().is_dir(), "parent directory should be created");
}

#[tokio::test]
async fn arguments_use_absolute_paths() {
    let tmp = tempdir().unwrap();
    let options = text_options(tmp.path());
    let source = tmp.path().join("input.adoc");
    write_file(&source, "text\n");

    let (renderer, calls) = recording_renderer(RenderOutput::success());
    let converter = AsciidocConverter::new(renderer, &options).unwrap();
    converter
        .convert(&ConversionJob::new(&source, tmp.path().join("out.txt")))
        .await
        .unwrap();

    let calls = calls.lock().unwrap();
    let args = &calls[0];
    assert!(PathBuf::from(&args[args.len() - 1]).is_absolute());
    assert_eq!(args[1], OsString::from("-r"));
    assert!(PathBuf::from(&args[2]).is_absolute(), "extension script: {:?}", args[2]);
}

#[test]
fn missing_tool_fails_pre_flight() {
    let tmp = tempdir().unwrap();
    let options = text_options(tmp.path());

    let mut renderer = MockRenderer::new();
    renderer.expect_locate().times(1).returning(|| {
        Err(ConvertError::ToolNotFound {
            program: "asciidoctor".into(),
        })
    });
    renderer.expect_invoke().times(0);

    let err = AsciidocConverter::new(renderer, &options)
        .err()
        .expect("converter must not be built");
    assert!(matches!(err, ConvertError::ToolNotFound { .. }));
    assert!(!err.is_recoverable());
}

#[test]
fn missing_extension_script_fails_pre_flight() {
    let tmp = tempdir().unwrap();
    let mut options = text_options(tmp.path());
    options.extension_script = tmp.path().join("missing.rb");

    let err = AsciidocConverter::new(located_renderer(), &options)
        .err()
        .expect("converter must not be built");
    assert!(matches!(err, ConvertError::ExtensionScriptNotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn missing_source_fails_before_spawning() {
    let tmp = tempdir().unwrap();
    let options = text_options(tmp.path());

    let mut renderer = located_renderer();
    renderer.expect_invoke().times(0);
    let converter = AsciidocConverter::new(renderer, &options).unwrap();

    let err = converter
        .convert(&ConversionJob::new(
            tmp.path().join("nope.adoc"),
            tmp.path().join("nope.txt"),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::SourceNotFound(_)), "got {err:?}");
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn non_zero_exit_is_a_recoverable_conversion_failure() {
    let tmp = tempdir().unwrap();
    let options = text_options(tmp.path());
    let source = tmp.path().join("bad.adoc");
    write_file(&source, "broken\n");

    let (renderer, _) = recording_renderer(RenderOutput::failure(1, "asciidoctor: FAILED: bad.adoc"));
    let converter = AsciidocConverter::new(renderer, &options).unwrap();

    let err = converter
        .convert(&ConversionJob::new(&source, tmp.path().join("bad.txt")))
        .await
        .unwrap_err();

    match &err {
        ConvertError::ConversionFailed { code, stderr, .. } => {
            assert_eq!(*code, Some(1));
            assert!(stderr.contains("FAILED"));
        }
        other => panic!("expected ConversionFailed, got {other:?}"),
    }
    assert!(err.is_recoverable());
    assert!(err.to_string().contains("asciidoctor: FAILED"));
}

#[tokio::test]
async fn existing_destination_is_reported_as_overwrite() {
    let tmp = tempdir().unwrap();
    let options = text_options(tmp.path());
    let source = tmp.path().join("input.adoc");
    let destination = tmp.path().join("output.txt");
    write_file(&source, "text\n");
    write_file(&destination, "old\n");

    let collector = EventCollector::default();
    let _guard = collector.install();

    let (renderer, calls) = recording_renderer(RenderOutput::success());
    let converter = AsciidocConverter::new(renderer, &options).unwrap();
    converter
        .convert(&ConversionJob::new(&source, &destination))
        .await
        .expect("overwrite is not an error");

    assert_eq!(calls.lock().unwrap().len(), 1);
    let warnings = collector.messages_at(Level::WARN);
    assert!(
        warnings.iter().any(|m| m.contains("overwritten")),
        "expected an overwrite warning, got {warnings:?}"
    );
}

#[tokio::test]
async fn spawn_failure_is_fatal() {
    let tmp = tempdir().unwrap();
    let options = text_options(tmp.path());
    let source = tmp.path().join("input.adoc");
    write_file(&source, "text\n");

    let mut renderer = located_renderer();
    renderer.expect_invoke().returning(|_| {
        Err(ConvertError::Spawn {
            program: PathBuf::from(ASCIIDOCTOR),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    });
    let converter = AsciidocConverter::new(renderer, &options).unwrap();

    let err = converter
        .convert(&ConversionJob::new(&source, tmp.path().join("out.txt")))
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::Spawn { .. }));
    assert!(!err.is_recoverable());
}
