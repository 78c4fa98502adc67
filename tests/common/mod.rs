#![allow(dead_code)]

use adoc_corpus::config::ConverterOptions;
use std::fs::{create_dir_all, write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::Level;
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Layer, Registry};

pub const ASCIIDOCTOR: &str = "/usr/bin/asciidoctor";

/// Collects `(level, message)` of every emitted event.
#[derive(Clone, Default)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl EventCollector {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = Registry::default().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for EventCollector {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        create_dir_all(parent).unwrap();
    }
    write(path, content).unwrap();
}

/// Options pointing at an (empty) extension script inside `dir`.
pub fn text_options(dir: &Path) -> ConverterOptions {
    let script = dir.join("scripts").join("asciidoc_text_converter.rb");
    write_file(&script, "# extension\n");
    ConverterOptions::new("text", None, &dir.join("scripts"), None).unwrap()
}

pub fn script_path(dir: &Path) -> PathBuf {
    dir.join("scripts").join("asciidoc_text_converter.rb")
}
