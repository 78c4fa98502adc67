//! # topic_map: from a nested topic map to an ordered list of documents
//!
//! A topic map is a YAML stream of one or more documents. Each document is a
//! tree of nodes:
//!
//! ```yaml
//! ---
//! Name: Getting started
//! Dir: ch1
//! Distros: openshift-enterprise,openshift-origin
//! Topics:
//!   - Name: Introduction
//!     File: intro
//!   - Name: Advanced
//!     Dir: sub
//!     Distros: openshift-enterprise
//!     Topics:
//!       - Name: Advanced usage
//!         File: advanced
//! ```
//!
//! A node carrying `Topics` is a group; its `Dir` becomes a path component for
//! everything below it. Any other node is a leaf naming a file stem. `Distros`
//! restricts a node, and its whole subtree, to the listed distros.
//!
//! Resolution is a pure depth-first walk: every call builds and returns its own
//! list, and parents concatenate their children's lists in listed order.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::attributes::is_blank_yaml;
use crate::error::ConvertError;

/// Set of distro tags a node applies to. Empty means every distro.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distros(Vec<String>);

impl Distros {
    /// Parse a comma-separated tag list such as `"openshift-enterprise,openshift-origin"`.
    pub fn parse(tags: &str) -> Self {
        Self(
            tags.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> &[String] {
        &self.0
    }

    /// Whether a node tagged with these distros is built for `distro`.
    pub fn includes(&self, distro: &str) -> bool {
        self.0.is_empty() || self.0.iter().any(|tag| tag == distro)
    }
}

/// One node of a topic map.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawTopic")]
pub enum TopicNode {
    Group {
        dir: String,
        distros: Distros,
        topics: Vec<TopicNode>,
    },
    Leaf {
        file: String,
        distros: Distros,
    },
}

impl TopicNode {
    pub fn group(dir: impl Into<String>, topics: Vec<TopicNode>) -> Self {
        TopicNode::Group {
            dir: dir.into(),
            distros: Distros::all(),
            topics,
        }
    }

    pub fn leaf(file: impl Into<String>) -> Self {
        TopicNode::Leaf {
            file: file.into(),
            distros: Distros::all(),
        }
    }

    /// Restrict this node to a comma-separated list of distros.
    pub fn with_distros(mut self, tags: &str) -> Self {
        match &mut self {
            TopicNode::Group { distros, .. } | TopicNode::Leaf { distros, .. } => {
                *distros = Distros::parse(tags)
            }
        }
        self
    }

    pub fn distros(&self) -> &Distros {
        match self {
            TopicNode::Group { distros, .. } | TopicNode::Leaf { distros, .. } => distros,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, TopicNode::Group { .. })
    }

    /// Resolve this node as the root of a map.
    pub fn resolve(&self, distro: &str) -> Vec<ResolvedPath> {
        resolve_under(self, distro, &[])
    }
}

/// Wire shape of a node, before the group/leaf decision.
#[derive(Debug, Deserialize)]
struct RawTopic {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Dir", default)]
    dir: Option<String>,
    #[serde(rename = "File", default)]
    file: Option<String>,
    #[serde(rename = "Distros", default)]
    distros: Option<String>,
    /// Outer `Some` when the key is present, even as a bare `Topics:`.
    #[serde(rename = "Topics", default, deserialize_with = "present")]
    topics: Option<Option<Vec<TopicNode>>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<RawTopic> for TopicNode {
    fn from(raw: RawTopic) -> Self {
        let distros = raw.distros.as_deref().map(Distros::parse).unwrap_or_default();
        match raw.topics {
            Some(topics) => {
                if raw.file.is_some() {
                    warn!(name = ?raw.name, file = ?raw.file, "Topic node has both Topics and File; treating it as a group");
                }
                TopicNode::Group {
                    dir: raw.dir.unwrap_or_default(),
                    distros,
                    topics: topics.unwrap_or_default(),
                }
            }
            None => {
                if raw.file.is_none() {
                    warn!(name = ?raw.name, dir = ?raw.dir, "Topic node has neither Topics nor File; treating it as a leaf with an empty file name");
                }
                TopicNode::Leaf {
                    file: raw.file.unwrap_or_default(),
                    distros,
                }
            }
        }
    }
}

/// Logical location of a document below a documentation root, without extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedPath {
    components: Vec<String>,
}

impl ResolvedPath {
    pub fn new<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            components: components
                .into_iter()
                .map(Into::into)
                .filter(|c: &String| !c.is_empty())
                .collect(),
        }
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn to_path_buf(&self) -> PathBuf {
        self.components.iter().collect()
    }

    /// The path with `.{extension}` appended to the last component.
    ///
    /// The extension is added, not substituted, so `v1.2` becomes `v1.2.adoc`.
    pub fn with_extension(&self, extension: &str) -> PathBuf {
        let mut path = self.to_path_buf();
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(extension);
        path.set_file_name(name);
        path
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.components.join("/"))
    }
}

fn resolve_under(node: &TopicNode, distro: &str, prefix: &[String]) -> Vec<ResolvedPath> {
    if !node.distros().includes(distro) {
        return Vec::new();
    }
    match node {
        TopicNode::Group { dir, topics, .. } => {
            let prefix = extend(prefix, dir);
            topics
                .iter()
                .flat_map(|topic| resolve_under(topic, distro, &prefix))
                .collect()
        }
        TopicNode::Leaf { file, .. } => vec![ResolvedPath::new(extend(prefix, file))],
    }
}

fn extend(prefix: &[String], component: &str) -> Vec<String> {
    let mut path = prefix.to_vec();
    if !component.is_empty() {
        path.push(component.to_string());
    }
    path
}

/// All root documents of a topic-map file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicMap {
    documents: Vec<TopicNode>,
}

impl TopicMap {
    pub fn new(documents: Vec<TopicNode>) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &[TopicNode] {
        &self.documents
    }

    /// Parse a YAML stream holding one or more `---`-separated map documents.
    ///
    /// Empty documents in the stream are skipped.
    pub fn parse(content: &str) -> Result<Self, String> {
        if is_blank_yaml(content) {
            return Ok(Self::default());
        }
        let mut documents = Vec::new();
        for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
            match Option::<TopicNode>::deserialize(document)
                .map_err(|e| format!("document {}: {e}", index + 1))?
            {
                Some(node) => documents.push(node),
                None => debug!(document = index + 1, "Skipping empty topic map document"),
            }
        }
        Ok(Self { documents })
    }

    /// Read and parse a topic-map file.
    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        info!(topic_map = %path.display(), "Loading topic map");
        let content = fs::read_to_string(path).map_err(|e| ConvertError::TopicMap {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let map = Self::parse(&content).map_err(|message| ConvertError::TopicMap {
            path: path.to_path_buf(),
            message,
        })?;
        info!(documents = map.documents.len(), "Topic map parsed");
        Ok(map)
    }

    /// Resolve every document against an empty prefix and concatenate the results.
    pub fn resolve(&self, distro: &str) -> Vec<ResolvedPath> {
        let paths: Vec<ResolvedPath> = self
            .documents
            .iter()
            .flat_map(|document| document.resolve(distro))
            .collect();
        info!(distro, files = paths.len(), "Resolved topic map");
        paths
    }
}
