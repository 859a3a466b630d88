//! Package descriptor and ignore-config readers
//!
//! Discovery only talks to the [`PackageParser`] and [`IgnoreConfigLoader`]
//! traits. The YAML implementations here read `package.yml` and
//! `autobuild.yml`.

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::config::defaults;
use crate::core::package::Package;
use crate::error::DescriptorError;

/// Parses one descriptor format into a [`Package`]
pub trait PackageParser: Send + Sync {
    /// File whose presence marks a package directory for this format
    fn descriptor_file(&self) -> &str;

    /// Parse the package in `dir`
    fn parse(&self, dir: &Path) -> Result<Package, DescriptorError>;
}

/// Per-directory discovery settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct IgnoreConfig {
    /// Prune this directory and everything below it
    #[serde(default)]
    pub ignore: bool,
}

/// Loads an ignore configuration file
pub trait IgnoreConfigLoader: Send + Sync {
    fn load(&self, file: &Path) -> Result<IgnoreConfig, DescriptorError>;
}

/// `package.yml` parser
#[derive(Debug, Clone)]
pub struct YamlPackageParser {
    file_name: String,
}

impl YamlPackageParser {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl Default for YamlPackageParser {
    fn default() -> Self {
        Self::new(defaults::DESCRIPTOR_FILE)
    }
}

#[derive(Debug, Deserialize)]
struct PackageYml {
    name: Option<String>,
    version: Option<String>,
    release: Option<u64>,
}

impl PackageParser for YamlPackageParser {
    fn descriptor_file(&self) -> &str {
        &self.file_name
    }

    fn parse(&self, dir: &Path) -> Result<Package, DescriptorError> {
        let path = dir.join(&self.file_name);
        let content = read(&path)?;
        let parse_error = |e: serde_yaml::Error| DescriptorError::ParseError {
            path: path.clone(),
            error: e.to_string(),
        };
        let yml: PackageYml = serde_yaml::from_str(&content).map_err(parse_error)?;
        let tree = literal_tree(&content).map_err(parse_error)?;

        let missing = |field: &str| DescriptorError::MissingField {
            path: path.clone(),
            field: field.to_string(),
        };
        let name = yml.name.ok_or_else(|| missing("name"))?;
        let version = yml.version.ok_or_else(|| missing("version"))?;
        let release = yml.release.ok_or_else(|| missing("release"))?;

        let mut dependencies = BTreeSet::new();
        for key in ["builddeps", "rundeps"] {
            if let Some(node) = tree.get(key) {
                collect_names(node, &mut dependencies);
            }
        }
        let mut provides = BTreeSet::new();
        if let Some(node) = tree.get("provides") {
            collect_names(node, &mut provides);
        }

        Ok(Package::new(name, version, release)
            .with_dependencies(dependencies)
            .with_provides(provides)
            .at(dir))
    }
}

/// `autobuild.yml` loader
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlIgnoreLoader;

impl IgnoreConfigLoader for YamlIgnoreLoader {
    fn load(&self, file: &Path) -> Result<IgnoreConfig, DescriptorError> {
        let content = read(file)?;
        if content.trim().is_empty() {
            return Ok(IgnoreConfig::default());
        }
        serde_yaml::from_str(&content).map_err(|e| DescriptorError::ParseError {
            path: file.to_path_buf(),
            error: e.to_string(),
        })
    }
}

fn read(path: &Path) -> Result<String, DescriptorError> {
    fs::read_to_string(path).map_err(|e| DescriptorError::ReadError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// YAML node whose scalars keep their source text
#[derive(Debug, PartialEq, Eq)]
enum Node {
    Null,
    Scalar(String),
    Seq(Vec<Node>),
    Map(Vec<(Node, Node)>),
}

impl Node {
    fn get(&self, key: &str) -> Option<&Node> {
        let Node::Map(entries) = self else {
            return None;
        };
        entries
            .iter()
            .find(|(k, _)| matches!(k, Node::Scalar(s) if s == key))
            .map(|(_, v)| v)
    }
}

/// Parse `content` keeping every scalar as written
///
/// A plain `Value` reads `1.10` as the float `1.1`. The document is parsed
/// once for its layout and then replayed, deserializing each scalar
/// position as a string.
fn literal_tree(content: &str) -> Result<Node, serde_yaml::Error> {
    let layout: Value = serde_yaml::from_str(content)?;
    Layout(&layout).deserialize(serde_yaml::Deserializer::from_str(content))
}

#[derive(Clone, Copy)]
struct Layout<'v>(&'v Value);

impl<'de> DeserializeSeed<'de> for Layout<'_> {
    type Value = Node;

    fn deserialize<D>(self, deserializer: D) -> Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        match self.0 {
            Value::Sequence(_) => deserializer.deserialize_seq(self),
            Value::Mapping(_) => deserializer.deserialize_map(self),
            Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                String::deserialize(deserializer).map(Node::Scalar)
            }
            Value::Null | Value::Tagged(_) => {
                IgnoredAny::deserialize(deserializer)?;
                Ok(Node::Null)
            }
        }
    }
}

impl<'de> Visitor<'de> for Layout<'_> {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("the layout of the first parse")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Node, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let Value::Sequence(items) = self.0 else {
            return Err(de::Error::invalid_type(de::Unexpected::Seq, &self));
        };
        let mut nodes = Vec::with_capacity(items.len());
        for item in items {
            let node = seq
                .next_element_seed(Layout(item))?
                .ok_or_else(|| de::Error::invalid_length(nodes.len(), &self))?;
            nodes.push(node);
        }
        Ok(Node::Seq(nodes))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        let Value::Mapping(mapping) = self.0 else {
            return Err(de::Error::invalid_type(de::Unexpected::Map, &self));
        };
        let mut entries = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let key = map
                .next_key_seed(Layout(key))?
                .ok_or_else(|| de::Error::invalid_length(entries.len(), &self))?;
            let value = map.next_value_seed(Layout(value))?;
            entries.push((key, value));
        }
        Ok(Node::Map(entries))
    }
}

/// Gather names from a string, a list, or a `subpackage: names` mapping
fn collect_names(node: &Node, out: &mut BTreeSet<String>) {
    match node {
        Node::Seq(items) => items.iter().for_each(|item| collect_names(item, out)),
        Node::Map(entries) => entries.iter().for_each(|(_, item)| collect_names(item, out)),
        Node::Scalar(name) => {
            let name = name.trim();
            if !name.is_empty() {
                out.insert(name.to_string());
            }
        }
        Node::Null => {}
    }
}
