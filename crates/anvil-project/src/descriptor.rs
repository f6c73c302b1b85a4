use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anvil_resources::Dependency;
use serde::{Deserialize, Serialize};

/// File name of the build descriptor in a project root.
pub const DESCRIPTOR_NAME: &str = "anvil.toml";

/// The build configuration of a project.
///
/// Only the coordinate fields are required; folders default to the standard
/// layout and the dependency and plugin tables start empty. The facet layer
/// mutates this value and hands it back to a [`BuildProvider`], never
/// touching the file format itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDescriptor {
    pub group: String,
    pub artifact: String,
    pub version: String,
    #[serde(default)]
    pub packaging: Packaging,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_source_directory: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<BuildPlugin>,
}

impl BuildDescriptor {
    /// A minimal descriptor for a fresh project named after its root
    /// directory.
    pub fn seeded(artifact: &str) -> Self {
        BuildDescriptor {
            group: "org.example".to_string(),
            artifact: artifact.to_string(),
            version: "1.0.0-SNAPSHOT".to_string(),
            packaging: Packaging::default(),
            source_directory: None,
            test_source_directory: None,
            dependencies: Vec::new(),
            plugins: Vec::new(),
        }
    }

    pub fn plugin(&self, id: &str) -> Option<&BuildPlugin> {
        self.plugins.iter().find(|plugin| plugin.id == id)
    }

    pub fn has_plugin(&self, id: &str) -> bool {
        self.plugin(id).is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Packaging {
    #[default]
    Jar,
    War,
    Ear,
    Pom,
}

/// A named build plugin with string-keyed settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlugin {
    pub id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed descriptor {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize descriptor: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Read/write seam for the build descriptor. Implementations own the file
/// format and its location.
pub trait BuildProvider: Send + Sync {
    fn exists(&self) -> bool;

    fn load(&self) -> Result<BuildDescriptor, DescriptorError>;

    fn store(&self, descriptor: &BuildDescriptor) -> Result<(), DescriptorError>;
}

/// The shipped provider: one TOML file, conventionally `anvil.toml` in the
/// project root.
#[derive(Debug, Clone)]
pub struct TomlBuildProvider {
    path: PathBuf,
}

impl TomlBuildProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BuildProvider for TomlBuildProvider {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> Result<BuildDescriptor, DescriptorError> {
        let text = fs::read_to_string(&self.path).map_err(|source| DescriptorError::Io {
            path: self.path.clone(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| DescriptorError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn store(&self, descriptor: &BuildDescriptor) -> Result<(), DescriptorError> {
        let text = toml::to_string_pretty(descriptor)?;
        fs::write(&self.path, text).map_err(|source| DescriptorError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
