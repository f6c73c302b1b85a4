use serde::{Deserialize, Serialize};

/// A build dependency coordinate. Only `group` and `artifact` are required;
/// everything else defaults to the build tool's conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub group: String,
    pub artifact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Dependency {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: None,
            classifier: None,
            scope: None,
            kind: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// `group:artifact[:version][:classifier]`.
    pub fn coordinate(&self) -> String {
        let mut coordinate = format!("{}:{}", self.group, self.artifact);
        if let Some(version) = &self.version {
            coordinate.push(':');
            coordinate.push_str(version);
        }
        if let Some(classifier) = &self.classifier {
            coordinate.push(':');
            coordinate.push_str(classifier);
        }
        coordinate
    }

    /// Whether this dependency contributes a jar to the class index. An
    /// unset or empty kind means jar.
    pub fn is_jar(&self) -> bool {
        matches!(self.kind.as_deref(), None | Some("") | Some("jar"))
    }

    /// Matches another coordinate on group and artifact, ignoring version
    /// and the rest.
    pub fn same_artifact(&self, other: &Dependency) -> bool {
        self.group == other.group && self.artifact == other.artifact
    }
}

#[derive(Debug, Clone)]
pub struct DependencyResource {
    dependency: Dependency,
}

impl DependencyResource {
    pub(crate) fn new(dependency: Dependency) -> Self {
        Self { dependency }
    }

    pub fn dependency(&self) -> &Dependency {
        &self.dependency
    }

    pub(crate) fn name(&self) -> String {
        format!("{}:{}", self.dependency.group, self.dependency.artifact)
    }
}
