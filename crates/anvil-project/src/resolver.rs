use std::path::PathBuf;

use anvil_resources::{Dependency, FileResource, ResourceFactory};
use tracing::debug;

use crate::TARGET;

/// Resolves dependency coordinates to jar files on disk.
///
/// Not-found is an empty vector, never an error. Remote fetching and
/// retries belong behind this seam, not in the core.
pub trait ArtifactResolver: Send + Sync {
    fn resolve(&self, dependency: &Dependency) -> Vec<FileResource>;
}

/// Resolves against a Maven-style local repository layout:
/// `group/as/dirs/artifact/version/artifact-version[-classifier].jar`.
#[derive(Debug, Clone)]
pub struct LocalRepositoryResolver {
    root: PathBuf,
    factory: ResourceFactory,
}

impl LocalRepositoryResolver {
    pub fn new(factory: &ResourceFactory, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            factory: factory.clone(),
        }
    }

    fn jar_path(&self, dependency: &Dependency) -> Option<PathBuf> {
        let version = dependency.version.as_deref()?;
        let base = self
            .root
            .join(dependency.group.replace('.', "/"))
            .join(&dependency.artifact)
            .join(version);
        let file_name = match dependency.classifier.as_deref() {
            Some(classifier) => {
                format!("{}-{}-{}.jar", dependency.artifact, version, classifier)
            }
            None => format!("{}-{}.jar", dependency.artifact, version),
        };
        Some(base.join(file_name))
    }
}

impl ArtifactResolver for LocalRepositoryResolver {
    fn resolve(&self, dependency: &Dependency) -> Vec<FileResource> {
        let Some(path) = self.jar_path(dependency) else {
            debug!(
                target: TARGET,
                coordinate = %dependency.coordinate(),
                "cannot resolve a dependency without a version"
            );
            return Vec::new();
        };
        if !path.is_file() {
            debug!(target: TARGET, path = %path.display(), "artifact not in the local repository");
            return Vec::new();
        }
        self.factory
            .file(path)
            .map(|file| vec![file])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::path::Path;

    fn seed_jar(repo: &Path, relative: &str) {
        let path = repo.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"jar bytes").unwrap();
    }

    #[test]
    fn resolves_versioned_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        seed_jar(dir.path(), "org/acme/acme-core/2.1.0/acme-core-2.1.0.jar");

        let factory = ResourceFactory::new();
        let resolver = LocalRepositoryResolver::new(&factory, dir.path());

        let hit = resolver.resolve(&Dependency::new("org.acme", "acme-core").with_version("2.1.0"));
        assert_eq!(hit.len(), 1);
        assert!(hit[0].path().ends_with("acme-core-2.1.0.jar"));

        let miss =
            resolver.resolve(&Dependency::new("org.acme", "acme-core").with_version("9.9.9"));
        assert!(miss.is_empty());
    }

    #[test]
    fn classifier_changes_the_file_name() {
        let dir = tempfile::tempdir().unwrap();
        seed_jar(
            dir.path(),
            "org/acme/acme-core/2.1.0/acme-core-2.1.0-sources.jar",
        );

        let factory = ResourceFactory::new();
        let resolver = LocalRepositoryResolver::new(&factory, dir.path());

        let dependency = Dependency::new("org.acme", "acme-core")
            .with_version("2.1.0")
            .with_classifier("sources");
        let hit = resolver.resolve(&dependency);
        assert_eq!(hit.len(), 1);
        assert!(hit[0].path().ends_with("acme-core-2.1.0-sources.jar"));
    }

    #[test]
    fn unversioned_dependencies_resolve_to_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ResourceFactory::new();
        let resolver = LocalRepositoryResolver::new(&factory, dir.path());
        assert!(resolver.resolve(&Dependency::new("org.acme", "acme-core")).is_empty());
    }
}
