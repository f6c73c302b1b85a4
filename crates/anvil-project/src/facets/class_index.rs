use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anvil_facets::{Facet, FacetError, FacetId};
use anvil_index::{ClassEntry, ClassIndex, IndexError, IndexTask, Indexer};
use tracing::{debug, warn};

use crate::facets::DependencyFacet;
use crate::project::Project;
use crate::resolver::ArtifactResolver;
use crate::TARGET;

/// A class index over the project's resolved jar dependencies.
///
/// Installation resolves the descriptor's jar-kind dependencies through the
/// injected resolver and scans them on a background thread. Every query
/// blocks on that scan; a facet that was never installed answers with a
/// not-built error instead of blocking forever.
pub struct ClassIndexFacet {
    resolver: Arc<dyn ArtifactResolver>,
    task: Option<IndexTask<ClassIndex>>,
}

impl ClassIndexFacet {
    pub fn new(resolver: Arc<dyn ArtifactResolver>) -> Self {
        Self {
            resolver,
            task: None,
        }
    }

    /// The built index, blocking while the background scan is still running.
    pub fn index(&self) -> Result<Arc<ClassIndex>, IndexError> {
        self.task.as_ref().ok_or(IndexError::NotBuilt)?.wait()
    }

    pub fn known_classes(&self) -> Result<Vec<String>, IndexError> {
        Ok(self.index()?.known_classes())
    }

    pub fn class_by_name(&self, binary_name: &str) -> Result<Option<ClassEntry>, IndexError> {
        Ok(self.index()?.class_by_name(binary_name).cloned())
    }

    pub fn direct_subclasses(&self, binary_name: &str) -> Result<Vec<String>, IndexError> {
        Ok(self.index()?.direct_subclasses(binary_name))
    }

    pub fn all_subclasses(&self, binary_name: &str) -> Result<Vec<String>, IndexError> {
        Ok(self.index()?.all_subclasses(binary_name))
    }

    pub fn direct_implementors(&self, binary_name: &str) -> Result<Vec<String>, IndexError> {
        Ok(self.index()?.direct_implementors(binary_name))
    }

    pub fn all_implementors(&self, binary_name: &str) -> Result<Vec<String>, IndexError> {
        Ok(self.index()?.all_implementors(binary_name))
    }

    pub fn annotated_with(&self, annotation: &str) -> Result<Vec<String>, IndexError> {
        Ok(self.index()?.annotated_with(annotation))
    }

    fn resolve_jars(&self, project: &Project) -> Result<Vec<PathBuf>, FacetError> {
        let descriptor = project
            .descriptor()
            .map_err(|err| FacetError::caused_by("failed to load the build descriptor", err))?;
        let mut jars = Vec::new();
        for dependency in descriptor.dependencies.iter().filter(|d| d.is_jar()) {
            let resolved = self.resolver.resolve(dependency);
            if resolved.is_empty() {
                warn!(
                    target: TARGET,
                    coordinate = %dependency.coordinate(),
                    "dependency did not resolve to any jar"
                );
                continue;
            }
            jars.extend(resolved.iter().map(|file| file.path().to_path_buf()));
        }
        Ok(jars)
    }
}

impl Facet<Project> for ClassIndexFacet {
    fn requires(&self) -> Vec<FacetId> {
        vec![FacetId::of::<DependencyFacet>()]
    }

    fn is_installed(&self, _owner: &Project) -> bool {
        self.task.is_some()
    }

    fn install(&mut self, owner: &mut Project) -> Result<(), FacetError> {
        let jars = self.resolve_jars(owner)?;
        debug!(target: TARGET, jars = jars.len(), "spawning class index build");
        self.task = Some(IndexTask::spawn(move || {
            let mut indexer = Indexer::new();
            for jar in &jars {
                if let Err(error) = indexer.index_jar(jar) {
                    warn!(target: TARGET, %error, "skipping unscannable dependency jar");
                }
            }
            Ok(indexer.finish())
        }));
        Ok(())
    }

    fn uninstall(&mut self, _owner: &mut Project) -> Result<(), FacetError> {
        self.task = None;
        Ok(())
    }
}

impl fmt::Debug for ClassIndexFacet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassIndexFacet")
            .field("built", &self.task.is_some())
            .finish_non_exhaustive()
    }
}
