use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anvil_facets::{FacetContainer, Faceted};
use anvil_resources::{DirectoryResource, ResourceFactory};
use tracing::debug;

use crate::descriptor::{
    BuildDescriptor, BuildProvider, DescriptorError, TomlBuildProvider, DESCRIPTOR_NAME,
};
use crate::error::ProjectError;
use crate::TARGET;

/// An open project: a root directory, a build descriptor behind its
/// provider, and the facets installed on it.
///
/// The root does not have to exist on disk yet; [`BuildFacet`] creates it
/// when it materializes the descriptor.
///
/// [`BuildFacet`]: crate::BuildFacet
pub struct Project {
    root: DirectoryResource,
    factory: ResourceFactory,
    provider: Arc<dyn BuildProvider>,
    facets: FacetContainer<Project>,
}

impl Project {
    /// Opens `root` as a project with an explicit descriptor provider.
    pub fn open(
        factory: &ResourceFactory,
        root: impl Into<PathBuf>,
        provider: Arc<dyn BuildProvider>,
    ) -> Result<Self, ProjectError> {
        let root = factory.directory(root)?;
        Ok(Self {
            root,
            factory: factory.clone(),
            provider,
            facets: FacetContainer::new(),
        })
    }

    /// Opens `root` with the default TOML provider reading `anvil.toml` in
    /// the root directory.
    pub fn with_toml_descriptor(
        factory: &ResourceFactory,
        root: impl Into<PathBuf>,
    ) -> Result<Self, ProjectError> {
        let root = root.into();
        let provider = Arc::new(TomlBuildProvider::new(root.join(DESCRIPTOR_NAME)));
        Self::open(factory, root, provider)
    }

    /// Climbs from `start` toward the filesystem root and opens the first
    /// ancestor directory holding an `anvil.toml`. `Ok(None)` when no
    /// ancestor does.
    pub fn discover(
        factory: &ResourceFactory,
        start: &Path,
    ) -> Result<Option<Self>, ProjectError> {
        for candidate in start.ancestors() {
            if candidate.join(DESCRIPTOR_NAME).is_file() {
                debug!(target: TARGET, root = %candidate.display(), "discovered project");
                return Self::with_toml_descriptor(factory, candidate).map(Some);
            }
        }
        Ok(None)
    }

    pub fn root(&self) -> &DirectoryResource {
        &self.root
    }

    pub fn factory(&self) -> &ResourceFactory {
        &self.factory
    }

    /// The project name, taken from the root directory name.
    pub fn name(&self) -> String {
        self.root
            .path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    }

    /// True once the build descriptor exists.
    pub fn has_descriptor(&self) -> bool {
        self.provider.exists()
    }

    /// Loads the build descriptor through the provider.
    pub fn descriptor(&self) -> Result<BuildDescriptor, DescriptorError> {
        self.provider.load()
    }

    /// Writes the build descriptor back through the provider.
    pub fn store_descriptor(&self, descriptor: &BuildDescriptor) -> Result<(), DescriptorError> {
        self.provider.store(descriptor)
    }
}

impl Faceted for Project {
    fn facet_container(&self) -> &FacetContainer<Self> {
        &self.facets
    }

    fn facet_container_mut(&mut self) -> &mut FacetContainer<Self> {
        &mut self.facets
    }
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("root", &self.root.path())
            .field("facets", &self.facets)
            .finish_non_exhaustive()
    }
}
