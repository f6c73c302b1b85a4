use anvil_facets::{Facet, FacetError, FacetId};
use anvil_resources::Dependency;
use tracing::debug;

use crate::error::ProjectError;
use crate::facets::BuildFacet;
use crate::project::Project;
use crate::TARGET;

/// Dependency-list operations over the build descriptor.
#[derive(Debug, Default)]
pub struct DependencyFacet;

impl DependencyFacet {
    /// Declares the dependency, replacing any existing entry with the same
    /// group/artifact pair.
    pub fn add_dependency(
        &self,
        project: &Project,
        dependency: Dependency,
    ) -> Result<(), ProjectError> {
        let mut descriptor = project.descriptor()?;
        descriptor
            .dependencies
            .retain(|existing| !existing.same_artifact(&dependency));
        debug!(target: TARGET, coordinate = %dependency.coordinate(), "adding dependency");
        descriptor.dependencies.push(dependency);
        project.store_descriptor(&descriptor)?;
        Ok(())
    }

    /// Removes every entry with the dependency's group/artifact pair.
    /// Removing an undeclared dependency is a no-op.
    pub fn remove_dependency(
        &self,
        project: &Project,
        dependency: &Dependency,
    ) -> Result<(), ProjectError> {
        let mut descriptor = project.descriptor()?;
        let before = descriptor.dependencies.len();
        descriptor
            .dependencies
            .retain(|existing| !existing.same_artifact(dependency));
        if descriptor.dependencies.len() != before {
            debug!(target: TARGET, coordinate = %dependency.coordinate(), "removing dependency");
            project.store_descriptor(&descriptor)?;
        }
        Ok(())
    }

    /// Whether an entry with this group/artifact pair is declared, at any
    /// version.
    pub fn has_dependency(
        &self,
        project: &Project,
        dependency: &Dependency,
    ) -> Result<bool, ProjectError> {
        let descriptor = project.descriptor()?;
        Ok(descriptor
            .dependencies
            .iter()
            .any(|existing| existing.same_artifact(dependency)))
    }

    /// The declared dependencies, in descriptor order.
    pub fn dependencies(&self, project: &Project) -> Result<Vec<Dependency>, ProjectError> {
        Ok(project.descriptor()?.dependencies)
    }
}

impl Facet<Project> for DependencyFacet {
    fn requires(&self) -> Vec<FacetId> {
        vec![FacetId::of::<BuildFacet>()]
    }

    fn is_installed(&self, owner: &Project) -> bool {
        owner.has_descriptor()
    }

    fn install(&mut self, _owner: &mut Project) -> Result<(), FacetError> {
        // The descriptor the BuildFacet requirement materialized already
        // carries the dependency table.
        Ok(())
    }
}
