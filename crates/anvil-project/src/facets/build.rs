use anvil_facets::{Facet, FacetError};
use tracing::debug;

use crate::descriptor::BuildDescriptor;
use crate::project::Project;
use crate::TARGET;

/// Marks a directory as an Anvil project by materializing its build
/// descriptor.
#[derive(Debug, Default)]
pub struct BuildFacet;

impl Facet<Project> for BuildFacet {
    fn is_installed(&self, owner: &Project) -> bool {
        owner.has_descriptor()
    }

    fn install(&mut self, owner: &mut Project) -> Result<(), FacetError> {
        owner
            .root()
            .mkdirs()
            .map_err(|err| FacetError::caused_by("failed to create the project root", err))?;
        let descriptor = BuildDescriptor::seeded(&owner.name());
        debug!(target: TARGET, artifact = %descriptor.artifact, "seeding build descriptor");
        owner
            .store_descriptor(&descriptor)
            .map_err(|err| FacetError::caused_by("failed to write the build descriptor", err))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use anvil_facets::Faceted;
    use anvil_resources::ResourceFactory;

    use crate::facets::default_facet_factory;

    #[test]
    fn install_seeds_the_descriptor_from_the_directory_name() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ResourceFactory::new();
        let mut project =
            Project::with_toml_descriptor(&factory, dir.path().join("shop")).unwrap();
        assert!(!BuildFacet.is_installed(&project));

        default_facet_factory()
            .install(&mut project, BuildFacet)
            .unwrap();

        assert!(project.has_facet::<BuildFacet>());
        let descriptor = project.descriptor().unwrap();
        assert_eq!(descriptor.group, "org.example");
        assert_eq!(descriptor.artifact, "shop");
        assert_eq!(descriptor.version, "1.0.0-SNAPSHOT");
        assert!(BuildFacet.is_installed(&project));
    }
}
