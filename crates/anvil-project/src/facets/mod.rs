//! Concrete facets installable on a [`Project`](crate::Project).

mod build;
mod class_index;
mod dependencies;
mod java_source;

pub use build::BuildFacet;
pub use class_index::ClassIndexFacet;
pub use dependencies::DependencyFacet;
pub use java_source::JavaSourceFacet;

use anvil_facets::FacetFactory;

use crate::project::Project;

/// A facet factory with defaults registered for every facet constructible
/// without collaborators. [`ClassIndexFacet`] needs an artifact resolver,
/// so it is always installed explicitly.
pub fn default_facet_factory() -> FacetFactory<Project> {
    let mut factory = FacetFactory::new();
    factory.register_default::<BuildFacet, _>(BuildFacet::default);
    factory.register_default::<DependencyFacet, _>(DependencyFacet::default);
    factory.register_default::<JavaSourceFacet, _>(JavaSourceFacet::default);
    factory
}
