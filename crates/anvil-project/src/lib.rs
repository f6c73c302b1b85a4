//! Project owner type and the concrete facets installed on it.
//!
//! A [`Project`] ties together a root directory resource, a build descriptor
//! behind an injected [`BuildProvider`], and a facet container. The concrete
//! facets cover the build descriptor itself ([`BuildFacet`]), the dependency
//! list ([`DependencyFacet`]), Java source folders ([`JavaSourceFacet`]) and
//! the background class index ([`ClassIndexFacet`]).

mod descriptor;
mod error;
mod facets;
mod project;
mod resolver;

pub use descriptor::{
    BuildDescriptor, BuildPlugin, BuildProvider, DescriptorError, Packaging, TomlBuildProvider,
    DESCRIPTOR_NAME,
};
pub use error::ProjectError;
pub use facets::{
    default_facet_factory, BuildFacet, ClassIndexFacet, DependencyFacet, JavaSourceFacet,
};
pub use project::Project;
pub use resolver::{ArtifactResolver, LocalRepositoryResolver};

pub(crate) const TARGET: &str = "anvil.project";
