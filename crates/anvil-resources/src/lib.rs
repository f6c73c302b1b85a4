//! Uniform resource tree over heterogeneous underlying objects.
//!
//! The resources layer is responsible for:
//! - Wrapping native values (filesystem paths, URLs, dependency records,
//!   parsed Java members, plain strings) behind one polymorphic [`Resource`]
//!   view with lazy child listing.
//! - Name lookup with ambiguity detection, and recursive filtered listing.
//! - Pathspec resolution (`.`/`..`, `*`/`?` wildcards) against the tree.
//! - Change events fired through listeners registered on the
//!   [`ResourceFactory`].

mod dependency;
mod error;
mod events;
mod factory;
mod file;
mod java;
mod pathspec;
mod resource;
mod virtuals;

pub use dependency::{Dependency, DependencyResource};
pub use error::ResourceError;
pub use events::{ResourceEvent, ResourceEventKind, ResourceListener};
pub use factory::{NativeObject, ResourceFactory, ResourceGenerator};
pub use file::{DirectoryResource, FileResource};
pub use java::{JavaMemberResource, JavaResource};
pub use resource::{Resource, ResourceFilter};

pub(crate) const TARGET: &str = "anvil.resources";
