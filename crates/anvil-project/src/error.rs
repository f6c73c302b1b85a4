use std::path::PathBuf;

use anvil_facets::FacetError;
use anvil_index::IndexError;
use anvil_resources::ResourceError;

use crate::descriptor::DescriptorError;

/// Umbrella error for project-layer operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Facet(#[from] FacetError),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("{path} is not under a source folder of this project")]
    OutsideSourceFolders { path: PathBuf },
}
