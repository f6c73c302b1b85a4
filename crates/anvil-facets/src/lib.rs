//! Capability composition for project-like owners.
//!
//! A [`Facet`] is an installable capability bound to exactly one owner. The
//! owner exposes its facets through [`Faceted`], and [`FacetFactory`]
//! installs facets while resolving their declared requirements first.

mod container;
mod facet;
mod factory;

pub use container::{FacetContainer, Faceted};
pub use facet::{Facet, FacetId};
pub use factory::FacetFactory;

use thiserror::Error;

pub(crate) const TARGET: &str = "anvil.facets";

#[derive(Debug, Error)]
pub enum FacetError {
    #[error("facet {facet} is not installed")]
    NotInstalled { facet: &'static str },
    #[error("no default registered for required facet {facet}")]
    NoDefault { facet: &'static str },
    #[error("required facet {facet} could not be installed")]
    Requirement {
        facet: &'static str,
        #[source]
        source: Box<FacetError>,
    },
    #[error("facet requirements form a cycle at {facet}")]
    Cycle { facet: &'static str },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl FacetError {
    pub fn failed(message: impl Into<String>) -> Self {
        FacetError::Failed {
            message: message.into(),
            source: None,
        }
    }

    pub fn caused_by(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        FacetError::Failed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
