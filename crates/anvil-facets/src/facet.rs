use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::FacetError;

/// An installable capability bound to one owner `O`.
///
/// A facet moves from *not installed* to *installed* via [`Facet::install`],
/// which mutates owner state (creates directories, edits build config).
/// [`Facet::is_installed`] is a pure predicate over owner state and must not
/// assume `install` ever ran: a capability can be present because someone
/// else set the owner up.
pub trait Facet<O>: Any + Send {
    /// Short name used in errors and logs.
    fn label(&self) -> &'static str {
        short_type_name(type_name::<Self>())
    }

    /// Facet types that must be installed on the owner before this one.
    fn requires(&self) -> Vec<FacetId> {
        Vec::new()
    }

    fn is_installed(&self, owner: &O) -> bool;

    fn install(&mut self, owner: &mut O) -> Result<(), FacetError>;

    /// Reverses `install`'s effects where possible.
    fn uninstall(&mut self, owner: &mut O) -> Result<(), FacetError> {
        let _ = owner;
        Ok(())
    }
}

/// Identity of a facet type: its `TypeId` plus a display name.
///
/// Equality and hashing use the `TypeId` only.
#[derive(Clone, Copy, Debug)]
pub struct FacetId {
    type_id: TypeId,
    name: &'static str,
}

impl FacetId {
    pub fn of<F: Any>() -> Self {
        Self {
            type_id: TypeId::of::<F>(),
            name: short_type_name(type_name::<F>()),
        }
    }

    /// Identity of a facet instance's concrete type.
    pub fn for_instance<O: 'static>(facet: &dyn Facet<O>) -> Self {
        Self {
            type_id: facet.type_id(),
            name: facet.label(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl PartialEq for FacetId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for FacetId {}

impl Hash for FacetId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for FacetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn short_type_name(name: &'static str) -> &'static str {
    name.rsplit("::").next().unwrap_or(name)
}
