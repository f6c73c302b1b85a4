use std::any::TypeId;
use std::collections::HashMap;

use crate::container::Faceted;
use crate::facet::{Facet, FacetId};
use crate::{FacetError, TARGET};

type MakeDefault<O> = Box<dyn Fn() -> Box<dyn Facet<O>> + Send + Sync>;

/// Installs facets onto an owner, resolving declared requirements first.
///
/// Requirements are satisfied from a registry of default constructors: for
/// each facet type a requirement names, the factory builds a default
/// instance and installs it recursively before the requesting facet's own
/// `install` runs. A facet that is already installed is registered and left
/// alone (idempotent). Failed installs leave the owner without the facet.
pub struct FacetFactory<O> {
    defaults: HashMap<TypeId, MakeDefault<O>>,
}

impl<O: Faceted + 'static> FacetFactory<O> {
    pub fn new() -> Self {
        Self {
            defaults: HashMap::new(),
        }
    }

    /// Registers the default constructor used when `F` shows up as an unmet
    /// requirement.
    pub fn register_default<F, M>(&mut self, make: M)
    where
        F: Facet<O>,
        M: Fn() -> F + Send + Sync + 'static,
    {
        self.defaults
            .insert(TypeId::of::<F>(), Box::new(move || Box::new(make())));
    }

    pub fn install<F: Facet<O>>(&self, owner: &mut O, facet: F) -> Result<(), FacetError> {
        self.install_boxed(owner, Box::new(facet))
    }

    pub fn install_boxed(
        &self,
        owner: &mut O,
        facet: Box<dyn Facet<O>>,
    ) -> Result<(), FacetError> {
        let mut stack = Vec::new();
        self.install_inner(owner, facet, &mut stack)
    }

    /// Installs a default instance of `F` from the registry.
    pub fn install_default<F: Facet<O>>(&self, owner: &mut O) -> Result<(), FacetError> {
        let id = FacetId::of::<F>();
        let make = self
            .defaults
            .get(&id.type_id())
            .ok_or(FacetError::NoDefault { facet: id.name() })?;
        self.install_boxed(owner, make())
    }

    /// Removes `F` from the owner and runs its `uninstall` hook; the
    /// registration is restored if the hook fails.
    pub fn uninstall<F: Facet<O>>(&self, owner: &mut O) -> Result<(), FacetError> {
        let Some(mut facet) = owner.facet_container_mut().remove::<F>() else {
            return Err(FacetError::NotInstalled {
                facet: FacetId::of::<F>().name(),
            });
        };
        tracing::debug!(target: TARGET, facet = facet.label(), "uninstalling");
        if let Err(err) = facet.uninstall(owner) {
            owner.facet_container_mut().insert(facet);
            return Err(err);
        }
        Ok(())
    }

    fn install_inner(
        &self,
        owner: &mut O,
        mut facet: Box<dyn Facet<O>>,
        stack: &mut Vec<TypeId>,
    ) -> Result<(), FacetError> {
        let id = FacetId::for_instance(facet.as_ref());

        if facet.is_installed(owner) {
            tracing::debug!(target: TARGET, facet = id.name(), "already installed");
            owner.facet_container_mut().insert(facet);
            return Ok(());
        }

        if stack.contains(&id.type_id()) {
            return Err(FacetError::Cycle { facet: id.name() });
        }
        stack.push(id.type_id());
        let requirements = self.install_requirements(owner, facet.as_ref(), stack);
        stack.pop();
        requirements?;

        tracing::debug!(target: TARGET, facet = id.name(), "installing");
        facet.install(owner)?;
        owner.facet_container_mut().insert(facet);
        Ok(())
    }

    fn install_requirements(
        &self,
        owner: &mut O,
        facet: &dyn Facet<O>,
        stack: &mut Vec<TypeId>,
    ) -> Result<(), FacetError> {
        for requirement in facet.requires() {
            if owner.facet_container().contains(&requirement) {
                continue;
            }
            let make =
                self.defaults
                    .get(&requirement.type_id())
                    .ok_or(FacetError::NoDefault {
                        facet: requirement.name(),
                    })?;
            self.install_inner(owner, make(), stack)
                .map_err(|source| FacetError::Requirement {
                    facet: requirement.name(),
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }
}

impl<O: Faceted + 'static> Default for FacetFactory<O> {
    fn default() -> Self {
        Self::new()
    }
}
