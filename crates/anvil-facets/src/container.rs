use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::facet::{Facet, FacetId};

/// The facets currently registered on an owner, iterable in registration
/// order.
pub struct FacetContainer<O> {
    facets: HashMap<TypeId, Box<dyn Facet<O>>>,
    order: Vec<TypeId>,
}

impl<O: 'static> FacetContainer<O> {
    pub fn new() -> Self {
        Self {
            facets: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Registers a facet, replacing any previous facet of the same concrete
    /// type (its registration-order slot is kept).
    pub fn insert(&mut self, facet: Box<dyn Facet<O>>) -> FacetId {
        let id = FacetId::for_instance(facet.as_ref());
        if self.facets.insert(id.type_id(), facet).is_none() {
            self.order.push(id.type_id());
        }
        id
    }

    pub fn contains(&self, id: &FacetId) -> bool {
        self.facets.contains_key(&id.type_id())
    }

    pub fn get<F: Facet<O>>(&self) -> Option<&F> {
        let facet = self.facets.get(&TypeId::of::<F>())?;
        let any: &dyn Any = facet.as_ref();
        any.downcast_ref::<F>()
    }

    pub fn get_mut<F: Facet<O>>(&mut self) -> Option<&mut F> {
        let facet = self.facets.get_mut(&TypeId::of::<F>())?;
        let any: &mut dyn Any = facet.as_mut();
        any.downcast_mut::<F>()
    }

    pub fn remove<F: Facet<O>>(&mut self) -> Option<Box<dyn Facet<O>>> {
        let type_id = TypeId::of::<F>();
        let facet = self.facets.remove(&type_id)?;
        self.order.retain(|id| *id != type_id);
        Some(facet)
    }

    /// Registered facets in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Facet<O>> {
        self.order
            .iter()
            .filter_map(|id| self.facets.get(id).map(Box::as_ref))
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.iter().map(|facet| facet.label()).collect()
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}

impl<O: 'static> Default for FacetContainer<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: 'static> fmt::Debug for FacetContainer<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}

/// Owner seam: anything that carries a [`FacetContainer`] gets typed facet
/// lookup for free.
pub trait Faceted: Sized + 'static {
    fn facet_container(&self) -> &FacetContainer<Self>;

    fn facet_container_mut(&mut self) -> &mut FacetContainer<Self>;

    /// Typed capability query.
    fn facet<F: Facet<Self>>(&self) -> Option<&F> {
        self.facet_container().get::<F>()
    }

    fn facet_mut<F: Facet<Self>>(&mut self) -> Option<&mut F> {
        self.facet_container_mut().get_mut::<F>()
    }

    fn has_facet<F: Facet<Self>>(&self) -> bool {
        self.facet::<F>().is_some()
    }
}
