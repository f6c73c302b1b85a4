use crate::resource::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceEventKind {
    Created,
    Modified,
    Deleted,
}

/// A change performed through a resource: a content write, a creation or a
/// deletion. Changes made behind the tree's back (e.g. another process
/// touching the file) are not observed.
#[derive(Debug, Clone)]
pub struct ResourceEvent {
    pub kind: ResourceEventKind,
    pub resource: Resource,
}

pub trait ResourceListener: Send + Sync {
    fn on_event(&self, event: &ResourceEvent);
}

impl<F> ResourceListener for F
where
    F: Fn(&ResourceEvent) + Send + Sync,
{
    fn on_event(&self, event: &ResourceEvent) {
        self(event)
    }
}
