use std::collections::{BTreeMap, BTreeSet, VecDeque};

use anvil_classfile::ClassSummary;

/// Metadata recorded for one scanned class.
///
/// Names are dotted binary names (`com.example.Foo$Bar`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    pub binary_name: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub annotations: Vec<String>,
    pub interface: bool,
}

impl From<ClassSummary> for ClassEntry {
    fn from(summary: ClassSummary) -> Self {
        let interface = summary.is_interface();
        ClassEntry {
            binary_name: summary.binary_name,
            super_class: summary.super_class,
            interfaces: summary.interfaces,
            annotations: summary.annotations,
            interface,
        }
    }
}

/// Immutable hierarchy and annotation lookup over a set of scanned classes.
///
/// All edges are precomputed at construction. Every query returns binary
/// names sorted and deduplicated, so results are stable across runs.
#[derive(Debug, Default)]
pub struct ClassIndex {
    entries: BTreeMap<String, ClassEntry>,
    /// Super class name to the classes directly extending it.
    subclasses: BTreeMap<String, Vec<String>>,
    /// Interface name to the classes (never interfaces) directly
    /// implementing it.
    implementors: BTreeMap<String, Vec<String>>,
    /// Interface name to the interfaces directly extending it.
    subinterfaces: BTreeMap<String, Vec<String>>,
    /// Annotation name to the types carrying it.
    annotated: BTreeMap<String, Vec<String>>,
}

impl ClassIndex {
    pub fn from_entries(entries: Vec<ClassEntry>) -> Self {
        let mut index = ClassIndex::default();
        for entry in entries {
            let name = entry.binary_name.clone();
            if entry.interface {
                // An interface's class-file super is java.lang.Object; the
                // interfaces it extends arrive in the interfaces list.
                for extended in &entry.interfaces {
                    push_edge(&mut index.subinterfaces, extended, &name);
                }
            } else {
                if let Some(super_class) = &entry.super_class {
                    push_edge(&mut index.subclasses, super_class, &name);
                }
                for implemented in &entry.interfaces {
                    push_edge(&mut index.implementors, implemented, &name);
                }
            }
            for annotation in &entry.annotations {
                push_edge(&mut index.annotated, annotation, &name);
            }
            index.entries.insert(name, entry);
        }
        // Keep results stable for deterministic tests.
        for edges in index
            .subclasses
            .values_mut()
            .chain(index.implementors.values_mut())
            .chain(index.subinterfaces.values_mut())
            .chain(index.annotated.values_mut())
        {
            edges.sort();
            edges.dedup();
        }
        index
    }

    /// Every indexed binary name, sorted.
    pub fn known_classes(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn class_by_name(&self, binary_name: &str) -> Option<&ClassEntry> {
        self.entries.get(binary_name)
    }

    /// Classes whose direct super class is `binary_name`.
    pub fn direct_subclasses(&self, binary_name: &str) -> Vec<String> {
        self.edge(&self.subclasses, binary_name)
    }

    /// Classes extending `binary_name` directly or transitively.
    pub fn all_subclasses(&self, binary_name: &str) -> Vec<String> {
        let mut found = BTreeSet::new();
        let mut frontier: VecDeque<String> = self.direct_subclasses(binary_name).into();
        while let Some(class) = frontier.pop_front() {
            if !found.insert(class.clone()) {
                continue;
            }
            frontier.extend(self.direct_subclasses(&class));
        }
        found.into_iter().collect()
    }

    /// Classes (never interfaces) that list `binary_name` in their
    /// `implements` clause.
    pub fn direct_implementors(&self, binary_name: &str) -> Vec<String> {
        self.edge(&self.implementors, binary_name)
    }

    /// Classes implementing `binary_name` directly, through an extending
    /// interface, or by inheriting from an implementing class.
    pub fn all_implementors(&self, binary_name: &str) -> Vec<String> {
        let mut interfaces = BTreeSet::new();
        let mut frontier = VecDeque::from([binary_name.to_string()]);
        while let Some(interface) = frontier.pop_front() {
            if !interfaces.insert(interface.clone()) {
                continue;
            }
            frontier.extend(self.edge(&self.subinterfaces, &interface));
        }

        let mut found = BTreeSet::new();
        for interface in &interfaces {
            for class in self.direct_implementors(interface) {
                found.extend(self.all_subclasses(&class));
                found.insert(class);
            }
        }
        found.into_iter().collect()
    }

    /// Types carrying `annotation_name` directly.
    pub fn annotated_with(&self, annotation_name: &str) -> Vec<String> {
        self.edge(&self.annotated, annotation_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn edge(&self, map: &BTreeMap<String, Vec<String>>, key: &str) -> Vec<String> {
        map.get(key).cloned().unwrap_or_default()
    }
}

fn push_edge(map: &mut BTreeMap<String, Vec<String>>, key: &str, value: &str) {
    map.entry(key.to_string())
        .or_default()
        .push(value.to_string());
}
