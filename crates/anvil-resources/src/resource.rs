use std::fmt;
use std::path::Path;

use crate::dependency::DependencyResource;
use crate::error::ResourceError;
use crate::factory::{NativeObject, ResourceFactory};
use crate::file::{DirectoryResource, FileResource};
use crate::java::{JavaMemberResource, JavaResource};
use crate::virtuals::{StringResource, UrlResource};

/// One node of the resource tree.
///
/// Every variant wraps exactly one underlying native value; equality is
/// defined over that value, never over allocation identity, so two handles
/// to the same file minted by separate factory calls compare equal.
#[derive(Clone)]
pub enum Resource {
    File(FileResource),
    Dir(DirectoryResource),
    Java(JavaResource),
    JavaMember(JavaMemberResource),
    Url(UrlResource),
    Dependency(DependencyResource),
    Text(StringResource),
}

/// Visitor handed to [`Resource::list_recursive`]. The boolean verdict is
/// observational only: it neither stops traversal nor drops entries from
/// the collected listing.
pub trait ResourceFilter {
    fn accept(&mut self, resource: &Resource) -> bool;
}

impl<F> ResourceFilter for F
where
    F: FnMut(&Resource) -> bool,
{
    fn accept(&mut self, resource: &Resource) -> bool {
        self(resource)
    }
}

impl Resource {
    /// Display name: the file name for path-backed variants, the signature
    /// for members, the coordinate for dependencies.
    pub fn name(&self) -> String {
        match self {
            Resource::File(file) => file_name(file.path()),
            Resource::Dir(dir) => file_name(dir.path()),
            Resource::Java(java) => file_name(java.path()),
            Resource::JavaMember(member) => member.signature(),
            Resource::Url(url) => url.url().as_str().to_string(),
            Resource::Dependency(dependency) => dependency.name(),
            Resource::Text(text) => text.contents().to_string(),
        }
    }

    /// The owning node, if any. Path-backed resources derive it from the
    /// parent path; members point back at their enclosing source file;
    /// virtual resources have none.
    pub fn parent(&self) -> Option<Resource> {
        match self {
            Resource::File(file) => parent_dir(file.path(), file.factory()),
            Resource::Dir(dir) => parent_dir(dir.path(), dir.factory()),
            Resource::Java(java) => parent_dir(java.path(), java.factory()),
            Resource::JavaMember(member) => {
                Some(Resource::Java(member.java_parent().clone()))
            }
            Resource::Url(_) | Resource::Dependency(_) | Resource::Text(_) => None,
        }
    }

    /// The wrapped native value.
    pub fn underlying(&self) -> NativeObject {
        match self {
            Resource::File(file) => NativeObject::Path(file.path().to_path_buf()),
            Resource::Dir(dir) => NativeObject::Path(dir.path().to_path_buf()),
            Resource::Java(java) => NativeObject::Path(java.path().to_path_buf()),
            Resource::JavaMember(member) => NativeObject::Member(member.member().clone()),
            Resource::Url(url) => NativeObject::Url(url.url().clone()),
            Resource::Dependency(dependency) => {
                NativeObject::Dependency(dependency.dependency().clone())
            }
            Resource::Text(text) => NativeObject::Text(text.contents().to_string()),
        }
    }

    /// Child resources in discovery order. Leaves list empty; listing never
    /// fails for expected absence (missing directory, unparsable source).
    pub fn children(&self) -> Vec<Resource> {
        match self {
            Resource::Dir(dir) => dir.children(),
            Resource::Java(java) => java.children(),
            Resource::File(_)
            | Resource::JavaMember(_)
            | Resource::Url(_)
            | Resource::Dependency(_)
            | Resource::Text(_) => Vec::new(),
        }
    }

    /// A child by name. Zero matches is `Ok(None)`; more than one match
    /// under the fuzzy rules (trimmed raw member name or display name) is an
    /// ambiguity error naming the candidates.
    pub fn find_child(&self, name: &str) -> Result<Option<Resource>, ResourceError> {
        let mut matches: Vec<Resource> = self
            .children()
            .into_iter()
            .filter(|child| child.matches_name(name))
            .collect();
        match matches.len() {
            0 => Ok(None),
            1 => Ok(Some(matches.remove(0))),
            _ => Err(ResourceError::AmbiguousName {
                name: name.to_string(),
                candidates: matches.iter().map(Resource::name).collect(),
            }),
        }
    }

    /// Flattens every leaf under this resource, recursing through
    /// directories without surfacing them. The filter sees each leaf as a
    /// side effect; its verdict is ignored.
    pub fn list_recursive(&self, filter: &mut dyn ResourceFilter) -> Vec<Resource> {
        let mut collected = Vec::new();
        self.collect_leaves(filter, &mut collected);
        collected
    }

    fn collect_leaves(&self, filter: &mut dyn ResourceFilter, out: &mut Vec<Resource>) {
        for child in self.children() {
            if matches!(child, Resource::Dir(_)) {
                child.collect_leaves(filter, out);
            } else {
                let _ = filter.accept(&child);
                out.push(child);
            }
        }
    }

    /// Resolves a pathspec (`src/*/Thing.java`, `../sibling`, `/abs/path`)
    /// against this node. Unmatched expressions yield an empty list, never
    /// an error.
    pub fn resolve(&self, expression: &str) -> Vec<Resource> {
        crate::pathspec::resolve(self, expression)
    }

    pub fn exists(&self) -> bool {
        match self {
            Resource::File(file) => file.exists(),
            Resource::Dir(dir) => dir.exists(),
            Resource::Java(java) => java.exists(),
            Resource::Url(url) => url.exists(),
            Resource::JavaMember(_) | Resource::Dependency(_) | Resource::Text(_) => true,
        }
    }

    /// Deletes the underlying file or empty directory. Virtual resources
    /// (members, URLs, dependencies, strings) have no physical backing and
    /// always fail with an unsupported-operation error.
    pub fn delete(&self) -> Result<(), ResourceError> {
        match self {
            Resource::File(file) => file.delete(),
            Resource::Dir(dir) => dir.delete(),
            Resource::Java(java) => java.delete(),
            other => Err(ResourceError::UnsupportedOperation {
                operation: "delete",
                resource: other.name(),
            }),
        }
    }

    /// Like [`delete`](Self::delete) but removes directory contents first.
    pub fn delete_recursive(&self) -> Result<(), ResourceError> {
        match self {
            Resource::File(file) => file.delete(),
            Resource::Dir(dir) => dir.delete_recursive(),
            Resource::Java(java) => java.delete(),
            other => Err(ResourceError::UnsupportedOperation {
                operation: "recursive delete",
                resource: other.name(),
            }),
        }
    }

    pub fn as_file(&self) -> Option<&FileResource> {
        match self {
            Resource::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_directory(&self) -> Option<&DirectoryResource> {
        match self {
            Resource::Dir(dir) => Some(dir),
            _ => None,
        }
    }

    pub fn as_java(&self) -> Option<&JavaResource> {
        match self {
            Resource::Java(java) => Some(java),
            _ => None,
        }
    }

    pub fn as_java_member(&self) -> Option<&JavaMemberResource> {
        match self {
            Resource::JavaMember(member) => Some(member),
            _ => None,
        }
    }

    pub fn as_url(&self) -> Option<&UrlResource> {
        match self {
            Resource::Url(url) => Some(url),
            _ => None,
        }
    }

    pub fn as_dependency(&self) -> Option<&DependencyResource> {
        match self {
            Resource::Dependency(dependency) => Some(dependency),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&StringResource> {
        match self {
            Resource::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Name match used by lookup and pathspec resolution. Members answer to
    /// their trimmed raw name as well as their full signature; everything
    /// else answers to its display name.
    pub(crate) fn matches_name(&self, needle: &str) -> bool {
        match self {
            Resource::JavaMember(member) => {
                let trimmed = needle.trim();
                member.raw_name() == trimmed || member.signature() == trimmed
            }
            _ => self.name() == needle,
        }
    }

    pub(crate) fn factory(&self) -> Option<&ResourceFactory> {
        match self {
            Resource::File(file) => Some(file.factory()),
            Resource::Dir(dir) => Some(dir.factory()),
            Resource::Java(java) => Some(java.factory()),
            Resource::JavaMember(member) => Some(member.java_parent().factory()),
            Resource::Url(_) | Resource::Dependency(_) | Resource::Text(_) => None,
        }
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.underlying() == other.underlying()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::File(file) => write!(f, "{}", file.path().display()),
            Resource::Dir(dir) => write!(f, "{}", dir.path().display()),
            Resource::Java(java) => write!(f, "{}", java.path().display()),
            _ => f.write_str(&self.name()),
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            Resource::File(_) => "File",
            Resource::Dir(_) => "Dir",
            Resource::Java(_) => "Java",
            Resource::JavaMember(_) => "JavaMember",
            Resource::Url(_) => "Url",
            Resource::Dependency(_) => "Dependency",
            Resource::Text(_) => "Text",
        };
        write!(f, "{variant}({self})")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn parent_dir(path: &Path, factory: &ResourceFactory) -> Option<Resource> {
    let parent = path.parent()?;
    if parent.as_os_str().is_empty() {
        return None;
    }
    Some(Resource::Dir(DirectoryResource::new(
        parent.to_path_buf(),
        factory.clone(),
    )))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::dependency::Dependency;

    const OVERLOADS: &str = "\
package com.acme;

public class Tasks {
    private String label;

    public void run() {
    }

    public void run(String arg) {
    }
}
";

    fn java_fixture(dir: &Path) -> Resource {
        let path = dir.join("Tasks.java");
        fs::write(&path, OVERLOADS).unwrap();
        let factory = ResourceFactory::new();
        Resource::Java(factory.java(path).unwrap())
    }

    #[test]
    fn find_child_distinguishes_none_one_and_many() {
        let dir = tempfile::tempdir().unwrap();
        let java = java_fixture(dir.path());

        // Raw name shared by both overloads: ambiguous.
        let err = java.find_child("run").unwrap_err();
        match err {
            ResourceError::AmbiguousName { name, candidates } => {
                assert_eq!(name, "run");
                assert_eq!(candidates, vec!["run()", "run(String)"]);
            }
            other => panic!("expected AmbiguousName, got {other}"),
        }

        // Full signature: exactly one.
        let found = java.find_child("run(String)").unwrap();
        assert_eq!(found.map(|r| r.name()), Some("run(String)".to_string()));

        // Raw field name is unique, so the trimmed fuzzy match resolves it.
        let found = java.find_child("  label  ").unwrap();
        assert_eq!(found.map(|r| r.name()), Some("label::String".to_string()));

        // Absence is not an error.
        assert!(java.find_child("missing").unwrap().is_none());
    }

    #[test]
    fn list_recursive_flattens_leaves_and_ignores_the_verdict() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("top.txt"), "t").unwrap();
        fs::write(dir.path().join("a/mid.txt"), "m").unwrap();
        fs::write(dir.path().join("a/b/deep.txt"), "d").unwrap();

        let factory = ResourceFactory::new();
        let root = Resource::Dir(factory.directory(dir.path()).unwrap());

        let mut seen = Vec::new();
        let mut reject_everything = |resource: &Resource| {
            seen.push(resource.name());
            false
        };
        let listed = root.list_recursive(&mut reject_everything);

        let mut names: Vec<String> = listed.iter().map(Resource::name).collect();
        names.sort();
        assert_eq!(names, vec!["deep.txt", "mid.txt", "top.txt"]);
        // The filter saw every leaf even though it rejected them all.
        assert_eq!(seen.len(), 3);
        // Directories were traversed, not surfaced.
        assert!(listed.iter().all(|r| r.as_directory().is_none()));
    }

    #[test]
    fn virtual_deletes_are_unsupported() {
        let factory = ResourceFactory::new();
        let virtuals = vec![
            Resource::Url(factory.url("https://example.org/x").unwrap()),
            Resource::Dependency(factory.dependency(Dependency::new("g", "a"))),
            Resource::Text(factory.string("inline")),
        ];

        for resource in virtuals {
            assert!(matches!(
                resource.delete(),
                Err(ResourceError::UnsupportedOperation { .. })
            ));
            assert!(matches!(
                resource.delete_recursive(),
                Err(ResourceError::UnsupportedOperation { .. })
            ));
        }
    }

    #[test]
    fn equality_follows_the_underlying_value() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ResourceFactory::new();
        let other_factory = ResourceFactory::new();

        let a = Resource::File(factory.file(dir.path().join("x.txt")).unwrap());
        let b = Resource::File(other_factory.file(dir.path().join("x.txt")).unwrap());
        let c = Resource::File(factory.file(dir.path().join("y.txt")).unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);

        let d1 = Resource::Dependency(factory.dependency(Dependency::new("g", "a")));
        let d2 = Resource::Dependency(factory.dependency(Dependency::new("g", "a")));
        assert_eq!(d1, d2);
    }

    #[test]
    fn parents_walk_toward_the_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let factory = ResourceFactory::new();

        let sub = Resource::Dir(factory.directory(dir.path().join("sub")).unwrap());
        let parent = sub.parent().unwrap();
        assert_eq!(parent.name(), file_name(dir.path()));

        let java = java_fixture(dir.path());
        let member = java.children().remove(0);
        assert_eq!(member.parent().unwrap(), java);
    }
}
