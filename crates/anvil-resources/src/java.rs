use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anvil_syntax::{JavaMember, JavaSource};
use tracing::{debug, warn};

use crate::error::ResourceError;
use crate::events::{ResourceEvent, ResourceEventKind};
use crate::factory::ResourceFactory;
use crate::resource::Resource;
use crate::TARGET;

/// A `.java` file whose members surface as child resources.
///
/// The parsed source is memoized per instance behind a mutex: the first
/// access reads and parses the file, later accesses reuse the snapshot until
/// [`refresh`](Self::refresh) or [`set_source`](Self::set_source) discards
/// it. Clones share the cache. The mutex also serializes the lazy parse so
/// concurrent listings never observe a half-built snapshot.
#[derive(Debug, Clone)]
pub struct JavaResource {
    path: PathBuf,
    factory: ResourceFactory,
    cache: Arc<Mutex<Option<Arc<JavaSource>>>>,
}

impl JavaResource {
    pub(crate) fn new(path: PathBuf, factory: ResourceFactory) -> Self {
        Self {
            path,
            factory,
            cache: Arc::new(Mutex::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// The parsed compilation unit. Reads and parses the file on first call;
    /// read or parse failures propagate.
    pub fn source(&self) -> Result<Arc<JavaSource>, ResourceError> {
        let mut cache = self.lock_cache();
        if let Some(source) = cache.as_ref() {
            return Ok(Arc::clone(source));
        }

        let text = fs::read_to_string(&self.path).map_err(|source| ResourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let parsed = self
            .factory
            .parser()
            .parse(&text)
            .map_err(|source| ResourceError::Syntax {
                path: self.path.clone(),
                source,
            })?;
        let parsed = Arc::new(parsed);
        *cache = Some(Arc::clone(&parsed));
        debug!(target: TARGET, path = %self.path.display(), "parsed and cached source");
        Ok(parsed)
    }

    /// Discards the cached parse; the next access re-reads the file.
    pub fn refresh(&self) {
        debug!(target: TARGET, path = %self.path.display(), "discarding cached source");
        *self.lock_cache() = None;
    }

    /// Renders the unit and writes it to this file, invalidating the cache.
    pub fn set_source(&self, source: &JavaSource) -> Result<(), ResourceError> {
        let rendered = source.render();
        let existed = self.path.exists();
        fs::write(&self.path, rendered).map_err(|source| ResourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        *self.lock_cache() = None;
        let kind = if existed {
            ResourceEventKind::Modified
        } else {
            ResourceEventKind::Created
        };
        self.factory.notify(ResourceEvent {
            kind,
            resource: Resource::Java(self.clone()),
        });
        Ok(())
    }

    /// `package.TypeName` of the parsed unit. Unlike member listing, this is
    /// a content operation: a missing or malformed file is an error.
    pub fn qualified_name(&self) -> Result<String, ResourceError> {
        Ok(self.source()?.qualified_name())
    }

    /// Member children in declaration order. A file that is missing or does
    /// not parse lists empty.
    pub(crate) fn children(&self) -> Vec<Resource> {
        match self.source() {
            Ok(source) => source
                .members
                .iter()
                .cloned()
                .map(|member| Resource::JavaMember(JavaMemberResource::new(member, self.clone())))
                .collect(),
            Err(error) => {
                debug!(
                    target: TARGET,
                    path = %self.path.display(),
                    %error,
                    "member listing degraded to empty"
                );
                Vec::new()
            }
        }
    }

    pub fn delete(&self) -> Result<(), ResourceError> {
        fs::remove_file(&self.path).map_err(|source| ResourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.factory.notify(ResourceEvent {
            kind: ResourceEventKind::Deleted,
            resource: Resource::Java(self.clone()),
        });
        Ok(())
    }

    pub(crate) fn factory(&self) -> &ResourceFactory {
        &self.factory
    }

    fn lock_cache(&self) -> MutexGuard<'_, Option<Arc<JavaSource>>> {
        match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(
                    target: TARGET,
                    path = %self.path.display(),
                    "parse cache poisoned; discarding cached source"
                );
                let mut guard = poisoned.into_inner();
                *guard = None;
                guard
            }
        }
    }
}

/// A field, method or enum constant of a parsed Java source file. Purely
/// virtual: it lives only as long as the handle and cannot be deleted.
#[derive(Debug, Clone)]
pub struct JavaMemberResource {
    member: JavaMember,
    parent: JavaResource,
}

impl JavaMemberResource {
    pub(crate) fn new(member: JavaMember, parent: JavaResource) -> Self {
        Self { member, parent }
    }

    pub fn member(&self) -> &JavaMember {
        &self.member
    }

    /// The declared name, without type or parameter decoration.
    pub fn raw_name(&self) -> &str {
        self.member.name()
    }

    /// The display signature, e.g. `count::int` or `run(String)`.
    pub fn signature(&self) -> String {
        self.member.signature()
    }

    pub fn java_parent(&self) -> &JavaResource {
        &self.parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINT: &str = "\
package com.acme.geo;

public class Point {
    private int x;
    private int y;

    public int getX() {
        return 0;
    }
}
";

    fn write_java(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn members_are_cached_until_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_java(dir.path(), "Point.java", POINT);
        let factory = ResourceFactory::new();
        let java = factory.java(&path).unwrap();

        let names: Vec<String> = java
            .children()
            .iter()
            .map(|child| child.name())
            .collect();
        assert_eq!(names, vec!["x::int", "y::int", "getX()"]);

        // A write behind the cache's back is not observed...
        fs::write(&path, "package com.acme.geo;\npublic class Point { private int z; }")
            .unwrap();
        assert_eq!(java.children().len(), 3);

        // ...until the cache is refreshed.
        java.refresh();
        let names: Vec<String> = java
            .children()
            .iter()
            .map(|child| child.name())
            .collect();
        assert_eq!(names, vec!["z::int"]);
    }

    #[test]
    fn parse_failure_lists_empty_but_content_ops_fail() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_java(dir.path(), "Broken.java", "this is not java");
        let factory = ResourceFactory::new();
        let java = factory.java(&path).unwrap();

        assert!(java.children().is_empty());
        assert!(matches!(
            java.qualified_name(),
            Err(ResourceError::Syntax { .. })
        ));
    }

    #[test]
    fn missing_file_lists_empty_but_content_ops_fail() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ResourceFactory::new();
        let java = factory.java(dir.path().join("Ghost.java")).unwrap();

        assert!(java.children().is_empty());
        assert!(matches!(java.qualified_name(), Err(ResourceError::Io { .. })));
    }

    #[test]
    fn set_source_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ResourceFactory::new();
        let java = factory.java(dir.path().join("Greeter.java")).unwrap();

        let unit = JavaSource::new(Some("com.acme"), "Greeter", anvil_syntax::TypeKind::Class)
            .with_member(JavaMember::Field {
                name: "greeting".to_string(),
                type_name: "String".to_string(),
            });
        java.set_source(&unit).unwrap();

        assert_eq!(java.qualified_name().unwrap(), "com.acme.Greeter");
        let reparsed = java.source().unwrap();
        assert_eq!(reparsed.name, "Greeter");
        assert_eq!(reparsed.members.len(), 1);
    }

    #[test]
    fn clones_share_the_parse_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_java(dir.path(), "Point.java", POINT);
        let factory = ResourceFactory::new();
        let java = factory.java(&path).unwrap();
        let alias = java.clone();

        let first = java.source().unwrap();
        let second = alias.source().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
