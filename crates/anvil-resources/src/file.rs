use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ResourceError;
use crate::events::{ResourceEvent, ResourceEventKind};
use crate::factory::{NativeObject, ResourceFactory};
use crate::resource::Resource;
use crate::TARGET;

/// A plain file on disk. The path does not have to exist yet; content
/// operations create it.
#[derive(Debug, Clone)]
pub struct FileResource {
    path: PathBuf,
    factory: ResourceFactory,
}

impl FileResource {
    pub(crate) fn new(path: PathBuf, factory: ResourceFactory) -> Self {
        Self { path, factory }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn contents(&self) -> Result<String, ResourceError> {
        fs::read_to_string(&self.path).map_err(|source| ResourceError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn contents_bytes(&self) -> Result<Vec<u8>, ResourceError> {
        fs::read(&self.path).map_err(|source| ResourceError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn set_contents(&self, contents: &str) -> Result<(), ResourceError> {
        let existed = self.path.exists();
        fs::write(&self.path, contents).map_err(|source| ResourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let kind = if existed {
            ResourceEventKind::Modified
        } else {
            ResourceEventKind::Created
        };
        self.factory.notify(ResourceEvent {
            kind,
            resource: Resource::File(self.clone()),
        });
        Ok(())
    }

    /// Creates the file empty. Fails if it already exists.
    pub fn create_new(&self) -> Result<(), ResourceError> {
        fs::File::create_new(&self.path).map_err(|source| ResourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.factory.notify(ResourceEvent {
            kind: ResourceEventKind::Created,
            resource: Resource::File(self.clone()),
        });
        Ok(())
    }

    pub fn delete(&self) -> Result<(), ResourceError> {
        fs::remove_file(&self.path).map_err(|source| ResourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.factory.notify(ResourceEvent {
            kind: ResourceEventKind::Deleted,
            resource: Resource::File(self.clone()),
        });
        Ok(())
    }

    pub(crate) fn factory(&self) -> &ResourceFactory {
        &self.factory
    }
}

/// A directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryResource {
    path: PathBuf,
    factory: ResourceFactory,
}

impl DirectoryResource {
    pub(crate) fn new(path: PathBuf, factory: ResourceFactory) -> Self {
        Self { path, factory }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Creates this directory and any missing ancestors. Existing
    /// directories are left alone.
    pub fn mkdirs(&self) -> Result<(), ResourceError> {
        if self.path.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.path).map_err(|source| ResourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.factory.notify(ResourceEvent {
            kind: ResourceEventKind::Created,
            resource: Resource::Dir(self.clone()),
        });
        Ok(())
    }

    /// Directory entries sorted by file name, each materialized through the
    /// factory (`.java` files come back as Java resources, subdirectories as
    /// directories). A missing or unreadable directory lists empty.
    pub fn children(&self) -> Vec<Resource> {
        let entries = match fs::read_dir(&self.path) {
            Ok(entries) => entries,
            Err(error) => {
                debug!(
                    target: TARGET,
                    path = %self.path.display(),
                    %error,
                    "directory listing failed"
                );
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .collect();
        paths.sort();

        let mut children = Vec::with_capacity(paths.len());
        for path in paths {
            match self.factory.create(NativeObject::Path(path)) {
                Ok(resource) => children.push(resource),
                Err(error) => {
                    debug!(target: TARGET, %error, "skipping unresolvable directory entry");
                }
            }
        }
        children
    }

    /// A child resource by name, materialized through the factory whether or
    /// not it exists yet.
    pub fn child(&self, name: &str) -> Result<Resource, ResourceError> {
        self.factory.create(NativeObject::Path(self.path.join(name)))
    }

    pub fn child_directory(&self, name: &str) -> Result<DirectoryResource, ResourceError> {
        self.factory.directory(self.path.join(name))
    }

    pub fn child_file(&self, name: &str) -> Result<FileResource, ResourceError> {
        self.factory.file(self.path.join(name))
    }

    /// Removes the directory. Fails on non-empty directories; use
    /// [`delete_recursive`](Self::delete_recursive) for those.
    pub fn delete(&self) -> Result<(), ResourceError> {
        fs::remove_dir(&self.path).map_err(|source| ResourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.factory.notify(ResourceEvent {
            kind: ResourceEventKind::Deleted,
            resource: Resource::Dir(self.clone()),
        });
        Ok(())
    }

    pub fn delete_recursive(&self) -> Result<(), ResourceError> {
        fs::remove_dir_all(&self.path).map_err(|source| ResourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.factory.notify(ResourceEvent {
            kind: ResourceEventKind::Deleted,
            resource: Resource::Dir(self.clone()),
        });
        Ok(())
    }

    pub(crate) fn factory(&self) -> &ResourceFactory {
        &self.factory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_are_sorted_and_typed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("A.java"), "public class A {}").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let factory = ResourceFactory::new();
        let root = factory.directory(dir.path()).unwrap();
        let children = root.children();

        let names: Vec<String> = children.iter().map(|child| child.name()).collect();
        assert_eq!(names, vec!["A.java", "b.txt", "sub"]);
        assert!(children[0].as_java().is_some());
        assert!(children[1].as_file().is_some());
        assert!(children[2].as_directory().is_some());
    }

    #[test]
    fn missing_directory_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ResourceFactory::new();
        let ghost = factory.directory(dir.path().join("ghost")).unwrap();
        assert!(ghost.children().is_empty());
        assert!(!ghost.exists());
    }

    #[test]
    fn set_contents_creates_then_modifies() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ResourceFactory::new();
        let file = factory.file(dir.path().join("notes.txt")).unwrap();

        assert!(!file.exists());
        file.set_contents("one").unwrap();
        assert_eq!(file.contents().unwrap(), "one");
        file.set_contents("two").unwrap();
        assert_eq!(file.contents().unwrap(), "two");

        file.delete().unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn mkdirs_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ResourceFactory::new();
        let nested = factory.directory(dir.path().join("a/b/c")).unwrap();
        nested.mkdirs().unwrap();
        nested.mkdirs().unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn plain_delete_refuses_non_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("full")).unwrap();
        fs::write(dir.path().join("full/x.txt"), "x").unwrap();

        let factory = ResourceFactory::new();
        let full = factory.directory(dir.path().join("full")).unwrap();
        assert!(full.delete().is_err());
        full.delete_recursive().unwrap();
        assert!(!full.exists());
    }
}
