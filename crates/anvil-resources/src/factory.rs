use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anvil_syntax::{JavaMember, JavaSourceParser, SourceScanner};
use url::Url;

use crate::dependency::{Dependency, DependencyResource};
use crate::error::ResourceError;
use crate::events::{ResourceEvent, ResourceListener};
use crate::file::{DirectoryResource, FileResource};
use crate::java::JavaResource;
use crate::resource::Resource;
use crate::virtuals::{StringResource, UrlResource};

/// A native value a [`Resource`] can wrap.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeObject {
    Path(PathBuf),
    Url(Url),
    Dependency(Dependency),
    Text(String),
    /// A parsed source member. Members are minted by their enclosing Java
    /// resource, never by the factory.
    Member(JavaMember),
}

impl NativeObject {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            NativeObject::Path(_) => "path",
            NativeObject::Url(_) => "URL",
            NativeObject::Dependency(_) => "dependency",
            NativeObject::Text(_) => "string",
            NativeObject::Member(_) => "java member",
        }
    }
}

/// Maps native values to resource views. Generators are consulted in
/// registration order, most specific first; the first one to answer wins.
pub trait ResourceGenerator: Send + Sync {
    fn generate(&self, factory: &ResourceFactory, native: &NativeObject) -> Option<Resource>;
}

/// Mints resources and owns the cross-cutting machinery they share: the
/// generator list, the Java source parser and the event listeners. Cloning
/// is cheap and clones share all of it.
#[derive(Clone)]
pub struct ResourceFactory {
    inner: Arc<FactoryInner>,
}

struct FactoryInner {
    parser: Arc<dyn JavaSourceParser>,
    generators: Mutex<Vec<Box<dyn ResourceGenerator>>>,
    listeners: Mutex<Vec<Arc<dyn ResourceListener>>>,
}

impl ResourceFactory {
    pub fn new() -> Self {
        Self::with_parser(Arc::new(SourceScanner::new()))
    }

    pub fn with_parser(parser: Arc<dyn JavaSourceParser>) -> Self {
        Self {
            inner: Arc::new(FactoryInner {
                parser,
                generators: Mutex::new(default_generators()),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Registers a generator ahead of the built-in ones, so custom shapes
    /// take precedence.
    pub fn register_generator(&self, generator: Box<dyn ResourceGenerator>) {
        self.lock_generators().insert(0, generator);
    }

    /// A resource view of the native value, produced by the first generator
    /// that recognizes its shape.
    pub fn create(&self, native: NativeObject) -> Result<Resource, ResourceError> {
        let generators = self.lock_generators();
        for generator in generators.iter() {
            if let Some(resource) = generator.generate(self, &native) {
                return Ok(resource);
            }
        }
        Err(ResourceError::UnrecognizedType {
            kind: native.kind_name(),
        })
    }

    /// A file handle. Fails if the path exists and is a directory.
    pub fn file(&self, path: impl Into<PathBuf>) -> Result<FileResource, ResourceError> {
        let path = path.into();
        if path.is_dir() {
            return Err(ResourceError::NotAFile { path });
        }
        Ok(FileResource::new(path, self.clone()))
    }

    /// A directory handle. Fails if the path exists and is not a directory.
    pub fn directory(&self, path: impl Into<PathBuf>) -> Result<DirectoryResource, ResourceError> {
        let path = path.into();
        if path.exists() && !path.is_dir() {
            return Err(ResourceError::NotADirectory { path });
        }
        Ok(DirectoryResource::new(path, self.clone()))
    }

    /// A Java source handle. The path must carry the `.java` extension and
    /// must not be an existing directory.
    pub fn java(&self, path: impl Into<PathBuf>) -> Result<JavaResource, ResourceError> {
        let path = path.into();
        match path.extension() {
            Some(ext) if ext == "java" => {}
            _ => return Err(ResourceError::NotJavaSource { path }),
        }
        if path.is_dir() {
            return Err(ResourceError::NotAFile { path });
        }
        Ok(JavaResource::new(path, self.clone()))
    }

    pub fn url(&self, spec: &str) -> Result<UrlResource, ResourceError> {
        let url = Url::parse(spec).map_err(|source| ResourceError::InvalidUrl {
            spec: spec.to_string(),
            source,
        })?;
        Ok(UrlResource::new(url))
    }

    pub fn dependency(&self, dependency: Dependency) -> DependencyResource {
        DependencyResource::new(dependency)
    }

    pub fn string(&self, value: impl Into<String>) -> StringResource {
        StringResource::new(value.into())
    }

    pub fn subscribe(&self, listener: Arc<dyn ResourceListener>) {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(listener);
    }

    pub(crate) fn notify(&self, event: ResourceEvent) {
        let listeners: Vec<Arc<dyn ResourceListener>> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        for listener in listeners {
            listener.on_event(&event);
        }
    }

    pub(crate) fn parser(&self) -> Arc<dyn JavaSourceParser> {
        Arc::clone(&self.inner.parser)
    }

    fn lock_generators(&self) -> std::sync::MutexGuard<'_, Vec<Box<dyn ResourceGenerator>>> {
        self.inner
            .generators
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ResourceFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResourceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceFactory").finish_non_exhaustive()
    }
}

fn default_generators() -> Vec<Box<dyn ResourceGenerator>> {
    vec![
        Box::new(JavaFileGenerator),
        Box::new(DirectoryGenerator),
        Box::new(FileGenerator),
        Box::new(UrlGenerator),
        Box::new(DependencyGenerator),
        Box::new(TextGenerator),
    ]
}

struct JavaFileGenerator;

impl ResourceGenerator for JavaFileGenerator {
    fn generate(&self, factory: &ResourceFactory, native: &NativeObject) -> Option<Resource> {
        let NativeObject::Path(path) = native else {
            return None;
        };
        let is_java = path
            .extension()
            .map(|ext| ext == "java")
            .unwrap_or(false);
        if is_java && !path.is_dir() {
            Some(Resource::Java(JavaResource::new(
                path.clone(),
                factory.clone(),
            )))
        } else {
            None
        }
    }
}

struct DirectoryGenerator;

impl ResourceGenerator for DirectoryGenerator {
    fn generate(&self, factory: &ResourceFactory, native: &NativeObject) -> Option<Resource> {
        let NativeObject::Path(path) = native else {
            return None;
        };
        if path.is_dir() || has_trailing_separator(path) {
            Some(Resource::Dir(DirectoryResource::new(
                path.clone(),
                factory.clone(),
            )))
        } else {
            None
        }
    }
}

struct FileGenerator;

impl ResourceGenerator for FileGenerator {
    fn generate(&self, factory: &ResourceFactory, native: &NativeObject) -> Option<Resource> {
        let NativeObject::Path(path) = native else {
            return None;
        };
        Some(Resource::File(FileResource::new(
            path.clone(),
            factory.clone(),
        )))
    }
}

struct UrlGenerator;

impl ResourceGenerator for UrlGenerator {
    fn generate(&self, _factory: &ResourceFactory, native: &NativeObject) -> Option<Resource> {
        let NativeObject::Url(url) = native else {
            return None;
        };
        Some(Resource::Url(UrlResource::new(url.clone())))
    }
}

struct DependencyGenerator;

impl ResourceGenerator for DependencyGenerator {
    fn generate(&self, _factory: &ResourceFactory, native: &NativeObject) -> Option<Resource> {
        let NativeObject::Dependency(dependency) = native else {
            return None;
        };
        Some(Resource::Dependency(DependencyResource::new(
            dependency.clone(),
        )))
    }
}

struct TextGenerator;

impl ResourceGenerator for TextGenerator {
    fn generate(&self, _factory: &ResourceFactory, native: &NativeObject) -> Option<Resource> {
        let NativeObject::Text(value) = native else {
            return None;
        };
        Some(Resource::Text(StringResource::new(value.clone())))
    }
}

/// A path spelled with a trailing separator names a directory even before it
/// exists on disk.
fn has_trailing_separator(path: &Path) -> bool {
    let raw = path.as_os_str().to_string_lossy();
    raw.ends_with('/') || raw.ends_with('\\')
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn create_dispatches_by_shape() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.java"), "class A {}").unwrap();
        fs::write(dir.path().join("data.bin"), [0u8]).unwrap();

        let factory = ResourceFactory::new();
        let java = factory
            .create(NativeObject::Path(dir.path().join("A.java")))
            .unwrap();
        assert!(java.as_java().is_some());

        let plain = factory
            .create(NativeObject::Path(dir.path().join("data.bin")))
            .unwrap();
        assert!(plain.as_file().is_some());

        let existing_dir = factory
            .create(NativeObject::Path(dir.path().to_path_buf()))
            .unwrap();
        assert!(existing_dir.as_directory().is_some());

        let future_dir = factory
            .create(NativeObject::Path(PathBuf::from("not/yet/here/")))
            .unwrap();
        assert!(future_dir.as_directory().is_some());

        let url = factory
            .create(NativeObject::Url(
                Url::parse("https://example.org/lib.jar").unwrap(),
            ))
            .unwrap();
        assert!(url.as_url().is_some());

        let dependency = factory
            .create(NativeObject::Dependency(Dependency::new("org.acme", "core")))
            .unwrap();
        assert!(dependency.as_dependency().is_some());

        let text = factory
            .create(NativeObject::Text("hello".to_string()))
            .unwrap();
        assert!(text.as_text().is_some());
    }

    #[test]
    fn detached_members_are_unrecognized() {
        let factory = ResourceFactory::new();
        let member = NativeObject::Member(JavaMember::EnumConstant {
            name: "NORTH".to_string(),
        });
        assert!(matches!(
            factory.create(member),
            Err(ResourceError::UnrecognizedType { kind: "java member" })
        ));
    }

    #[test]
    fn shape_mismatches_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("plain.txt"), "x").unwrap();

        let factory = ResourceFactory::new();
        assert!(matches!(
            factory.file(dir.path()),
            Err(ResourceError::NotAFile { .. })
        ));
        assert!(matches!(
            factory.directory(dir.path().join("plain.txt")),
            Err(ResourceError::NotADirectory { .. })
        ));
        assert!(matches!(
            factory.java(dir.path().join("plain.txt")),
            Err(ResourceError::NotJavaSource { .. })
        ));
    }

    #[test]
    fn registered_generators_take_precedence() {
        struct MarkdownAsText;

        impl ResourceGenerator for MarkdownAsText {
            fn generate(
                &self,
                _factory: &ResourceFactory,
                native: &NativeObject,
            ) -> Option<Resource> {
                let NativeObject::Path(path) = native else {
                    return None;
                };
                if path.extension().map(|ext| ext == "md").unwrap_or(false) {
                    Some(Resource::Text(StringResource::new(
                        path.display().to_string(),
                    )))
                } else {
                    None
                }
            }
        }

        let factory = ResourceFactory::new();
        factory.register_generator(Box::new(MarkdownAsText));
        let resource = factory
            .create(NativeObject::Path(PathBuf::from("README.md")))
            .unwrap();
        assert!(resource.as_text().is_some());
    }

    #[test]
    fn invalid_url_is_an_error() {
        let factory = ResourceFactory::new();
        assert!(matches!(
            factory.url("not a url"),
            Err(ResourceError::InvalidUrl { .. })
        ));
    }
}
