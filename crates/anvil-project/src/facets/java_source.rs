use std::collections::BTreeMap;
use std::path::PathBuf;

use anvil_facets::{Facet, FacetError, FacetId};
use anvil_resources::{DirectoryResource, JavaResource, Resource};
use anvil_syntax::{qualified_to_source_path, JavaSource};
use tracing::debug;

use crate::descriptor::BuildPlugin;
use crate::error::ProjectError;
use crate::facets::BuildFacet;
use crate::project::Project;
use crate::TARGET;

pub const DEFAULT_SOURCE_DIR: &str = "src/main/java";
pub const DEFAULT_TEST_SOURCE_DIR: &str = "src/test/java";

const COMPILER_PLUGIN: &str = "java-compiler";

/// Java source folders plus qualified-name navigation over them.
///
/// The folders default to the standard layout; descriptor overrides win.
/// Installation creates both folders and registers the `java-compiler`
/// plugin in the descriptor.
#[derive(Debug, Default)]
pub struct JavaSourceFacet;

impl JavaSourceFacet {
    /// The main source folder.
    pub fn source_directory(&self, project: &Project) -> Result<DirectoryResource, ProjectError> {
        let relative = self
            .source_override(project, |descriptor| descriptor.source_directory)?
            .unwrap_or_else(|| DEFAULT_SOURCE_DIR.to_string());
        Ok(project
            .factory()
            .directory(project.root().path().join(relative))?)
    }

    /// The test source folder.
    pub fn test_source_directory(
        &self,
        project: &Project,
    ) -> Result<DirectoryResource, ProjectError> {
        let relative = self
            .source_override(project, |descriptor| descriptor.test_source_directory)?
            .unwrap_or_else(|| DEFAULT_TEST_SOURCE_DIR.to_string());
        Ok(project
            .factory()
            .directory(project.root().path().join(relative))?)
    }

    /// Simple type name of a source file, derived from its location under a
    /// source folder.
    pub fn calculate_name(
        &self,
        project: &Project,
        java: &JavaResource,
    ) -> Result<String, ProjectError> {
        let relative = self.relative_to_source_folder(project, java)?;
        Ok(relative
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default())
    }

    /// Dotted package of a source file, derived from its location under a
    /// source folder. The default package is the empty string.
    pub fn calculate_package(
        &self,
        project: &Project,
        java: &JavaResource,
    ) -> Result<String, ProjectError> {
        let relative = self.relative_to_source_folder(project, java)?;
        let segments: Vec<String> = relative
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(segments.join("."))
    }

    /// The project's base package, taken from the descriptor group.
    pub fn base_package(&self, project: &Project) -> Result<String, ProjectError> {
        Ok(project.descriptor()?.group)
    }

    /// A source file handle under the main source folder, from a qualified
    /// type name (`com.example.Widget`) or a path form
    /// (`com/example/Widget.java`). The file does not have to exist.
    pub fn java_resource(
        &self,
        project: &Project,
        qualified: &str,
    ) -> Result<JavaResource, ProjectError> {
        let folder = self.source_directory(project)?;
        Ok(project
            .factory()
            .java(folder.path().join(qualified_to_source_path(qualified)))?)
    }

    /// As [`java_resource`](Self::java_resource), under the test source
    /// folder.
    pub fn test_java_resource(
        &self,
        project: &Project,
        qualified: &str,
    ) -> Result<JavaResource, ProjectError> {
        let folder = self.test_source_directory(project)?;
        Ok(project
            .factory()
            .java(folder.path().join(qualified_to_source_path(qualified)))?)
    }

    /// Renders the unit and writes it at its canonical location under the
    /// main source folder, creating parent directories as needed.
    pub fn save_source(
        &self,
        project: &Project,
        source: &JavaSource,
    ) -> Result<JavaResource, ProjectError> {
        let java = self.java_resource(project, &source.qualified_name())?;
        if let Some(parent) = java.path().parent() {
            project.factory().directory(parent)?.mkdirs()?;
        }
        debug!(target: TARGET, path = %java.path().display(), "writing source file");
        java.set_source(source)?;
        Ok(java)
    }

    /// Invokes `visitor` for every Java source leaf under the main source
    /// folder.
    pub fn visit_sources(
        &self,
        project: &Project,
        visitor: &mut dyn FnMut(&JavaResource),
    ) -> Result<(), ProjectError> {
        visit_java_leaves(&self.source_directory(project)?, visitor);
        Ok(())
    }

    /// Invokes `visitor` for every Java source leaf under the test source
    /// folder.
    pub fn visit_test_sources(
        &self,
        project: &Project,
        visitor: &mut dyn FnMut(&JavaResource),
    ) -> Result<(), ProjectError> {
        visit_java_leaves(&self.test_source_directory(project)?, visitor);
        Ok(())
    }

    fn source_override(
        &self,
        project: &Project,
        pick: impl FnOnce(crate::descriptor::BuildDescriptor) -> Option<String>,
    ) -> Result<Option<String>, ProjectError> {
        if !project.has_descriptor() {
            return Ok(None);
        }
        Ok(pick(project.descriptor()?))
    }

    fn relative_to_source_folder(
        &self,
        project: &Project,
        java: &JavaResource,
    ) -> Result<PathBuf, ProjectError> {
        let folders = [
            self.source_directory(project)?,
            self.test_source_directory(project)?,
        ];
        for folder in &folders {
            if let Ok(relative) = java.path().strip_prefix(folder.path()) {
                return Ok(relative.to_path_buf());
            }
        }
        Err(ProjectError::OutsideSourceFolders {
            path: java.path().to_path_buf(),
        })
    }
}

fn visit_java_leaves(folder: &DirectoryResource, visitor: &mut dyn FnMut(&JavaResource)) {
    let mut observe_all = |_resource: &Resource| true;
    for leaf in Resource::Dir(folder.clone()).list_recursive(&mut observe_all) {
        if let Some(java) = leaf.as_java() {
            visitor(java);
        }
    }
}

fn compiler_plugin() -> BuildPlugin {
    BuildPlugin {
        id: COMPILER_PLUGIN.to_string(),
        settings: BTreeMap::from([
            ("release".to_string(), "17".to_string()),
            ("encoding".to_string(), "UTF-8".to_string()),
        ]),
    }
}

impl Facet<Project> for JavaSourceFacet {
    fn requires(&self) -> Vec<FacetId> {
        vec![FacetId::of::<BuildFacet>()]
    }

    fn is_installed(&self, owner: &Project) -> bool {
        let relative = owner
            .descriptor()
            .ok()
            .and_then(|descriptor| descriptor.source_directory)
            .unwrap_or_else(|| DEFAULT_SOURCE_DIR.to_string());
        owner.root().path().join(relative).is_dir()
    }

    fn install(&mut self, owner: &mut Project) -> Result<(), FacetError> {
        let source = self
            .source_directory(owner)
            .map_err(|err| FacetError::caused_by("failed to locate the source folder", err))?;
        let test = self.test_source_directory(owner).map_err(|err| {
            FacetError::caused_by("failed to locate the test source folder", err)
        })?;
        source
            .mkdirs()
            .map_err(|err| FacetError::caused_by("failed to create the source folder", err))?;
        test.mkdirs().map_err(|err| {
            FacetError::caused_by("failed to create the test source folder", err)
        })?;

        let mut descriptor = owner
            .descriptor()
            .map_err(|err| FacetError::caused_by("failed to load the build descriptor", err))?;
        if !descriptor.has_plugin(COMPILER_PLUGIN) {
            descriptor.plugins.push(compiler_plugin());
            owner.store_descriptor(&descriptor).map_err(|err| {
                FacetError::caused_by("failed to register the compiler plugin", err)
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use anvil_resources::ResourceFactory;
    use anvil_syntax::TypeKind;

    use crate::facets::default_facet_factory;

    fn installed_project(root: &std::path::Path) -> Project {
        let factory = ResourceFactory::new();
        let mut project = Project::with_toml_descriptor(&factory, root).unwrap();
        default_facet_factory()
            .install(&mut project, JavaSourceFacet)
            .unwrap();
        project
    }

    #[test]
    fn install_creates_folders_and_registers_the_compiler() {
        let dir = tempfile::tempdir().unwrap();
        let project = installed_project(&dir.path().join("shop"));

        assert!(dir.path().join("shop/src/main/java").is_dir());
        assert!(dir.path().join("shop/src/test/java").is_dir());

        let descriptor = project.descriptor().unwrap();
        let plugin = descriptor.plugin(COMPILER_PLUGIN).unwrap();
        assert_eq!(plugin.settings.get("release").map(String::as_str), Some("17"));
        assert_eq!(
            plugin.settings.get("encoding").map(String::as_str),
            Some("UTF-8")
        );
    }

    #[test]
    fn descriptor_overrides_win_over_the_default_layout() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ResourceFactory::new();
        let mut project =
            Project::with_toml_descriptor(&factory, dir.path().join("legacy")).unwrap();
        default_facet_factory()
            .install(&mut project, BuildFacet)
            .unwrap();

        let mut descriptor = project.descriptor().unwrap();
        descriptor.source_directory = Some("sources".to_string());
        project.store_descriptor(&descriptor).unwrap();

        default_facet_factory()
            .install(&mut project, JavaSourceFacet)
            .unwrap();
        assert!(dir.path().join("legacy/sources").is_dir());

        let facet = JavaSourceFacet;
        let folder = facet.source_directory(&project).unwrap();
        assert!(folder.path().ends_with("sources"));
    }

    #[test]
    fn name_and_package_invert_java_resource() {
        let dir = tempfile::tempdir().unwrap();
        let project = installed_project(&dir.path().join("shop"));
        let facet = JavaSourceFacet;

        let java = facet
            .java_resource(&project, "com.acme.shop.Order")
            .unwrap();
        assert_eq!(facet.calculate_name(&project, &java).unwrap(), "Order");
        assert_eq!(
            facet.calculate_package(&project, &java).unwrap(),
            "com.acme.shop"
        );

        let test = facet
            .test_java_resource(&project, "com.acme.shop.OrderTest")
            .unwrap();
        assert_eq!(facet.calculate_name(&project, &test).unwrap(), "OrderTest");

        let stray = project
            .factory()
            .java(dir.path().join("Elsewhere.java"))
            .unwrap();
        assert!(matches!(
            facet.calculate_name(&project, &stray),
            Err(ProjectError::OutsideSourceFolders { .. })
        ));
    }

    #[test]
    fn save_source_writes_and_visiting_finds_it() {
        let dir = tempfile::tempdir().unwrap();
        let project = installed_project(&dir.path().join("shop"));
        let facet = JavaSourceFacet;

        let unit = JavaSource::new(Some("com.acme.shop"), "Order", TypeKind::Class);
        let saved = facet.save_source(&project, &unit).unwrap();
        assert!(saved.exists());
        assert_eq!(saved.qualified_name().unwrap(), "com.acme.shop.Order");

        let mut seen = Vec::new();
        facet
            .visit_sources(&project, &mut |java: &JavaResource| {
                seen.push(java.path().to_path_buf());
            })
            .unwrap();
        assert_eq!(seen, vec![saved.path().to_path_buf()]);

        let mut test_seen = 0usize;
        facet
            .visit_test_sources(&project, &mut |_java: &JavaResource| test_seen += 1)
            .unwrap();
        assert_eq!(test_seen, 0);
    }
}
