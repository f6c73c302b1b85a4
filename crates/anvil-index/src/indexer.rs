use std::ffi::OsStr;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anvil_classfile::ClassSummary;
use tracing::{debug, warn};

use crate::error::ScanError;
use crate::index::{ClassEntry, ClassIndex};
use crate::TARGET;

/// Accumulates scanned class metadata before freezing it into a
/// [`ClassIndex`].
#[derive(Debug, Default)]
pub struct Indexer {
    entries: Vec<ClassEntry>,
}

impl Indexer {
    pub fn new() -> Self {
        Indexer::default()
    }

    /// Record one class from raw bytes. `origin` says where the bytes came
    /// from and only feeds error reporting.
    pub fn add_class(&mut self, bytes: &[u8], origin: &str) -> Result<(), ScanError> {
        let summary = ClassSummary::parse(bytes).map_err(|source| ScanError::ClassFile {
            origin: origin.to_string(),
            source,
        })?;
        self.entries.push(ClassEntry::from(summary));
        Ok(())
    }

    /// Scan every `.class` entry of a jar, nested and multi-release entries
    /// included. Malformed entries are logged and skipped so one bad class
    /// does not discard the rest of the archive. Returns the number of
    /// classes recorded.
    pub fn index_jar(&mut self, path: &Path) -> Result<usize, ScanError> {
        let file = File::open(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive = zip::ZipArchive::new(file).map_err(|source| ScanError::Archive {
            path: path.to_path_buf(),
            source,
        })?;

        let mut added = 0;
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|source| ScanError::Archive {
                path: path.to_path_buf(),
                source,
            })?;
            if !entry.is_file() || !entry.name().ends_with(".class") {
                continue;
            }
            let origin = format!("{}!{}", path.display(), entry.name());
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            if let Err(error) = entry.read_to_end(&mut bytes) {
                warn!(target: TARGET, %origin, %error, "skipping unreadable jar entry");
                continue;
            }
            match self.add_class(&bytes, &origin) {
                Ok(()) => added += 1,
                Err(error) => warn!(target: TARGET, %error, "skipping malformed class"),
            }
        }
        debug!(target: TARGET, path = %path.display(), added, "indexed jar");
        Ok(added)
    }

    /// Scan every `.class` file under a directory tree.
    pub fn index_class_dir(&mut self, dir: &Path) -> Result<usize, ScanError> {
        let mut added = 0;
        for entry in walkdir::WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension() != Some(OsStr::new("class")) {
                continue;
            }
            let bytes = std::fs::read(entry.path()).map_err(|source| ScanError::Io {
                path: entry.path().to_path_buf(),
                source,
            })?;
            let origin = entry.path().display().to_string();
            match self.add_class(&bytes, &origin) {
                Ok(()) => added += 1,
                Err(error) => warn!(target: TARGET, %error, "skipping malformed class"),
            }
        }
        debug!(target: TARGET, dir = %dir.display(), added, "indexed class directory");
        Ok(added)
    }

    /// Freeze the accumulated entries into an immutable index.
    pub fn finish(self) -> ClassIndex {
        ClassIndex::from_entries(self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use anvil_testing::ClassBytes;

    #[test]
    fn add_class_records_an_entry() {
        let mut indexer = Indexer::new();
        indexer
            .add_class(&ClassBytes::new("com.example.One").build(), "test")
            .unwrap();
        let index = indexer.finish();
        assert_eq!(index.known_classes(), ["com.example.One"]);
    }

    #[test]
    fn malformed_bytes_name_their_origin() {
        let mut indexer = Indexer::new();
        let err = indexer.add_class(b"not a class", "fixture!Bad.class").unwrap_err();
        assert!(
            matches!(err, ScanError::ClassFile { ref origin, .. } if origin == "fixture!Bad.class")
        );
    }

    #[test]
    fn missing_jar_is_an_io_error() {
        let mut indexer = Indexer::new();
        let err = indexer.index_jar(Path::new("/no/such/lib.jar")).unwrap_err();
        assert!(matches!(err, ScanError::Io { .. }));
    }
}
