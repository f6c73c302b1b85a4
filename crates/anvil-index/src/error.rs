use std::io;
use std::path::PathBuf;

/// Failure while scanning class bytes into index entries.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("malformed class file {origin}: {source}")]
    ClassFile {
        origin: String,
        #[source]
        source: anvil_classfile::Error,
    },
}

/// Failure reported by an [`IndexTask`](crate::IndexTask).
///
/// The task caches its outcome, so the same error is handed to every
/// waiter. That requires `Clone`, which is why the scan failure is carried
/// as a rendered message rather than the source error itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("index build failed: {message}")]
    Failed { message: String },

    #[error("index build panicked")]
    Panicked,

    #[error("index has not been built")]
    NotBuilt,
}

impl IndexError {
    pub(crate) fn failed(source: &ScanError) -> Self {
        IndexError::Failed {
            message: source.to_string(),
        }
    }
}
