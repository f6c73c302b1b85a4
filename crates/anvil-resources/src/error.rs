use std::io;
use std::path::PathBuf;

use anvil_syntax::SyntaxError;

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// More than one child matches a lookup name. The caller must
    /// disambiguate, e.g. with a full member signature.
    #[error("ambiguous name {name:?}: matches {candidates:?}")]
    AmbiguousName {
        name: String,
        candidates: Vec<String>,
    },

    #[error("{operation} is not supported on {resource}")]
    UnsupportedOperation {
        operation: &'static str,
        resource: String,
    },

    #[error("no resource generator accepts a {kind} value")]
    UnrecognizedType { kind: &'static str },

    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("{path} is not a file")]
    NotAFile { path: PathBuf },

    #[error("{path} is not a Java source file")]
    NotJavaSource { path: PathBuf },

    #[error("invalid URL {spec:?}: {source}")]
    InvalidUrl {
        spec: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Syntax {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },
}
