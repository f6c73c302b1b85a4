//! Lightweight Java source model used by the resource tree.
//!
//! This is deliberately not a full Java parser: the resource tree only needs
//! the package, the top-level type, and the member names/shapes, so the
//! shipped [`SourceScanner`] extracts those with a comment-stripping scan and
//! a handful of patterns. Anything that needs real Java semantics should sit
//! behind its own [`JavaSourceParser`] implementation.

mod names;
mod scanner;
mod source;

pub use names::{package_of, qualified_to_source_path, simple_name};
pub use scanner::SourceScanner;
pub use source::{JavaMember, JavaSource, TypeKind};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("no type declaration found")]
    NoTypeDeclaration,
    #[error("unbalanced braces in type body")]
    UnbalancedBraces,
}

/// Parser collaborator seam.
///
/// `parse` fails on malformed input; absence of the backing file is the
/// caller's concern (the caller owns the read).
pub trait JavaSourceParser: Send + Sync {
    fn parse(&self, source: &str) -> Result<JavaSource, SyntaxError>;
}
