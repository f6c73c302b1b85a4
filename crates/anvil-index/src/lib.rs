//! Reflection-free class index built in the background.
//!
//! This crate is responsible for:
//! - Scanning jar files and loose class directories into per-class metadata
//!   (name, super class, interfaces, annotations).
//! - Deterministic hierarchy and annotation queries over the scanned set.
//! - A one-shot background task handle with blocking access and sticky
//!   failure reporting.

mod error;
mod index;
mod indexer;
mod task;

pub use error::{IndexError, ScanError};
pub use index::{ClassEntry, ClassIndex};
pub use indexer::Indexer;
pub use task::IndexTask;

pub(crate) const TARGET: &str = "anvil.index";
