#![forbid(unsafe_code)]

mod constant_pool;
mod error;
mod reader;
mod summary;

pub use crate::error::{Error, Result};
pub use crate::summary::{ClassSummary, ACC_ANNOTATION, ACC_INTERFACE};
