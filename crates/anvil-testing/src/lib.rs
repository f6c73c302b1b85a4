//! Helpers shared by Anvil tests.
//!
//! Builds synthetic `.class` bytes and jar files so index and project tests
//! never need a JDK on the machine running them.

mod classes;
mod jars;

pub use classes::ClassBytes;
pub use jars::{class_entry, write_jar};
