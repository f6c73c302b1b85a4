use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

use zip::write::FileOptions;
use zip::ZipWriter;

/// Jar entry path for a binary class name: `com.example.Foo` becomes
/// `com/example/Foo.class`.
pub fn class_entry(binary_name: &str) -> String {
    format!("{}.class", binary_name.replace('.', "/"))
}

/// Writes a jar containing the given entries in order.
pub fn write_jar(path: &Path, entries: &[(String, Vec<u8>)]) -> io::Result<()> {
    let mut jar = ZipWriter::new(File::create(path)?);
    let options = FileOptions::<()>::default();
    for (name, contents) in entries {
        jar.start_file(name.as_str(), options)?;
        jar.write_all(contents)?;
    }
    jar.finish()?;
    Ok(())
}
