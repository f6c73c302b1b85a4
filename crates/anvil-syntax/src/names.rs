use std::path::PathBuf;

/// Maps a qualified type name (or an already slash-separated relative path,
/// with or without the `.java` suffix) to a source-folder-relative path:
/// `com.example.Widget` → `com/example/Widget.java`.
pub fn qualified_to_source_path(qualified: &str) -> PathBuf {
    let trimmed = qualified.trim();
    let stem = trimmed.strip_suffix(".java").unwrap_or(trimmed);
    let mut path = stem.replace('.', "/");
    path.push_str(".java");
    PathBuf::from(path)
}

/// Last segment of a dotted qualified name.
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Everything before the last dot, or `None` for the default package.
pub fn package_of(qualified: &str) -> Option<&str> {
    qualified.rsplit_once('.').map(|(package, _)| package)
}
