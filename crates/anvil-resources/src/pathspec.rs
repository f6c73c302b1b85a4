use std::path::PathBuf;

use regex::Regex;

use crate::factory::NativeObject;
use crate::resource::Resource;

/// Resolves a shell-style path expression against a starting resource.
///
/// Segments are matched against children by exact name first, then by the
/// fuzzy member rules; `*` and `?` expand against child names; `.` keeps the
/// cursor and `..` moves to the parent, the root being its own parent. An
/// absolute expression restarts at the filesystem root for cursors that can
/// mint path resources; cursors without a factory resolve absolutes to
/// nothing. Unmatched segments yield an empty list, never an error.
pub(crate) fn resolve(start: &Resource, expression: &str) -> Vec<Resource> {
    let expression = expression.trim();
    if expression.is_empty() {
        return vec![start.clone()];
    }

    let mut frontier: Vec<Resource> = Vec::new();
    if expression.starts_with('/') {
        let Some(factory) = start.factory() else {
            return Vec::new();
        };
        match factory.create(NativeObject::Path(PathBuf::from("/"))) {
            Ok(root) => frontier.push(root),
            Err(_) => return Vec::new(),
        }
    } else {
        frontier.push(start.clone());
    }

    for segment in expression.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }

        let mut next: Vec<Resource> = Vec::new();
        if segment == ".." {
            for resource in &frontier {
                let parent = resource.parent().unwrap_or_else(|| resource.clone());
                push_unique(&mut next, parent);
            }
        } else if segment.contains('*') || segment.contains('?') {
            let Some(matcher) = glob_matcher(segment) else {
                return Vec::new();
            };
            for resource in &frontier {
                for child in resource.children() {
                    if matcher.is_match(&child.name()) {
                        push_unique(&mut next, child);
                    }
                }
            }
        } else {
            for resource in &frontier {
                let children = resource.children();
                let mut matched: Vec<Resource> = children
                    .iter()
                    .filter(|child| child.name() == segment)
                    .cloned()
                    .collect();
                if matched.is_empty() {
                    matched = children
                        .iter()
                        .filter(|child| child.matches_name(segment))
                        .cloned()
                        .collect();
                }
                for found in matched {
                    push_unique(&mut next, found);
                }
            }
        }

        frontier = next;
        if frontier.is_empty() {
            return frontier;
        }
    }

    frontier
}

fn push_unique(list: &mut Vec<Resource>, resource: Resource) {
    if !list.iter().any(|existing| existing == &resource) {
        list.push(resource);
    }
}

/// Anchored regex for one glob segment: `*` matches any run, `?` one
/// character, everything else literally.
fn glob_matcher(segment: &str) -> Option<Regex> {
    let mut pattern = String::with_capacity(segment.len() + 2);
    pattern.push('^');
    for ch in segment.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');
    Regex::new(&pattern).ok()
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::factory::ResourceFactory;

    fn tree(dir: &Path) -> Resource {
        fs::create_dir_all(dir.join("src/com")).unwrap();
        fs::write(dir.join("src/Alpha.java"), "class Alpha {}").unwrap();
        fs::write(dir.join("src/Beta.java"), "class Beta {}").unwrap();
        fs::write(dir.join("src/notes.txt"), "n").unwrap();
        fs::write(dir.join("src/com/Gamma.java"), "class Gamma {}").unwrap();

        let factory = ResourceFactory::new();
        Resource::Dir(factory.directory(dir).unwrap())
    }

    #[test]
    fn wildcards_expand_in_listing_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = tree(dir.path());

        let matches = root.resolve("src/*.java");
        let names: Vec<String> = matches.iter().map(Resource::name).collect();
        assert_eq!(names, vec!["Alpha.java", "Beta.java"]);

        let single = root.resolve("src/?eta.java");
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].name(), "Beta.java");
    }

    #[test]
    fn unmatched_segments_yield_empty() {
        let dir = tempfile::tempdir().unwrap();
        let root = tree(dir.path());

        assert!(root.resolve("src/Missing.java").is_empty());
        assert!(root.resolve("nowhere/*.java").is_empty());
    }

    #[test]
    fn dot_and_dotdot_move_the_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let root = tree(dir.path());

        let here = root.resolve(".");
        assert_eq!(here, vec![root.clone()]);

        let back = root.resolve("src/com/../Alpha.java");
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].name(), "Alpha.java");
    }

    #[test]
    fn the_root_is_its_own_parent() {
        let factory = ResourceFactory::new();
        let root = Resource::Dir(factory.directory("/").unwrap());
        let still_root = root.resolve("..");
        assert_eq!(still_root, vec![root]);
    }

    #[test]
    fn absolute_expressions_restart_at_the_filesystem_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = tree(dir.path());
        let cursor = root.resolve("src/com").remove(0);

        let expression = dir.path().join("src/notes.txt").display().to_string();
        let resolved = cursor.resolve(&expression);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name(), "notes.txt");
    }

    #[test]
    fn absolute_expressions_on_virtual_cursors_yield_empty() {
        let factory = ResourceFactory::new();
        let cursor = Resource::Text(factory.string("inline"));
        assert!(cursor.resolve("/etc").is_empty());
    }

    #[test]
    fn segments_reach_into_java_members() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(
            dir.path().join("src/Thing.java"),
            "package p;\npublic class Thing {\n    private long id;\n}\n",
        )
        .unwrap();

        let factory = ResourceFactory::new();
        let root = Resource::Dir(factory.directory(dir.path()).unwrap());

        let members = root.resolve("src/Thing.java/id");
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name(), "id::long");
    }
}
