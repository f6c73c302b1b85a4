use std::fs;
use std::path::Path;
use std::sync::Arc;

use anvil_index::{IndexError, IndexTask, Indexer};
use anvil_testing::{class_entry, write_jar, ClassBytes};

const ACC_PUBLIC: u16 = 0x0001;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;

#[test]
fn indexes_a_jar_end_to_end() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let jar = dir.path().join("app.jar");
    write_jar(
        &jar,
        &[
            (
                class_entry("com.example.Api"),
                ClassBytes::new("com.example.Api")
                    .access_flags(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT)
                    .build(),
            ),
            (
                class_entry("com.example.Base"),
                ClassBytes::new("com.example.Base")
                    .implements("com.example.Api")
                    .build(),
            ),
            (
                class_entry("com.example.Leaf"),
                ClassBytes::new("com.example.Leaf")
                    .extends("com.example.Base")
                    .build(),
            ),
            (
                "META-INF/MANIFEST.MF".to_string(),
                b"Manifest-Version: 1.0\n".to_vec(),
            ),
        ],
    )?;

    let mut indexer = Indexer::new();
    assert_eq!(indexer.index_jar(&jar)?, 3);
    let index = indexer.finish();
    assert_eq!(
        index.known_classes(),
        ["com.example.Api", "com.example.Base", "com.example.Leaf"]
    );
    assert_eq!(index.direct_implementors("com.example.Api"), ["com.example.Base"]);
    assert_eq!(
        index.all_implementors("com.example.Api"),
        ["com.example.Base", "com.example.Leaf"]
    );
    Ok(())
}

#[test]
fn corrupt_entries_degrade_the_index() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let jar = dir.path().join("mixed.jar");
    write_jar(
        &jar,
        &[
            (
                class_entry("com.example.Good"),
                ClassBytes::new("com.example.Good").build(),
            ),
            (class_entry("com.example.Bad"), b"\xde\xad\xbe\xef".to_vec()),
        ],
    )?;

    let mut indexer = Indexer::new();
    assert_eq!(indexer.index_jar(&jar)?, 1);
    assert_eq!(indexer.finish().known_classes(), ["com.example.Good"]);
    Ok(())
}

#[test]
fn scans_loose_class_directories() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let classes = dir.path().join("build").join("classes");
    let nested = classes.join("com").join("example");
    fs::create_dir_all(&nested)?;
    fs::write(
        nested.join("Thing.class"),
        ClassBytes::new("com.example.Thing").build(),
    )?;
    fs::write(nested.join("notes.txt"), "not a class")?;

    let mut indexer = Indexer::new();
    assert_eq!(indexer.index_class_dir(&classes)?, 1);
    assert_eq!(indexer.finish().known_classes(), ["com.example.Thing"]);
    Ok(())
}

#[test]
fn background_builds_share_one_snapshot() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let jar = dir.path().join("app.jar");
    write_jar(
        &jar,
        &[(
            class_entry("com.example.App"),
            ClassBytes::new("com.example.App")
                .annotated_with("com.example.Entry")
                .build(),
        )],
    )?;

    let task = IndexTask::spawn(move || {
        let mut indexer = Indexer::new();
        indexer.index_jar(&jar)?;
        Ok(indexer.finish())
    });

    let index = task.wait()?;
    assert_eq!(index.annotated_with("com.example.Entry"), ["com.example.App"]);
    let again = task.wait()?;
    assert!(Arc::ptr_eq(&index, &again));
    Ok(())
}

#[test]
fn a_missing_jar_fails_the_task_at_first_access() {
    let task = IndexTask::spawn(|| {
        let mut indexer = Indexer::new();
        indexer.index_jar(Path::new("/no/such/lib.jar"))?;
        Ok(indexer.finish())
    });

    let err = task.wait().unwrap_err();
    assert!(matches!(err, IndexError::Failed { ref message } if message.contains("lib.jar")));
    assert_eq!(task.wait().unwrap_err(), err);
}
