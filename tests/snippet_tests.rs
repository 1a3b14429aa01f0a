// Snippet store tests

use pretty_assertions::assert_eq;
use pseudostep::snippets::{SnippetError, SnippetStore};
use tempfile::TempDir;

#[test]
fn test_save_load_and_list() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SnippetStore::new(dir.path().join("snippets"));

    store.save("loop", "FOR i ← 1 TO 3\nOUTPUT i\nNEXT i").expect("Save failed");
    store.save("hello", "OUTPUT \"hi\"").expect("Save failed");

    let snippet = store.load("loop").expect("Load failed");
    assert_eq!(snippet.name, "loop");
    assert_eq!(snippet.code, "FOR i ← 1 TO 3\nOUTPUT i\nNEXT i");

    assert_eq!(store.list().expect("List failed"), vec!["hello", "loop"]);
}

#[test]
fn test_save_overwrites() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SnippetStore::new(dir.path());

    store.save("a", "OUTPUT 1").expect("Save failed");
    store.save("a", "OUTPUT 2").expect("Save failed");
    assert_eq!(store.load("a").expect("Load failed").code, "OUTPUT 2");
    assert_eq!(store.list().expect("List failed").len(), 1);
}

#[test]
fn test_missing_snippet_is_not_found() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SnippetStore::new(dir.path());
    assert!(matches!(store.load("nope"), Err(SnippetError::NotFound(name)) if name == "nope"));
}

#[test]
fn test_rejects_bad_names_and_empty_code() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SnippetStore::new(dir.path());

    assert!(matches!(store.save("../x", "OUTPUT 1"), Err(SnippetError::InvalidName(_))));
    assert!(matches!(store.save("ok", "   "), Err(SnippetError::EmptyCode)));
    assert!(matches!(store.load("a b"), Err(SnippetError::InvalidName(_))));
}

#[test]
fn test_list_of_missing_directory_is_empty() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SnippetStore::new(dir.path().join("absent"));
    assert!(store.list().expect("List failed").is_empty());
}

#[test]
fn test_list_ignores_other_files() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("notes.txt"), "x").expect("Write failed");
    let store = SnippetStore::new(dir.path());
    store.save("only", "OUTPUT 1").expect("Save failed");
    assert_eq!(store.list().expect("List failed"), vec!["only"]);
}
