use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use taskdoc_core::{DocumentFormat, ErrorKind, StoreConfig, StoreError, TaskStore};
use tempfile::TempDir;
use uuid::Uuid;

const LEGACY_ID: &str = "8975d81b-d18c-4c17-a918-0aa22cfb27eb";

fn document_path(dir: &TempDir) -> PathBuf {
    dir.path().join("tasks.xml")
}

fn open_store(path: &Path) -> TaskStore {
    let store = TaskStore::new(&StoreConfig::new(path));
    store.load().unwrap();
    store
}

fn write_empty_document(path: &Path) {
    fs::write(
        path,
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n<tasks/>\n",
    )
    .unwrap();
}

#[test]
fn empty_document_then_add_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = document_path(&dir);
    write_empty_document(&path);

    let store = TaskStore::new(&StoreConfig::new(&path));
    let report = store.load().unwrap();
    assert_eq!(report.loaded, 0);
    assert!(!report.file_missing);
    assert!(store.list_all().is_empty());

    let task = store.add("Buy milk", "2% milk").unwrap();
    assert!(!task.id().is_nil());
    assert!(!task.completed);
    assert_eq!(store.list_all().len(), 1);

    let reloaded = open_store(&path);
    let tasks = reloaded.list_all();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id(), task.id());
    assert_eq!(tasks[0].title, "Buy milk");
    assert_eq!(tasks[0].description, "2% milk");
    assert!(!tasks[0].completed);
    assert_eq!(tasks[0].created_at(), task.created_at());
}

#[test]
fn missing_document_starts_empty_and_first_add_creates_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = document_path(&dir);

    let store = TaskStore::new(&StoreConfig::new(&path));
    let report = store.load().unwrap();
    assert!(report.file_missing);
    assert!(store.is_empty());
    assert!(!path.exists());

    store.add("first", "").unwrap();
    assert!(path.exists());
    assert_eq!(open_store(&path).len(), 1);
}

#[test]
fn toggle_twice_restores_original_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = document_path(&dir);
    let store = open_store(&path);
    let task = store.add("laundry", "whites").unwrap();

    assert!(store.toggle_completed(task.id()).unwrap());
    assert!(store.find_by_id(task.id()).unwrap().completed);
    assert!(open_store(&path).find_by_id(task.id()).unwrap().completed);

    assert!(!store.toggle_completed(task.id()).unwrap());
    assert!(!store.find_by_id(task.id()).unwrap().completed);
    assert!(!open_store(&path).find_by_id(task.id()).unwrap().completed);
}

#[test]
fn identical_titles_get_distinct_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = document_path(&dir);
    let store = open_store(&path);

    let first = store.add("Call mom", "").unwrap();
    let second = store.add("Call mom", "").unwrap();

    assert_ne!(first.id(), second.id());
    assert_eq!(store.list_all().len(), 2);
    assert_eq!(open_store(&path).list_all().len(), 2);
}

#[test]
fn many_adds_never_repeat_an_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&document_path(&dir));

    for index in 0..50 {
        store.add(format!("task {index}"), "").unwrap();
    }

    let ids: HashSet<_> = store.list_all().iter().map(|task| task.id()).collect();
    assert_eq!(ids.len(), 50);
}

#[test]
fn updates_are_visible_in_memory_and_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = document_path(&dir);
    let store = open_store(&path);
    let task = store.add("draft", "old body").unwrap();

    store.update_title(task.id(), "final").unwrap();
    store.update_description(task.id(), "new body").unwrap();

    let in_memory = store.find_by_id(task.id()).unwrap();
    assert_eq!(in_memory.title, "final");
    assert_eq!(in_memory.description, "new body");

    let persisted = open_store(&path).find_by_id(task.id()).unwrap();
    assert_eq!(persisted, in_memory);
}

#[test]
fn delete_removes_from_memory_and_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = document_path(&dir);
    let store = open_store(&path);
    let kept = store.add("keep", "").unwrap();
    let dropped = store.add("drop", "").unwrap();

    let removed = store.delete(dropped.id()).unwrap();
    assert_eq!(removed.id(), dropped.id());
    assert!(store.find_by_id(dropped.id()).is_none());

    let reloaded = open_store(&path);
    assert!(reloaded.find_by_id(dropped.id()).is_none());
    assert_eq!(reloaded.list_all(), vec![kept]);
}

#[test]
fn unknown_id_is_not_found_and_leaves_document_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = document_path(&dir);
    let store = open_store(&path);
    store.add("existing", "body").unwrap();
    let before = fs::read(&path).unwrap();
    let missing = Uuid::new_v4();

    let results = [
        store.update_title(missing, "x").map(|_| ()),
        store.update_description(missing, "x").map(|_| ()),
        store.toggle_completed(missing).map(|_| ()),
        store.delete(missing).map(|_| ()),
    ];

    for result in results {
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(matches!(err, StoreError::NotFound(id) if id == missing));
    }
    assert_eq!(fs::read(&path).unwrap(), before);
    assert_eq!(store.len(), 1);
}

#[test]
fn list_all_returns_a_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&document_path(&dir));
    let task = store.add("original", "").unwrap();

    let mut snapshot = store.list_all();
    snapshot[0].title = "mutated".to_string();
    snapshot.clear();

    assert_eq!(store.find_by_id(task.id()).unwrap().title, "original");
    assert_eq!(store.len(), 1);
}

#[test]
fn insertion_order_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = document_path(&dir);
    let store = open_store(&path);
    let titles = ["one", "two", "three"];
    for title in titles {
        store.add(title, "").unwrap();
    }
    let middle = store.list_all()[1].id();
    store.delete(middle).unwrap();
    store.add("four", "").unwrap();

    let reloaded: Vec<String> = open_store(&path)
        .list_all()
        .into_iter()
        .map(|task| task.title)
        .collect();
    assert_eq!(reloaded, vec!["one", "three", "four"]);
}

#[test]
fn legacy_document_with_malformed_entries_loads_what_it_can() {
    let dir = tempfile::tempdir().unwrap();
    let path = document_path(&dir);
    fs::write(
        &path,
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n\
             <tasks>\n\
                 <task completed=\"true\" id=\"{LEGACY_ID}\">\n\
                     <title>Legacy</title>\n\
                     <description>null</description>\n\
                     <CreatedAt>not a date</CreatedAt>\n\
                 </task>\n\
                 <task completed=\"false\" id=\"\">\n\
                     <title>Orphan</title>\n\
                     <description>no id</description>\n\
                     <CreatedAt>01-01-2024 10:00:00 AM</CreatedAt>\n\
                 </task>\n\
             </tasks>\n"
        ),
    )
    .unwrap();

    let store = TaskStore::new(&StoreConfig::new(&path));
    let report = store.load().unwrap();

    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.timestamp_fallbacks, 1);
    let task = store.find_by_id(Uuid::parse_str(LEGACY_ID).unwrap()).unwrap();
    assert_eq!(task.title, "Legacy");
    assert_eq!(task.description, "null");
    assert!(task.completed);
}

#[test]
fn corrupt_document_fails_load_and_is_not_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = document_path(&dir);
    fs::write(&path, "<tasks><task completed=\"false\"></tasks>").unwrap();

    let store = TaskStore::new(&StoreConfig::new(&path));
    let err = store.load().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Corrupt);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "<tasks><task completed=\"false\"></tasks>"
    );
}

#[test]
fn failed_save_rolls_back_in_memory_add() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone").join("tasks.xml");
    let store = TaskStore::new(&StoreConfig::new(&path));
    store.load().unwrap();

    let err = store.add("never saved", "").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::IoFailure);
    assert!(store.is_empty());
}

#[test]
fn reload_replaces_rather_than_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = document_path(&dir);
    let store = open_store(&path);
    store.add("only", "").unwrap();

    store.load().unwrap();
    store.load().unwrap();

    assert_eq!(store.len(), 1);
}

#[test]
fn padded_and_blank_text_survive_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = document_path(&dir);
    let store = open_store(&path);

    let padded = store.add("  padded ", "\n body\n").unwrap();
    let blank = store.add("x", "   ").unwrap();
    store.update_title(blank.id(), " renamed\t").unwrap();

    let reloaded = open_store(&path);
    assert_eq!(reloaded.list_all(), store.list_all());
    let padded_again = reloaded.find_by_id(padded.id()).unwrap();
    assert_eq!(padded_again.title, "  padded ");
    assert_eq!(padded_again.description, "\n body\n");
    let blank_again = reloaded.find_by_id(blank.id()).unwrap();
    assert_eq!(blank_again.title, " renamed\t");
    assert_eq!(blank_again.description, "   ");
}

#[test]
fn json_document_path_persists_a_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    let store = TaskStore::new(&StoreConfig::new(&path));
    assert_eq!(store.format(), DocumentFormat::Json);
    let report = store.load().unwrap();
    assert!(report.file_missing);

    let task = store.add("Buy milk", "2% milk").unwrap();
    store.toggle_completed(task.id()).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let entries = raw.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["title"], "Buy milk");
    assert_eq!(entries[0]["completed"], true);
    assert_eq!(entries[0]["id"], task.id().to_string());

    let reloaded = open_store(&path);
    assert_eq!(reloaded.list_all(), store.list_all());
    assert_eq!(reloaded.list_all()[0].created_at(), task.created_at());
}

#[test]
fn corrupt_json_document_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(&path, "[{\"title\": \"half").unwrap();

    let err = TaskStore::new(&StoreConfig::new(&path)).load().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Corrupt);
    assert_eq!(fs::read_to_string(&path).unwrap(), "[{\"title\": \"half");
}
