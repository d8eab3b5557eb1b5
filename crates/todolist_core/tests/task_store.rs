use std::fs;
use todolist_core::{
    JsonTaskStore, NewTask, Priority, ScoreState, StoreError, Task, TaskStore, TodoList,
};

#[test]
fn missing_files_load_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonTaskStore::in_dir(dir.path());

    assert!(store.load().unwrap().is_empty());
    assert_eq!(store.load_score().unwrap(), ScoreState::default());
}

#[test]
fn save_writes_indented_array_with_all_fields() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonTaskStore::in_dir(dir.path());
    let task = Task::create(
        NewTask::new("Buy milk", "errands")
            .description("2 liters")
            .priority(Priority::Medium),
    )
    .unwrap();

    store.save(std::slice::from_ref(&task)).unwrap();

    let text = fs::read_to_string(store.tasks_path()).unwrap();
    assert!(text.starts_with("[\n    {\n        \"id\": "));
    assert!(text.contains("\"title\": \"Buy milk\""));
    assert!(text.contains("\"description\": \"2 liters\""));
    assert!(text.contains("\"category\": \"errands\""));
    assert!(text.contains("\"priority\": \"Medium\""));
    assert!(text.contains("\"completed\": false"));

    assert_eq!(store.load().unwrap(), vec![task]);
}

#[test]
fn save_of_fresh_load_is_byte_stable() {
    let dir = tempfile::tempdir().unwrap();
    let mut list = TodoList::open(JsonTaskStore::in_dir(dir.path())).unwrap();
    list.add(NewTask::new("one", "a")).unwrap();
    let second = list.add(NewTask::new("two", "b")).unwrap();
    list.complete(second.id).unwrap();

    let mut store = JsonTaskStore::in_dir(dir.path());
    let before = fs::read(store.tasks_path()).unwrap();
    let loaded = store.load().unwrap();
    store.save(&loaded).unwrap();
    let after = fs::read(store.tasks_path()).unwrap();

    assert_eq!(before, after);
}

const LEGACY_TASKS: &str = r#"[
    {
        "title": "Old task",
        "description": "",
        "category": "home",
        "priority": "High",
        "completed": true
    },
    {
        "title": "Water plants",
        "description": "balcony",
        "category": "home",
        "priority": "Low",
        "completed": false
    }
]"#;

#[test]
fn legacy_file_round_trips_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonTaskStore::in_dir(dir.path());
    fs::write(store.tasks_path(), LEGACY_TASKS).unwrap();

    let tasks = store.load().unwrap();
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|task| task.id.is_nil()));
    store.save(&tasks).unwrap();

    assert_eq!(fs::read_to_string(store.tasks_path()).unwrap(), LEGACY_TASKS);
}

#[test]
fn sparse_records_load_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonTaskStore::in_dir(dir.path());
    fs::write(
        store.tasks_path(),
        r#"[{"title": "Sparse", "category": "misc"}]"#,
    )
    .unwrap();

    let tasks = store.load().unwrap();
    assert_eq!(tasks[0].priority, Priority::Low);
    assert!(!tasks[0].completed);
    assert_eq!(tasks[0].description, "");
}

#[test]
fn opening_a_legacy_file_twice_keeps_the_same_ids() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonTaskStore::in_dir(dir.path());
    fs::write(store.tasks_path(), LEGACY_TASKS).unwrap();

    let first = TodoList::open(JsonTaskStore::in_dir(dir.path())).unwrap();
    let first_ids = first.tasks().iter().map(|task| task.id).collect::<Vec<_>>();
    assert!(first_ids.iter().all(|id| !id.is_nil()));
    assert_ne!(first_ids[0], first_ids[1]);

    let mut second = TodoList::open(JsonTaskStore::in_dir(dir.path())).unwrap();
    let second_ids = second.tasks().iter().map(|task| task.id).collect::<Vec<_>>();
    assert_eq!(first_ids, second_ids);
    assert_eq!(second.tasks()[0].title, "Old task");

    let outcome = second.complete(second_ids[1]).unwrap();
    assert_eq!(outcome.task.title, "Water plants");
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonTaskStore::in_dir(dir.path());
    fs::write(store.tasks_path(), "{ not json").unwrap();

    let err = store.load().unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }));
    assert!(TodoList::open(store).is_err());
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let mut store = JsonTaskStore::in_dir(&nested);

    store.save(&[]).unwrap();
    store
        .save_score(&ScoreState {
            points: 40,
            level: 2,
        })
        .unwrap();

    assert_eq!(fs::read_to_string(store.tasks_path()).unwrap(), "[]");
    assert_eq!(
        store.load_score().unwrap(),
        ScoreState {
            points: 40,
            level: 2
        }
    );
}

#[test]
fn reload_picks_up_external_changes() {
    let dir = tempfile::tempdir().unwrap();
    let mut list = TodoList::open(JsonTaskStore::in_dir(dir.path())).unwrap();
    list.add(NewTask::new("mine", "x")).unwrap();

    let mut other = TodoList::open(JsonTaskStore::in_dir(dir.path())).unwrap();
    other.add(NewTask::new("theirs", "y")).unwrap();

    assert_eq!(list.len(), 1);
    list.reload().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list.search("theirs"), Some(1));
}
