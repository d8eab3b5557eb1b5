//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level task functions to Dart via FRB.
//! - Turn validation/range/not-found errors into user-facing messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each call opens the store, runs one use case, and drops it.
//! - File access is serialized process-wide.

use log::warn;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};
use todolist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, AppConfig,
    ConfigOverrides, JsonTaskStore, LogLevel, NewTask, Priority, Task, TaskId, TodoList,
};
use uuid::Uuid;

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = match level.parse::<LogLevel>() {
        Ok(level) => level,
        Err(err) => return err.to_string(),
    };
    let log_dir = log_dir.trim();
    if log_dir.is_empty() {
        return "log_dir cannot be empty".to_string();
    }
    match init_logging_inner(level, Path::new(log_dir)) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the data directory used by every later call.
///
/// # FFI contract
/// - First successful call wins; later calls with another directory fail.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_data_dir(dir: String) -> String {
    let overrides = ConfigOverrides {
        data_dir: Some(PathBuf::from(dir.trim())),
        log_level: None,
    };
    let config = match AppConfig::resolve(&overrides) {
        Ok(config) => config,
        Err(err) => return err.to_string(),
    };
    let active = DATA_DIR.get_or_init(|| config.data_dir.clone());
    if *active != config.data_dir {
        return format!(
            "data dir already configured at `{}`; refusing to switch to `{}`",
            active.display(),
            config.data_dir.display()
        );
    }
    String::new()
}

/// One task row for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    /// Zero-based list position at the time of the call.
    pub position: u32,
    pub task_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    /// `High|Medium|Low`.
    pub priority: String,
    pub completed: bool,
    /// Pre-rendered list line.
    pub display: String,
}

/// Response envelope for add/complete/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    /// Affected task ID.
    pub task_id: Option<String>,
    /// Notices to show, in order.
    pub messages: Vec<String>,
}

impl TaskActionResponse {
    fn success(task_id: TaskId, messages: Vec<String>) -> Self {
        Self {
            ok: true,
            task_id: Some(task_id.to_string()),
            messages,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            messages: vec![message.into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub items: Vec<TaskItem>,
    /// Empty on success.
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSearchResponse {
    /// Position of the first match.
    pub position: Option<u32>,
    pub task_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardResponse {
    pub completed_count: u32,
    pub pending_count: u32,
    pub total_count: u32,
    pub success_rate_percent: f64,
    pub points: u32,
    pub level: u32,
    /// Pre-rendered dashboard line.
    pub display: String,
    /// Empty on success.
    pub error: String,
}

/// Adds a task.
///
/// `priority` accepts `high|medium|low`; blank means Low.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(
    title: String,
    description: String,
    category: String,
    priority: String,
) -> TaskActionResponse {
    let priority = if priority.trim().is_empty() {
        Priority::default()
    } else {
        match priority.parse::<Priority>() {
            Ok(priority) => priority,
            Err(err) => return TaskActionResponse::failure(err.to_string()),
        }
    };
    let input = NewTask::new(title, category)
        .description(description)
        .priority(priority);

    match with_todo_list(|list| list.add(input).map_err(|err| err.to_string())) {
        Ok(task) => TaskActionResponse::success(task.id, vec!["Task added.".to_string()]),
        Err(err) => TaskActionResponse::failure(format!("Input Error: {err}")),
    }
}

/// Marks a task completed and returns level-up/completion notices.
#[flutter_rust_bridge::frb(sync)]
pub fn task_complete(task_id: String) -> TaskActionResponse {
    let id = match parse_task_id(&task_id) {
        Ok(id) => id,
        Err(err) => return TaskActionResponse::failure(err),
    };
    match with_todo_list(|list| list.complete(id).map_err(|err| err.to_string())) {
        Ok(outcome) => TaskActionResponse::success(id, outcome.messages()),
        Err(err) => TaskActionResponse::failure(format!("Selection Error: {err}")),
    }
}

/// Deletes a task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(task_id: String) -> TaskActionResponse {
    let id = match parse_task_id(&task_id) {
        Ok(id) => id,
        Err(err) => return TaskActionResponse::failure(err),
    };
    match with_todo_list(|list| list.delete(id).map_err(|err| err.to_string())) {
        Ok(task) => TaskActionResponse::success(
            id,
            vec![format!("Task '{}' has been deleted.", task.title)],
        ),
        Err(err) => TaskActionResponse::failure(format!("Selection Error: {err}")),
    }
}

/// Lists all tasks in order.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list() -> TaskListResponse {
    let listed = with_todo_list(|list| {
        Ok(list
            .tasks()
            .iter()
            .enumerate()
            .map(to_task_item)
            .collect::<Vec<_>>())
    });
    match listed {
        Ok(items) => TaskListResponse {
            items,
            error: String::new(),
        },
        Err(err) => TaskListResponse {
            items: Vec::new(),
            error: format!("task_list failed: {err}"),
        },
    }
}

/// Finds the first task whose title contains `query`, ignoring case.
#[flutter_rust_bridge::frb(sync)]
pub fn task_search(query: String) -> TaskSearchResponse {
    let found = with_todo_list(|list| {
        Ok(list
            .search(&query)
            .map(|position| (position, list.tasks()[position].id)))
    });
    match found {
        Ok(Some((position, id))) => TaskSearchResponse {
            position: Some(position as u32),
            task_id: Some(id.to_string()),
            message: "Found.".to_string(),
        },
        Ok(None) => TaskSearchResponse {
            position: None,
            task_id: None,
            message: "No matching task found.".to_string(),
        },
        Err(err) => TaskSearchResponse {
            position: None,
            task_id: None,
            message: format!("task_search failed: {err}"),
        },
    }
}

/// Returns dashboard counters.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard() -> DashboardResponse {
    match with_todo_list(|list| Ok(list.summary())) {
        Ok(summary) => DashboardResponse {
            completed_count: summary.completed_count as u32,
            pending_count: summary.pending_count as u32,
            total_count: summary.total_count as u32,
            success_rate_percent: summary.success_rate_percent,
            points: summary.points,
            level: summary.level,
            display: summary.to_string(),
            error: String::new(),
        },
        Err(err) => DashboardResponse {
            completed_count: 0,
            pending_count: 0,
            total_count: 0,
            success_rate_percent: 0.0,
            points: 0,
            level: 1,
            display: String::new(),
            error: format!("dashboard failed: {err}"),
        },
    }
}

fn parse_task_id(raw: &str) -> Result<TaskId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("Selection Error: invalid task id `{raw}`"))
}

fn resolve_data_dir() -> PathBuf {
    DATA_DIR
        .get_or_init(|| match AppConfig::resolve(&ConfigOverrides::default()) {
            Ok(config) => config.data_dir,
            Err(err) => {
                warn!("event=ffi_config module=ffi status=fallback error={err}");
                std::env::temp_dir().join("todolist")
            }
        })
        .clone()
}

fn lock_store() -> MutexGuard<'static, ()> {
    STORE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_todo_list<T>(
    f: impl FnOnce(&mut TodoList<JsonTaskStore>) -> Result<T, String>,
) -> Result<T, String> {
    let _guard = lock_store();
    let store = JsonTaskStore::in_dir(resolve_data_dir());
    let mut list = TodoList::open(store).map_err(|err| format!("task store open failed: {err}"))?;
    f(&mut list)
}

fn to_task_item((position, task): (usize, &Task)) -> TaskItem {
    TaskItem {
        position: position as u32,
        task_id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        category: task.category.clone(),
        priority: task.priority.to_string(),
        completed: task.completed,
        display: task.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        configure_data_dir, core_version, dashboard, init_logging, lock_store, resolve_data_dir,
        task_add, task_complete, task_delete, task_list, task_search,
    };
    use std::time::{SystemTime, UNIX_EPOCH};
    use todolist_core::JsonTaskStore;

    fn use_test_data_dir() {
        let dir = std::env::temp_dir().join(format!("todolist-ffi-test-{}", std::process::id()));
        let error = configure_data_dir(dir.display().to_string());
        assert!(error.is_empty(), "{error}");
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }

    /// Appends a record without an `id`, as older tasks files have them.
    fn append_record_without_id(title: &str) {
        use_test_data_dir();
        let _guard = lock_store();
        let store = JsonTaskStore::in_dir(resolve_data_dir());
        let path = store.tasks_path();
        let mut records = match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str::<Vec<serde_json::Value>>(&text)
                .expect("tasks file should parse"),
            Err(_) => Vec::new(),
        };
        records.push(serde_json::json!({
            "title": title,
            "description": "",
            "category": "legacy",
            "priority": "Medium",
            "completed": false
        }));
        std::fs::create_dir_all(path.parent().expect("tasks file has a parent"))
            .expect("create data dir");
        std::fs::write(path, serde_json::to_vec_pretty(&records).expect("serialize"))
            .expect("write tasks file");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn configure_data_dir_rejects_relative_path() {
        let error = configure_data_dir("relative/dir".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn add_then_search_and_list_finds_task() {
        use_test_data_dir();
        let token = unique_token("ffi-search");
        let created = task_add(
            token.clone(),
            String::new(),
            "tests".to_string(),
            "High".to_string(),
        );
        assert!(created.ok, "{:?}", created.messages);
        let task_id = created.task_id.expect("add should return task_id");

        let found = task_search(token.to_uppercase());
        assert_eq!(found.task_id.as_deref(), Some(task_id.as_str()));

        let listed = task_list();
        assert!(listed.error.is_empty(), "{}", listed.error);
        let item = listed
            .items
            .iter()
            .find(|item| item.task_id == task_id)
            .expect("created task should be listed");
        assert_eq!(item.priority, "High");
        assert_eq!(Some(item.position), found.position);
    }

    #[test]
    fn add_rejects_missing_category() {
        use_test_data_dir();
        let response = task_add(
            "title".to_string(),
            String::new(),
            String::new(),
            String::new(),
        );
        assert!(!response.ok);
        assert!(response.messages[0].contains("category"));
    }

    #[test]
    fn complete_reports_points_and_rejects_repeat() {
        use_test_data_dir();
        let title = unique_token("ffi-complete");
        let created = task_add(title.clone(), String::new(), "tests".to_string(), String::new());
        let task_id = created.task_id.expect("add should return task_id");

        let completed = task_complete(task_id.clone());
        assert!(completed.ok, "{:?}", completed.messages);
        let last = completed.messages.last().expect("completion notice");
        assert_eq!(
            last,
            &format!("Task '{title}' marked as completed! 10 points awarded!")
        );

        let again = task_complete(task_id);
        assert!(!again.ok);
        assert!(again.messages[0].contains("already completed"));

        let board = dashboard();
        assert!(board.error.is_empty(), "{}", board.error);
        assert!(board.completed_count >= 1);
    }

    #[test]
    fn delete_removes_task_and_rejects_bad_ids() {
        use_test_data_dir();
        let created = task_add(
            unique_token("ffi-delete"),
            String::new(),
            "tests".to_string(),
            String::new(),
        );
        let task_id = created.task_id.expect("add should return task_id");

        assert!(task_delete(task_id.clone()).ok);
        assert!(!task_delete(task_id).ok);
        assert!(!task_delete("not-a-uuid".to_string()).ok);
    }

    #[test]
    fn record_without_id_keeps_its_id_across_calls() {
        let title = unique_token("ffi-legacy");
        append_record_without_id(&title);

        let id_of = |items: Vec<super::TaskItem>| {
            items
                .into_iter()
                .find(|item| item.title == title)
                .map(|item| item.task_id)
                .expect("legacy task should be listed")
        };
        let first_id = id_of(task_list().items);
        let second_id = id_of(task_list().items);
        assert_eq!(first_id, second_id);

        let completed = task_complete(first_id.clone());
        assert!(completed.ok, "{:?}", completed.messages);
        assert!(task_delete(first_id).ok);
    }

    #[test]
    fn search_miss_reports_not_found() {
        use_test_data_dir();
        let response = task_search(unique_token("never-added"));
        assert_eq!(response.position, None);
        assert_eq!(response.message, "No matching task found.");
    }
}
