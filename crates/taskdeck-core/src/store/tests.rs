//! Tests for the store module.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use jiff::Timestamp;

use super::*;
use crate::{
    error::{Result, StoreError},
    models::{Difficulty, Priority, TimeEstimate},
    params::{CreateProject, GenerateTodos, TodoDraft},
    slot::{MemorySlot, SlotStorage},
};

fn create_test_store() -> (MemorySlot, ProjectStore) {
    let slot = MemorySlot::new();
    let store = ProjectStoreBuilder::new()
        .with_slot(slot.clone())
        .build()
        .expect("Failed to create store");
    (slot, store)
}

fn rehydrate(slot: &MemorySlot) -> ProjectStore {
    ProjectStoreBuilder::new()
        .with_slot(slot.clone())
        .build()
        .expect("Failed to rebuild store")
}

fn todo(id: &str, task: &str) -> Todo {
    let mut todo = Todo::new(task);
    todo.id = id.to_string();
    todo
}

fn project(id: &str, name: &str, todos: Vec<Todo>) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{name} description"),
        created_at: Timestamp::from_second(1_700_000_000).unwrap(),
        prompt: None,
        todos,
        completed: false,
    }
}

fn draft(task: &str, dependencies: Vec<usize>) -> TodoDraft {
    TodoDraft {
        task: task.to_string(),
        explanation: format!("Why {task}"),
        category: Some("Setup".to_string()),
        priority: Some("high".to_string()),
        difficulty: Some("easy".to_string()),
        time: Some("1h 30m".to_string()),
        dependencies,
    }
}

/// Slot whose writes fail while `failing` is set and whose reads fail while
/// `unreadable` is set.
#[derive(Clone, Default)]
struct FlakySlot {
    inner: MemorySlot,
    failing: Arc<AtomicBool>,
    unreadable: Arc<AtomicBool>,
}

impl SlotStorage for FlakySlot {
    fn load(&self, name: &str) -> Result<Option<String>> {
        if self.unreadable.load(Ordering::SeqCst) {
            return Err(StoreError::Configuration {
                message: "slot locked".to_string(),
            });
        }
        self.inner.load(name)
    }

    fn save(&self, name: &str, blob: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Configuration {
                message: "slot unavailable".to_string(),
            });
        }
        self.inner.save(name, blob)
    }

    fn clear(&self, name: &str) -> Result<()> {
        self.inner.clear(name)
    }
}

#[test]
fn test_empty_store() {
    let (_slot, store) = create_test_store();

    assert!(store.projects().is_empty());
    assert_eq!(store.active_project_id(), None);
    assert!(store.get_project("anything").is_none());
    assert!(store.get_todo_by_id("anything").is_none());
    assert!(store.active_project().is_none());
}

#[test]
fn test_add_then_get_returns_equal_project() {
    let (_slot, mut store) = create_test_store();
    let p = project("p1", "First", vec![todo("t1", "One"), todo("t2", "Two")]);

    assert!(!store.add_project(p.clone()));
    assert_eq!(store.get_project("p1"), Some(&p));
}

#[test]
fn test_add_same_id_replaces_in_place() {
    let (_slot, mut store) = create_test_store();
    store.add_project(project("p1", "First", vec![]));
    store.add_project(project("p2", "Second", vec![]));

    let replacement = project("p1", "Replaced", vec![todo("t9", "New")]);
    assert!(store.add_project(replacement.clone()));

    assert_eq!(store.projects().len(), 2);
    assert_eq!(store.projects()[0], replacement);
    assert_eq!(store.projects()[1].id, "p2");
}

#[test]
fn test_update_project_merges_fields() {
    let (_slot, mut store) = create_test_store();
    store.add_project(project("p1", "First", vec![todo("t1", "One")]));

    let updated = store
        .update_project(
            "p1",
            &ProjectPatch {
                name: Some("Renamed".to_string()),
                completed: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.name, "Renamed");
    assert!(updated.completed);
    assert_eq!(updated.description, "First description");
    assert_eq!(updated.todos.len(), 1);
    assert_eq!(store.get_project("p1"), Some(&updated));
}

#[test]
fn test_update_missing_project_changes_nothing() {
    let (slot, mut store) = create_test_store();
    store.add_project(project("p1", "First", vec![]));
    let before = store.state().clone();
    let blob = slot.load(DEFAULT_SLOT_NAME).unwrap();

    let result = store.update_project(
        "missing",
        &ProjectPatch {
            name: Some("x".to_string()),
            ..Default::default()
        },
    );

    assert!(matches!(result, Err(StoreError::ProjectNotFound { ref id }) if id == "missing"));
    assert_eq!(store.state(), &before);
    assert_eq!(slot.load(DEFAULT_SLOT_NAME).unwrap(), blob);
}

#[test]
fn test_set_active_to_unknown_id_reads_back() {
    let (slot, mut store) = create_test_store();

    store.set_active_project("ghost");

    assert_eq!(store.active_project_id(), Some("ghost"));
    assert!(store.active_project().is_none());
    assert_eq!(rehydrate(&slot).active_project_id(), Some("ghost"));
}

#[test]
fn test_toggle_flips_only_matching_todo_and_twice_restores() {
    let (_slot, mut store) = create_test_store();
    store.add_project(project("p1", "First", vec![todo("t1", "One"), todo("t2", "Two")]));
    let original = store.state().clone();

    assert_eq!(store.toggle_todo_completed("t1").unwrap(), 1);
    assert!(store.get_todo_by_id("t1").unwrap().completed);
    assert!(!store.get_todo_by_id("t2").unwrap().completed);

    store.toggle_todo_completed("t1").unwrap();
    assert_eq!(store.state(), &original);
}

#[test]
fn test_toggle_unknown_todo_is_not_found() {
    let (_slot, mut store) = create_test_store();
    store.add_project(project("p1", "First", vec![todo("t1", "One")]));

    let err = store.toggle_todo_completed("nope").unwrap_err();
    assert!(err.is_not_found());
    assert!(!store.get_todo_by_id("t1").unwrap().completed);
}

#[test]
fn test_duplicate_todo_id_across_projects_toggles_both() {
    let (_slot, mut store) = create_test_store();
    store.add_project(project("p1", "First", vec![todo("shared", "In first")]));
    store.add_project(project("p2", "Second", vec![todo("shared", "In second")]));

    assert_eq!(store.todo_owners("shared"), vec!["p1", "p2"]);
    assert_eq!(store.toggle_todo_completed("shared").unwrap(), 2);

    for id in ["p1", "p2"] {
        assert!(store.get_project(id).unwrap().todos[0].completed);
    }
    assert_eq!(store.get_todo_by_id("shared").unwrap().task, "In first");
}

#[test]
fn test_notes_then_toggle_keeps_both() {
    let (_slot, mut store) = create_test_store();
    store.add_project(project("p1", "First", vec![todo("t1", "One")]));

    store.update_todo_notes("t1", "call the vendor").unwrap();
    store.toggle_todo_completed("t1").unwrap();

    let t = store.get_todo_by_id("t1").unwrap();
    assert!(t.completed);
    assert_eq!(t.notes.as_deref(), Some("call the vendor"));
}

#[test]
fn test_regenerate_keeps_identity_completion_order_and_notes() {
    let (_slot, mut store) = create_test_store();
    let mut original = todo("t1", "Old task");
    original.order = 7;
    original.completed = true;
    original.notes = Some("mine".to_string());
    store.add_project(project("p1", "First", vec![original]));

    let touched = store
        .regenerate_todo(
            "t1",
            &TodoPatch {
                task: Some("New task".to_string()),
                priority: Some(Priority::Low),
                difficulty: Some(Difficulty::Hard),
                time: Some(Some(TimeEstimate::from_minutes(20))),
                dependencies: Some(vec!["t0".to_string()]),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(touched, 1);

    let t = store.get_todo_by_id("t1").unwrap();
    assert_eq!(t.task, "New task");
    assert_eq!(t.priority, Priority::Low);
    assert_eq!(t.difficulty, Difficulty::Hard);
    assert_eq!(t.time, Some(TimeEstimate::from_minutes(20)));
    assert_eq!(t.dependencies, vec!["t0".to_string()]);
    assert_eq!(t.id, "t1");
    assert!(t.completed);
    assert_eq!(t.order, 7);
    assert_eq!(t.notes.as_deref(), Some("mine"));
}

#[test]
fn test_regenerate_can_clear_estimate() {
    let (_slot, mut store) = create_test_store();
    let mut estimated = todo("t1", "Paint fence");
    estimated.time = Some(TimeEstimate::from_minutes(45));
    store.add_project(project("p1", "First", vec![estimated]));

    let patch = TodoPatch::try_from(crate::params::RegenerateTodo {
        id: "t1".to_string(),
        time: Some("  ".to_string()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(patch.time, Some(None));
    assert_eq!(patch.describe(), vec!["Updated time estimate".to_string()]);

    store.regenerate_todo("t1", &patch).unwrap();
    assert_eq!(store.get_todo_by_id("t1").unwrap().time, None);

    store.regenerate_todo("t1", &TodoPatch::default()).unwrap();
    assert_eq!(store.get_todo_by_id("t1").unwrap().time, None);
}

#[test]
fn test_blank_notes_clear_notes() {
    let (slot, mut store) = create_test_store();
    store.add_project(project("p1", "First", vec![todo("t1", "One")]));

    store.update_todo_notes("t1", "call the vendor").unwrap();
    assert_eq!(
        store.get_todo_by_id("t1").unwrap().notes.as_deref(),
        Some("call the vendor")
    );

    store.update_todo_notes("t1", "").unwrap();
    assert_eq!(store.get_todo_by_id("t1").unwrap().notes, None);
    let blob = slot.load(DEFAULT_SLOT_NAME).unwrap().unwrap();
    assert!(!blob.contains("\"notes\""));

    store.update_todo_notes("t1", "   ").unwrap();
    assert_eq!(store.get_todo_by_id("t1").unwrap().notes, None);
}

#[test]
fn test_every_mutation_persists() {
    let (slot, mut store) = create_test_store();
    store.add_project(project("p1", "First", vec![todo("t1", "One")]));
    store.set_active_project("p1");
    store.update_todo_notes("t1", "remember").unwrap();
    store.toggle_todo_completed("t1").unwrap();

    let restored = rehydrate(&slot);
    assert_eq!(restored.state(), store.state());
    assert!(!store.is_dirty());
}

#[test]
fn test_serialize_clear_deserialize_round_trip() {
    let (slot, mut store) = create_test_store();
    store.add_project(project("p1", "First", vec![todo("t1", "One")]));
    store.set_active_project("p1");
    let snapshot = store.state().to_json().unwrap();
    let expected = store.state().clone();

    slot.clear(DEFAULT_SLOT_NAME).unwrap();
    store.reload();
    assert_eq!(store.state(), &StoreState::default());

    slot.save(DEFAULT_SLOT_NAME, &snapshot).unwrap();
    store.reload();
    assert_eq!(store.state(), &expected);
}

#[test]
fn test_persisted_blob_uses_camel_case_keys() {
    let (slot, mut store) = create_test_store();
    store.add_project(project("p1", "First", vec![]));

    let blob = slot.load(DEFAULT_SLOT_NAME).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert!(value["activeProjectId"].is_null());
    assert_eq!(value["projects"][0]["createdAt"], "2023-11-14T22:13:20Z");
}

#[test]
fn test_corrupt_blob_falls_back_to_empty_state() {
    let slot = MemorySlot::new();
    slot.save(DEFAULT_SLOT_NAME, "{not json").unwrap();

    let store = rehydrate(&slot);
    assert!(store.projects().is_empty());
    assert_eq!(store.active_project_id(), None);
}

#[test]
fn test_slot_name_isolates_state() {
    let slot = MemorySlot::new();
    let mut first = ProjectStoreBuilder::new()
        .with_slot(slot.clone())
        .with_slot_name("first")
        .build()
        .unwrap();
    first.add_project(project("p1", "First", vec![]));

    let second = ProjectStoreBuilder::new()
        .with_slot(slot)
        .with_slot_name("second")
        .build()
        .unwrap();
    assert_eq!(second.slot_name(), "second");
    assert!(second.projects().is_empty());
}

#[test]
fn test_failed_write_marks_dirty_until_flush() {
    let slot = FlakySlot::default();
    let mut store = ProjectStoreBuilder::new()
        .with_slot(slot.clone())
        .build()
        .unwrap();

    slot.failing.store(true, Ordering::SeqCst);
    store.add_project(project("p1", "First", vec![]));
    assert!(store.is_dirty());
    assert_eq!(store.projects().len(), 1);
    assert!(store.flush().is_err());

    slot.failing.store(false, Ordering::SeqCst);
    store.flush().unwrap();
    assert!(!store.is_dirty());
    assert!(slot.inner.load(DEFAULT_SLOT_NAME).unwrap().is_some());
}

#[test]
fn test_refresh_keeps_state_when_read_fails() {
    let slot = FlakySlot::default();
    let mut store = ProjectStoreBuilder::new()
        .with_slot(slot.clone())
        .build()
        .unwrap();
    store.add_project(project("p1", "First", vec![]));
    store.add_project(project("p2", "Second", vec![]));

    slot.unreadable.store(true, Ordering::SeqCst);
    store.refresh();
    assert_eq!(store.projects().len(), 2);
    slot.unreadable.store(false, Ordering::SeqCst);

    store
        .create_project(&CreateProject {
            name: "New".to_string(),
            ..Default::default()
        })
        .unwrap();

    let restored = ProjectStoreBuilder::new()
        .with_slot(slot.clone())
        .build()
        .unwrap();
    let names: Vec<&str> = restored.projects().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second", "New"]);
}

#[test]
fn test_refresh_keeps_state_when_blob_is_corrupt() {
    let (slot, mut store) = create_test_store();
    store.add_project(project("p1", "First", vec![]));

    slot.save(DEFAULT_SLOT_NAME, "{\"projects\": [").unwrap();
    store.refresh();
    assert_eq!(store.projects().len(), 1);
    assert_eq!(store.projects()[0].id, "p1");
}

#[test]
fn test_refresh_picks_up_other_writers() {
    let (slot, mut store) = create_test_store();
    store.add_project(project("p1", "First", vec![]));

    let mut other = rehydrate(&slot);
    other.add_project(project("p2", "Second", vec![]));
    other.set_active_project("p2");

    store.refresh();
    assert_eq!(store.projects().len(), 2);
    assert_eq!(store.active_project_id(), Some("p2"));

    slot.clear(DEFAULT_SLOT_NAME).unwrap();
    store.refresh();
    assert!(store.projects().is_empty());
}

#[test]
fn test_refresh_skips_dirty_store() {
    let slot = FlakySlot::default();
    let mut store = ProjectStoreBuilder::new()
        .with_slot(slot.clone())
        .build()
        .unwrap();

    slot.failing.store(true, Ordering::SeqCst);
    store.add_project(project("p1", "Pending", vec![]));
    store.refresh();
    assert!(store.is_dirty());
    assert_eq!(store.projects()[0].name, "Pending");
}

#[test]
fn test_ensure_default_project_only_when_empty() {
    let (_slot, mut store) = create_test_store();

    assert!(store.ensure_default_project());
    let active = store.active_project().unwrap();
    assert_eq!(active.name, "My First Project");
    assert_eq!(active.description, "Default project for your todos");
    assert_eq!(active.prompt.as_deref(), Some("Default project"));

    assert!(!store.ensure_default_project());
    assert_eq!(store.projects().len(), 1);
}

#[test]
fn test_create_project_with_select() {
    let (_slot, mut store) = create_test_store();

    let created = store
        .create_project(&CreateProject {
            name: "  Garden  ".to_string(),
            description: None,
            prompt: Some("grow tomatoes".to_string()),
            select: true,
        })
        .unwrap();

    assert_eq!(created.name, "Garden");
    assert_eq!(created.description, "");
    assert_eq!(store.active_project_id(), Some(created.id.as_str()));

    let err = store
        .create_project(&CreateProject {
            name: " ".to_string(),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput { ref field, .. } if field == "name"));
    assert_eq!(store.projects().len(), 1);
}

#[test]
fn test_append_generated_creates_project_without_target() {
    let (_slot, mut store) = create_test_store();

    let generated = store
        .append_generated(&GenerateTodos {
            project_id: None,
            prompt: "Launch a blog".to_string(),
            todos: vec![draft("Pick a domain", vec![]), draft("Write first post", vec![1])],
        })
        .unwrap();

    assert!(generated.created_project);
    let project = store.active_project().unwrap();
    assert_eq!(project.id, generated.project_id);
    assert_eq!(project.name, "Generated Project");
    assert_eq!(project.description, "Project generated from prompt");
    assert_eq!(project.prompt.as_deref(), Some("Launch a blog"));

    let first = &project.todos[0];
    let second = &project.todos[1];
    assert_eq!(first.order, 1);
    assert_eq!(second.order, 2);
    assert_eq!(first.category, "Setup");
    assert_eq!(first.priority, Priority::High);
    assert_eq!(first.difficulty, Difficulty::Easy);
    assert_eq!(first.time, Some(TimeEstimate::from_minutes(90)));
    assert_eq!(second.dependencies, vec![first.id.clone()]);
    assert_ne!(first.id, second.id);
    assert!(!first.completed);
}

#[test]
fn test_append_generated_continues_order_in_active_project() {
    let (_slot, mut store) = create_test_store();
    let mut existing = todo("t1", "Existing");
    existing.order = 4;
    store.add_project(project("p1", "First", vec![existing]));
    store.set_active_project("p1");

    let generated = store
        .append_generated(&GenerateTodos {
            project_id: None,
            prompt: "More work".to_string(),
            todos: vec![draft("Next", vec![]), draft("After", vec![])],
        })
        .unwrap();

    assert!(!generated.created_project);
    assert_eq!(generated.project_id, "p1");
    let p = store.get_project("p1").unwrap();
    let orders: Vec<u32> = p.todos.iter().map(|t| t.order).collect();
    assert_eq!(orders, vec![4, 5, 6]);
    assert_eq!(p.prompt.as_deref(), Some("More work"));
}

#[test]
fn test_append_generated_keeps_existing_prompt() {
    let (_slot, mut store) = create_test_store();
    let mut p = project("p1", "First", vec![]);
    p.prompt = Some("original goal".to_string());
    store.add_project(p);

    store
        .append_generated(&GenerateTodos {
            project_id: Some("p1".to_string()),
            prompt: "follow-up".to_string(),
            todos: vec![draft("Step", vec![])],
        })
        .unwrap();

    assert_eq!(
        store.get_project("p1").unwrap().prompt.as_deref(),
        Some("original goal")
    );
}

#[test]
fn test_append_generated_drops_bad_dependencies() {
    let (_slot, mut store) = create_test_store();

    let generated = store
        .append_generated(&GenerateTodos {
            project_id: None,
            prompt: "deps".to_string(),
            todos: vec![
                draft("A", vec![0, 1, 3, 9]),
                draft("B", vec![1, 1, 2]),
                draft("C", vec![2, 1]),
            ],
        })
        .unwrap();

    let ids: Vec<&str> = generated.todos.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(generated.todos[0].dependencies, vec![ids[2].to_string()]);
    assert_eq!(generated.todos[1].dependencies, vec![ids[0].to_string()]);
    assert_eq!(
        generated.todos[2].dependencies,
        vec![ids[1].to_string(), ids[0].to_string()]
    );
}

#[test]
fn test_append_generated_rejects_invalid_batch_atomically() {
    let (_slot, mut store) = create_test_store();
    store.add_project(project("p1", "First", vec![]));
    let before = store.state().clone();

    let mut bad = draft("Bad", vec![]);
    bad.priority = Some("urgent".to_string());
    let result = store.append_generated(&GenerateTodos {
        project_id: None,
        prompt: "x".to_string(),
        todos: vec![draft("Good", vec![]), bad],
    });
    assert!(matches!(result, Err(StoreError::InvalidInput { ref field, .. }) if field == "priority"));

    let missing = store.append_generated(&GenerateTodos {
        project_id: Some("nope".to_string()),
        prompt: "x".to_string(),
        todos: vec![draft("Good", vec![])],
    });
    assert!(matches!(missing, Err(StoreError::ProjectNotFound { .. })));

    let empty = store.append_generated(&GenerateTodos {
        project_id: None,
        prompt: "x".to_string(),
        todos: vec![],
    });
    assert!(empty.is_err());

    assert_eq!(store.state(), &before);
}

#[test]
fn test_remove_project_clears_active_pointer() {
    let (slot, mut store) = create_test_store();
    store.add_project(project("p1", "First", vec![todo("t1", "One")]));
    store.add_project(project("p2", "Second", vec![]));
    store.set_active_project("p1");

    let removed = store.remove_project("p1").unwrap();
    assert_eq!(removed.todos.len(), 1);
    assert_eq!(store.active_project_id(), None);
    assert!(store.get_todo_by_id("t1").is_none());

    store.set_active_project("p2");
    store.remove_project("p1").unwrap_err();
    assert_eq!(rehydrate(&slot).active_project_id(), Some("p2"));
}

#[test]
fn test_remove_todo_strips_dependencies_without_renumbering() {
    let (_slot, mut store) = create_test_store();
    let mut a = todo("a", "A");
    a.order = 1;
    let mut b = todo("b", "B");
    b.order = 2;
    b.dependencies = vec!["a".to_string(), "x".to_string()];
    let mut c = todo("c", "C");
    c.order = 3;
    store.add_project(project("p1", "First", vec![a, b, c]));

    assert_eq!(store.remove_todo("a").unwrap(), 1);

    let p = store.get_project("p1").unwrap();
    assert_eq!(p.todos[0].dependencies, vec!["x".to_string()]);
    let orders: Vec<u32> = p.todos.iter().map(|t| t.order).collect();
    assert_eq!(orders, vec![2, 3]);
    assert!(store.remove_todo("a").unwrap_err().is_not_found());
}

#[test]
fn test_summaries_and_views() {
    let (_slot, mut store) = create_test_store();
    let mut a = todo("a", "A");
    a.completed = true;
    a.time = Some(TimeEstimate::from_minutes(30));
    let mut b = todo("b", "B");
    b.dependencies = vec!["a".to_string()];
    b.time = Some(TimeEstimate::from_minutes(45));
    let mut c = todo("c", "C");
    c.dependencies = vec!["b".to_string(), "unknown".to_string()];
    store.add_project(project("p1", "First", vec![a, b, c]));
    store.set_active_project("p1");

    let summary = &store.summaries()[0];
    assert!(summary.active);
    assert_eq!(summary.total_todos, 3);
    assert_eq!(summary.completed_todos, 1);
    assert_eq!(summary.pending_todos, 2);
    assert_eq!(summary.estimated_minutes, 75);
    assert_eq!(summary.remaining_minutes, 45);

    let p = store.active_project().unwrap();
    let ready: Vec<&str> = p.ready_todos().iter().map(|t| t.id.as_str()).collect();
    let blocked: Vec<&str> = p.blocked_todos().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ready, vec!["b"]);
    assert_eq!(blocked, vec!["c"]);
}

#[test]
fn test_assistant_context_is_project_json() {
    let (_slot, mut store) = create_test_store();
    let p = project("p1", "First", vec![todo("t1", "One")]);
    store.add_project(p.clone());

    let context = store.assistant_context("p1").unwrap();
    let parsed: Project = serde_json::from_str(&context).unwrap();
    assert_eq!(parsed, p);
    assert!(context.contains('\n'));
    assert!(store.assistant_context("p2").unwrap_err().is_not_found());
}
