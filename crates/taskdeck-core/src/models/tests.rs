use jiff::Timestamp;

use crate::{
    display::LocalDateTime,
    models::{
        history::derive_tags, CompletionFilter, Difficulty, HistoryEntry, Priority, Project,
        ProjectSummary, TimeEstimate, Todo, TodoFilter, TodoSort,
    },
};

fn create_test_todo(id: &str, priority: Priority, completed: bool) -> Todo {
    Todo {
        id: id.to_string(),
        task: format!("Task {id}"),
        explanation: "Explains the task".to_string(),
        category: "Setup".to_string(),
        priority,
        difficulty: Difficulty::Medium,
        time: Some(TimeEstimate::from_minutes(95)),
        dependencies: Vec::new(),
        completed,
        order: 1,
        notes: None,
    }
}

fn create_test_project() -> Project {
    Project {
        id: "p-1".to_string(),
        name: "Test Project".to_string(),
        description: "This is a test project".to_string(),
        created_at: Timestamp::from_second(1640995200).unwrap(), // 2022-01-01 00:00:00 UTC
        prompt: Some("build a shed".to_string()),
        todos: vec![
            create_test_todo("a", Priority::Low, true),
            create_test_todo("b", Priority::High, false),
        ],
        completed: false,
    }
}

#[test]
fn test_todo_display() {
    let mut todo = create_test_todo("a", Priority::High, false);
    todo.dependencies = vec!["x".to_string(), "y".to_string()];
    todo.notes = Some("Ask the neighbour".to_string());
    let output = todo.to_string();

    assert!(output.starts_with("### Task a (○ Open)"));
    assert!(output.contains("- ID: `a`"));
    assert!(output.contains("- Priority: ▲ High"));
    assert!(output.contains("- Estimate: 1h 35m"));
    assert!(output.contains("- Depends on: x, y"));
    assert!(output.contains("#### Notes\n\nAsk the neighbour"));
}

#[test]
fn test_completed_todo_display_omits_empty_sections() {
    let mut todo = create_test_todo("a", Priority::Medium, true);
    todo.time = None;
    todo.explanation.clear();
    let output = todo.to_string();

    assert!(output.contains("(✓ Done)"));
    assert!(!output.contains("Estimate"));
    assert!(!output.contains("Depends on"));
    assert!(!output.contains("Notes"));
}

#[test]
fn test_project_display() {
    let project = create_test_project();
    let output = project.to_string();

    assert!(output.starts_with("# Test Project"));
    assert!(output.contains("- Progress: 1/2 todos done"));
    assert!(output.contains("- Prompt: build a shed"));
    assert!(output.contains(&format!(
        "- Created: {}",
        LocalDateTime(&project.created_at)
    )));
    assert!(output.contains("## Todos"));
    assert!(output.contains("### Task b (○ Open)"));
}

#[test]
fn test_empty_project_display() {
    let mut project = create_test_project();
    project.todos.clear();

    assert!(project.to_string().contains("No todos in this project."));
}

#[test]
fn test_summary_display() {
    let project = create_test_project();
    let summary = ProjectSummary::from_project(&project, Some("p-1"));
    let output = summary.to_string();

    assert!(output.starts_with("## Test Project ★ (1/2)"));
    assert!(output.contains("- **Estimate**: 1h 35m remaining of 3h 10m"));
    assert!(!ProjectSummary::from(&project).to_string().contains('★'));
}

#[test]
fn test_todo_filter_and_sort() {
    let mut project = create_test_project();
    let mut quick = create_test_todo("c", Priority::Medium, false);
    quick.time = Some(TimeEstimate::from_minutes(10));
    quick.category = "setup".to_string();
    project.todos.push(quick);
    let mut unknown = create_test_todo("d", Priority::High, false);
    unknown.time = None;
    unknown.category = "Review".to_string();
    project.todos.push(unknown);

    let pending = TodoFilter {
        completion: Some(CompletionFilter::Pending),
        ..Default::default()
    };
    let ids: Vec<&str> = project.todos_matching(&pending).iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "d"]);

    let by_priority = TodoFilter {
        sort: TodoSort::Priority,
        ..Default::default()
    };
    let ids: Vec<&str> = project
        .todos_matching(&by_priority)
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(ids, vec!["b", "d", "c", "a"]);

    let setup_by_estimate = TodoFilter {
        category: Some("SETUP".to_string()),
        sort: TodoSort::Estimate,
        ..Default::default()
    };
    let ids: Vec<&str> = project
        .todos_matching(&setup_by_estimate)
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(ids, vec!["c", "a", "b"]);

    let all_by_estimate = TodoFilter {
        sort: TodoSort::Estimate,
        ..Default::default()
    };
    let last = *project.todos_matching(&all_by_estimate).last().unwrap();
    assert_eq!(last.id, "d");
}

#[test]
fn test_next_order_continues_from_highest() {
    let mut project = create_test_project();
    assert_eq!(project.next_order(), 2);

    project.todos[0].order = 9;
    assert_eq!(project.next_order(), 10);

    project.todos.clear();
    assert_eq!(project.next_order(), 1);
}

#[test]
fn test_todo_reads_legacy_and_missing_estimates() {
    let legacy: Todo = serde_json::from_str(
        r#"{"id":"t","task":"Paint","explanation":"","category":"","priority":"High",
            "difficulty":"Easy","time":"1 hour 30 minutes","dependencies":[],
            "completed":false,"order":1}"#,
    )
    .unwrap();
    assert_eq!(legacy.time, Some(TimeEstimate::from_minutes(90)));

    let odd: Todo = serde_json::from_str(
        r#"{"id":"t","task":"Paint","priority":"Low","difficulty":"Hard",
            "time":"whenever","completed":true,"order":3}"#,
    )
    .unwrap();
    assert_eq!(odd.time, None);
    assert!(odd.dependencies.is_empty());

    let json = serde_json::to_value(&legacy).unwrap();
    assert_eq!(json["time"], 90);
    assert!(json.get("notes").is_none());
}

#[test]
fn test_history_matches_and_tags() {
    let mut review = create_test_todo("c", Priority::Low, false);
    review.category = "Review".to_string();
    let todos = vec![
        create_test_todo("a", Priority::Low, false),
        review,
        create_test_todo("b", Priority::Low, false),
    ];

    assert_eq!(derive_tags(&todos), vec!["Setup".to_string(), "Review".to_string()]);

    let entry = HistoryEntry {
        id: 1,
        prompt: "Organise a Workshop".to_string(),
        name: "Organise a Workshop... (Jan 1, 00:00)".to_string(),
        description: "Generated 3 todos for: Organise a Workshop".to_string(),
        tags: derive_tags(&todos),
        todos,
        created_at: Timestamp::from_second(1640995200).unwrap(),
    };

    assert!(entry.matches("workshop"));
    assert!(entry.matches("TASK B"));
    assert!(entry.matches("review"));
    assert!(!entry.matches("budget"));
    assert!(entry.to_string().contains("- **Tags**: Setup, Review"));
}
