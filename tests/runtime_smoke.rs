use std::{sync::Arc, time::Duration};

use tokio::sync::broadcast;

use todosync::{
    config::RuntimeConfig,
    core::store::{DeleteOutcome, StoreError, TaskStore},
    op::OpKind,
    remote::memory::MemoryRemote,
    runtime::{
        events::TaskEvent,
        handle::{RuntimeError, spawn_task_list},
    },
    task::{SubmitIntent, TaskField, TaskRecord},
    types::OptionSets,
};

fn milk() -> TaskRecord {
    TaskRecord {
        id: "1".to_string(),
        title: "Buy milk".to_string(),
        priority: "low".to_string(),
        category: "errand".to_string(),
        completed: false,
    }
}

async fn next_event(sub: &mut broadcast::Receiver<TaskEvent>) -> TaskEvent {
    tokio::time::timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("event")
        .expect("recv")
}

#[tokio::test]
async fn runtime_create_toggle_and_events_ordered() {
    let remote = Arc::new(MemoryRemote::with_tasks(vec![milk()]));
    let cfg = RuntimeConfig {
        load_on_start: false,
        ..RuntimeConfig::default()
    };
    let handle = spawn_task_list(TaskStore::new(remote.clone()), cfg);
    let mut sub = handle.subscribe();

    assert!(handle.load().await.expect("load"));
    handle.set_draft_field(TaskField::Title, "Pay bills").await.expect("draft");
    let created = handle.submit_draft(SubmitIntent::default()).await.expect("submit");
    let completed = handle.toggle_completed("1").await.expect("toggle");
    assert!(completed);

    assert_eq!(next_event(&mut sub).await, TaskEvent::Loaded { count: 1 });
    assert_eq!(next_event(&mut sub).await, TaskEvent::Created { id: created.id.clone() });
    assert_eq!(
        next_event(&mut sub).await,
        TaskEvent::Toggled {
            id: "1".to_string(),
            completed: true
        }
    );

    let snap = handle.snapshot().await.expect("snapshot");
    assert_eq!(snap.tasks.len(), 2);
    assert!(snap.tasks[0].completed);
    assert!(snap.draft.is_empty());
    assert_eq!(snap.editing, None);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn runtime_edit_flow_and_restart_emits_cancel() {
    let remote = Arc::new(MemoryRemote::with_tasks(vec![
        milk(),
        TaskRecord {
            id: "2".to_string(),
            title: "Pay bills".to_string(),
            priority: "high".to_string(),
            category: "finance".to_string(),
            completed: false,
        },
    ]));
    let handle = spawn_task_list(TaskStore::new(remote.clone()), RuntimeConfig::default());
    let mut sub = handle.subscribe();

    // Commands queue behind the startup load.
    handle.start_edit("1").await.expect("start 1");
    handle.set_edit_field(TaskField::Title, "Buy bread").await.expect("edit");
    handle.start_edit("2").await.expect("start 2");
    handle.set_edit_field(TaskField::Priority, "low").await.expect("edit");
    let saved = handle.save_edit(SubmitIntent::default()).await.expect("save");
    assert_eq!(saved, "2");

    let mut seen = Vec::new();
    for _ in 0..5 {
        seen.push(next_event(&mut sub).await);
    }
    assert_eq!(
        seen,
        vec![
            TaskEvent::Loaded { count: 2 },
            TaskEvent::EditStarted { id: "1".to_string() },
            TaskEvent::EditCancelled { id: "1".to_string() },
            TaskEvent::EditStarted { id: "2".to_string() },
            TaskEvent::Updated { id: "2".to_string() },
        ]
    );

    let snap = handle.snapshot().await.expect("snapshot");
    assert_eq!(snap.tasks[0], milk());
    assert_eq!(snap.tasks[1].priority, "low");
    assert_eq!(snap.editing, None);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn runtime_reports_failures_and_declines() {
    let remote = Arc::new(MemoryRemote::with_tasks(vec![milk()]));
    let handle = spawn_task_list(TaskStore::new(remote.clone()), RuntimeConfig::default());
    let mut sub = handle.subscribe();

    let outcome = handle.confirm_delete("1", false).await.expect("declined");
    assert_eq!(outcome, DeleteOutcome::Declined);

    remote.fail_next(OpKind::Toggle);
    let err = handle.toggle_completed("1").await.expect_err("toggle fails");
    assert!(matches!(err, RuntimeError::Store(StoreError::Remote(_))));

    let err = handle.start_edit("42").await.expect_err("missing");
    assert!(matches!(err, RuntimeError::Store(StoreError::NotFound(_))));

    let outcome = handle
        .confirm_delete("1", |prompt: &str| prompt.contains("Buy milk"))
        .await
        .expect("delete");
    assert_eq!(outcome, DeleteOutcome::Deleted);

    assert_eq!(next_event(&mut sub).await, TaskEvent::Loaded { count: 1 });
    assert_eq!(next_event(&mut sub).await, TaskEvent::DeleteDeclined { id: "1".to_string() });
    assert_eq!(next_event(&mut sub).await, TaskEvent::SyncFailed { op: OpKind::Toggle });
    assert_eq!(next_event(&mut sub).await, TaskEvent::NotFound { id: "42".to_string() });
    assert_eq!(next_event(&mut sub).await, TaskEvent::Deleted { id: "1".to_string() });
    assert!(remote.tasks().is_empty());

    handle.shutdown().await.expect("shutdown");
    assert!(matches!(handle.snapshot().await, Err(RuntimeError::ChannelClosed)));
}

#[tokio::test]
async fn snapshot_carries_configured_choices_for_rendering() {
    let options = OptionSets {
        priorities: vec!["someday".to_string(), "today".to_string()],
        categories: vec!["garden".to_string()],
    };
    let store = TaskStore::new(Arc::new(MemoryRemote::with_tasks(vec![milk()]))).with_options(options.clone());
    let handle = spawn_task_list(store, RuntimeConfig::default());

    let snap = handle.snapshot().await.expect("snapshot");
    assert_eq!(snap.options, options);

    let rendered: Vec<String> = [TaskField::Priority, TaskField::Category]
        .into_iter()
        .filter_map(|field| snap.options.choices(field))
        .map(|choices| choices.join("|"))
        .collect();
    assert_eq!(rendered, vec!["someday|today".to_string(), "garden".to_string()]);

    // Unknown values still go through; the lists only drive rendering.
    handle.start_edit("1").await.expect("start");
    handle.set_edit_field(TaskField::Priority, "urgent").await.expect("edit");
    handle.save_edit(SubmitIntent::default()).await.expect("save");
    let snap = handle.snapshot().await.expect("snapshot");
    assert_eq!(snap.tasks[0].priority, "urgent");

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn missing_targets_are_reported_as_events() {
    let remote = Arc::new(MemoryRemote::new());
    let cfg = RuntimeConfig {
        load_on_start: false,
        ..RuntimeConfig::default()
    };
    let handle = spawn_task_list(TaskStore::new(remote.clone()), cfg);
    let mut sub = handle.subscribe();

    let err = handle.toggle_completed("9").await.expect_err("missing");
    assert!(matches!(err, RuntimeError::Store(StoreError::NotFound(_))));
    assert_eq!(next_event(&mut sub).await, TaskEvent::NotFound { id: "9".to_string() });
    assert_eq!(remote.request_count(), 0);

    handle.shutdown().await.expect("shutdown");
}
