use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection};
use taskboard_core::{NewTask, Priority, Task, TaskPatch};
use taskboard_server::entities::task;
use taskboard_server::task::{TaskService, TaskServiceError};

mod common;

pub struct TestContext {
    pub db: DatabaseConnection,
}

async fn setup() -> anyhow::Result<TestContext> {
    let db = common::setup_db().await?;
    Ok(TestContext { db })
}

/// Inserts a row directly, bypassing the service.
async fn insert_task(db: &DatabaseConnection, text: &str, completed: bool, priority: &str) -> i32 {
    let active_model = task::ActiveModel {
        text: ActiveValue::Set(text.to_string()),
        completed: ActiveValue::Set(completed),
        priority: ActiveValue::Set(priority.to_string()),
        ..Default::default()
    };
    active_model
        .insert(db)
        .await
        .expect("Failed to insert task")
        .id
}

#[tokio::test]
async fn can_create_task() {
    let state = setup().await.expect("Failed to setup test context");
    let task_service = TaskService::new(&state.db);

    let created = task_service
        .create_task(NewTask::new("Write report", Priority::High))
        .await
        .expect("Failed to create task");

    let expected = Task::new(created.id, "Write report", false, Priority::High);
    assert_eq!(created, expected);
}

#[tokio::test]
async fn can_assign_increasing_ids() {
    let state = setup().await.expect("Failed to setup test context");
    let task_service = TaskService::new(&state.db);

    let first = task_service
        .create_task(NewTask::new("first", Priority::Medium))
        .await
        .unwrap();
    let second = task_service
        .create_task(NewTask::new("second", Priority::Medium))
        .await
        .unwrap();

    assert!(second.id > first.id);
}

#[tokio::test]
async fn can_reject_blank_text_on_create() {
    let state = setup().await.expect("Failed to setup test context");
    let task_service = TaskService::new(&state.db);

    let result = task_service
        .create_task(NewTask::new("   ", Priority::Low))
        .await;

    assert!(matches!(result, Err(TaskServiceError::Validation)));
    assert!(task_service.get_all_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn can_apply_store_defaults() {
    let state = setup().await.expect("Failed to setup test context");

    let created = task::ActiveModel {
        text: ActiveValue::Set("defaults".to_string()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .expect("Failed to insert task");

    assert!(!created.completed);
    assert_eq!(created.priority, "Medium");
}

#[tokio::test]
async fn can_list_tasks_newest_first() {
    let state = setup().await.expect("Failed to setup test context");
    let first = insert_task(&state.db, "one", false, "Low").await;
    let second = insert_task(&state.db, "two", true, "High").await;
    let task_service = TaskService::new(&state.db);

    let tasks = task_service
        .get_all_tasks()
        .await
        .expect("Failed to get all tasks");

    assert_eq!(
        tasks,
        vec![
            Task::new(second, "two", true, Priority::High),
            Task::new(first, "one", false, Priority::Low),
        ]
    );
}

#[tokio::test]
async fn can_handle_empty_task_list() {
    let state = setup().await.expect("Failed to setup test context");
    let task_service = TaskService::new(&state.db);

    let tasks = task_service.get_all_tasks().await.unwrap();

    assert!(tasks.is_empty());
}

#[tokio::test]
async fn can_update_only_supplied_fields() {
    let state = setup().await.expect("Failed to setup test context");
    let id = insert_task(&state.db, "A", false, "Low").await;
    let task_service = TaskService::new(&state.db);

    task_service
        .update_task(id, TaskPatch::completed(true))
        .await
        .expect("Failed to update task");

    let updated = task_service.get_task_by_id(id).await.unwrap();
    assert_eq!(updated, Task::new(id, "A", true, Priority::Low));
}

#[tokio::test]
async fn can_update_text_and_priority() {
    let state = setup().await.expect("Failed to setup test context");
    let id = insert_task(&state.db, "old", true, "Low").await;
    let task_service = TaskService::new(&state.db);

    task_service
        .update_task(id, TaskPatch::text("new").with_priority(Priority::High))
        .await
        .expect("Failed to update task");

    let updated = task_service.get_task_by_id(id).await.unwrap();
    assert_eq!(updated, Task::new(id, "new", true, Priority::High));
}

#[tokio::test]
async fn can_reject_empty_patch() {
    let state = setup().await.expect("Failed to setup test context");
    let id = insert_task(&state.db, "A", false, "Low").await;
    let task_service = TaskService::new(&state.db);

    let result = task_service.update_task(id, TaskPatch::default()).await;

    assert!(matches!(result, Err(TaskServiceError::EmptyPatch)));
}

#[tokio::test]
async fn can_reject_blank_text_on_update() {
    let state = setup().await.expect("Failed to setup test context");
    let id = insert_task(&state.db, "keep me", false, "Low").await;
    let task_service = TaskService::new(&state.db);

    let result = task_service.update_task(id, TaskPatch::text("")).await;

    assert!(matches!(result, Err(TaskServiceError::Validation)));
    let unchanged = task_service.get_task_by_id(id).await.unwrap();
    assert_eq!(unchanged.text, "keep me");
}

#[tokio::test]
async fn can_handle_update_when_task_not_found() {
    let state = setup().await.expect("Failed to setup test context");
    let id = insert_task(&state.db, "exists", false, "Medium").await;
    let task_service = TaskService::new(&state.db);

    let non_existent_id = id + 1;
    let result = task_service
        .update_task(non_existent_id, TaskPatch::completed(true))
        .await;

    assert!(result.is_err());
    if let Err(e) = result {
        assert_eq!(
            e.to_string(),
            format!("Task with ID {} not found", non_existent_id)
        );
    }
}

#[tokio::test]
async fn can_delete_task_once() {
    let state = setup().await.expect("Failed to setup test context");
    let id = insert_task(&state.db, "short lived", false, "Medium").await;
    let task_service = TaskService::new(&state.db);

    task_service
        .delete_task(id)
        .await
        .expect("First delete should succeed");
    let second = task_service.delete_task(id).await;

    assert!(matches!(second, Err(TaskServiceError::TaskNotFound(missing)) if missing == id));
    assert!(task_service.get_all_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn can_report_corrupt_priority() {
    let state = setup().await.expect("Failed to setup test context");
    let id = insert_task(&state.db, "odd", false, "Urgent").await;
    let task_service = TaskService::new(&state.db);

    let result = task_service.get_all_tasks().await;

    assert!(matches!(
        result,
        Err(TaskServiceError::CorruptRow { id: corrupt, .. }) if corrupt == id
    ));
}
