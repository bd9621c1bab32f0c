use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use taskboard_api::{routes::create_router, state::ApiState};
use taskboard_core::{
    PaginationConfig, SearchParams, Shift, Slots, Task, TaskList, TaskUpdate,
};
use taskboard_db::{Error, TaskStore};
use tokio::sync::Mutex;
use tower::ServiceExt;

/// In-memory store applying the same listing rules as the MongoDB pipeline.
#[derive(Default)]
struct MemoryStore {
    tasks: Vec<Task>,
    assignments: Mutex<Vec<(String, TaskUpdate)>>,
    fail: bool,
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self, params: &SearchParams) -> taskboard_db::Result<TaskList> {
        if self.fail {
            return Err(Error::QueryFailed("connection reset by peer".to_string()));
        }

        let now = Utc::now();
        let page = PaginationConfig::default().resolve(params.limit, params.page);
        let tasks = self
            .tasks
            .iter()
            .filter(|task| !task.shifts.is_empty())
            .filter(|task| match params.status {
                Some(status) => status.predicate().matches(task, now),
                None => true,
            })
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();

        Ok(TaskList {
            pagination: page.pagination,
            tasks,
        })
    }

    async fn assign_task(&self, task_id: &str, update: &TaskUpdate) -> taskboard_db::Result<()> {
        update.validate()?;
        if !self.tasks.iter().any(|task| task.id == task_id) {
            return Err(Error::TaskNotFound(task_id.to_string()));
        }
        self.assignments
            .lock()
            .await
            .push((task_id.to_string(), update.clone()));
        Ok(())
    }
}

fn task(id: &str, start_in_days: i64) -> Task {
    let start = Utc::now() + Duration::days(start_in_days);
    Task {
        id: id.to_string(),
        name: format!("Task {id}"),
        ops: None,
        organisation: None,
        shifts: vec![Shift {
            id: format!("{id}-shift"),
            start_date: Some(start),
            end_date: Some(start + Duration::hours(8)),
            slots: Slots { filled: 0, total: 1 },
            applicants: 0,
        }],
    }
}

fn seeded_store() -> Arc<MemoryStore> {
    let mut no_shifts = task("empty", 1);
    no_shifts.shifts.clear();

    Arc::new(MemoryStore {
        tasks: vec![task("future", 3), task("past", -3), no_shifts],
        ..Default::default()
    })
}

fn app(store: Arc<MemoryStore>) -> Router {
    create_router(ApiState { store })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn patch(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn ids(json: &Value) -> Vec<String> {
    json["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let (status, json) = send(app(seeded_store()), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_list_defaults() {
    let (status, json) = send(app(seeded_store()), get("/tasks")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pagination"]["limit"], 20);
    assert_eq!(json["pagination"]["page"], 1);
    assert_eq!(ids(&json), vec!["future", "past"]);
}

#[tokio::test]
async fn test_list_by_status() {
    let (_, upcoming) = send(app(seeded_store()), get("/tasks?status=upcoming")).await;
    assert_eq!(ids(&upcoming), vec!["future"]);

    let (_, done) = send(app(seeded_store()), get("/tasks?status=DONE")).await;
    assert_eq!(ids(&done), vec!["past"]);

    let (_, ongoing) = send(app(seeded_store()), get("/tasks?status=ongoing")).await;
    assert_eq!(ids(&ongoing), vec!["future", "past"]);
}

#[tokio::test]
async fn test_list_clamps_limit() {
    let (status, json) = send(app(seeded_store()), get("/tasks?limit=500&page=2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pagination"]["limit"], 100);
    assert_eq!(json["pagination"]["page"], 2);
    assert!(ids(&json).is_empty());
}

#[tokio::test]
async fn test_list_tolerates_bad_numbers() {
    let (status, json) = send(app(seeded_store()), get("/tasks?limit=abc&page=99999")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pagination"]["limit"], 20);
    assert_eq!(json["pagination"]["page"], 1);
}

#[tokio::test]
async fn test_list_store_failure_is_opaque() {
    let store = Arc::new(MemoryStore {
        fail: true,
        ..Default::default()
    });

    let (status, json) = send(app(store), get("/tasks")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Internal Server Error");
}

#[tokio::test]
async fn test_task_json_shape() {
    let store = seeded_store();
    let (_, json) = send(app(store.clone()), get("/tasks?status=upcoming")).await;
    let shift = &json["tasks"][0]["shifts"][0];

    assert_eq!(shift["id"], "future-shift");
    assert!(shift["startDate"].is_string());
    assert!(shift["endDate"].is_string());
    assert_eq!(shift["slots"]["total"], 1);

    let tasks: Vec<Task> = serde_json::from_value(json["tasks"].clone()).unwrap();
    assert_eq!(tasks, vec![store.tasks[0].clone()]);
}

#[tokio::test]
async fn test_assign_task() {
    let store = seeded_store();

    let (status, json) = send(
        app(store.clone()),
        patch("/tasks/future", r#"{"assigneeId":"user-42"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["assigneeId"], "user-42");

    let assignments = store.assignments.lock().await;
    assert_eq!(
        *assignments,
        vec![("future".to_string(), TaskUpdate::new("user-42"))]
    );
}

#[tokio::test]
async fn test_empty_assignee_never_reaches_store() {
    let store = seeded_store();

    let (status, json) = send(
        app(store.clone()),
        patch("/tasks/future", r#"{"assigneeId":""}"#),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("empty assignee ID"));
    assert!(store.assignments.lock().await.is_empty());
}

#[tokio::test]
async fn test_missing_payload() {
    let store = seeded_store();

    let (status, json) = send(app(store.clone()), patch("/tasks/future", "")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "empty payload");
    assert!(store.assignments.lock().await.is_empty());
}

#[tokio::test]
async fn test_assign_unknown_task() {
    let (status, _) = send(
        app(seeded_store()),
        patch("/tasks/nope", r#"{"assigneeId":"user-42"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_rejects_empty_assignee_directly() {
    let store = seeded_store();

    let result = store.assign_task("future", &TaskUpdate::default()).await;
    let error = tokio_test::assert_err!(result);

    assert!(matches!(error, Error::Invalid(_)));
}
