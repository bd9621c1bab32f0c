use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use futures_util::{future, Stream, StreamExt, TryStreamExt};
use mongodb::{
    options::{AggregateOptions, ClientOptions},
    Client, Collection,
};
use taskboard_core::{PaginationConfig, SearchParams, Task, TaskList, TaskUpdate};

use crate::{
    models::decode_task,
    pipeline::{TaskQuery, TASKS_COLLECTION},
    Error, Result,
};

/// Read and assign operations the HTTP layer depends on.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// One page of tasks matching `params`.
    async fn list_tasks(&self, params: &SearchParams) -> Result<TaskList>;

    /// Set a task's assignee and bump its `updatedAt`.
    async fn assign_task(&self, task_id: &str, update: &TaskUpdate) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
    pub connect_timeout: Duration,
    pub query_timeout: Duration,
    pub pagination: PaginationConfig,
}

impl DatabaseConfig {
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            connect_timeout: Self::CONNECT_TIMEOUT,
            query_timeout: Self::QUERY_TIMEOUT,
            pagination: PaginationConfig::default(),
        }
    }
}

/// `updatedAt` is stored as a string in the dataset, not a BSON date.
pub fn format_updated_at(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Decode raw pipeline output into tasks. The first error is yielded and
/// then the stream ends.
pub fn decode_documents<S>(documents: S) -> impl Stream<Item = Result<Task>> + Send
where
    S: Stream<Item = mongodb::error::Result<Document>> + Send,
{
    documents
        .map(|item| match item {
            Ok(document) => decode_task(document),
            Err(e) => Err(Error::IterationFailed(e.to_string())),
        })
        .scan(false, |failed, item| {
            if *failed {
                return future::ready(None);
            }
            *failed = item.is_err();
            future::ready(Some(item))
        })
}

#[derive(Clone)]
pub struct Database {
    tasks: Collection<Document>,
    query_timeout: Duration,
    pagination: PaginationConfig,
}

impl Database {
    /// Connect and ping the server, bounded by `connect_timeout`.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let client = tokio::time::timeout(config.connect_timeout, Self::connect(config))
            .await
            .map_err(|_| {
                Error::Connection(format!(
                    "no answer from server within {}s",
                    config.connect_timeout.as_secs()
                ))
            })??;

        tracing::info!("Connected to {} collection on MongoDB", TASKS_COLLECTION);

        Ok(Self::from_client(client, config))
    }

    /// Wrap an existing client. No I/O happens until the first operation.
    pub fn from_client(client: Client, config: &DatabaseConfig) -> Self {
        let tasks = client.database(&config.name).collection(TASKS_COLLECTION);

        Self {
            tasks,
            query_timeout: config.query_timeout,
            pagination: config.pagination,
        }
    }

    async fn connect(config: &DatabaseConfig) -> Result<Client> {
        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        options.app_name = Some("taskboard".to_string());
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);

        let client = Client::with_options(options).map_err(|e| Error::Connection(e.to_string()))?;

        client
            .database(&config.name)
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Ok(client)
    }

    // ========================================================================
    // Listing
    // ========================================================================

    /// Run `pipeline` on the tasks collection and decode results lazily.
    ///
    /// The stream is forward-only. A decode error ends it; so does a cursor
    /// error while fetching the next batch.
    pub async fn stream_tasks(
        &self,
        pipeline: Vec<Document>,
    ) -> Result<impl Stream<Item = Result<Task>> + Send> {
        let options = AggregateOptions::builder()
            .max_time(self.query_timeout)
            .build();

        let cursor = self
            .tasks
            .aggregate(pipeline, options)
            .await
            .map_err(|e| Error::QueryFailed(e.to_string()))?;

        Ok(decode_documents(cursor))
    }

    /// Run a compiled listing to completion. Nothing is returned on error.
    pub async fn run_query(&self, query: TaskQuery) -> Result<TaskList> {
        let TaskQuery {
            pipeline,
            pagination,
        } = query;

        let fetch = async {
            let stream = self.stream_tasks(pipeline).await?;
            stream.try_collect::<Vec<Task>>().await
        };

        let tasks = tokio::time::timeout(self.query_timeout, fetch)
            .await
            .map_err(|_| {
                Error::QueryFailed(format!(
                    "timed out after {}s",
                    self.query_timeout.as_secs()
                ))
            })??;

        tracing::info!("Fetched {} tasks from MongoDB", tasks.len());

        Ok(TaskList { pagination, tasks })
    }

    // ========================================================================
    // Assignment
    // ========================================================================

    async fn set_assignee(&self, task_id: &str, update: &TaskUpdate) -> Result<()> {
        let filter = doc! { "_id": task_id };
        let changes = doc! {
            "$set": {
                "assigneeId": update.assignee_id.as_str(),
                "updatedAt": format_updated_at(Utc::now()),
            }
        };

        let result = tokio::time::timeout(
            self.query_timeout,
            self.tasks.update_one(filter, changes, None),
        )
        .await
        .map_err(|_| Error::UpdateFailed {
            task_id: task_id.to_string(),
            reason: format!("timed out after {}s", self.query_timeout.as_secs()),
        })?
        .map_err(|e| Error::UpdateFailed {
            task_id: task_id.to_string(),
            reason: e.to_string(),
        })?;

        if result.matched_count == 0 {
            return Err(Error::TaskNotFound(task_id.to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl TaskStore for Database {
    async fn list_tasks(&self, params: &SearchParams) -> Result<TaskList> {
        let query = TaskQuery::compile(params, &self.pagination, Utc::now());

        tracing::debug!(
            status = ?params.status,
            stages = query.pipeline.len(),
            "Fetching tasks from MongoDB"
        );

        self.run_query(query).await
    }

    async fn assign_task(&self, task_id: &str, update: &TaskUpdate) -> Result<()> {
        update.validate()?;

        self.set_assignee(task_id, update).await?;

        tracing::info!("Successfully updated task {} in MongoDB", task_id);

        Ok(())
    }
}
