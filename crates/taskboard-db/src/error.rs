use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Could not find tasks: {0}")]
    QueryFailed(String),

    #[error("Could not decode task: {0}")]
    DecodeFailed(String),

    #[error("Error while reading tasks: {0}")]
    IterationFailed(String),

    #[error("Error while updating task {task_id} assignee: {reason}")]
    UpdateFailed { task_id: String, reason: String },

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error(transparent)]
    Invalid(#[from] taskboard_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
