pub mod models;
pub mod pipeline;
pub mod filter;
pub mod repository;
pub mod error;

// Re-exports
pub use models::{decode_task, ShiftDocument, TaskDocument};
pub use pipeline::{base_pipeline, pagination_stages, TaskQuery};
pub use filter::status_stage;
pub use repository::{decode_documents, format_updated_at, Database, DatabaseConfig, TaskStore};
pub use error::{Error, Result};
