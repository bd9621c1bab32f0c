pub mod task;
pub mod search;
pub mod pagination;
pub mod error;

// Re-exports
pub use task::{Ops, Organisation, Shift, Slots, Task, TaskList, TaskUpdate};
pub use search::{Comparator, DatePredicate, SearchParams, ShiftDateField, StatusFilter};
pub use pagination::{Pagination, PaginationConfig, ResolvedPage};
pub use error::{Error, Result};
