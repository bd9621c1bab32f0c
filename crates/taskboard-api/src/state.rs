use std::sync::Arc;

use taskboard_db::TaskStore;

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn TaskStore>,
}
