use std::sync::Arc;

use tailspin_dal::Pool;

#[derive(Clone, Debug)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(pool: Pool) -> Self {
        AppState {
            state: Arc::new(AppStateInner { pool }),
        }
    }

    pub fn pool(&self) -> &Pool {
        &self.state.pool
    }
}

#[derive(Debug)]
struct AppStateInner {
    pool: Pool,
}
