use shared_config::AppConfig;

use crate::locks::PractitionerLocks;

/// Application state shared across all routers. The lock registry has to
/// outlive individual requests, so it lives here rather than in any cell.
pub struct AppState {
    pub config: AppConfig,
    pub practitioner_locks: PractitionerLocks,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            practitioner_locks: PractitionerLocks::new(),
        }
    }
}
