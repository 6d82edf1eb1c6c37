pub mod locks;
pub mod state;
pub mod test_utils;

pub use locks::PractitionerLocks;
pub use state::AppState;
