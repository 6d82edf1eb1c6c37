pub mod availability;
pub mod conflict;

pub use availability::AvailabilityService;
