pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    AvailabilityDocument, AvailabilityError, ConflictReport, ConflictScope, Slot, SlotDay,
    SlotInput, TimeRange, WriteMode,
};
pub use services::availability::AvailabilityService;
