pub mod client;
pub mod models;

pub use client::BookingClient;
pub use models::{BookingError, DetachResult};
