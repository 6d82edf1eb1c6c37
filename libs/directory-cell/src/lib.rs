pub mod client;
pub mod models;

pub use client::DirectoryClient;
pub use models::{DirectoryError, Practitioner};
