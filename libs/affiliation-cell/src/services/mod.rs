pub mod affiliation;

pub use affiliation::AffiliationService;
