pub mod expiry_service;

pub use expiry_service::{spawn_expiry_service, ExpiryService};
