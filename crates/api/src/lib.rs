pub mod app;
pub mod auth;
pub mod error;
pub mod gql;
pub mod middleware;
pub mod services;
pub mod settlement;
pub mod state;

pub use state::AppState;
