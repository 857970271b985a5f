pub mod resolvers;
pub mod types;

pub use resolvers::{CommissionMutation, CommissionQuery};
