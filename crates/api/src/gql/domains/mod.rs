// Each domain contains: mod.rs, resolvers.rs, types.rs (+ service.rs for workflows)

pub mod clubs;
pub mod commissions;
pub mod payments;
pub mod reservations;
pub mod timeslots;
