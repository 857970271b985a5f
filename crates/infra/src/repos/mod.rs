pub mod clubs;
pub mod commissions;
pub mod courts;
pub mod payments;
pub mod reservations;
pub mod schedules;
pub mod timeslots;

pub use commissions::FeeTotals;
pub use payments::{CreatePayment, PaymentMethod, PaymentStatus};
pub use reservations::{CreateReservation, ReservationStatus};
pub use timeslots::{NewTimeslot, SlotStatus};
