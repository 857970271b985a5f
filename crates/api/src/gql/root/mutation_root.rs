use async_graphql::MergedObject;

use crate::gql::domains::commissions::CommissionMutation;
use crate::gql::domains::payments::PaymentMutation;
use crate::gql::domains::reservations::ReservationMutation;
use crate::gql::domains::timeslots::TimeslotMutation;

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    CommissionMutation,
    PaymentMutation,
    ReservationMutation,
    TimeslotMutation,
);
