use async_graphql::MergedObject;

use crate::gql::domains::clubs::ClubQuery;
use crate::gql::domains::commissions::CommissionQuery;
use crate::gql::domains::payments::PaymentQuery;
use crate::gql::domains::reservations::ReservationQuery;
use crate::gql::domains::timeslots::TimeslotQuery;

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    ClubQuery,
    CommissionQuery,
    PaymentQuery,
    ReservationQuery,
    TimeslotQuery,
);
