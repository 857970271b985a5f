use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, Enum, Error, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::gql::domains::clubs::types::{Club, Court};
use crate::gql::domains::payments::types::PaymentMethod;
use crate::gql::domains::timeslots::types::Timeslot;
use crate::gql::loaders::{ClubLoader, CourtLoader, TimeslotLoader};

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub enum ReservationStatus {
    Pending,
    Paid,
    Cancelled,
}

impl From<infra::repos::reservations::ReservationStatus> for ReservationStatus {
    fn from(status: infra::repos::reservations::ReservationStatus) -> Self {
        match status {
            infra::repos::reservations::ReservationStatus::Pending => ReservationStatus::Pending,
            infra::repos::reservations::ReservationStatus::Paid => ReservationStatus::Paid,
            infra::repos::reservations::ReservationStatus::Cancelled => {
                ReservationStatus::Cancelled
            }
        }
    }
}

impl From<ReservationStatus> for infra::repos::reservations::ReservationStatus {
    fn from(status: ReservationStatus) -> Self {
        match status {
            ReservationStatus::Pending => infra::repos::reservations::ReservationStatus::Pending,
            ReservationStatus::Paid => infra::repos::reservations::ReservationStatus::Paid,
            ReservationStatus::Cancelled => {
                infra::repos::reservations::ReservationStatus::Cancelled
            }
        }
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Reservation {
    pub id: ID,
    pub user_id: ID,
    pub club_id: ID,
    pub court_id: ID,
    pub timeslot_id: ID,
    pub commission_id: Option<ID>,
    pub total_cents: i32,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub platform_fee_cents: i32,
    pub club_fee_cents: i32,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::ReservationRow> for Reservation {
    fn from(row: infra::models::ReservationRow) -> Self {
        Self {
            id: row.id.into(),
            user_id: row.user_id.into(),
            club_id: row.club_id.into(),
            court_id: row.court_id.into(),
            timeslot_id: row.timeslot_id.into(),
            commission_id: row.commission_id.map(Into::into),
            total_cents: row.total_cents,
            currency: row.currency,
            payment_method: row.payment_method.into(),
            platform_fee_cents: row.platform_fee_cents,
            club_fee_cents: row.club_fee_cents,
            status: row.status.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[ComplexObject]
impl Reservation {
    async fn club(&self, ctx: &Context<'_>) -> Result<Club> {
        let loader = ctx.data::<DataLoader<ClubLoader>>()?;
        let club_uuid =
            Uuid::parse_str(self.club_id.as_str()).map_err(|e| Error::new(e.to_string()))?;

        match loader
            .load_one(club_uuid)
            .await
            .map_err(|e| Error::new(e.to_string()))?
        {
            Some(row) => Ok(row.into()),
            None => Err(Error::new("Club not found")),
        }
    }

    async fn court(&self, ctx: &Context<'_>) -> Result<Court> {
        let loader = ctx.data::<DataLoader<CourtLoader>>()?;
        let court_uuid =
            Uuid::parse_str(self.court_id.as_str()).map_err(|e| Error::new(e.to_string()))?;

        match loader
            .load_one(court_uuid)
            .await
            .map_err(|e| Error::new(e.to_string()))?
        {
            Some(row) => Ok(row.into()),
            None => Err(Error::new("Court not found")),
        }
    }

    async fn timeslot(&self, ctx: &Context<'_>) -> Result<Timeslot> {
        let loader = ctx.data::<DataLoader<TimeslotLoader>>()?;
        let timeslot_uuid =
            Uuid::parse_str(self.timeslot_id.as_str()).map_err(|e| Error::new(e.to_string()))?;

        match loader
            .load_one(timeslot_uuid)
            .await
            .map_err(|e| Error::new(e.to_string()))?
        {
            Some(row) => Ok(row.into()),
            None => Err(Error::new("Timeslot not found")),
        }
    }
}

/// Either an existing timeslot ID, or a court + date + start time that names
/// a slot the schedule offers but nobody has booked yet.
#[derive(InputObject)]
pub struct CreateReservationInput {
    pub timeslot_id: Option<ID>,
    pub court_id: Option<ID>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub payment_method: PaymentMethod,
}
