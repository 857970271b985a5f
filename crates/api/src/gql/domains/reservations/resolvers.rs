use async_graphql::{Context, Object, Result, ID};
use uuid::Uuid;

use super::service::{self, CreateReservationParams, TimeslotRef};
use super::types::{CreateReservationInput, Reservation};
use crate::gql::common::types::Role;
use crate::gql::domains::timeslots::types::{AvailabilityEvent, AvailabilityEventType};
use crate::gql::error::{BookingError, BookingResultExt, ResultExt};
use crate::gql::subscriptions::publish_availability_event;
use crate::state::AppState;
use infra::repos::reservations;

#[derive(Default)]
pub struct ReservationQuery;

#[Object]
impl ReservationQuery {
    async fn my_reservations(&self, ctx: &Context<'_>) -> Result<Vec<Reservation>> {
        use crate::auth::permissions::require_claims;

        let claims = require_claims(ctx)?;
        let user_id = Uuid::parse_str(&claims.sub).gql_err("Invalid user ID")?;

        let state = ctx.data::<AppState>()?;
        let rows = reservations::list_for_user(&state.db, user_id).await?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    /// A single reservation, visible to its owner and admins
    async fn reservation(&self, ctx: &Context<'_>, id: ID) -> Result<Reservation> {
        use crate::auth::permissions::require_claims;

        let claims = require_claims(ctx)?;
        let user_id = Uuid::parse_str(&claims.sub).gql_err("Invalid user ID")?;
        let is_admin = Role::from(claims.role.clone()) == Role::Admin;

        let state = ctx.data::<AppState>()?;
        let reservation_id = Uuid::parse_str(id.as_str()).gql_err("Invalid reservation ID")?;

        let row = reservations::get_by_id(&state.db, reservation_id)
            .await
            .map_err(BookingError::from)
            .and_then(|row| row.ok_or(BookingError::NotFound("reservation")))
            .to_gql()?;

        if row.user_id != user_id && !is_admin {
            return Err(BookingError::Forbidden).to_gql();
        }

        Ok(row.into())
    }
}

#[derive(Default)]
pub struct ReservationMutation;

#[Object]
impl ReservationMutation {
    /// Hold a slot with a PENDING reservation. The hold expires on its own
    /// if payment never arrives.
    async fn create_reservation(
        &self,
        ctx: &Context<'_>,
        input: CreateReservationInput,
    ) -> Result<Reservation> {
        use crate::auth::permissions::require_player;

        let player = require_player(ctx)?;
        let state = ctx.data::<AppState>()?;

        let slot = match (input.timeslot_id, input.court_id, input.date, input.start_time) {
            (Some(id), _, _, _) => {
                TimeslotRef::ById(Uuid::parse_str(id.as_str()).gql_err("Invalid timeslot ID")?)
            }
            (None, Some(court_id), Some(date), Some(start_time)) => TimeslotRef::Virtual {
                court_id: Uuid::parse_str(court_id.as_str()).gql_err("Invalid court ID")?,
                date,
                start_time,
            },
            _ => {
                return Err(async_graphql::Error::new(
                    "Provide either timeslotId or courtId with date and startTime",
                ));
            }
        };

        let params = CreateReservationParams {
            user_id: player.id,
            slot,
            payment_method: input.payment_method.into(),
        };

        let created = service::create_reservation(&state.db, params)
            .await
            .to_gql()?;

        publish_availability_event(
            created.timeslot.court_id,
            AvailabilityEvent::from_slot(AvailabilityEventType::SlotHeld, &created.timeslot),
        );

        Ok(created.reservation.into())
    }

    /// Confirm a fiat reservation after checkout completes
    async fn confirm_reservation(&self, ctx: &Context<'_>, reservation_id: ID) -> Result<Reservation> {
        use crate::auth::permissions::require_claims;

        let claims = require_claims(ctx)?;
        let user_id = Uuid::parse_str(&claims.sub).gql_err("Invalid user ID")?;
        let is_admin = Role::from(claims.role.clone()) == Role::Admin;

        let state = ctx.data::<AppState>()?;
        let reservation_id =
            Uuid::parse_str(reservation_id.as_str()).gql_err("Invalid reservation ID")?;

        let outcome = service::confirm_reservation(&state.db, reservation_id, user_id, is_admin)
            .await
            .to_gql()?;

        if outcome.newly_paid {
            publish_availability_event(
                outcome.timeslot.court_id,
                AvailabilityEvent::from_slot(AvailabilityEventType::SlotReserved, &outcome.timeslot),
            );
        }

        Ok(outcome.reservation.into())
    }

    /// Cancel a PENDING reservation and release its slot (owner only)
    async fn cancel_reservation(&self, ctx: &Context<'_>, reservation_id: ID) -> Result<Reservation> {
        use crate::auth::permissions::require_claims;

        let claims = require_claims(ctx)?;
        let user_id = Uuid::parse_str(&claims.sub).gql_err("Invalid user ID")?;

        let state = ctx.data::<AppState>()?;
        let reservation_id =
            Uuid::parse_str(reservation_id.as_str()).gql_err("Invalid reservation ID")?;

        let outcome = service::cancel_reservation(&state.db, reservation_id, user_id)
            .await
            .to_gql()?;

        if outcome.newly_cancelled {
            publish_availability_event(
                outcome.timeslot.court_id,
                AvailabilityEvent::from_slot(AvailabilityEventType::SlotReleased, &outcome.timeslot),
            );
        }

        Ok(outcome.reservation.into())
    }
}
