use async_graphql::{Context, Object, Result, ID};
use uuid::Uuid;

use super::service;
use super::types::{Payment, SettlementIntent};
use crate::gql::common::types::{PaginationInput, Role};
use crate::gql::domains::reservations::types::Reservation;
use crate::gql::domains::timeslots::types::{AvailabilityEvent, AvailabilityEventType};
use crate::gql::error::{BookingResultExt, ResultExt};
use crate::gql::subscriptions::publish_availability_event;
use crate::state::AppState;
use infra::repos::payments;

#[derive(Default)]
pub struct PaymentQuery;

#[Object]
impl PaymentQuery {
    /// Settlement ledger, newest first (admin only)
    async fn payments(
        &self,
        ctx: &Context<'_>,
        pagination: Option<PaginationInput>,
    ) -> Result<Vec<Payment>> {
        use crate::auth::permissions::require_admin;

        let _admin = require_admin(ctx)?;
        let state = ctx.data::<AppState>()?;

        let page = pagination
            .unwrap_or(PaginationInput {
                limit: Some(50),
                offset: Some(0),
            })
            .to_limit_offset();

        let rows = payments::list(&state.db, page).await?;
        Ok(rows.into_iter().map(Payment::from).collect())
    }
}

#[derive(Default)]
pub struct PaymentMutation;

#[Object]
impl PaymentMutation {
    /// Settlement instructions for a PENDING reservation: a checkout
    /// redirect for fiat, transfer details for USDC
    async fn prepare_settlement(
        &self,
        ctx: &Context<'_>,
        reservation_id: ID,
    ) -> Result<SettlementIntent> {
        use crate::auth::permissions::require_claims;

        let claims = require_claims(ctx)?;
        let user_id = Uuid::parse_str(&claims.sub).gql_err("Invalid user ID")?;
        let is_admin = Role::from(claims.role.clone()) == Role::Admin;

        let state = ctx.data::<AppState>()?;
        let reservation_id =
            Uuid::parse_str(reservation_id.as_str()).gql_err("Invalid reservation ID")?;

        service::prepare_settlement(state, reservation_id, user_id, is_admin)
            .await
            .to_gql()
    }

    /// Verify an on-chain transfer by its signature and settle the reservation
    async fn confirm_settlement(
        &self,
        ctx: &Context<'_>,
        reservation_id: ID,
        signature: String,
    ) -> Result<Reservation> {
        use crate::auth::permissions::require_claims;

        let claims = require_claims(ctx)?;
        let user_id = Uuid::parse_str(&claims.sub).gql_err("Invalid user ID")?;
        let is_admin = Role::from(claims.role.clone()) == Role::Admin;

        let state = ctx.data::<AppState>()?;
        let reservation_id =
            Uuid::parse_str(reservation_id.as_str()).gql_err("Invalid reservation ID")?;

        let settled =
            service::confirm_settlement(state, reservation_id, &signature, user_id, is_admin)
                .await
                .to_gql()?;

        if settled.newly_paid {
            publish_availability_event(
                settled.timeslot.court_id,
                AvailabilityEvent::from_slot(AvailabilityEventType::SlotReserved, &settled.timeslot),
            );
        }

        Ok(settled.reservation.into())
    }
}
