use async_graphql::{Context, Object, Result, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::types::{Commission, CommissionStats};
use crate::gql::common::types::Role;
use crate::gql::error::{BookingError, BookingResultExt, ResultExt};
use crate::state::AppState;
use infra::fees;
use infra::repos::commissions;

#[derive(Default)]
pub struct CommissionQuery;

#[Object]
impl CommissionQuery {
    /// The commission split currently in force, if one has been configured
    async fn active_commission(&self, ctx: &Context<'_>) -> Result<Option<Commission>> {
        use crate::auth::permissions::require_role;

        let _viewer = require_role(ctx, Role::Club)?;
        let state = ctx.data::<AppState>()?;

        let row = commissions::get_active(&state.db).await?;
        Ok(row.map(Commission::from))
    }

    /// Platform-wide fee totals over PAID reservations (admin only)
    async fn commission_stats(
        &self,
        ctx: &Context<'_>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<CommissionStats> {
        use crate::auth::permissions::require_admin;

        let _admin = require_admin(ctx)?;
        let state = ctx.data::<AppState>()?;

        let totals = commissions::paid_totals(&state.db, from, to).await?;
        Ok(totals.into())
    }

    /// Fee totals for one club's PAID reservations (owner or admin)
    async fn club_commission_stats(
        &self,
        ctx: &Context<'_>,
        club_id: ID,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<CommissionStats> {
        use crate::auth::permissions::require_club_owner;

        let club_id = Uuid::parse_str(club_id.as_str()).gql_err("Invalid club ID")?;
        let _owner = require_club_owner(ctx, club_id).await?;

        let state = ctx.data::<AppState>()?;
        let totals = commissions::paid_totals_for_club(&state.db, club_id, from, to).await?;
        Ok(totals.into())
    }
}

#[derive(Default)]
pub struct CommissionMutation;

#[Object]
impl CommissionMutation {
    /// Swap in a new commission split (admin only). Existing reservations
    /// keep the split that was frozen onto them at booking time.
    async fn update_commission_config(
        &self,
        ctx: &Context<'_>,
        platform_fee_bps: i32,
        club_fee_bps: i32,
    ) -> Result<Commission> {
        use crate::auth::permissions::require_admin;

        let _admin = require_admin(ctx)?;
        let state = ctx.data::<AppState>()?;

        if !fees::valid_split(platform_fee_bps, club_fee_bps) {
            return Err(BookingError::InvalidSplit).to_gql();
        }

        // Deactivate-then-insert inside one transaction so the single-active
        // guard never sees two live configs
        let mut tx = state.db.begin().await?;
        commissions::deactivate_all(&mut *tx).await?;
        let row = commissions::insert_active(&mut *tx, platform_fee_bps, club_fee_bps).await?;
        tx.commit().await?;

        Ok(row.into())
    }
}
