use async_graphql::{Context, Object, Result, ID};
use chrono::NaiveDate;

use super::service;
use super::types::{AvailabilitySlot, MaterializeTimeslotsResponse, Timeslot};
use crate::gql::common::helpers::get_club_id_for_court;
use crate::gql::error::{BookingResultExt, ResultExt};
use crate::state::AppState;
use infra::repos::timeslots;

#[derive(Default)]
pub struct TimeslotQuery;

#[Object]
impl TimeslotQuery {
    /// Availability for one court on one day, including slots not yet materialized
    async fn court_availability(
        &self,
        ctx: &Context<'_>,
        court_id: ID,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>> {
        let state = ctx.data::<AppState>()?;
        let court_id = uuid::Uuid::parse_str(court_id.as_str()).gql_err("Invalid court ID")?;

        service::court_availability(&state.db, court_id, date)
            .await
            .to_gql()
    }

    /// All materialized timeslots for a court
    async fn court_timeslots(&self, ctx: &Context<'_>, court_id: ID) -> Result<Vec<Timeslot>> {
        let state = ctx.data::<AppState>()?;
        let court_id = uuid::Uuid::parse_str(court_id.as_str()).gql_err("Invalid court ID")?;

        let rows = timeslots::list_for_court(&state.db, court_id).await?;
        Ok(rows.into_iter().map(Timeslot::from).collect())
    }
}

#[derive(Default)]
pub struct TimeslotMutation;

#[Object]
impl TimeslotMutation {
    /// Pre-materialize a full day of slots for a court (club owner or admin)
    async fn materialize_timeslots(
        &self,
        ctx: &Context<'_>,
        court_id: ID,
        date: NaiveDate,
    ) -> Result<MaterializeTimeslotsResponse> {
        use crate::auth::permissions::require_club_owner;

        let state = ctx.data::<AppState>()?;
        let court_id = uuid::Uuid::parse_str(court_id.as_str()).gql_err("Invalid court ID")?;

        let club_id = get_club_id_for_court(&state.db, court_id).await?;
        let _owner = require_club_owner(ctx, club_id).await?;

        let day = service::materialize_day(&state.db, court_id, date)
            .await
            .to_gql()?;

        Ok(MaterializeTimeslotsResponse {
            slots: day.slots.into_iter().map(Timeslot::from).collect(),
            created_count: day.created as i32,
        })
    }
}
