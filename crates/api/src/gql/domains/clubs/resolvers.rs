use async_graphql::{Context, Object, Result, ID};

use super::types::{Club, Court};
use crate::gql::error::{BookingError, BookingResultExt, ResultExt};
use crate::state::AppState;
use infra::repos::{clubs, courts};

#[derive(Default)]
pub struct ClubQuery;

#[Object]
impl ClubQuery {
    async fn clubs(&self, ctx: &Context<'_>) -> Result<Vec<Club>> {
        let state = ctx.data::<AppState>()?;
        let rows = clubs::list(&state.db).await?;
        Ok(rows.into_iter().map(Club::from).collect())
    }

    async fn club(&self, ctx: &Context<'_>, id: ID) -> Result<Club> {
        let state = ctx.data::<AppState>()?;
        let club_id = uuid::Uuid::parse_str(id.as_str()).gql_err("Invalid club ID")?;

        let row = clubs::get_by_id(&state.db, club_id)
            .await
            .map_err(BookingError::from)
            .and_then(|row| row.ok_or(BookingError::NotFound("club")))
            .to_gql()?;

        Ok(row.into())
    }

    /// Get all courts for a club
    async fn courts(&self, ctx: &Context<'_>, club_id: ID) -> Result<Vec<Court>> {
        let state = ctx.data::<AppState>()?;
        let club_id = uuid::Uuid::parse_str(club_id.as_str()).gql_err("Invalid club ID")?;

        let rows = courts::list_by_club(&state.db, club_id).await?;
        Ok(rows.into_iter().map(Court::from).collect())
    }
}
