use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::CourtRow;

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<CourtRow>> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        SELECT id, club_id, name, base_price_cents, currency, is_active, created_at, updated_at
        FROM courts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn list_by_club<'e>(
    executor: impl PgExecutor<'e>,
    club_id: Uuid,
) -> SqlxResult<Vec<CourtRow>> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        SELECT id, club_id, name, base_price_cents, currency, is_active, created_at, updated_at
        FROM courts
        WHERE club_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(club_id)
    .fetch_all(executor)
    .await
}
