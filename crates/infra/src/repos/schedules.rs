use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::ScheduleRow;

/// The single active schedule covering a court on a given weekday, if any.
/// A partial unique index guarantees at most one row matches.
pub async fn active_for_day<'e>(
    executor: impl PgExecutor<'e>,
    court_id: Uuid,
    weekday: i16,
) -> SqlxResult<Option<ScheduleRow>> {
    sqlx::query_as::<_, ScheduleRow>(
        r#"
        SELECT id, court_id, weekday, open_time, close_time, slot_minutes,
               price_override_cents, is_active, created_at, updated_at
        FROM schedules
        WHERE court_id = $1 AND weekday = $2 AND is_active
        "#,
    )
    .bind(court_id)
    .bind(weekday)
    .fetch_optional(executor)
    .await
}

pub async fn list_for_court<'e>(
    executor: impl PgExecutor<'e>,
    court_id: Uuid,
) -> SqlxResult<Vec<ScheduleRow>> {
    sqlx::query_as::<_, ScheduleRow>(
        r#"
        SELECT id, court_id, weekday, open_time, close_time, slot_minutes,
               price_override_cents, is_active, created_at, updated_at
        FROM schedules
        WHERE court_id = $1 AND is_active
        ORDER BY weekday ASC, open_time ASC
        "#,
    )
    .bind(court_id)
    .fetch_all(executor)
    .await
}
