use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::CommissionRow;

/// The commission config in force right now, or `None` when the platform
/// still runs on the built-in default split.
pub async fn get_active<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<Option<CommissionRow>> {
    sqlx::query_as::<_, CommissionRow>(
        r#"
        SELECT id, platform_fee_bps, club_fee_bps, is_active, effective_from, created_at
        FROM commissions
        WHERE is_active
        ORDER BY effective_from DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(executor)
    .await
}

pub async fn deactivate_all<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<()> {
    sqlx::query("UPDATE commissions SET is_active = false WHERE is_active")
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn insert_active<'e>(
    executor: impl PgExecutor<'e>,
    platform_fee_bps: i32,
    club_fee_bps: i32,
) -> SqlxResult<CommissionRow> {
    sqlx::query_as::<_, CommissionRow>(
        r#"
        INSERT INTO commissions (platform_fee_bps, club_fee_bps, is_active, effective_from)
        VALUES ($1, $2, true, now())
        RETURNING id, platform_fee_bps, club_fee_bps, is_active, effective_from, created_at
        "#,
    )
    .bind(platform_fee_bps)
    .bind(club_fee_bps)
    .fetch_one(executor)
    .await
}

/// Aggregated fee totals over PAID reservations.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct FeeTotals {
    pub reservation_count: i64,
    pub gross_cents: i64,
    pub platform_fee_cents: i64,
    pub club_fee_cents: i64,
}

pub async fn paid_totals<'e>(
    executor: impl PgExecutor<'e>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> SqlxResult<FeeTotals> {
    sqlx::query_as::<_, FeeTotals>(
        r#"
        SELECT COUNT(*)::bigint AS reservation_count,
               COALESCE(SUM(total_cents), 0)::bigint AS gross_cents,
               COALESCE(SUM(platform_fee_cents), 0)::bigint AS platform_fee_cents,
               COALESCE(SUM(club_fee_cents), 0)::bigint AS club_fee_cents
        FROM reservations
        WHERE status = 'paid'
          AND ($1::timestamptz IS NULL OR created_at >= $1)
          AND ($2::timestamptz IS NULL OR created_at < $2)
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_one(executor)
    .await
}

pub async fn paid_totals_for_club<'e>(
    executor: impl PgExecutor<'e>,
    club_id: Uuid,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> SqlxResult<FeeTotals> {
    sqlx::query_as::<_, FeeTotals>(
        r#"
        SELECT COUNT(*)::bigint AS reservation_count,
               COALESCE(SUM(total_cents), 0)::bigint AS gross_cents,
               COALESCE(SUM(platform_fee_cents), 0)::bigint AS platform_fee_cents,
               COALESCE(SUM(club_fee_cents), 0)::bigint AS club_fee_cents
        FROM reservations
        WHERE status = 'paid' AND club_id = $3
          AND ($1::timestamptz IS NULL OR created_at >= $1)
          AND ($2::timestamptz IS NULL OR created_at < $2)
        "#,
    )
    .bind(from)
    .bind(to)
    .bind(club_id)
    .fetch_one(executor)
    .await
}
