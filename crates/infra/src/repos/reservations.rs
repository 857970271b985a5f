use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::ReservationRow;
use crate::repos::payments::PaymentMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, serde::Serialize, serde::Deserialize)]
#[sqlx(type_name = "reservation_status", rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Paid,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Paid => "paid",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReservationStatus::Pending),
            "paid" => Ok(ReservationStatus::Paid),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            _ => Err(format!("Unknown reservation status: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateReservation {
    pub user_id: Uuid,
    pub club_id: Uuid,
    pub court_id: Uuid,
    pub timeslot_id: Uuid,
    pub commission_id: Option<Uuid>,
    pub total_cents: i32,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub platform_fee_cents: i32,
    pub club_fee_cents: i32,
}

/// Insert a PENDING reservation. The partial unique index on live
/// reservations per timeslot turns a lost booking race into a unique
/// violation, which the caller maps to a domain error.
pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateReservation,
) -> SqlxResult<ReservationRow> {
    sqlx::query_as::<_, ReservationRow>(
        r#"
        INSERT INTO reservations (user_id, club_id, court_id, timeslot_id, commission_id,
                                  total_cents, currency, payment_method,
                                  platform_fee_cents, club_fee_cents)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, user_id, club_id, court_id, timeslot_id, commission_id, total_cents,
                  currency, payment_method, platform_fee_cents, club_fee_cents, status,
                  created_at, updated_at
        "#,
    )
    .bind(data.user_id)
    .bind(data.club_id)
    .bind(data.court_id)
    .bind(data.timeslot_id)
    .bind(data.commission_id)
    .bind(data.total_cents)
    .bind(&data.currency)
    .bind(data.payment_method)
    .bind(data.platform_fee_cents)
    .bind(data.club_fee_cents)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<ReservationRow>> {
    sqlx::query_as::<_, ReservationRow>(
        r#"
        SELECT id, user_id, club_id, court_id, timeslot_id, commission_id, total_cents,
               currency, payment_method, platform_fee_cents, club_fee_cents, status,
               created_at, updated_at
        FROM reservations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Row-locked load for state transitions; must run inside a transaction.
pub async fn get_by_id_for_update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<ReservationRow>> {
    sqlx::query_as::<_, ReservationRow>(
        r#"
        SELECT id, user_id, club_id, court_id, timeslot_id, commission_id, total_cents,
               currency, payment_method, platform_fee_cents, club_fee_cents, status,
               created_at, updated_at
        FROM reservations
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn list_for_user<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
) -> SqlxResult<Vec<ReservationRow>> {
    sqlx::query_as::<_, ReservationRow>(
        r#"
        SELECT id, user_id, club_id, court_id, timeslot_id, commission_id, total_cents,
               currency, payment_method, platform_fee_cents, club_fee_cents, status,
               created_at, updated_at
        FROM reservations
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub async fn set_status<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    status: ReservationStatus,
) -> SqlxResult<()> {
    sqlx::query("UPDATE reservations SET status = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(executor)
        .await?;
    Ok(())
}

/// PENDING -> PAID, skipping rows that already left PENDING. Individually
/// atomic so the settlement sequence can re-run it safely.
pub async fn mark_paid_if_pending<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query(
        "UPDATE reservations SET status = 'paid', updated_at = now() WHERE id = $1 AND status = 'pending'",
    )
    .bind(id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Live (pending or paid) reservations holding any of the given slots.
/// Feeds the availability overlay.
pub async fn live_for_timeslots<'e>(
    executor: impl PgExecutor<'e>,
    timeslot_ids: &[Uuid],
) -> SqlxResult<Vec<ReservationRow>> {
    sqlx::query_as::<_, ReservationRow>(
        r#"
        SELECT id, user_id, club_id, court_id, timeslot_id, commission_id, total_cents,
               currency, payment_method, platform_fee_cents, club_fee_cents, status,
               created_at, updated_at
        FROM reservations
        WHERE timeslot_id = ANY($1::uuid[]) AND status IN ('pending', 'paid')
        "#,
    )
    .bind(timeslot_ids)
    .fetch_all(executor)
    .await
}

/// PENDING reservations created before the cutoff whose payment was never
/// confirmed. Rows with a confirmed payment are mid-settlement and must not
/// be reaped.
pub async fn list_stale_pending<'e>(
    executor: impl PgExecutor<'e>,
    cutoff: DateTime<Utc>,
) -> SqlxResult<Vec<ReservationRow>> {
    sqlx::query_as::<_, ReservationRow>(
        r#"
        SELECT r.id, r.user_id, r.club_id, r.court_id, r.timeslot_id, r.commission_id,
               r.total_cents, r.currency, r.payment_method, r.platform_fee_cents,
               r.club_fee_cents, r.status, r.created_at, r.updated_at
        FROM reservations r
        LEFT JOIN payments p ON p.reservation_id = r.id AND p.status = 'confirmed'
        WHERE r.status = 'pending' AND r.created_at < $1 AND p.id IS NULL
        ORDER BY r.created_at ASC
        "#,
    )
    .bind(cutoff)
    .fetch_all(executor)
    .await
}
