use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::TimeslotRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, serde::Serialize, serde::Deserialize)]
#[sqlx(type_name = "slot_status", rename_all = "snake_case")]
pub enum SlotStatus {
    Available,
    Reserved,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "available",
            SlotStatus::Reserved => "reserved",
        }
    }
}

impl FromStr for SlotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(SlotStatus::Available),
            "reserved" => Ok(SlotStatus::Reserved),
            _ => Err(format!("Unknown slot status: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTimeslot {
    pub court_id: Uuid,
    pub club_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub price_cents: i32,
    pub currency: String,
}

/// Idempotent find-or-create on the natural key (court_id, date, start_time).
///
/// Concurrent callers converge on a single row; when the row already exists
/// its stored price and status win and the insert collapses into a read.
pub async fn materialize<'e>(
    executor: impl PgExecutor<'e>,
    slot: &NewTimeslot,
) -> SqlxResult<TimeslotRow> {
    sqlx::query_as::<_, TimeslotRow>(
        r#"
        INSERT INTO timeslots (court_id, club_id, date, start_time, end_time, price_cents, currency)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (court_id, date, start_time)
            DO UPDATE SET updated_at = now()
        RETURNING id, court_id, club_id, date, start_time, end_time, price_cents, currency, status, created_at, updated_at
        "#,
    )
    .bind(slot.court_id)
    .bind(slot.club_id)
    .bind(slot.date)
    .bind(slot.start_time)
    .bind(slot.end_time)
    .bind(slot.price_cents)
    .bind(&slot.currency)
    .fetch_one(executor)
    .await
}

/// Insert a slot only when no row occupies its natural key yet. Returns
/// `None` when the key was already taken. Used by bulk pre-materialization.
pub async fn insert_if_absent<'e>(
    executor: impl PgExecutor<'e>,
    slot: &NewTimeslot,
) -> SqlxResult<Option<TimeslotRow>> {
    sqlx::query_as::<_, TimeslotRow>(
        r#"
        INSERT INTO timeslots (court_id, club_id, date, start_time, end_time, price_cents, currency)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (court_id, date, start_time) DO NOTHING
        RETURNING id, court_id, club_id, date, start_time, end_time, price_cents, currency, status, created_at, updated_at
        "#,
    )
    .bind(slot.court_id)
    .bind(slot.club_id)
    .bind(slot.date)
    .bind(slot.start_time)
    .bind(slot.end_time)
    .bind(slot.price_cents)
    .bind(&slot.currency)
    .fetch_optional(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<TimeslotRow>> {
    sqlx::query_as::<_, TimeslotRow>(
        r#"
        SELECT id, court_id, club_id, date, start_time, end_time, price_cents, currency, status, created_at, updated_at
        FROM timeslots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn list_for_court_date<'e>(
    executor: impl PgExecutor<'e>,
    court_id: Uuid,
    date: NaiveDate,
) -> SqlxResult<Vec<TimeslotRow>> {
    sqlx::query_as::<_, TimeslotRow>(
        r#"
        SELECT id, court_id, club_id, date, start_time, end_time, price_cents, currency, status, created_at, updated_at
        FROM timeslots
        WHERE court_id = $1 AND date = $2
        ORDER BY start_time ASC
        "#,
    )
    .bind(court_id)
    .bind(date)
    .fetch_all(executor)
    .await
}

pub async fn list_for_court<'e>(
    executor: impl PgExecutor<'e>,
    court_id: Uuid,
) -> SqlxResult<Vec<TimeslotRow>> {
    sqlx::query_as::<_, TimeslotRow>(
        r#"
        SELECT id, court_id, club_id, date, start_time, end_time, price_cents, currency, status, created_at, updated_at
        FROM timeslots
        WHERE court_id = $1
        ORDER BY date ASC, start_time ASC
        "#,
    )
    .bind(court_id)
    .fetch_all(executor)
    .await
}

pub async fn set_status<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    status: SlotStatus,
) -> SqlxResult<()> {
    sqlx::query("UPDATE timeslots SET status = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(executor)
        .await?;
    Ok(())
}
