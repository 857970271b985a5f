use crate::repos::payments::{PaymentMethod, PaymentStatus};
use crate::repos::reservations::ReservationStatus;
use crate::repos::timeslots::SlotStatus;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ClubRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CourtRow {
    pub id: Uuid,
    pub club_id: Uuid,
    pub name: String,
    pub base_price_cents: i32,
    pub currency: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Weekly opening-hours row for a single court and weekday (0 = Sunday).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub id: Uuid,
    pub court_id: Uuid,
    pub weekday: i16,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub slot_minutes: i32,
    pub price_override_cents: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TimeslotRow {
    pub id: Uuid,
    pub court_id: Uuid,
    pub club_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub price_cents: i32,
    pub currency: String,
    pub status: SlotStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ReservationRow {
    pub id: Uuid,
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
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PaymentRow {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub method: PaymentMethod,
    pub amount_cents: i32,
    pub currency: String,
    pub provider: String,
    pub provider_ref: Option<String>,
    pub network: Option<String>,
    pub token_amount_micros: Option<i64>,
    pub platform_fee_cents: i32,
    pub club_fee_cents: i32,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CommissionRow {
    pub id: Uuid,
    pub platform_fee_bps: i32,
    pub club_fee_bps: i32,
    pub is_active: bool,
    pub effective_from: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
