use async_graphql::{Enum, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use infra::models::TimeslotRow;
use infra::repos::timeslots::SlotStatus;

/// What a bookable slot looks like to a caller, holds included.
#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum AvailabilityStatus {
    Available,
    Pending,
    Reserved,
}

impl From<SlotStatus> for AvailabilityStatus {
    fn from(status: SlotStatus) -> Self {
        match status {
            SlotStatus::Available => AvailabilityStatus::Available,
            SlotStatus::Reserved => AvailabilityStatus::Reserved,
        }
    }
}

/// A materialized timeslot row.
#[derive(SimpleObject, Clone)]
pub struct Timeslot {
    pub id: ID,
    pub court_id: ID,
    pub club_id: ID,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub price_cents: i32,
    pub currency: String,
    pub status: AvailabilityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TimeslotRow> for Timeslot {
    fn from(row: TimeslotRow) -> Self {
        Self {
            id: row.id.into(),
            court_id: row.court_id.into(),
            club_id: row.club_id.into(),
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            price_cents: row.price_cents,
            currency: row.currency,
            status: row.status.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// One entry in a court's availability for a day. Slots that were never
/// materialized carry no timeslot_id.
#[derive(SimpleObject, Clone)]
pub struct AvailabilitySlot {
    pub court_id: ID,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub price_cents: i32,
    pub currency: String,
    pub status: AvailabilityStatus,
    pub timeslot_id: Option<ID>,
}

#[derive(SimpleObject)]
pub struct MaterializeTimeslotsResponse {
    pub slots: Vec<Timeslot>,
    pub created_count: i32,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum AvailabilityEventType {
    SlotHeld,
    SlotReleased,
    SlotReserved,
}

#[derive(SimpleObject, Clone)]
pub struct AvailabilityEvent {
    pub event_type: AvailabilityEventType,
    pub court_id: ID,
    pub club_id: ID,
    pub timeslot_id: ID,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub status: AvailabilityStatus,
    pub timestamp: DateTime<Utc>,
}

impl AvailabilityEvent {
    /// The event status reflects the hold, not the row: a held slot stays
    /// 'available' in the table until payment confirms.
    pub fn from_slot(event_type: AvailabilityEventType, slot: &TimeslotRow) -> Self {
        let status = match event_type {
            AvailabilityEventType::SlotHeld => AvailabilityStatus::Pending,
            AvailabilityEventType::SlotReleased => AvailabilityStatus::Available,
            AvailabilityEventType::SlotReserved => AvailabilityStatus::Reserved,
        };

        Self {
            event_type,
            court_id: slot.court_id.into(),
            club_id: slot.club_id.into(),
            timeslot_id: slot.id.into(),
            date: slot.date,
            start_time: slot.start_time,
            status,
            timestamp: Utc::now(),
        }
    }
}
