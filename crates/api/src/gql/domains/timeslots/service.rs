use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use infra::models::TimeslotRow;
use infra::repos::reservations::ReservationStatus;
use infra::repos::timeslots::{NewTimeslot, SlotStatus};
use infra::repos::{courts, reservations, schedules, timeslots};
use infra::slots;

use super::types::{AvailabilitySlot, AvailabilityStatus};
use crate::gql::error::BookingError;

/// Result of materializing a court's schedule for one day.
pub struct MaterializedDay {
    pub slots: Vec<TimeslotRow>,
    pub created: usize,
}

/// Compose a court's availability for one day: the schedule grid, overlaid
/// with materialized rows and live reservation holds.
///
/// A court without an active schedule for that weekday yields only whatever
/// rows were already materialized (usually none).
pub async fn court_availability(
    db: &sqlx::PgPool,
    court_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<AvailabilitySlot>, BookingError> {
    let court = courts::get_by_id(db, court_id)
        .await?
        .ok_or(BookingError::NotFound("court"))?;

    let schedule = schedules::active_for_day(db, court_id, slots::weekday_index(date)).await?;
    let candidates = match &schedule {
        Some(s) => slots::day_candidates(s, court.base_price_cents),
        None => Vec::new(),
    };

    let rows = timeslots::list_for_court_date(db, court_id, date).await?;
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let holds: HashMap<Uuid, ReservationStatus> = reservations::live_for_timeslots(db, &ids)
        .await?
        .into_iter()
        .map(|r| (r.timeslot_id, r.status))
        .collect();

    let mut by_start: HashMap<NaiveTime, TimeslotRow> =
        rows.into_iter().map(|r| (r.start_time, r)).collect();

    let mut out = Vec::with_capacity(candidates.len());
    for cand in &candidates {
        match by_start.remove(&cand.start_time) {
            Some(row) => {
                let hold = holds.get(&row.id);
                out.push(slot_view(&row, hold));
            }
            None => out.push(AvailabilitySlot {
                court_id: court_id.into(),
                date,
                start_time: cand.start_time,
                end_time: cand.end_time,
                price_cents: cand.price_cents,
                currency: court.currency.clone(),
                status: AvailabilityStatus::Available,
                timeslot_id: None,
            }),
        }
    }

    // Rows that fall outside the current grid (the schedule changed after
    // they were materialized) still surface.
    for row in by_start.into_values() {
        let hold = holds.get(&row.id);
        out.push(slot_view(&row, hold));
    }

    out.sort_by_key(|s| s.start_time);
    Ok(out)
}

/// Materialize every slot of a court's schedule for one day. Safe to repeat:
/// slots that already exist are left untouched.
pub async fn materialize_day(
    db: &sqlx::PgPool,
    court_id: Uuid,
    date: NaiveDate,
) -> Result<MaterializedDay, BookingError> {
    let court = courts::get_by_id(db, court_id)
        .await?
        .ok_or(BookingError::NotFound("court"))?;

    let schedule = schedules::active_for_day(db, court_id, slots::weekday_index(date))
        .await?
        .ok_or(BookingError::NoScheduleForDay)?;

    let mut created = 0usize;
    for cand in slots::day_candidates(&schedule, court.base_price_cents) {
        let new_slot = NewTimeslot {
            court_id,
            club_id: court.club_id,
            date,
            start_time: cand.start_time,
            end_time: cand.end_time,
            price_cents: cand.price_cents,
            currency: court.currency.clone(),
        };
        if timeslots::insert_if_absent(db, &new_slot).await?.is_some() {
            created += 1;
        }
    }

    let slots = timeslots::list_for_court_date(db, court_id, date).await?;
    Ok(MaterializedDay { slots, created })
}

fn slot_view(row: &TimeslotRow, hold: Option<&ReservationStatus>) -> AvailabilitySlot {
    let status = if row.status == SlotStatus::Reserved {
        AvailabilityStatus::Reserved
    } else {
        match hold {
            // A paid reservation wins even before the row status catches up
            Some(ReservationStatus::Paid) => AvailabilityStatus::Reserved,
            Some(_) => AvailabilityStatus::Pending,
            None => AvailabilityStatus::Available,
        }
    };

    AvailabilitySlot {
        court_id: row.court_id.into(),
        date: row.date,
        start_time: row.start_time,
        end_time: row.end_time,
        price_cents: row.price_cents,
        currency: row.currency.clone(),
        status,
        timeslot_id: Some(row.id.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(status: SlotStatus) -> TimeslotRow {
        TimeslotRow {
            id: Uuid::new_v4(),
            court_id: Uuid::new_v4(),
            club_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            price_cents: 50_000,
            currency: "MXN".to_string(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn free_row_reads_available() {
        let view = slot_view(&row(SlotStatus::Available), None);
        assert_eq!(view.status, AvailabilityStatus::Available);
        assert!(view.timeslot_id.is_some());
    }

    #[test]
    fn pending_hold_reads_pending() {
        let view = slot_view(&row(SlotStatus::Available), Some(&ReservationStatus::Pending));
        assert_eq!(view.status, AvailabilityStatus::Pending);
    }

    #[test]
    fn paid_hold_reads_reserved_before_row_flips() {
        let view = slot_view(&row(SlotStatus::Available), Some(&ReservationStatus::Paid));
        assert_eq!(view.status, AvailabilityStatus::Reserved);
    }

    #[test]
    fn reserved_row_wins_over_hold_state() {
        let view = slot_view(&row(SlotStatus::Reserved), None);
        assert_eq!(view.status, AvailabilityStatus::Reserved);
    }
}
