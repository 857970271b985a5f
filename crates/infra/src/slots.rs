use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::models::ScheduleRow;

/// A bookable slot derived from a schedule, before any row exists for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCandidate {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub price_cents: i32,
}

/// Weekday index used by the schedules table: 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

/// Generate the candidate grid for one schedule day.
///
/// Slots step from `open_time` in `slot_minutes` increments and a slot is
/// only emitted when it fits entirely before `close_time`; a trailing
/// partial window is dropped. The stored price is the schedule override
/// when present, otherwise the court base price. Inverted windows and
/// non-positive slot lengths yield an empty grid.
pub fn day_candidates(schedule: &ScheduleRow, base_price_cents: i32) -> Vec<SlotCandidate> {
    let price_cents = schedule.price_override_cents.unwrap_or(base_price_cents);
    grid(
        schedule.open_time,
        schedule.close_time,
        schedule.slot_minutes,
        price_cents,
    )
}

fn grid(open: NaiveTime, close: NaiveTime, slot_minutes: i32, price_cents: i32) -> Vec<SlotCandidate> {
    if slot_minutes <= 0 {
        return Vec::new();
    }

    // Work in whole minutes from midnight so stepping can never wrap the clock.
    let open_m = (open.num_seconds_from_midnight() / 60) as i32;
    let close_m = (close.num_seconds_from_midnight() / 60) as i32;

    let mut candidates = Vec::new();
    let mut cur = open_m;
    while cur + slot_minutes <= close_m {
        let (Some(start), Some(end)) = (minute_of_day(cur), minute_of_day(cur + slot_minutes))
        else {
            break;
        };
        candidates.push(SlotCandidate {
            start_time: start,
            end_time: end,
            price_cents,
        });
        cur += slot_minutes;
    }
    candidates
}

fn minute_of_day(minutes: i32) -> Option<NaiveTime> {
    NaiveTime::from_num_seconds_from_midnight_opt(minutes as u32 * 60, 0)
}
