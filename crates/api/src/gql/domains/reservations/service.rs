use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use infra::fees;
use infra::models::{ReservationRow, TimeslotRow};
use infra::repos::payments::{PaymentMethod, PaymentStatus};
use infra::repos::reservations::{CreateReservation, ReservationStatus};
use infra::repos::timeslots::{NewTimeslot, SlotStatus};
use infra::repos::{commissions, courts, payments, reservations, schedules, timeslots};
use infra::slots;

use crate::gql::error::{claim_error, BookingError};

/// How the caller names the slot they want: an existing row, or a position
/// on the schedule grid that has never been materialized.
pub enum TimeslotRef {
    ById(Uuid),
    Virtual {
        court_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
    },
}

pub struct CreateReservationParams {
    pub user_id: Uuid,
    pub slot: TimeslotRef,
    pub payment_method: PaymentMethod,
}

#[derive(Debug)]
pub struct CreatedReservation {
    pub reservation: ReservationRow,
    pub timeslot: TimeslotRow,
}

#[derive(Debug)]
pub struct ConfirmOutcome {
    pub reservation: ReservationRow,
    pub timeslot: TimeslotRow,
    /// False when the reservation was already paid and nothing changed.
    pub newly_paid: bool,
}

#[derive(Debug)]
pub struct CancelOutcome {
    pub reservation: ReservationRow,
    pub timeslot: TimeslotRow,
    /// False when the reservation was already cancelled and nothing changed.
    pub newly_cancelled: bool,
}

/// Place a PENDING hold on a slot, materializing it first if the caller
/// booked straight off the schedule grid.
///
/// The slot claim is the insert itself: a partial unique index allows at
/// most one live reservation per timeslot, so the loser of a booking race
/// gets `SlotUnavailable` no matter how the requests interleave. The fee
/// split is frozen onto the row from the commission config active right now.
///
/// The caller (resolver) is responsible for:
/// - Authentication / authorization
/// - Parsing IDs from GraphQL input
/// - Converting the result to GraphQL types
/// - Publishing subscription events
pub async fn create_reservation(
    pool: &sqlx::PgPool,
    params: CreateReservationParams,
) -> Result<CreatedReservation, BookingError> {
    let mut tx = pool.begin().await?;

    let slot = resolve_slot(&mut tx, params.slot).await?;
    if slot.status != SlotStatus::Available {
        return Err(BookingError::SlotUnavailable);
    }

    let commission = commissions::get_active(&mut *tx).await?;
    let (commission_id, platform_bps) = match &commission {
        Some(c) => (Some(c.id), c.platform_fee_bps),
        None => (None, fees::DEFAULT_PLATFORM_FEE_BPS),
    };
    let (platform_fee, club_fee) = fees::split(slot.price_cents as i64, platform_bps);

    let data = CreateReservation {
        user_id: params.user_id,
        club_id: slot.club_id,
        court_id: slot.court_id,
        timeslot_id: slot.id,
        commission_id,
        total_cents: slot.price_cents,
        currency: slot.currency.clone(),
        payment_method: params.payment_method,
        platform_fee_cents: platform_fee as i32,
        club_fee_cents: club_fee as i32,
    };

    let reservation = reservations::create(&mut *tx, data)
        .await
        .map_err(claim_error)?;

    tx.commit().await?;

    Ok(CreatedReservation {
        reservation,
        timeslot: slot,
    })
}

/// Mark a fiat reservation PAID and flip its slot to reserved, atomically.
///
/// Re-confirming a paid reservation is a no-op; USDC reservations must go
/// through settlement confirmation instead, where the transfer is verified
/// on-chain first.
pub async fn confirm_reservation(
    pool: &sqlx::PgPool,
    reservation_id: Uuid,
    user_id: Uuid,
    is_admin: bool,
) -> Result<ConfirmOutcome, BookingError> {
    let mut tx = pool.begin().await?;

    let mut reservation = reservations::get_by_id_for_update(&mut *tx, reservation_id)
        .await?
        .ok_or(BookingError::NotFound("reservation"))?;

    if reservation.user_id != user_id && !is_admin {
        return Err(BookingError::Forbidden);
    }

    match reservation.status {
        ReservationStatus::Paid => {
            let timeslot = timeslots::get_by_id(&mut *tx, reservation.timeslot_id)
                .await?
                .ok_or(BookingError::NotFound("timeslot"))?;
            tx.commit().await?;
            return Ok(ConfirmOutcome {
                reservation,
                timeslot,
                newly_paid: false,
            });
        }
        ReservationStatus::Cancelled => {
            return Err(BookingError::InvalidState(
                "reservation is cancelled".to_string(),
            ));
        }
        ReservationStatus::Pending => {}
    }

    if reservation.payment_method == PaymentMethod::Usdc {
        return Err(BookingError::InvalidState(
            "use settlement confirmation for on-chain payments".to_string(),
        ));
    }

    reservations::set_status(&mut *tx, reservation.id, ReservationStatus::Paid).await?;
    timeslots::set_status(&mut *tx, reservation.timeslot_id, SlotStatus::Reserved).await?;

    let timeslot = timeslots::get_by_id(&mut *tx, reservation.timeslot_id)
        .await?
        .ok_or(BookingError::NotFound("timeslot"))?;

    tx.commit().await?;

    reservation.status = ReservationStatus::Paid;
    Ok(ConfirmOutcome {
        reservation,
        timeslot,
        newly_paid: true,
    })
}

/// Cancel a PENDING reservation, releasing its slot for rebooking.
///
/// Cancellation is owner-only. The cancelled row is kept for history;
/// releasing the hold is nothing more than the status change, since only
/// live rows occupy the claim index. Paid reservations cannot be cancelled
/// here, and neither can a reservation whose payment has already been
/// verified: from that point the settlement sequence owns the row and will
/// finish marking it paid.
pub async fn cancel_reservation(
    pool: &sqlx::PgPool,
    reservation_id: Uuid,
    user_id: Uuid,
) -> Result<CancelOutcome, BookingError> {
    let mut tx = pool.begin().await?;

    let mut reservation = reservations::get_by_id_for_update(&mut *tx, reservation_id)
        .await?
        .ok_or(BookingError::NotFound("reservation"))?;

    if reservation.user_id != user_id {
        return Err(BookingError::Forbidden);
    }

    let timeslot = timeslots::get_by_id(&mut *tx, reservation.timeslot_id)
        .await?
        .ok_or(BookingError::NotFound("timeslot"))?;

    match reservation.status {
        ReservationStatus::Cancelled => {
            tx.commit().await?;
            return Ok(CancelOutcome {
                reservation,
                timeslot,
                newly_cancelled: false,
            });
        }
        ReservationStatus::Paid => {
            return Err(BookingError::AlreadyPaid);
        }
        ReservationStatus::Pending => {}
    }

    // Locking the payment row serializes this against settlement
    // confirmation: whichever commits first, the other sees its outcome.
    if let Some(payment) =
        payments::get_by_reservation_for_update(&mut *tx, reservation.id).await?
    {
        if payment.status == PaymentStatus::Confirmed {
            return Err(BookingError::InvalidState(
                "payment is already confirmed".to_string(),
            ));
        }
    }

    reservations::set_status(&mut *tx, reservation.id, ReservationStatus::Cancelled).await?;
    tx.commit().await?;

    reservation.status = ReservationStatus::Cancelled;
    Ok(CancelOutcome {
        reservation,
        timeslot,
        newly_cancelled: true,
    })
}

/// TTL path for the background sweeper: cancel a reservation only if it is
/// still PENDING and settlement has not confirmed a payment for it in the
/// meantime. Returns None when someone else won the race.
pub async fn expire_reservation(
    pool: &sqlx::PgPool,
    reservation_id: Uuid,
) -> Result<Option<ReservationRow>, BookingError> {
    let mut tx = pool.begin().await?;

    let mut reservation = match reservations::get_by_id_for_update(&mut *tx, reservation_id).await?
    {
        Some(row) => row,
        None => return Ok(None),
    };

    if reservation.status != ReservationStatus::Pending {
        return Ok(None);
    }

    // A confirmed payment means the settlement sequence is mid-flight;
    // leave the row for it to finish.
    if let Some(payment) =
        payments::get_by_reservation_for_update(&mut *tx, reservation.id).await?
    {
        if payment.status == PaymentStatus::Confirmed {
            return Ok(None);
        }
    }

    reservations::set_status(&mut *tx, reservation.id, ReservationStatus::Cancelled).await?;
    tx.commit().await?;

    reservation.status = ReservationStatus::Cancelled;
    Ok(Some(reservation))
}

/// Resolve a slot reference to a concrete row. A virtual reference must
/// match a position the active schedule produces for that day; the matching
/// slot is materialized on the spot (find-or-create, so a stored row keeps
/// its original price even if the schedule moved since).
async fn resolve_slot(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    slot: TimeslotRef,
) -> Result<TimeslotRow, BookingError> {
    match slot {
        TimeslotRef::ById(id) => timeslots::get_by_id(&mut **tx, id)
            .await?
            .ok_or(BookingError::NotFound("timeslot")),
        TimeslotRef::Virtual {
            court_id,
            date,
            start_time,
        } => {
            let court = courts::get_by_id(&mut **tx, court_id)
                .await?
                .ok_or(BookingError::NotFound("court"))?;

            let schedule = schedules::active_for_day(&mut **tx, court_id, slots::weekday_index(date))
                .await?
                .ok_or(BookingError::NoScheduleForDay)?;

            let candidate = slots::day_candidates(&schedule, court.base_price_cents)
                .into_iter()
                .find(|c| c.start_time == start_time)
                .ok_or(BookingError::NotFound("timeslot"))?;

            let new_slot = NewTimeslot {
                court_id,
                club_id: court.club_id,
                date,
                start_time: candidate.start_time,
                end_time: candidate.end_time,
                price_cents: candidate.price_cents,
                currency: court.currency.clone(),
            };

            let row = timeslots::materialize(&mut **tx, &new_slot).await?;
            Ok(row)
        }
    }
}
