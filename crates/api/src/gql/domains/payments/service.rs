use uuid::Uuid;

use infra::models::{PaymentRow, ReservationRow, TimeslotRow};
use infra::repos::payments::{CreatePayment, PaymentMethod, PaymentStatus};
use infra::repos::reservations::ReservationStatus;
use infra::repos::timeslots::SlotStatus;
use infra::repos::{payments, reservations, timeslots};

use super::types::SettlementIntent;
use crate::gql::error::BookingError;
use crate::settlement::USDC_DECIMALS;
use crate::state::AppState;

pub struct SettledReservation {
    pub reservation: ReservationRow,
    pub payment: PaymentRow,
    pub timeslot: TimeslotRow,
    /// False when the reservation had already been marked paid.
    pub newly_paid: bool,
}

/// Build the settlement instructions for a PENDING reservation.
///
/// Fiat reservations get a checkout redirect and settle through
/// `confirmReservation` when the provider calls back. USDC reservations get
/// a pending payment row plus the exact transfer the payer's wallet must
/// produce: recipient, mint, and token amount at the configured rate.
pub async fn prepare_settlement(
    state: &AppState,
    reservation_id: Uuid,
    user_id: Uuid,
    is_admin: bool,
) -> Result<SettlementIntent, BookingError> {
    let reservation = reservations::get_by_id(&state.db, reservation_id)
        .await?
        .ok_or(BookingError::NotFound("reservation"))?;

    if reservation.user_id != user_id && !is_admin {
        return Err(BookingError::Forbidden);
    }

    match reservation.status {
        ReservationStatus::Pending => {}
        ReservationStatus::Paid => return Err(BookingError::AlreadyPaid),
        ReservationStatus::Cancelled => {
            return Err(BookingError::InvalidState(
                "reservation is cancelled".to_string(),
            ));
        }
    }

    match reservation.payment_method {
        PaymentMethod::Fiat => Ok(SettlementIntent {
            reservation_id: reservation.id.into(),
            method: reservation.payment_method.into(),
            amount_cents: reservation.total_cents,
            currency: reservation.currency,
            redirect_url: Some(format!(
                "{}/checkout/{}",
                state.fiat_checkout_url(),
                reservation.id
            )),
            payment_id: None,
            reference: None,
            receiver: None,
            usdc_mint: None,
            network: None,
            token_amount_micros: None,
            token_decimals: None,
        }),
        PaymentMethod::Usdc => {
            let settlement = state.settlement().ok_or(BookingError::SettlementDisabled)?;
            let token_amount_micros =
                settlement.cents_to_token_micros(reservation.total_cents as i64);

            let data = CreatePayment {
                reservation_id: reservation.id,
                method: PaymentMethod::Usdc,
                amount_cents: reservation.total_cents,
                currency: reservation.currency.clone(),
                provider: "solana".to_string(),
                provider_ref: Uuid::new_v4().to_string(),
                network: Some(settlement.network().to_string()),
                token_amount_micros: Some(token_amount_micros),
                platform_fee_cents: reservation.platform_fee_cents,
                club_fee_cents: reservation.club_fee_cents,
            };

            let payment = payments::upsert_pending(&state.db, data)
                .await?
                .ok_or(BookingError::AlreadyPaid)?;

            Ok(SettlementIntent {
                reservation_id: reservation.id.into(),
                method: reservation.payment_method.into(),
                amount_cents: reservation.total_cents,
                currency: reservation.currency,
                redirect_url: None,
                payment_id: Some(payment.id.into()),
                reference: payment.provider_ref,
                receiver: Some(settlement.platform_wallet().to_string()),
                usdc_mint: Some(settlement.usdc_mint().to_string()),
                network: payment.network,
                token_amount_micros: payment.token_amount_micros,
                token_decimals: Some(USDC_DECIMALS as i32),
            })
        }
    }
}

/// Verify an on-chain USDC transfer and settle the reservation.
///
/// The side effects run as three strictly ordered, individually atomic
/// steps: confirm the payment, mark the reservation paid, flip the slot to
/// reserved. They are deliberately NOT one transaction; a crash between
/// steps leaves an earlier step committed, and re-running the confirmation
/// completes the rest without doubling any effect.
pub async fn confirm_settlement(
    state: &AppState,
    reservation_id: Uuid,
    signature: &str,
    user_id: Uuid,
    is_admin: bool,
) -> Result<SettledReservation, BookingError> {
    let reservation = reservations::get_by_id(&state.db, reservation_id)
        .await?
        .ok_or(BookingError::NotFound("reservation"))?;

    if reservation.user_id != user_id && !is_admin {
        return Err(BookingError::Forbidden);
    }

    if reservation.status == ReservationStatus::Cancelled {
        return Err(BookingError::InvalidState(
            "reservation is cancelled".to_string(),
        ));
    }

    if reservation.payment_method != PaymentMethod::Usdc {
        return Err(BookingError::InvalidState(
            "reservation is not an on-chain settlement".to_string(),
        ));
    }

    let settlement = state.settlement().ok_or(BookingError::SettlementDisabled)?;

    let payment = payments::get_by_reservation(&state.db, reservation.id)
        .await?
        .ok_or(BookingError::NotFound("payment"))?;

    // Step 1: verify the transfer and confirm the payment. A payment that
    // already confirmed was verified by an earlier run; never verify twice.
    if payment.status != PaymentStatus::Confirmed {
        let expected_micros = payment
            .token_amount_micros
            .unwrap_or_else(|| settlement.cents_to_token_micros(reservation.total_cents as i64));

        settlement.verify_transfer(signature, expected_micros).await?;
        payments::confirm_if_pending(&state.db, payment.id, signature).await?;
    }

    // Step 2: reservation PENDING -> PAID.
    let newly_paid = reservations::mark_paid_if_pending(&state.db, reservation.id).await?;

    let reservation = reservations::get_by_id(&state.db, reservation_id)
        .await?
        .ok_or(BookingError::NotFound("reservation"))?;

    // Step 3: the slot leaves the open pool, but only for a reservation that
    // actually ended up PAID. The hold can die while the network lookup is
    // in flight (user cancel, expiry); reserving the slot for a dead hold
    // would strand it with no live reservation.
    if reservation.status != ReservationStatus::Paid {
        return Err(BookingError::InvalidState(
            "payment is confirmed but the reservation was cancelled".to_string(),
        ));
    }
    timeslots::set_status(&state.db, reservation.timeslot_id, SlotStatus::Reserved).await?;
    let payment = payments::get_by_reservation(&state.db, reservation.id)
        .await?
        .ok_or(BookingError::NotFound("payment"))?;
    let timeslot = timeslots::get_by_id(&state.db, reservation.timeslot_id)
        .await?
        .ok_or(BookingError::NotFound("timeslot"))?;

    Ok(SettledReservation {
        reservation,
        payment,
        timeslot,
        newly_paid,
    })
}
