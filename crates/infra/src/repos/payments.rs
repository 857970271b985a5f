use std::str::FromStr;

use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::PaymentRow;
use crate::pagination::LimitOffset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, serde::Serialize, serde::Deserialize)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Confirmed => "confirmed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "confirmed" => Ok(PaymentStatus::Confirmed),
            _ => Err(format!("Unknown payment status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, serde::Serialize, serde::Deserialize)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Fiat,
    Usdc,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Fiat => "fiat",
            PaymentMethod::Usdc => "usdc",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fiat" => Ok(PaymentMethod::Fiat),
            "usdc" => Ok(PaymentMethod::Usdc),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub reservation_id: Uuid,
    pub method: PaymentMethod,
    pub amount_cents: i32,
    pub currency: String,
    pub provider: String,
    pub provider_ref: String,
    pub network: Option<String>,
    pub token_amount_micros: Option<i64>,
    pub platform_fee_cents: i32,
    pub club_fee_cents: i32,
}

/// One payment row per reservation. Re-preparing refreshes the pending row
/// (new reference, recomputed amount) but never touches a confirmed one;
/// `None` signals the payment has already been confirmed.
pub async fn upsert_pending<'e>(
    executor: impl PgExecutor<'e>,
    data: CreatePayment,
) -> SqlxResult<Option<PaymentRow>> {
    sqlx::query_as::<_, PaymentRow>(
        r#"
        INSERT INTO payments (reservation_id, method, amount_cents, currency, provider,
                              provider_ref, network, token_amount_micros,
                              platform_fee_cents, club_fee_cents)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (reservation_id) DO UPDATE
            SET provider_ref = EXCLUDED.provider_ref,
                amount_cents = EXCLUDED.amount_cents,
                token_amount_micros = EXCLUDED.token_amount_micros,
                network = EXCLUDED.network,
                updated_at = now()
            WHERE payments.status = 'pending'
        RETURNING id, reservation_id, method, amount_cents, currency, provider, provider_ref,
                  network, token_amount_micros, platform_fee_cents, club_fee_cents, status,
                  created_at, updated_at
        "#,
    )
    .bind(data.reservation_id)
    .bind(data.method)
    .bind(data.amount_cents)
    .bind(&data.currency)
    .bind(&data.provider)
    .bind(&data.provider_ref)
    .bind(&data.network)
    .bind(data.token_amount_micros)
    .bind(data.platform_fee_cents)
    .bind(data.club_fee_cents)
    .fetch_optional(executor)
    .await
}

pub async fn get_by_reservation<'e>(
    executor: impl PgExecutor<'e>,
    reservation_id: Uuid,
) -> SqlxResult<Option<PaymentRow>> {
    sqlx::query_as::<_, PaymentRow>(
        r#"
        SELECT id, reservation_id, method, amount_cents, currency, provider, provider_ref,
               network, token_amount_micros, platform_fee_cents, club_fee_cents, status,
               created_at, updated_at
        FROM payments
        WHERE reservation_id = $1
        "#,
    )
    .bind(reservation_id)
    .fetch_optional(executor)
    .await
}

/// Row-locked read for transactions that must not race `confirm_if_pending`:
/// the lock makes the confirmation wait until the caller commits.
pub async fn get_by_reservation_for_update<'e>(
    executor: impl PgExecutor<'e>,
    reservation_id: Uuid,
) -> SqlxResult<Option<PaymentRow>> {
    sqlx::query_as::<_, PaymentRow>(
        r#"
        SELECT id, reservation_id, method, amount_cents, currency, provider, provider_ref,
               network, token_amount_micros, platform_fee_cents, club_fee_cents, status,
               created_at, updated_at
        FROM payments
        WHERE reservation_id = $1
        FOR UPDATE
        "#,
    )
    .bind(reservation_id)
    .fetch_optional(executor)
    .await
}

/// PENDING -> CONFIRMED, recording the on-chain reference. A payment that
/// already confirmed keeps its original reference; the update is a no-op
/// and the sequence stays idempotent.
pub async fn confirm_if_pending<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    provider_ref: &str,
) -> SqlxResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE payments
        SET status = 'confirmed', provider_ref = $2, updated_at = now()
        WHERE id = $1 AND status = 'pending'
        "#,
    )
    .bind(id)
    .bind(provider_ref)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    page: LimitOffset,
) -> SqlxResult<Vec<PaymentRow>> {
    sqlx::query_as::<_, PaymentRow>(
        r#"
        SELECT id, reservation_id, method, amount_cents, currency, provider, provider_ref,
               network, token_amount_micros, platform_fee_cents, club_fee_cents, status,
               created_at, updated_at
        FROM payments
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(executor)
    .await
}
