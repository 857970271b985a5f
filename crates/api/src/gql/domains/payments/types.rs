use async_graphql::{Enum, SimpleObject, ID};
use chrono::{DateTime, Utc};

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub enum PaymentMethod {
    Fiat,
    Usdc,
}

impl From<infra::repos::payments::PaymentMethod> for PaymentMethod {
    fn from(method: infra::repos::payments::PaymentMethod) -> Self {
        match method {
            infra::repos::payments::PaymentMethod::Fiat => PaymentMethod::Fiat,
            infra::repos::payments::PaymentMethod::Usdc => PaymentMethod::Usdc,
        }
    }
}

impl From<PaymentMethod> for infra::repos::payments::PaymentMethod {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Fiat => infra::repos::payments::PaymentMethod::Fiat,
            PaymentMethod::Usdc => infra::repos::payments::PaymentMethod::Usdc,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum PaymentStatus {
    Pending,
    Confirmed,
}

impl From<infra::repos::payments::PaymentStatus> for PaymentStatus {
    fn from(status: infra::repos::payments::PaymentStatus) -> Self {
        match status {
            infra::repos::payments::PaymentStatus::Pending => PaymentStatus::Pending,
            infra::repos::payments::PaymentStatus::Confirmed => PaymentStatus::Confirmed,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Payment {
    pub id: ID,
    pub reservation_id: ID,
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

impl From<infra::models::PaymentRow> for Payment {
    fn from(row: infra::models::PaymentRow) -> Self {
        Self {
            id: row.id.into(),
            reservation_id: row.reservation_id.into(),
            method: row.method.into(),
            amount_cents: row.amount_cents,
            currency: row.currency,
            provider: row.provider,
            provider_ref: row.provider_ref,
            network: row.network,
            token_amount_micros: row.token_amount_micros,
            platform_fee_cents: row.platform_fee_cents,
            club_fee_cents: row.club_fee_cents,
            status: row.status.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Everything the client needs to settle a reservation. Fiat intents carry
/// only a checkout redirect; USDC intents carry the transfer details the
/// payer's wallet must match exactly.
#[derive(SimpleObject, Clone)]
pub struct SettlementIntent {
    pub reservation_id: ID,
    pub method: PaymentMethod,
    pub amount_cents: i32,
    pub currency: String,
    pub redirect_url: Option<String>,
    pub payment_id: Option<ID>,
    pub reference: Option<String>,
    pub receiver: Option<String>,
    pub usdc_mint: Option<String>,
    pub network: Option<String>,
    pub token_amount_micros: Option<i64>,
    pub token_decimals: Option<i32>,
}
