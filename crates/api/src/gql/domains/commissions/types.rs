use async_graphql::{SimpleObject, ID};
use chrono::{DateTime, Utc};

use infra::repos::commissions::FeeTotals;

#[derive(SimpleObject, Clone)]
pub struct Commission {
    pub id: ID,
    pub platform_fee_bps: i32,
    pub club_fee_bps: i32,
    pub is_active: bool,
    pub effective_from: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<infra::models::CommissionRow> for Commission {
    fn from(row: infra::models::CommissionRow) -> Self {
        Self {
            id: row.id.into(),
            platform_fee_bps: row.platform_fee_bps,
            club_fee_bps: row.club_fee_bps,
            is_active: row.is_active,
            effective_from: row.effective_from,
            created_at: row.created_at,
        }
    }
}

/// Fee totals over PAID reservations for a period.
#[derive(SimpleObject, Clone)]
pub struct CommissionStats {
    pub reservation_count: i64,
    pub gross_cents: i64,
    pub platform_fee_cents: i64,
    pub club_fee_cents: i64,
}

impl From<FeeTotals> for CommissionStats {
    fn from(totals: FeeTotals) -> Self {
        Self {
            reservation_count: totals.reservation_count,
            gross_cents: totals.gross_cents,
            platform_fee_cents: totals.platform_fee_cents,
            club_fee_cents: totals.club_fee_cents,
        }
    }
}
