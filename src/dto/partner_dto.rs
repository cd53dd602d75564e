//! DTOs de partners y su ledger

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::partner::Partner;

// Vista del ledger financiero de un partner
#[derive(Debug, Serialize)]
pub struct EarningsResponse {
    pub partner_id: Uuid,
    pub partner_name: String,
    pub total_earnings: Decimal,
    pub online_earnings: Decimal,
    pub cash_earnings: Decimal,
    pub payout_balance: Decimal,
    pub last_payout_at: Option<DateTime<Utc>>,
}

impl From<Partner> for EarningsResponse {
    fn from(p: Partner) -> Self {
        Self {
            partner_id: p.id,
            partner_name: p.name,
            total_earnings: p.total_earnings,
            online_earnings: p.online_earnings,
            cash_earnings: p.cash_earnings,
            payout_balance: p.payout_balance,
            last_payout_at: p.last_payout_at,
        }
    }
}
