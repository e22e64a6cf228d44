use super::entities::AccountKind;
use super::ledger::LedgerBalances;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/treasury.ts")]
pub struct TreasuryBalances {
    pub safe: i64,
    pub registry: i64,
    pub bank: i64,
    pub total: i64,
    pub currency: String,
}

impl TreasuryBalances {
    pub fn new(balances: LedgerBalances, currency: impl Into<String>) -> Self {
        Self {
            safe: balances.safe,
            registry: balances.registry,
            bank: balances.bank,
            total: balances.total(),
            currency: currency.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/treasury.ts")]
pub struct VerificationLine {
    pub account: AccountKind,
    pub stored: i64,
    pub replayed: i64,
    pub difference: i64,
}

/// 账本核对结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/treasury.ts")]
pub struct VerificationReport {
    pub lines: Vec<VerificationLine>,
    pub consistent: bool,
    pub movement_count: i64,
    pub verified_at: chrono::DateTime<chrono::Utc>,
}
