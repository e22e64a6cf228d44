use super::entities::{AccountKind, MovementKind};
use crate::models::common::PaginationQuery;
use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/treasury.ts")]
pub struct TransferRequest {
    pub from: AccountKind,
    pub to: AccountKind,
    pub amount: i64,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/treasury.ts")]
pub struct ExpenseRequest {
    pub account: AccountKind,
    pub amount: i64,
    pub category: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/treasury.ts")]
pub struct IncomeRequest {
    pub account: AccountKind,
    pub amount: i64,
    pub description: Option<String>,
}

// 管理员更正，amount 带符号
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/treasury.ts")]
pub struct AdjustmentRequest {
    pub account: AccountKind,
    pub amount: i64,
    pub reason: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/treasury.ts")]
pub struct MovementQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub account: Option<AccountKind>,
    pub kind: Option<MovementKind>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct MovementListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub account: Option<AccountKind>,
    pub kind: Option<MovementKind>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl From<MovementQueryParams> for MovementListQuery {
    fn from(params: MovementQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            account: params.account,
            kind: params.kind,
            from: params.from,
            to: params.to,
        }
    }
}
