use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 资金账户：保险柜、收银台、银行
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/treasury.ts")]
pub enum AccountKind {
    Safe,
    Registry,
    Bank,
}

string_enum!(AccountKind {
    Safe => "safe",
    Registry => "registry",
    Bank => "bank",
});

impl AccountKind {
    pub const ALL: [AccountKind; 3] = [AccountKind::Safe, AccountKind::Registry, AccountKind::Bank];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/treasury.ts")]
pub enum MovementKind {
    Payment,
    PaymentReversal,
    Transfer,
    Expense,
    Income,
    Adjustment,
}

string_enum!(MovementKind {
    Payment => "payment",
    PaymentReversal => "payment_reversal",
    Transfer => "transfer",
    Expense => "expense",
    Income => "income",
    Adjustment => "adjustment",
});

// 流水记录：amount 恒为正，from 账户借记，to 账户贷记
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/treasury.ts")]
pub struct Movement {
    pub id: i64,
    pub kind: MovementKind,
    pub from_account: Option<AccountKind>,
    pub to_account: Option<AccountKind>,
    pub amount: i64,
    pub payment_id: Option<i64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 待写入的流水
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub kind: MovementKind,
    pub from_account: Option<AccountKind>,
    pub to_account: Option<AccountKind>,
    pub amount: i64,
    pub payment_id: Option<i64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_by: i64,
}

impl NewMovement {
    pub fn transfer(
        from: AccountKind,
        to: AccountKind,
        amount: i64,
        description: Option<String>,
        created_by: i64,
    ) -> Self {
        Self {
            kind: MovementKind::Transfer,
            from_account: Some(from),
            to_account: Some(to),
            amount,
            payment_id: None,
            category: None,
            description,
            created_by,
        }
    }

    pub fn expense(
        account: AccountKind,
        amount: i64,
        category: String,
        description: Option<String>,
        created_by: i64,
    ) -> Self {
        Self {
            kind: MovementKind::Expense,
            from_account: Some(account),
            to_account: None,
            amount,
            payment_id: None,
            category: Some(category),
            description,
            created_by,
        }
    }

    pub fn income(
        account: AccountKind,
        amount: i64,
        description: Option<String>,
        created_by: i64,
    ) -> Self {
        Self {
            kind: MovementKind::Income,
            from_account: None,
            to_account: Some(account),
            amount,
            payment_id: None,
            category: None,
            description,
            created_by,
        }
    }

    /// 调整金额带符号：正数贷记，负数借记
    pub fn adjustment(account: AccountKind, signed_amount: i64, reason: String, created_by: i64) -> Self {
        let (from_account, to_account) = if signed_amount < 0 {
            (Some(account), None)
        } else {
            (None, Some(account))
        };
        Self {
            kind: MovementKind::Adjustment,
            from_account,
            to_account,
            amount: signed_amount.saturating_abs(),
            payment_id: None,
            category: None,
            description: Some(reason),
            created_by,
        }
    }

    pub fn payment(account: AccountKind, amount: i64, payment_id: i64, created_by: i64) -> Self {
        Self {
            kind: MovementKind::Payment,
            from_account: None,
            to_account: Some(account),
            amount,
            payment_id: Some(payment_id),
            category: None,
            description: None,
            created_by,
        }
    }

    pub fn payment_reversal(
        account: AccountKind,
        amount: i64,
        payment_id: i64,
        reason: String,
        created_by: i64,
    ) -> Self {
        Self {
            kind: MovementKind::PaymentReversal,
            from_account: Some(account),
            to_account: None,
            amount,
            payment_id: Some(payment_id),
            category: None,
            description: Some(reason),
            created_by,
        }
    }
}
