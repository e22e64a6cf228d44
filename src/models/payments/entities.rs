use crate::models::treasury::entities::AccountKind;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 缴费方式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Cheque,
    MobileMoney,
}

string_enum!(PaymentMethod {
    Cash => "cash",
    BankTransfer => "bank_transfer",
    Cheque => "cheque",
    MobileMoney => "mobile_money",
});

impl PaymentMethod {
    /// 现金进收银台，其余方式进银行
    pub fn account(&self) -> AccountKind {
        match self {
            PaymentMethod::Cash => AccountKind::Registry,
            PaymentMethod::BankTransfer | PaymentMethod::Cheque | PaymentMethod::MobileMoney => {
                AccountKind::Bank
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub enum PaymentState {
    Valid,
    Cancelled,
}

string_enum!(PaymentState {
    Valid => "valid",
    Cancelled => "cancelled",
});

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct Payment {
    pub id: i64,
    pub enrollment_id: i64,
    pub receipt_number: String,
    pub amount: i64,
    pub method: PaymentMethod,
    pub account: AccountKind,
    pub status: PaymentState,
    pub note: Option<String>,
    pub cancel_reason: Option<String>,
    pub paid_at: chrono::DateTime<chrono::Utc>,
    pub recorded_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub cancelled_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// 待写入的缴费
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub enrollment_id: i64,
    pub receipt_number: String,
    pub amount: i64,
    pub method: PaymentMethod,
    pub note: Option<String>,
    pub paid_at: chrono::DateTime<chrono::Utc>,
    pub recorded_by: i64,
}

/// 校验缴费金额：必须为正且不超过剩余应缴
pub fn check_payment_amount(amount: i64, remaining: i64) -> Result<(), String> {
    if amount <= 0 {
        return Err("Payment amount must be greater than zero".to_string());
    }
    if amount > remaining {
        return Err(format!(
            "Payment amount {amount} exceeds the remaining balance {remaining}"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_account_mapping() {
        assert_eq!(PaymentMethod::Cash.account(), AccountKind::Registry);
        assert_eq!(PaymentMethod::BankTransfer.account(), AccountKind::Bank);
        assert_eq!(PaymentMethod::Cheque.account(), AccountKind::Bank);
        assert_eq!(PaymentMethod::MobileMoney.account(), AccountKind::Bank);
    }

    #[test]
    fn test_check_payment_amount() {
        assert!(check_payment_amount(10_000, 10_000).is_ok());
        assert!(check_payment_amount(1, 10_000).is_ok());
        assert!(check_payment_amount(0, 10_000).is_err());
        assert!(check_payment_amount(-5, 10_000).is_err());
        assert!(check_payment_amount(10_001, 10_000).is_err());
        assert!(check_payment_amount(1, 0).is_err());
    }

    #[test]
    fn test_method_serde_names() {
        let method: PaymentMethod = serde_json::from_str("\"mobile_money\"").unwrap();
        assert_eq!(method, PaymentMethod::MobileMoney);
        assert_eq!(method.as_str(), "mobile_money");
    }
}
