use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub enum EnrollmentStatus {
    Active,
    Withdrawn,
}

string_enum!(EnrollmentStatus {
    Active => "active",
    Withdrawn => "withdrawn",
});

/// 缴费状态，由应缴与已缴金额推导
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

string_enum!(PaymentStatus {
    Unpaid => "unpaid",
    Partial => "partial",
    Paid => "paid",
});

impl PaymentStatus {
    pub fn from_amounts(amount_due: i64, amount_paid: i64) -> Self {
        if amount_paid >= amount_due {
            PaymentStatus::Paid
        } else if amount_paid > 0 {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }
}

// 报名记录，amount_due 为报名时的费用快照
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub academic_year_id: i64,
    pub amount_due: i64,
    pub discount: i64,
    pub status: EnrollmentStatus,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Enrollment {
    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Active
    }
}

/// 待写入的报名
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub student_id: i64,
    pub class_id: i64,
    pub academic_year_id: i64,
    pub amount_due: i64,
    pub discount: i64,
}

/// 根据班级费用和优惠计算应缴金额
pub fn compute_amount_due(total_fee: i64, discount: i64) -> Result<i64, String> {
    if discount < 0 {
        return Err("Discount cannot be negative".to_string());
    }
    if discount > total_fee {
        return Err(format!(
            "Discount {discount} exceeds the class fees {total_fee}"
        ));
    }
    Ok(total_fee - discount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_from_amounts() {
        assert_eq!(PaymentStatus::from_amounts(100_000, 0), PaymentStatus::Unpaid);
        assert_eq!(
            PaymentStatus::from_amounts(100_000, 40_000),
            PaymentStatus::Partial
        );
        assert_eq!(
            PaymentStatus::from_amounts(100_000, 100_000),
            PaymentStatus::Paid
        );
        // 全额减免视为已缴清
        assert_eq!(PaymentStatus::from_amounts(0, 0), PaymentStatus::Paid);
    }

    #[test]
    fn test_compute_amount_due() {
        assert_eq!(compute_amount_due(150_000, 0), Ok(150_000));
        assert_eq!(compute_amount_due(150_000, 50_000), Ok(100_000));
        assert_eq!(compute_amount_due(150_000, 150_000), Ok(0));
        assert!(compute_amount_due(150_000, 150_001).is_err());
        assert!(compute_amount_due(150_000, -1).is_err());
    }

    #[test]
    fn test_status_strings() {
        assert_eq!("withdrawn".parse::<EnrollmentStatus>(), Ok(EnrollmentStatus::Withdrawn));
        assert_eq!(PaymentStatus::Partial.to_string(), "partial");
        assert!("late".parse::<PaymentStatus>().is_err());
    }
}
