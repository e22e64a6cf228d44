use super::entities::{Enrollment, PaymentStatus};
use serde::Serialize;
use ts_rs::TS;

// 报名详情（含缴费进度）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub enrollment: Enrollment,
    pub student_name: String,
    pub matricule: String,
    pub class_name: String,
    pub amount_paid: i64,
    pub remaining: i64,
    pub payment_status: PaymentStatus,
}

impl EnrollmentDetail {
    pub fn new(
        enrollment: Enrollment,
        student_name: String,
        matricule: String,
        class_name: String,
        amount_paid: i64,
    ) -> Self {
        let remaining = (enrollment.amount_due - amount_paid).max(0);
        let payment_status = PaymentStatus::from_amounts(enrollment.amount_due, amount_paid);
        Self {
            enrollment,
            student_name,
            matricule,
            class_name,
            amount_paid,
            remaining,
            payment_status,
        }
    }
}
