use super::entities::Payment;
use serde::Serialize;
use ts_rs::TS;

/// 收据（由前端渲染为 PDF）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct Receipt {
    pub school_name: String,
    pub currency: String,
    pub payment: Payment,
    pub student_name: String,
    pub matricule: String,
    pub class_name: String,
    pub academic_year: String,
    pub amount_due: i64,
    pub total_paid: i64,
    pub remaining: i64,
    pub recorded_by: String,
    pub issued_at: chrono::DateTime<chrono::Utc>,
}
