use super::entities::{PaymentMethod, PaymentState};
use crate::models::common::PaginationQuery;
use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct CreatePaymentRequest {
    pub enrollment_id: i64,
    pub amount: i64,
    pub method: PaymentMethod,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct CancelPaymentRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub enrollment_id: Option<i64>,
    pub student_id: Option<i64>,
    pub method: Option<PaymentMethod>,
    pub status: Option<PaymentState>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub enrollment_id: Option<i64>,
    pub student_id: Option<i64>,
    pub method: Option<PaymentMethod>,
    pub status: Option<PaymentState>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl From<PaymentQueryParams> for PaymentListQuery {
    fn from(params: PaymentQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            enrollment_id: params.enrollment_id,
            student_id: params.student_id,
            method: params.method,
            status: params.status,
            from: params.from,
            to: params.to,
        }
    }
}
