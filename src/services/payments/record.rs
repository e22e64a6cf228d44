use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::info;

use super::PaymentService;
use crate::config::AppConfig;
use crate::models::payments::{
    entities::{NewPayment, check_payment_amount},
    requests::CreatePaymentRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    bad_request, conflict, current_user_id, error_response, internal_error, not_found,
};
use crate::utils::random_code::generate_code;

/// 收据号：`{前缀}-{YYYYMMDD}-{6 位随机码}`
pub(crate) fn receipt_number(prefix: &str, paid_at: DateTime<Utc>, code: &str) -> String {
    format!("{prefix}-{}-{code}", paid_at.format("%Y%m%d"))
}

pub async fn record_payment(
    service: &PaymentService,
    req: CreatePaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    if req.note.as_deref().is_some_and(|n| n.chars().count() > 255) {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Note must be at most 255 characters",
        ));
    }

    let now = Utc::now();
    let paid_at = req.paid_at.unwrap_or(now);
    if paid_at > now {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Payment date cannot be in the future",
        ));
    }

    let storage = service.get_storage(request);

    let enrollment = match storage.get_enrollment(req.enrollment_id).await {
        Ok(Some(enrollment)) => enrollment,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::EnrollmentNotFound,
                "Enrollment not found",
            ));
        }
        Err(e) => return Ok(internal_error("Failed to get enrollment", &e)),
    };
    if !enrollment.is_active() {
        return Ok(conflict(
            ErrorCode::EnrollmentInactive,
            "Payments can only be recorded on active enrollments",
        ));
    }

    // 存储层在事务内会再校验一次
    let paid = match storage.sum_valid_payments(enrollment.id).await {
        Ok(paid) => paid,
        Err(e) => return Ok(internal_error("Failed to sum payments", &e)),
    };
    let remaining = enrollment.amount_due - paid;
    if req.amount <= 0 {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Payment amount must be greater than zero",
        ));
    }
    if let Err(msg) = check_payment_amount(req.amount, remaining) {
        return Ok(conflict(ErrorCode::Overpayment, msg));
    }

    let prefix = &AppConfig::get().treasury.receipt_prefix;
    let payment = NewPayment {
        enrollment_id: enrollment.id,
        receipt_number: receipt_number(prefix, paid_at, &generate_code(6)),
        amount: req.amount,
        method: req.method,
        note: req.note,
        paid_at,
        recorded_by: uid,
    };

    match storage.record_payment(payment).await {
        Ok(payment) => {
            info!(
                "Payment {} of {} ({}) recorded on enrollment {} by user {}",
                payment.receipt_number, payment.amount, payment.method, payment.enrollment_id, uid
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                payment,
                "Payment recorded successfully",
            )))
        }
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to record payment",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_receipt_number_format() {
        let paid_at = Utc.with_ymd_and_hms(2024, 10, 3, 9, 15, 0).unwrap();
        assert_eq!(
            receipt_number("REC", paid_at, "K7P2QX"),
            "REC-20241003-K7P2QX"
        );
    }
}
