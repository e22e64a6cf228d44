use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PaymentService;
use crate::config::AppConfig;
use crate::models::payments::responses::Receipt;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};

/// 收据数据，客户端据此渲染 PDF
pub async fn get_receipt(
    service: &PaymentService,
    payment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = AppConfig::get();

    let payment = match storage.get_payment(payment_id).await {
        Ok(Some(payment)) => payment,
        Ok(None) => return Ok(not_found(ErrorCode::PaymentNotFound, "Payment not found")),
        Err(e) => return Ok(internal_error("Failed to get payment", &e)),
    };

    let detail = match storage.get_enrollment_detail(payment.enrollment_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::EnrollmentNotFound,
                "Enrollment not found",
            ));
        }
        Err(e) => return Ok(internal_error("Failed to get enrollment", &e)),
    };

    let academic_year = match storage
        .get_academic_year(detail.enrollment.academic_year_id)
        .await
    {
        Ok(Some(year)) => year.name,
        Ok(None) => String::new(),
        Err(e) => return Ok(internal_error("Failed to get academic year", &e)),
    };

    let recorded_by = match storage.get_user_by_id(payment.recorded_by).await {
        Ok(Some(user)) => user.display_name.unwrap_or(user.username),
        Ok(None) => format!("#{}", payment.recorded_by),
        Err(e) => return Ok(internal_error("Failed to get cashier", &e)),
    };

    let receipt = Receipt {
        school_name: config.app.system_name.clone(),
        currency: config.treasury.currency.clone(),
        student_name: detail.student_name,
        matricule: detail.matricule,
        class_name: detail.class_name,
        academic_year,
        amount_due: detail.enrollment.amount_due,
        total_paid: detail.amount_paid,
        remaining: detail.remaining,
        recorded_by,
        issued_at: chrono::Utc::now(),
        payment,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(receipt, "Receipt generated")))
}
