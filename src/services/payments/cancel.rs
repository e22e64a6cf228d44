use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PaymentService;
use crate::models::payments::{entities::PaymentState, requests::CancelPaymentRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    bad_request, conflict, current_user_id, error_response, internal_error, not_found,
};
use crate::utils::validate::validate_label;

pub async fn cancel_payment(
    service: &PaymentService,
    payment_id: i64,
    req: CancelPaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let reason = req.reason.trim().to_string();
    if let Err(msg) = validate_label(&reason, 255) {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            format!("Cancellation reason: {msg}"),
        ));
    }

    let storage = service.get_storage(request);

    match storage.get_payment(payment_id).await {
        Ok(Some(payment)) if payment.status == PaymentState::Cancelled => {
            return Ok(conflict(
                ErrorCode::PaymentAlreadyCancelled,
                "Payment is already cancelled",
            ));
        }
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::PaymentNotFound, "Payment not found")),
        Err(e) => return Ok(internal_error("Failed to get payment", &e)),
    }

    // 作废与冲正在同一事务内完成，账户余额不足时整体回滚
    match storage.cancel_payment(payment_id, reason, uid).await {
        Ok(payment) => {
            info!(
                "Payment {} ({}) cancelled by user {}",
                payment.receipt_number, payment.amount, uid
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                payment,
                "Payment cancelled successfully",
            )))
        }
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to cancel payment",
        )),
    }
}
