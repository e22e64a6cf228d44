//! 资金写操作：转账、支出、其他收入与更正
//!
//! 余额校验和流水写入都在存储层的同一事务里完成，这里只做请求层面的校验。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TreasuryService;
use crate::models::treasury::{
    entities::NewMovement,
    ledger::validate_movement,
    requests::{AdjustmentRequest, ExpenseRequest, IncomeRequest, TransferRequest},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user_id, error_response};
use crate::utils::validate::validate_label;

fn check_description(description: Option<&str>) -> Result<(), String> {
    match description {
        Some(text) if text.chars().count() > 255 => {
            Err("Description must be at most 255 characters".to_string())
        }
        _ => Ok(()),
    }
}

async fn apply(
    service: &TreasuryService,
    movement: NewMovement,
    request: &HttpRequest,
    success_message: &str,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_movement(&movement) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    match service.get_storage(request).apply_movement(movement).await {
        Ok(movement) => {
            info!(
                "Treasury {} of {} ({:?} -> {:?}) by user {}",
                movement.kind,
                movement.amount,
                movement.from_account,
                movement.to_account,
                movement.created_by
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(movement, success_message)))
        }
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::InternalServerError,
            "Treasury operation failed",
        )),
    }
}

pub async fn transfer(
    service: &TreasuryService,
    req: TransferRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    if let Err(msg) = check_description(req.description.as_deref()) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let movement = NewMovement::transfer(req.from, req.to, req.amount, req.description, uid);
    apply(service, movement, request, "Transfer completed").await
}

pub async fn record_expense(
    service: &TreasuryService,
    req: ExpenseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    let category = req.category.trim().to_string();
    if let Err(msg) = validate_label(&category, 64)
        .map_err(|msg| format!("Category: {msg}"))
        .and_then(|_| check_description(req.description.as_deref()))
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let movement = NewMovement::expense(req.account, req.amount, category, req.description, uid);
    apply(service, movement, request, "Expense recorded").await
}

pub async fn record_income(
    service: &TreasuryService,
    req: IncomeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    if let Err(msg) = check_description(req.description.as_deref()) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let movement = NewMovement::income(req.account, req.amount, req.description, uid);
    apply(service, movement, request, "Income recorded").await
}

pub async fn adjust(
    service: &TreasuryService,
    req: AdjustmentRequest,
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
            format!("Reason: {msg}"),
        ));
    }
    if req.amount == 0 {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Adjustment amount must not be zero",
        ));
    }

    let movement = NewMovement::adjustment(req.account, req.amount, reason, uid);
    apply(service, movement, request, "Adjustment recorded").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_description() {
        assert!(check_description(None).is_ok());
        assert!(check_description(Some("Caisse vers coffre")).is_ok());
        assert!(check_description(Some(&"x".repeat(256))).is_err());
    }
}
