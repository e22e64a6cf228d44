use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EnrollmentService, detail_response};
use crate::models::ErrorCode;
use crate::models::enrollments::{entities::compute_amount_due, requests::TransferEnrollmentRequest};
use crate::services::{bad_request, conflict, current_user_id, internal_error, not_found};

/// 转班后的应缴金额：沿用原优惠，且不能低于已缴金额
fn transferred_amount_due(new_total_fee: i64, discount: i64, paid: i64) -> Result<i64, String> {
    let amount_due = compute_amount_due(new_total_fee, discount)?;
    if paid > amount_due {
        return Err(format!(
            "Already paid {paid}, which exceeds the new amount due {amount_due}"
        ));
    }
    Ok(amount_due)
}

pub async fn transfer(
    service: &EnrollmentService,
    enrollment_id: i64,
    req: TransferEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let enrollment = match storage.get_enrollment(enrollment_id).await {
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
            "Only active enrollments can be transferred",
        ));
    }
    if enrollment.class_id == req.class_id {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Student is already in this class",
        ));
    }

    let target = match storage.get_class_by_id(req.class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Ok(internal_error("Failed to get class", &e)),
    };
    if target.academic_year_id != enrollment.academic_year_id {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Transfers are only allowed within the same academic year",
        ));
    }

    match storage.count_active_enrollments(target.id).await {
        Ok(active) if active >= target.capacity as i64 => {
            return Ok(conflict(
                ErrorCode::ClassFull,
                format!("Class {} is full ({} seats)", target.name, target.capacity),
            ));
        }
        Ok(_) => {}
        Err(e) => return Ok(internal_error("Failed to count enrollments", &e)),
    }

    let paid = match storage.sum_valid_payments(enrollment_id).await {
        Ok(paid) => paid,
        Err(e) => return Ok(internal_error("Failed to sum payments", &e)),
    };
    let amount_due = match transferred_amount_due(target.total_fee(), enrollment.discount, paid) {
        Ok(amount) => amount,
        Err(msg) => return Ok(conflict(ErrorCode::Overpayment, msg)),
    };

    match storage
        .transfer_enrollment(enrollment_id, target.id, amount_due)
        .await
    {
        Ok(Some(_)) => {
            info!(
                "Enrollment {} transferred from class {} to {} by {}",
                enrollment_id, enrollment.class_id, target.id, uid
            );
            Ok(detail_response(&storage, enrollment_id, false, "Enrollment transferred").await)
        }
        Ok(None) => Ok(not_found(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        )),
        Err(e) => Ok(internal_error("Failed to transfer enrollment", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transferred_amount_due_keeps_discount() {
        assert_eq!(transferred_amount_due(200_000, 20_000, 50_000), Ok(180_000));
    }

    #[test]
    fn test_transfer_refused_when_already_overpaid() {
        // 转入费用更低的班级，已缴超过新应缴
        assert!(transferred_amount_due(100_000, 0, 120_000).is_err());
        assert_eq!(transferred_amount_due(100_000, 0, 100_000), Ok(100_000));
    }

    #[test]
    fn test_discount_larger_than_new_fee() {
        assert!(transferred_amount_due(50_000, 60_000, 0).is_err());
    }
}
