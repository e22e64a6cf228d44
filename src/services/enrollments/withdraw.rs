use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EnrollmentService, detail_response};
use crate::models::ErrorCode;
use crate::models::enrollments::entities::EnrollmentStatus;
use crate::services::{conflict, current_user_id, internal_error, not_found};

/// 退学：报名置为 withdrawn，已缴费用保留
pub async fn withdraw(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.get_enrollment(enrollment_id).await {
        Ok(Some(enrollment)) if !enrollment.is_active() => {
            return Ok(conflict(
                ErrorCode::EnrollmentInactive,
                "Enrollment is already withdrawn",
            ));
        }
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::EnrollmentNotFound,
                "Enrollment not found",
            ));
        }
        Err(e) => return Ok(internal_error("Failed to get enrollment", &e)),
    }

    match storage
        .update_enrollment_status(enrollment_id, EnrollmentStatus::Withdrawn)
        .await
    {
        Ok(Some(_)) => {
            info!("Enrollment {} withdrawn by {}", enrollment_id, uid);
            Ok(detail_response(&storage, enrollment_id, false, "Enrollment withdrawn").await)
        }
        Ok(None) => Ok(not_found(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        )),
        Err(e) => Ok(internal_error("Failed to withdraw enrollment", &e)),
    }
}
