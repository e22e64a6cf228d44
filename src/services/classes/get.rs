use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{ApiResponse, ErrorCode, classes::responses::ClassDetail};
use crate::services::{internal_error, not_found};

pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Ok(internal_error("Failed to get class information", &e)),
    };

    match storage.count_active_enrollments(class_id).await {
        Ok(active_enrollments) => {
            let seats_left = (class.capacity as i64 - active_enrollments).max(0);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ClassDetail {
                    class,
                    active_enrollments,
                    seats_left,
                },
                "Class information retrieved successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to count enrollments", &e)),
    }
}
