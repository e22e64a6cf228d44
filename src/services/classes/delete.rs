use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::enrollments::requests::EnrollmentListQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{conflict, current_user_id, internal_error, not_found};

pub async fn delete_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    // 有报名记录（含已退学）的班级保留，缴费记录依赖它
    let query = EnrollmentListQuery {
        page: Some(1),
        size: Some(1),
        class_id: Some(class_id),
        ..Default::default()
    };
    match storage.list_enrollments_with_pagination(query).await {
        Ok(page) if page.pagination.total > 0 => {
            return Ok(conflict(
                ErrorCode::ClassHasEnrollments,
                "Class still has enrollments",
            ));
        }
        Ok(_) => {}
        Err(e) => return Ok(internal_error("Failed to check class enrollments", &e)),
    }

    match storage.delete_class(class_id).await {
        Ok(true) => {
            info!("Class {} deleted by {}", class_id, uid);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(internal_error("Failed to delete class", &e)),
    }
}
