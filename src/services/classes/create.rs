use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, check_fees_and_capacity, check_head_teacher};
use crate::models::classes::requests::CreateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, current_user_id, internal_error, not_found};
use crate::utils::validate::validate_label;

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    mut class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    class_data.name = class_data.name.trim().to_string();
    class_data.level = class_data.level.trim().to_string();
    if let Err(msg) = validate_label(&class_data.name, 64)
        .and_then(|_| validate_label(&class_data.level, 16))
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Err(msg) = check_fees_and_capacity(
        Some(class_data.tuition_fee),
        Some(class_data.registration_fee),
        Some(class_data.capacity),
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);

    match storage.get_academic_year(class_data.academic_year_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::AcademicYearNotFound,
                "Academic year not found",
            ));
        }
        Err(e) => return Ok(internal_error("Failed to get academic year", &e)),
    }

    if let Some(teacher_id) = class_data.head_teacher_id
        && let Err(resp) = check_head_teacher(&storage, teacher_id).await
    {
        return Ok(resp);
    }

    // 学年内班级名称唯一
    match storage
        .get_class_by_name(class_data.academic_year_id, &class_data.name)
        .await
    {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::ClassAlreadyExists,
                format!("Class '{}' already exists in this academic year", class_data.name),
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Failed to check class name", &e)),
    }

    match storage.create_class(class_data).await {
        Ok(class) => {
            info!("Class {} created successfully by {}", class.name, uid);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(class, "Class created successfully")))
        }
        Err(e) => Ok(internal_error("Class creation failed", &e)),
    }
}
