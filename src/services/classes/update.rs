use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, check_fees_and_capacity, check_head_teacher};
use crate::models::classes::requests::UpdateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, current_user_id, internal_error, not_found};
use crate::utils::validate::validate_label;

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    mut update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = check_fees_and_capacity(
        update_data.tuition_fee,
        update_data.registration_fee,
        update_data.capacity,
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Some(name) = update_data.name.as_mut() {
        *name = name.trim().to_string();
        if let Err(msg) = validate_label(name, 64) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }
    }
    if let Some(level) = update_data.level.as_mut() {
        *level = level.trim().to_string();
        if let Err(msg) = validate_label(level, 16) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }
    }

    let storage = service.get_storage(request);

    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Ok(internal_error("Failed to get class", &e)),
    };

    if let Some(name) = update_data.name.as_deref()
        && name != class.name
    {
        match storage.get_class_by_name(class.academic_year_id, name).await {
            Ok(Some(other)) if other.id != class_id => {
                return Ok(conflict(
                    ErrorCode::ClassAlreadyExists,
                    format!("Class '{name}' already exists in this academic year"),
                ));
            }
            Ok(_) => {}
            Err(e) => return Ok(internal_error("Failed to check class name", &e)),
        }
    }

    // 容量不能低于当前在读人数
    if let Some(capacity) = update_data.capacity {
        match storage.count_active_enrollments(class_id).await {
            Ok(active) if (capacity as i64) < active => {
                return Ok(conflict(
                    ErrorCode::ClassFull,
                    format!("Capacity {capacity} is below the {active} active enrollments"),
                ));
            }
            Ok(_) => {}
            Err(e) => return Ok(internal_error("Failed to count enrollments", &e)),
        }
    }

    if let Some(teacher_id) = update_data.head_teacher_id
        && let Err(resp) = check_head_teacher(&storage, teacher_id).await
    {
        return Ok(resp);
    }

    match storage.update_class(class_id, update_data).await {
        Ok(Some(class)) => {
            info!("Class {} updated by {}", class.id, uid);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                class,
                "Class information updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(internal_error("Failed to update class", &e)),
    }
}
