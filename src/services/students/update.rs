use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use super::create::validate_student_fields;
use crate::models::{ApiResponse, ErrorCode, students::requests::UpdateStudentRequest};
use crate::services::{bad_request, internal_error, not_found};

pub async fn update_student(
    service: &StudentService,
    student_id: i64,
    mut update: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    for name in [update.first_name.as_mut(), update.last_name.as_mut()]
        .into_iter()
        .flatten()
    {
        *name = name.trim().to_string();
    }
    if let Err(msg) = validate_student_fields(
        update.first_name.as_deref(),
        update.last_name.as_deref(),
        update.guardian_phone.as_deref(),
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    match service
        .get_storage(request)
        .update_student(student_id, update)
        .await
    {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Ok(internal_error("Failed to update student", &e)),
    }
}
