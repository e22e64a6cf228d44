use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::attendance::requests::AttendanceSummaryParams;
use crate::models::attendance::responses::AttendanceSummary;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, internal_error, not_found};

pub async fn attendance_summary(
    service: &AttendanceService,
    student_id: i64,
    query: AttendanceSummaryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let (Some(from), Some(to)) = (query.from, query.to)
        && from > to
    {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "'from' must not be after 'to'",
        ));
    }

    let storage = service.get_storage(request);
    match storage.get_student(student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(internal_error("Failed to get student", &e)),
    }

    match storage
        .list_student_attendance(student_id, query.from, query.to)
        .await
    {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttendanceSummary::from_records(student_id, query.from, query.to, &records),
            "Attendance summary retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to get attendance", &e)),
    }
}
