use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{conflict, current_user_id, internal_error, not_found};

pub async fn delete_student(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    // 缴费记录（含已作废）是账本的一部分，不能随学生删除
    match storage.count_student_payments(student_id).await {
        Ok(0) => {}
        Ok(count) => {
            return Ok(conflict(
                ErrorCode::StudentHasPayments,
                format!("Student has {count} payment record(s) and cannot be deleted"),
            ));
        }
        Err(e) => return Ok(internal_error("Failed to check student payments", &e)),
    }

    match storage.delete_student(student_id).await {
        Ok(true) => {
            info!("Student {} deleted by {}", student_id, uid);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Ok(internal_error("Failed to delete student", &e)),
    }
}
