use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EnrollmentService, detail_response};
use crate::models::enrollments::{
    entities::{NewEnrollment, compute_amount_due},
    requests::CreateEnrollmentRequest,
};
use crate::models::ErrorCode;
use crate::services::{bad_request, conflict, current_user_id, internal_error, not_found};

pub async fn enroll(
    service: &EnrollmentService,
    req: CreateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.get_student(req.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(internal_error("Failed to get student", &e)),
    }

    let class = match storage.get_class_by_id(req.class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Ok(internal_error("Failed to get class", &e)),
    };

    // 每名学生每学年只有一条报名，换班走转班
    match storage
        .find_enrollment_for_year(req.student_id, class.academic_year_id)
        .await
    {
        Ok(Some(existing)) => {
            return Ok(conflict(
                ErrorCode::AlreadyEnrolled,
                format!(
                    "Student is already enrolled this academic year (enrollment {})",
                    existing.id
                ),
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Failed to check enrollments", &e)),
    }

    match storage.count_active_enrollments(class.id).await {
        Ok(active) if active >= class.capacity as i64 => {
            return Ok(conflict(
                ErrorCode::ClassFull,
                format!("Class {} is full ({} seats)", class.name, class.capacity),
            ));
        }
        Ok(_) => {}
        Err(e) => return Ok(internal_error("Failed to count enrollments", &e)),
    }

    let discount = req.discount.unwrap_or(0);
    let amount_due = match compute_amount_due(class.total_fee(), discount) {
        Ok(amount) => amount,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let new_enrollment = NewEnrollment {
        student_id: req.student_id,
        class_id: class.id,
        academic_year_id: class.academic_year_id,
        amount_due,
        discount,
    };

    match storage.create_enrollment(new_enrollment).await {
        Ok(enrollment) => {
            info!(
                "Student {} enrolled in class {} by {} (due {})",
                enrollment.student_id, enrollment.class_id, uid, enrollment.amount_due
            );
            Ok(detail_response(&storage, enrollment.id, true, "Enrollment created successfully").await)
        }
        Err(e) => Ok(internal_error("Enrollment failed", &e)),
    }
}
