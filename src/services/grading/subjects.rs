use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GradingService, load_class};
use crate::models::grading::requests::{
    CreateSubjectRequest, SubjectQueryParams, UpdateSubjectRequest,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, current_user_id, internal_error, not_found};
use crate::utils::validate::validate_label;

fn check_coefficient(coefficient: i32) -> Result<(), &'static str> {
    if !(1..=20).contains(&coefficient) {
        return Err("Coefficient must be between 1 and 20");
    }
    Ok(())
}

async fn check_teacher(
    service: &GradingService,
    request: &HttpRequest,
    teacher_id: i64,
) -> Result<(), HttpResponse> {
    match service.get_storage(request).get_user_by_id(teacher_id).await {
        Ok(Some(user)) if user.role == UserRole::Teacher => Ok(()),
        Ok(Some(_)) => Err(bad_request(
            ErrorCode::ValidationFailed,
            "The subject teacher must have the teacher role",
        )),
        Ok(None) => Err(not_found(ErrorCode::UserNotFound, "Teacher not found")),
        Err(e) => Err(internal_error("Failed to check teacher", &e)),
    }
}

pub async fn create_subject(
    service: &GradingService,
    mut req: CreateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    req.name = req.name.trim().to_string();
    if let Err(msg) = validate_label(&req.name, 64) {
        return Ok(bad_request(ErrorCode::ValidationFailed, format!("Name: {msg}")));
    }
    if let Err(msg) = check_coefficient(req.coefficient) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    if let Err(resp) = load_class(&storage, req.class_id).await {
        return Ok(resp);
    }
    if let Some(teacher_id) = req.teacher_id
        && let Err(resp) = check_teacher(service, request, teacher_id).await
    {
        return Ok(resp);
    }

    match storage.get_subject_by_name(req.class_id, &req.name).await {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::Conflict,
                "A subject with this name already exists in the class",
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Failed to check subject name", &e)),
    }

    match storage.create_subject(req).await {
        Ok(subject) => {
            info!(
                "Subject '{}' created in class {} by user {}",
                subject.name, subject.class_id, uid
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                subject,
                "Subject created successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to create subject", &e)),
    }
}

pub async fn list_subjects(
    service: &GradingService,
    query: SubjectQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).list_subjects(query.class_id).await {
        Ok(subjects) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            subjects,
            "Subjects retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list subjects", &e)),
    }
}

pub async fn update_subject(
    service: &GradingService,
    subject_id: i64,
    mut req: UpdateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let existing = match storage.get_subject(subject_id).await {
        Ok(Some(subject)) => subject,
        Ok(None) => return Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => return Ok(internal_error("Failed to get subject", &e)),
    };

    if let Some(name) = req.name.as_mut() {
        *name = name.trim().to_string();
        if let Err(msg) = validate_label(name, 64) {
            return Ok(bad_request(ErrorCode::ValidationFailed, format!("Name: {msg}")));
        }
        match storage.get_subject_by_name(existing.class_id, name).await {
            Ok(Some(other)) if other.id != subject_id => {
                return Ok(conflict(
                    ErrorCode::Conflict,
                    "A subject with this name already exists in the class",
                ));
            }
            Ok(_) => {}
            Err(e) => return Ok(internal_error("Failed to check subject name", &e)),
        }
    }
    if let Some(coefficient) = req.coefficient
        && let Err(msg) = check_coefficient(coefficient)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Some(teacher_id) = req.teacher_id
        && let Err(resp) = check_teacher(service, request, teacher_id).await
    {
        return Ok(resp);
    }

    match storage.update_subject(subject_id, req).await {
        Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            subject,
            "Subject updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => Ok(internal_error("Failed to update subject", &e)),
    }
}

pub async fn delete_subject(
    service: &GradingService,
    subject_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.count_subject_evaluations(subject_id).await {
        Ok(0) => {}
        Ok(count) => {
            return Ok(conflict(
                ErrorCode::Conflict,
                format!("Subject has {count} evaluation(s) and cannot be deleted"),
            ));
        }
        Err(e) => return Ok(internal_error("Failed to count evaluations", &e)),
    }

    match storage.delete_subject(subject_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Subject deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => Ok(internal_error("Failed to delete subject", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_coefficient() {
        assert!(check_coefficient(1).is_ok());
        assert!(check_coefficient(5).is_ok());
        assert!(check_coefficient(0).is_err());
        assert!(check_coefficient(-2).is_err());
        assert!(check_coefficient(21).is_err());
    }
}
