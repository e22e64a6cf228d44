use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use tracing::info;

use super::{GradingService, load_open_trimester};
use crate::models::grading::requests::{GradeEntry, RecordGradesRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user_id, internal_error, not_found};

/// 分数范围与重复学生校验；`None` 为缺考
fn check_entries(entries: &[GradeEntry], max_score: f64) -> Result<(), String> {
    if entries.is_empty() {
        return Err("At least one grade is required".to_string());
    }
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.student_id) {
            return Err(format!("Student {} appears more than once", entry.student_id));
        }
        if let Some(score) = entry.score
            && !(score.is_finite() && (0.0..=max_score).contains(&score))
        {
            return Err(format!(
                "Score {score} for student {} must be between 0 and {max_score}",
                entry.student_id
            ));
        }
    }
    Ok(())
}

pub async fn record_grades(
    service: &GradingService,
    evaluation_id: i64,
    req: RecordGradesRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let evaluation = match storage.get_evaluation(evaluation_id).await {
        Ok(Some(evaluation)) => evaluation,
        Ok(None) => {
            return Ok(not_found(ErrorCode::EvaluationNotFound, "Evaluation not found"));
        }
        Err(e) => return Ok(internal_error("Failed to get evaluation", &e)),
    };
    if let Err(msg) = check_entries(&req.grades, evaluation.max_score) {
        return Ok(bad_request(ErrorCode::InvalidScore, msg));
    }
    if let Err(resp) = load_open_trimester(&storage, evaluation.trimester_id).await {
        return Ok(resp);
    }
    let subject = match storage.get_subject(evaluation.subject_id).await {
        Ok(Some(subject)) => subject,
        Ok(None) => return Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => return Ok(internal_error("Failed to get subject", &e)),
    };

    for entry in &req.grades {
        match storage
            .find_active_enrollment_in_class(entry.student_id, subject.class_id)
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(bad_request(
                    ErrorCode::EnrollmentInactive,
                    format!(
                        "Student {} is not actively enrolled in the class",
                        entry.student_id
                    ),
                ));
            }
            Err(e) => return Ok(internal_error("Failed to check enrollment", &e)),
        }
    }

    match storage.upsert_grades(evaluation_id, req.grades, uid).await {
        Ok(grades) => {
            info!(
                "{} grade(s) recorded for evaluation {} by user {}",
                grades.len(),
                evaluation_id,
                uid
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(grades, "Grades recorded successfully")))
        }
        Err(e) => Ok(internal_error("Failed to record grades", &e)),
    }
}

pub async fn list_grades(
    service: &GradingService,
    evaluation_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_evaluation(evaluation_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(not_found(ErrorCode::EvaluationNotFound, "Evaluation not found"));
        }
        Err(e) => return Ok(internal_error("Failed to get evaluation", &e)),
    }

    match storage.list_grades(evaluation_id).await {
        Ok(grades) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            grades,
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list grades", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(student_id: i64, score: Option<f64>) -> GradeEntry {
        GradeEntry { student_id, score }
    }

    #[test]
    fn test_check_entries_accepts_bounds_and_absence() {
        let entries = vec![entry(1, Some(0.0)), entry(2, Some(20.0)), entry(3, None)];
        assert!(check_entries(&entries, 20.0).is_ok());
    }

    #[test]
    fn test_check_entries_rejects_out_of_range() {
        assert!(check_entries(&[entry(1, Some(10.5))], 10.0).is_err());
        assert!(check_entries(&[entry(1, Some(-1.0))], 20.0).is_err());
    }

    #[test]
    fn test_check_entries_rejects_duplicates_and_empty() {
        assert!(check_entries(&[entry(1, Some(5.0)), entry(1, Some(6.0))], 20.0).is_err());
        assert!(check_entries(&[], 20.0).is_err());
    }
}
