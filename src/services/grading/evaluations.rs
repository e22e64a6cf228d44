use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GradingService, load_class, load_open_trimester};
use crate::models::grading::entities::EvaluationKind;
use crate::models::grading::requests::{CreateEvaluationRequest, EvaluationQueryParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, current_user_id, internal_error, not_found};
use crate::utils::validate::validate_label;

/// 未指定满分时按 20 分制
const DEFAULT_MAX_SCORE: f64 = 20.0;

fn resolve_max_score(max_score: Option<f64>) -> Result<f64, &'static str> {
    match max_score {
        None => Ok(DEFAULT_MAX_SCORE),
        Some(value) if value.is_finite() && value > 0.0 => Ok(value),
        Some(_) => Err("Maximum score must be greater than zero"),
    }
}

pub async fn create_evaluation(
    service: &GradingService,
    mut req: CreateEvaluationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    req.title = req.title.trim().to_string();
    if let Err(msg) = validate_label(&req.title, 128) {
        return Ok(bad_request(ErrorCode::ValidationFailed, format!("Title: {msg}")));
    }
    let max_score = match resolve_max_score(req.max_score) {
        Ok(value) => value,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request);
    let subject = match storage.get_subject(req.subject_id).await {
        Ok(Some(subject)) => subject,
        Ok(None) => return Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => return Ok(internal_error("Failed to get subject", &e)),
    };
    let trimester = match load_open_trimester(&storage, req.trimester_id).await {
        Ok(trimester) => trimester,
        Err(resp) => return Ok(resp),
    };
    let class = match load_class(&storage, subject.class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    if class.academic_year_id != trimester.academic_year_id {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Trimester does not belong to the class's academic year",
        ));
    }
    if let Some(date) = req.evaluation_date
        && (date < trimester.start_date || date > trimester.end_date)
    {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Evaluation date must fall within the trimester",
        ));
    }

    if req.kind == EvaluationKind::Composition {
        match storage.has_composition(subject.id, trimester.id).await {
            Ok(true) => {
                return Ok(conflict(
                    ErrorCode::Conflict,
                    "This subject already has a composition for the trimester",
                ));
            }
            Ok(false) => {}
            Err(e) => return Ok(internal_error("Failed to check compositions", &e)),
        }
    }

    match storage.create_evaluation(req, max_score, uid).await {
        Ok(evaluation) => {
            info!(
                "Evaluation {} ({}) created for subject {} by user {}",
                evaluation.id, evaluation.kind, evaluation.subject_id, uid
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                evaluation,
                "Evaluation created successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to create evaluation", &e)),
    }
}

pub async fn list_evaluations(
    service: &GradingService,
    query: EvaluationQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).list_evaluations(query).await {
        Ok(evaluations) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            evaluations,
            "Evaluations retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list evaluations", &e)),
    }
}

pub async fn delete_evaluation(
    service: &GradingService,
    evaluation_id: i64,
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
    if let Err(resp) = load_open_trimester(&storage, evaluation.trimester_id).await {
        return Ok(resp);
    }

    match storage.delete_evaluation(evaluation_id).await {
        Ok(true) => {
            info!("Evaluation {} deleted by user {}", evaluation_id, uid);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Evaluation deleted successfully",
            )))
        }
        Ok(false) => Ok(not_found(ErrorCode::EvaluationNotFound, "Evaluation not found")),
        Err(e) => Ok(internal_error("Failed to delete evaluation", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_max_score() {
        assert_eq!(resolve_max_score(None), Ok(20.0));
        assert_eq!(resolve_max_score(Some(40.0)), Ok(40.0));
        assert!(resolve_max_score(Some(0.0)).is_err());
        assert!(resolve_max_score(Some(-10.0)).is_err());
        assert!(resolve_max_score(Some(f64::NAN)).is_err());
    }
}
