pub mod calc;
pub mod evaluations;
pub mod grades;
pub mod report_card;
pub mod results;
pub mod subjects;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::academics::entities::Trimester;
use crate::models::classes::entities::Class;
use crate::models::grading::requests::{
    AnnualResultsQueryParams, ComputeResultsRequest, CreateEvaluationRequest,
    CreateSubjectRequest, EvaluationQueryParams, RecordGradesRequest, ReportCardQueryParams,
    ResultsQueryParams, SubjectQueryParams, UpdateSubjectRequest,
};
use crate::services::{conflict, internal_error, not_found};
use crate::storage::Storage;

lazy_storage_service!(GradingService);

impl GradingService {
    pub async fn create_subject(
        &self,
        req: CreateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::create_subject(self, req, request).await
    }

    pub async fn list_subjects(
        &self,
        query: SubjectQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::list_subjects(self, query, request).await
    }

    pub async fn update_subject(
        &self,
        subject_id: i64,
        req: UpdateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::update_subject(self, subject_id, req, request).await
    }

    pub async fn delete_subject(
        &self,
        subject_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::delete_subject(self, subject_id, request).await
    }

    pub async fn create_evaluation(
        &self,
        req: CreateEvaluationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        evaluations::create_evaluation(self, req, request).await
    }

    pub async fn list_evaluations(
        &self,
        query: EvaluationQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        evaluations::list_evaluations(self, query, request).await
    }

    pub async fn delete_evaluation(
        &self,
        evaluation_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        evaluations::delete_evaluation(self, evaluation_id, request).await
    }

    pub async fn record_grades(
        &self,
        evaluation_id: i64,
        req: RecordGradesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grades::record_grades(self, evaluation_id, req, request).await
    }

    pub async fn list_grades(
        &self,
        evaluation_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grades::list_grades(self, evaluation_id, request).await
    }

    pub async fn compute_trimester_results(
        &self,
        req: ComputeResultsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        results::compute_trimester_results(self, req, request).await
    }

    pub async fn list_trimester_results(
        &self,
        query: ResultsQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        results::list_trimester_results(self, query, request).await
    }

    pub async fn compute_annual_results(
        &self,
        query: AnnualResultsQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        results::compute_annual_results(self, query, request).await
    }

    pub async fn get_report_card(
        &self,
        query: ReportCardQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        report_card::get_report_card(self, query, request).await
    }
}

pub(crate) async fn load_class(
    storage: &Arc<dyn Storage>,
    class_id: i64,
) -> Result<Class, HttpResponse> {
    match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => Ok(class),
        Ok(None) => Err(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Err(internal_error("Failed to get class", &e)),
    }
}

pub(crate) async fn load_trimester(
    storage: &Arc<dyn Storage>,
    trimester_id: i64,
) -> Result<Trimester, HttpResponse> {
    match storage.get_trimester(trimester_id).await {
        Ok(Some(trimester)) => Ok(trimester),
        Ok(None) => Err(not_found(ErrorCode::TrimesterNotFound, "Trimester not found")),
        Err(e) => Err(internal_error("Failed to get trimester", &e)),
    }
}

/// 已结束的学期不可再修改成绩数据
pub(crate) async fn load_open_trimester(
    storage: &Arc<dyn Storage>,
    trimester_id: i64,
) -> Result<Trimester, HttpResponse> {
    let trimester = load_trimester(storage, trimester_id).await?;
    if trimester.is_closed {
        return Err(conflict(
            ErrorCode::TrimesterClosed,
            format!("Trimester '{}' is closed", trimester.name),
        ));
    }
    Ok(trimester)
}
