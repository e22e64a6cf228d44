//! 学期结果与年度结果

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use super::{GradingService, calc, load_class, load_trimester};
use crate::config::AppConfig;
use crate::models::grading::entities::AnnualResult;
use crate::models::grading::requests::{
    AnnualResultsQueryParams, ComputeResultsRequest, EvaluationQueryParams, ResultsQueryParams,
};
use crate::models::grading::responses::{AnnualResultsResponse, ComputeResultsResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, current_user_id, internal_error};

pub async fn compute_trimester_results(
    service: &GradingService,
    req: ComputeResultsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let class = match load_class(&storage, req.class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    let trimester = match load_trimester(&storage, req.trimester_id).await {
        Ok(trimester) => trimester,
        Err(resp) => return Ok(resp),
    };
    if trimester.is_closed {
        return Ok(conflict(
            ErrorCode::TrimesterClosed,
            format!("Trimester '{}' is closed", trimester.name),
        ));
    }
    if class.academic_year_id != trimester.academic_year_id {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Trimester does not belong to the class's academic year",
        ));
    }

    if !req.force {
        match storage.has_trimester_results(class.id, trimester.id).await {
            Ok(true) => {
                return match storage.list_trimester_results(class.id, trimester.id).await {
                    Ok(results) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                        ComputeResultsResponse {
                            computed: false,
                            results,
                        },
                        "Results already computed",
                    ))),
                    Err(e) => Ok(internal_error("Failed to list results", &e)),
                };
            }
            Ok(false) => {}
            Err(e) => return Ok(internal_error("Failed to check results", &e)),
        }
    }

    let students = match storage.list_active_students_in_class(class.id).await {
        Ok(students) => students,
        Err(e) => return Ok(internal_error("Failed to list students", &e)),
    };
    let subjects = match storage.list_subjects(class.id).await {
        Ok(subjects) => subjects,
        Err(e) => return Ok(internal_error("Failed to list subjects", &e)),
    };
    let evaluations = match storage
        .list_evaluations(EvaluationQueryParams {
            class_id: Some(class.id),
            subject_id: None,
            trimester_id: Some(trimester.id),
        })
        .await
    {
        Ok(evaluations) => evaluations,
        Err(e) => return Ok(internal_error("Failed to list evaluations", &e)),
    };
    let grades = match storage
        .list_grades_for_evaluations(evaluations.iter().map(|e| e.id).collect())
        .await
    {
        Ok(grades) => grades,
        Err(e) => return Ok(internal_error("Failed to list grades", &e)),
    };

    let student_ids: Vec<i64> = students.iter().map(|s| s.id).collect();
    let computed = calc::build_trimester_results(
        &student_ids,
        &subjects,
        &evaluations,
        &grades,
        &AppConfig::get().grading,
    );

    match storage
        .replace_trimester_results(class.id, trimester.id, computed)
        .await
    {
        Ok(results) => {
            info!(
                "Computed {} result(s) for class {} trimester {} by user {}",
                results.len(),
                class.id,
                trimester.id,
                uid
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ComputeResultsResponse {
                    computed: true,
                    results,
                },
                "Results computed successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to store results", &e)),
    }
}

pub async fn list_trimester_results(
    service: &GradingService,
    query: ResultsQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service
        .get_storage(request)
        .list_trimester_results(query.class_id, query.trimester_id)
        .await
    {
        Ok(results) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            results,
            "Results retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list results", &e)),
    }
}

/// 年度结果按已保存的学期结果即时计算，不落库
pub async fn compute_annual_results(
    service: &GradingService,
    query: AnnualResultsQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let class = match load_class(&storage, query.class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    if class.academic_year_id != query.academic_year_id {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Class does not belong to this academic year",
        ));
    }

    let mut trimesters = match storage.list_trimesters(query.academic_year_id).await {
        Ok(trimesters) => trimesters,
        Err(e) => return Ok(internal_error("Failed to list trimesters", &e)),
    };
    trimesters.sort_by_key(|t| t.number);

    // 学生 -> 各学期总平均（按学期顺序）
    let mut averages: BTreeMap<i64, Vec<Option<f64>>> = BTreeMap::new();
    for (index, trimester) in trimesters.iter().enumerate() {
        let results = match storage.list_trimester_results(class.id, trimester.id).await {
            Ok(results) => results,
            Err(e) => return Ok(internal_error("Failed to list results", &e)),
        };
        for result in results {
            averages
                .entry(result.student_id)
                .or_insert_with(|| vec![None; trimesters.len()])[index] = result.average;
        }
    }

    let mut names: HashMap<i64, String> = match storage.list_active_students_in_class(class.id).await
    {
        Ok(students) => students.iter().map(|s| (s.id, s.full_name())).collect(),
        Err(e) => return Ok(internal_error("Failed to list students", &e)),
    };
    // 中途退学的学生仍保留年度记录
    for student_id in averages.keys() {
        if names.contains_key(student_id) {
            continue;
        }
        match storage.get_student(*student_id).await {
            Ok(Some(student)) => {
                names.insert(student.id, student.full_name());
            }
            Ok(None) => {}
            Err(e) => return Ok(internal_error("Failed to get student", &e)),
        }
    }

    let config = &AppConfig::get().grading;
    let annual: Vec<Option<f64>> = averages
        .values()
        .map(|per_trimester| calc::annual_average(per_trimester))
        .collect();
    let ranks = calc::competition_ranks(&annual);

    let mut results: Vec<AnnualResult> = averages
        .into_iter()
        .zip(annual.into_iter().zip(ranks))
        .map(|((student_id, trimester_averages), (annual_average, rank))| AnnualResult {
            student_id,
            student_name: names.get(&student_id).cloned().unwrap_or_default(),
            trimester_averages,
            annual_average,
            rank,
            decision: annual_average.map(|avg| calc::annual_decision(avg, config)),
        })
        .collect();
    results.sort_by(|a, b| a.student_name.cmp(&b.student_name));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AnnualResultsResponse {
            class_id: class.id,
            academic_year_id: query.academic_year_id,
            results,
        },
        "Annual results computed successfully",
    )))
}
