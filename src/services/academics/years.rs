use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AcademicService;
use crate::models::{
    ApiResponse, ErrorCode,
    academics::{requests::CreateAcademicYearRequest, responses::AcademicYearDetail},
};
use crate::services::{bad_request, conflict, internal_error, not_found};
use crate::utils::validate::validate_label;

pub async fn create_year(
    service: &AcademicService,
    mut req: CreateAcademicYearRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    req.name = req.name.trim().to_string();
    if let Err(msg) = validate_label(&req.name, 32) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if req.start_date >= req.end_date {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "The start date must be before the end date",
        ));
    }

    let storage = service.get_storage(request);

    match storage.list_academic_years().await {
        Ok(years) if years.iter().any(|y| y.name.eq_ignore_ascii_case(&req.name)) => {
            return Ok(conflict(
                ErrorCode::Conflict,
                format!("Academic year '{}' already exists", req.name),
            ));
        }
        Ok(_) => {}
        Err(e) => return Ok(internal_error("Failed to check academic years", &e)),
    }

    match storage.create_academic_year(req).await {
        Ok(year) => {
            info!("Academic year {} created", year.name);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                year,
                "Academic year created successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to create academic year", &e)),
    }
}

pub async fn list_years(
    service: &AcademicService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).list_academic_years().await {
        Ok(years) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            years,
            "Academic years retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list academic years", &e)),
    }
}

pub async fn get_year(
    service: &AcademicService,
    year_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let year = match storage.get_academic_year(year_id).await {
        Ok(Some(year)) => year,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::AcademicYearNotFound,
                "Academic year not found",
            ));
        }
        Err(e) => return Ok(internal_error("Failed to get academic year", &e)),
    };

    match storage.list_trimesters(year_id).await {
        Ok(trimesters) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AcademicYearDetail { year, trimesters },
            "Academic year retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list trimesters", &e)),
    }
}

pub async fn set_current_year(
    service: &AcademicService,
    year_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service
        .get_storage(request)
        .set_current_academic_year(year_id)
        .await
    {
        Ok(Some(year)) => {
            info!("Academic year {} is now current", year.name);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                year,
                "Current academic year updated",
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::AcademicYearNotFound,
            "Academic year not found",
        )),
        Err(e) => Ok(internal_error("Failed to set current academic year", &e)),
    }
}
