use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AcademicService;
use crate::models::{
    ApiResponse, ErrorCode,
    academics::{entities::Trimester, requests::CreateTrimesterRequest},
};
use crate::services::{bad_request, conflict, current_user_id, internal_error, not_found};

/// 学期编号与日期的基本校验
fn check_trimester_request(req: &CreateTrimesterRequest) -> Result<(), String> {
    if !(Trimester::MIN_NUMBER..=Trimester::MAX_NUMBER).contains(&req.number) {
        return Err(format!(
            "Trimester number must be between {} and {}",
            Trimester::MIN_NUMBER,
            Trimester::MAX_NUMBER
        ));
    }
    if req.start_date >= req.end_date {
        return Err("The start date must be before the end date".to_string());
    }
    Ok(())
}

pub async fn create_trimester(
    service: &AcademicService,
    year_id: i64,
    req: CreateTrimesterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = check_trimester_request(&req) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

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

    if !year.contains_range(req.start_date, req.end_date) {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            format!(
                "Trimester dates must fall within {} ({} to {})",
                year.name, year.start_date, year.end_date
            ),
        ));
    }

    match storage.list_trimesters(year_id).await {
        Ok(existing) if existing.iter().any(|t| t.number == req.number) => {
            return Ok(conflict(
                ErrorCode::Conflict,
                format!("Trimester {} already exists for {}", req.number, year.name),
            ));
        }
        Ok(_) => {}
        Err(e) => return Ok(internal_error("Failed to list trimesters", &e)),
    }

    match storage.create_trimester(year_id, req).await {
        Ok(trimester) => {
            info!("Trimester {} created for {}", trimester.number, year.name);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                trimester,
                "Trimester created successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to create trimester", &e)),
    }
}

pub async fn list_trimesters(
    service: &AcademicService,
    year_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).list_trimesters(year_id).await {
        Ok(trimesters) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            trimesters,
            "Trimesters retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list trimesters", &e)),
    }
}

pub async fn get_active_trimester(
    service: &AcademicService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).get_active_trimester().await {
        Ok(Some(trimester)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            trimester,
            "Active trimester retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::NoActiveTrimester,
            "No trimester is currently active",
        )),
        Err(e) => Ok(internal_error("Failed to get active trimester", &e)),
    }
}

pub async fn activate_trimester(
    service: &AcademicService,
    trimester_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_trimester(trimester_id).await {
        Ok(Some(t)) if t.is_closed => {
            return Ok(conflict(
                ErrorCode::TrimesterClosed,
                "A closed trimester cannot be activated",
            ));
        }
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::TrimesterNotFound, "Trimester not found")),
        Err(e) => return Ok(internal_error("Failed to get trimester", &e)),
    }

    match storage.activate_trimester(trimester_id).await {
        Ok(Some(trimester)) => {
            info!("Trimester {} activated", trimester.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                trimester,
                "Trimester activated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::TrimesterNotFound, "Trimester not found")),
        Err(e) => Ok(internal_error("Failed to activate trimester", &e)),
    }
}

pub async fn close_trimester(
    service: &AcademicService,
    trimester_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user_id = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.get_trimester(trimester_id).await {
        Ok(Some(t)) if t.is_closed => {
            return Ok(conflict(
                ErrorCode::TrimesterClosed,
                "Trimester is already closed",
            ));
        }
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::TrimesterNotFound, "Trimester not found")),
        Err(e) => return Ok(internal_error("Failed to get trimester", &e)),
    }

    // 有评估的班级都必须先算出学期结果
    match storage.list_classes_missing_results(trimester_id).await {
        Ok(missing) if !missing.is_empty() => {
            return Ok(conflict(
                ErrorCode::ResultsNotComputed,
                format!("Results are not computed for classes {missing:?}"),
            ));
        }
        Ok(_) => {}
        Err(e) => return Ok(internal_error("Failed to check trimester results", &e)),
    }

    match storage.close_trimester(trimester_id).await {
        Ok(Some(trimester)) => {
            info!("Trimester {} closed by user {}", trimester.id, user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                trimester,
                "Trimester closed successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::TrimesterNotFound, "Trimester not found")),
        Err(e) => Ok(internal_error("Failed to close trimester", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request(number: i32, start: (i32, u32, u32), end: (i32, u32, u32)) -> CreateTrimesterRequest {
        CreateTrimesterRequest {
            number,
            name: None,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        }
    }

    #[test]
    fn test_check_trimester_request() {
        assert!(check_trimester_request(&request(1, (2024, 9, 16), (2024, 12, 20))).is_ok());
        assert!(check_trimester_request(&request(0, (2024, 9, 16), (2024, 12, 20))).is_err());
        assert!(check_trimester_request(&request(4, (2024, 9, 16), (2024, 12, 20))).is_err());
        assert!(check_trimester_request(&request(2, (2025, 1, 6), (2025, 1, 6))).is_err());
    }
}
