use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::{
    ApiResponse,
    enrollments::requests::{EnrollmentListQuery, EnrollmentQueryParams},
};
use crate::services::internal_error;

pub async fn list_enrollments(
    service: &EnrollmentService,
    query: EnrollmentQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service
        .get_storage(request)
        .list_enrollments_with_pagination(EnrollmentListQuery::from(query))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Enrollment list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve enrollment list", &e)),
    }
}
