use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TreasuryService;
use crate::models::{
    ApiResponse, ErrorCode,
    treasury::requests::{MovementListQuery, MovementQueryParams},
};
use crate::services::{bad_request, internal_error};

pub async fn list_movements(
    service: &TreasuryService,
    query: MovementQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let (Some(from), Some(to)) = (query.from, query.to)
        && from > to
    {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "'from' must not be after 'to'",
        ));
    }

    match service
        .get_storage(request)
        .list_movements_with_pagination(MovementListQuery::from(query))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Movements retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list movements", &e)),
    }
}
