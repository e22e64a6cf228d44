use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PaymentService;
use crate::models::{
    ApiResponse, ErrorCode,
    payments::requests::{PaymentListQuery, PaymentQueryParams},
};
use crate::services::{bad_request, internal_error};

pub async fn list_payments(
    service: &PaymentService,
    query: PaymentQueryParams,
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
        .list_payments_with_pagination(PaymentListQuery::from(query))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Payment list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve payment list", &e)),
    }
}
