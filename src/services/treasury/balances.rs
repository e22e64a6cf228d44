use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TreasuryService;
use crate::config::AppConfig;
use crate::models::{ApiResponse, treasury::responses::TreasuryBalances};
use crate::services::internal_error;

pub async fn get_balances(
    service: &TreasuryService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).get_treasury_balances().await {
        Ok(balances) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TreasuryBalances::new(balances, AppConfig::get().treasury.currency.clone()),
            "Balances retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to get treasury balances", &e)),
    }
}
