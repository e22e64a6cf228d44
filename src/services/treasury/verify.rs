use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{info, warn};

use super::TreasuryService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::treasury::{ledger, responses::VerificationReport};
use crate::services::internal_error;
use crate::storage::Storage;

/// 读取余额和全部流水并比对，备份也复用此函数
pub(crate) async fn build_report(storage: &Arc<dyn Storage>) -> Result<VerificationReport> {
    let stored = storage.get_treasury_balances().await?;
    let movements = storage.list_all_movements().await?;
    Ok(ledger::verify(stored, &movements))
}

pub async fn verify(service: &TreasuryService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match build_report(&storage).await {
        Ok(report) => {
            if report.consistent {
                info!("Treasury verified over {} movements", report.movement_count);
            } else {
                warn!("Treasury ledger is inconsistent: {:?}", report.lines);
            }
            let message = if report.consistent {
                "Ledger is consistent"
            } else {
                "Ledger is inconsistent"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(report, message)))
        }
        Err(e) => Ok(internal_error("Failed to verify treasury", &e)),
    }
}
