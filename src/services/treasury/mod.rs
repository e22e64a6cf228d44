pub mod balances;
pub mod movements;
pub mod operations;
pub mod verify;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::treasury::requests::{
    AdjustmentRequest, ExpenseRequest, IncomeRequest, MovementQueryParams, TransferRequest,
};

lazy_storage_service!(TreasuryService);

impl TreasuryService {
    pub async fn get_balances(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        balances::get_balances(self, request).await
    }

    pub async fn transfer(
        &self,
        req: TransferRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        operations::transfer(self, req, request).await
    }

    pub async fn record_expense(
        &self,
        req: ExpenseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        operations::record_expense(self, req, request).await
    }

    pub async fn record_income(
        &self,
        req: IncomeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        operations::record_income(self, req, request).await
    }

    // 管理员更正
    pub async fn adjust(
        &self,
        req: AdjustmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        operations::adjust(self, req, request).await
    }

    pub async fn list_movements(
        &self,
        query: MovementQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        movements::list_movements(self, query, request).await
    }

    // 重放账本并与余额比对
    pub async fn verify(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        verify::verify(self, request).await
    }
}
