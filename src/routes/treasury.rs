use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::treasury::requests::{
    AdjustmentRequest, ExpenseRequest, IncomeRequest, MovementQueryParams, TransferRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::TreasuryService;

static TREASURY_SERVICE: Lazy<TreasuryService> = Lazy::new(TreasuryService::new_lazy);

pub async fn get_balances(req: HttpRequest) -> ActixResult<HttpResponse> {
    TREASURY_SERVICE.get_balances(&req).await
}

pub async fn transfer(
    req: HttpRequest,
    body: web::Json<TransferRequest>,
) -> ActixResult<HttpResponse> {
    TREASURY_SERVICE.transfer(body.into_inner(), &req).await
}

pub async fn record_expense(
    req: HttpRequest,
    body: web::Json<ExpenseRequest>,
) -> ActixResult<HttpResponse> {
    TREASURY_SERVICE.record_expense(body.into_inner(), &req).await
}

pub async fn record_income(
    req: HttpRequest,
    body: web::Json<IncomeRequest>,
) -> ActixResult<HttpResponse> {
    TREASURY_SERVICE.record_income(body.into_inner(), &req).await
}

pub async fn adjust(
    req: HttpRequest,
    body: web::Json<AdjustmentRequest>,
) -> ActixResult<HttpResponse> {
    TREASURY_SERVICE.adjust(body.into_inner(), &req).await
}

pub async fn list_movements(
    req: HttpRequest,
    query: web::Query<MovementQueryParams>,
) -> ActixResult<HttpResponse> {
    TREASURY_SERVICE
        .list_movements(query.into_inner(), &req)
        .await
}

pub async fn verify(req: HttpRequest) -> ActixResult<HttpResponse> {
    TREASURY_SERVICE.verify(&req).await
}

// 配置路由
pub fn configure_treasury_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/treasury")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::finance_roles()))
                    .route("/balances", web::get().to(get_balances))
                    .route("/movements", web::get().to(list_movements))
                    .route("/verify", web::get().to(verify))
                    .service(
                        web::scope("")
                            .wrap(middlewares::RateLimit::treasury_write())
                            .route("/transfers", web::post().to(transfer))
                            .route("/expenses", web::post().to(record_expense))
                            .route("/incomes", web::post().to(record_income))
                            // 更正只允许管理员
                            .route(
                                "/adjustments",
                                web::post()
                                    .to(adjust)
                                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                            ),
                    ),
            ),
    );
}
