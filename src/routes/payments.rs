use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::payments::requests::{
    CancelPaymentRequest, CreatePaymentRequest, PaymentQueryParams,
};
use crate::models::users::entities::UserRole;
use crate::services::PaymentService;
use crate::utils::SafeIDI64;

static PAYMENT_SERVICE: Lazy<PaymentService> = Lazy::new(PaymentService::new_lazy);

pub async fn list_payments(
    req: HttpRequest,
    query: web::Query<PaymentQueryParams>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.list_payments(query.into_inner(), &req).await
}

pub async fn record_payment(
    req: HttpRequest,
    body: web::Json<CreatePaymentRequest>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.record_payment(body.into_inner(), &req).await
}

pub async fn get_payment(req: HttpRequest, payment_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.get_payment(payment_id.0, &req).await
}

pub async fn cancel_payment(
    req: HttpRequest,
    payment_id: SafeIDI64,
    body: web::Json<CancelPaymentRequest>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .cancel_payment(payment_id.0, body.into_inner(), &req)
        .await
}

pub async fn get_receipt(req: HttpRequest, payment_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.get_receipt(payment_id.0, &req).await
}

// 配置路由
pub fn configure_payment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/payments")
            .wrap(middlewares::RequireRole::new_any(UserRole::finance_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_payments))
                    .route(
                        web::post()
                            .to(record_payment)
                            .wrap(middlewares::RateLimit::treasury_write()),
                    ),
            )
            .route("/{id}", web::get().to(get_payment))
            .route("/{id}/receipt", web::get().to(get_receipt))
            .route(
                "/{id}/cancel",
                web::post()
                    .to(cancel_payment)
                    .wrap(middlewares::RateLimit::treasury_write()),
            ),
    );
}
