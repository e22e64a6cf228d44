pub mod cancel;
pub mod get;
pub mod list;
pub mod receipt;
pub mod record;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::payments::requests::{
    CancelPaymentRequest, CreatePaymentRequest, PaymentQueryParams,
};

lazy_storage_service!(PaymentService);

impl PaymentService {
    pub async fn record_payment(
        &self,
        req: CreatePaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::record_payment(self, req, request).await
    }

    pub async fn cancel_payment(
        &self,
        payment_id: i64,
        req: CancelPaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        cancel::cancel_payment(self, payment_id, req, request).await
    }

    pub async fn get_payment(
        &self,
        payment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_payment(self, payment_id, request).await
    }

    pub async fn list_payments(
        &self,
        query: PaymentQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_payments(self, query, request).await
    }

    pub async fn get_receipt(
        &self,
        payment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        receipt::get_receipt(self, payment_id, request).await
    }
}
