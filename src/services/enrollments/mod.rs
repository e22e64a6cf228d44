pub mod create;
pub mod get;
pub mod list;
pub mod transfer;
pub mod withdraw;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::enrollments::requests::{
    CreateEnrollmentRequest, EnrollmentQueryParams, TransferEnrollmentRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};
use crate::storage::Storage;

lazy_storage_service!(EnrollmentService);

impl EnrollmentService {
    pub async fn enroll(
        &self,
        req: CreateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::enroll(self, req, request).await
    }

    pub async fn get_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_enrollment(self, enrollment_id, request).await
    }

    pub async fn list_enrollments(
        &self,
        query: EnrollmentQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_enrollments(self, query, request).await
    }

    pub async fn withdraw(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        withdraw::withdraw(self, enrollment_id, request).await
    }

    pub async fn transfer(
        &self,
        enrollment_id: i64,
        req: TransferEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        transfer::transfer(self, enrollment_id, req, request).await
    }
}

/// 写操作完成后返回带缴费进度的详情
pub(crate) async fn detail_response(
    storage: &Arc<dyn Storage>,
    enrollment_id: i64,
    created: bool,
    message: &str,
) -> HttpResponse {
    match storage.get_enrollment_detail(enrollment_id).await {
        Ok(Some(detail)) if created => {
            HttpResponse::Created().json(ApiResponse::success(detail, message))
        }
        Ok(Some(detail)) => HttpResponse::Ok().json(ApiResponse::success(detail, message)),
        Ok(None) => not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found"),
        Err(e) => internal_error("Failed to load enrollment", &e),
    }
}
