pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classes::requests::{ClassQueryParams, CreateClassRequest, UpdateClassRequest};
use crate::models::treasury::ledger::MAX_AMOUNT;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, internal_error};
use crate::storage::Storage;

lazy_storage_service!(ClassService);

impl ClassService {
    pub async fn create_class(
        &self,
        request: &HttpRequest,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, request, class_data).await
    }

    pub async fn get_class(&self, request: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        get::get_class(self, request, class_id).await
    }

    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_classes(self, request, query).await
    }

    pub async fn update_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
        update_data: UpdateClassRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_class(self, request, class_id, update_data).await
    }

    pub async fn delete_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_class(self, request, class_id).await
    }
}

/// 费用与容量的取值范围
pub(crate) fn check_fees_and_capacity(
    tuition_fee: Option<i64>,
    registration_fee: Option<i64>,
    capacity: Option<i32>,
) -> Result<(), &'static str> {
    if tuition_fee.is_some_and(|fee| fee < 0) || registration_fee.is_some_and(|fee| fee < 0) {
        return Err("Fees cannot be negative");
    }
    if tuition_fee.is_some_and(|fee| fee > MAX_AMOUNT)
        || registration_fee.is_some_and(|fee| fee > MAX_AMOUNT)
    {
        return Err("Fees exceed the allowed maximum");
    }
    if capacity.is_some_and(|c| c < 1) {
        return Err("Capacity must be at least 1");
    }
    Ok(())
}

/// 班主任必须是教师账号
pub(crate) async fn check_head_teacher(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_id(teacher_id).await {
        Ok(Some(user)) if user.role == UserRole::Teacher => Ok(()),
        Ok(Some(_)) => Err(bad_request(
            ErrorCode::ValidationFailed,
            "The head teacher must have the teacher role",
        )),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "Head teacher not found",
        ))),
        Err(e) => Err(internal_error("Failed to check head teacher", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_fees_and_capacity() {
        assert!(check_fees_and_capacity(Some(150_000), Some(10_000), Some(40)).is_ok());
        assert!(check_fees_and_capacity(None, None, None).is_ok());
        assert!(check_fees_and_capacity(Some(0), Some(0), Some(1)).is_ok());
        assert!(check_fees_and_capacity(Some(-1), None, None).is_err());
        assert!(check_fees_and_capacity(None, Some(-5), None).is_err());
        assert!(check_fees_and_capacity(None, None, Some(0)).is_err());
    }

    #[test]
    fn test_fee_upper_bound() {
        assert!(check_fees_and_capacity(Some(MAX_AMOUNT), Some(MAX_AMOUNT), Some(30)).is_ok());
        assert!(check_fees_and_capacity(Some(i64::MAX), Some(1), Some(30)).is_err());
        assert!(check_fees_and_capacity(Some(1), Some(MAX_AMOUNT + 1), None).is_err());
    }
}
