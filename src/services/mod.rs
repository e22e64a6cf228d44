/// 为各服务生成 `new_lazy` 与 `get_storage`
macro_rules! lazy_storage_service {
    ($name:ident) => {
        pub struct $name {
            storage: Option<std::sync::Arc<dyn crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> std::sync::Arc<dyn crate::storage::Storage> {
                if let Some(storage) = &self.storage {
                    storage.clone()
                } else {
                    request
                        .app_data::<actix_web::web::Data<std::sync::Arc<dyn crate::storage::Storage>>>()
                        .expect("Storage not found in app data")
                        .get_ref()
                        .clone()
                }
            }
        }
    };
}

pub mod academics;
pub mod attendance;
pub mod auth;
pub mod backups;
pub mod classes;
pub mod enrollments;
pub mod grading;
pub mod payments;
pub mod schedule;
pub mod students;
pub mod system;
pub mod treasury;
pub mod users;

pub use academics::AcademicService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use backups::BackupService;
pub use classes::ClassService;
pub use enrollments::EnrollmentService;
pub use grading::GradingService;
pub use payments::PaymentService;
pub use schedule::ScheduleService;
pub use students::StudentService;
pub use system::SystemService;
pub use treasury::TreasuryService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse};
use tracing::error;

use crate::errors::SchoolSysError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

/// 将存储层错误转换为响应
///
/// 业务错误按类型映射状态码；其余视为服务端故障，使用 `fallback` 错误码并记录日志。
pub(crate) fn error_response(
    err: &SchoolSysError,
    fallback: ErrorCode,
    action: &str,
) -> HttpResponse {
    match err {
        SchoolSysError::Validation(msg) | SchoolSysError::DateParse(msg) => {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                msg.as_str(),
            ))
        }
        SchoolSysError::NotFound(msg) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::NotFound, msg.as_str()))
        }
        SchoolSysError::Conflict(msg) => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::Conflict, msg.as_str()))
        }
        SchoolSysError::InsufficientFunds(msg) => HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::InsufficientFunds, msg.as_str()),
        ),
        SchoolSysError::TrimesterClosed(msg) => HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::TrimesterClosed, msg.as_str()),
        ),
        _ => {
            error!("{action}: {err}");
            HttpResponse::InternalServerError()
                .json(ApiResponse::error_empty(fallback, format!("{action}: {err}")))
        }
    }
}

/// 500 响应的简写
pub(crate) fn internal_error(action: &str, err: &SchoolSysError) -> HttpResponse {
    error_response(err, ErrorCode::InternalServerError, action)
}

/// 当前登录用户 ID，缺失时返回 401 响应
pub(crate) fn current_user_id(request: &HttpRequest) -> Result<i64, HttpResponse> {
    RequireJWT::extract_user_id(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        ))
    })
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn conflict(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_response_status_mapping() {
        let cases = [
            (SchoolSysError::validation("bad"), StatusCode::BAD_REQUEST),
            (SchoolSysError::not_found("gone"), StatusCode::NOT_FOUND),
            (SchoolSysError::conflict("dup"), StatusCode::CONFLICT),
            (SchoolSysError::insufficient_funds("low"), StatusCode::CONFLICT),
            (SchoolSysError::trimester_closed("closed"), StatusCode::CONFLICT),
            (
                SchoolSysError::database_operation("down"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            let resp = error_response(&err, ErrorCode::InternalServerError, "test");
            assert_eq!(resp.status(), status, "{err}");
        }
    }
}
