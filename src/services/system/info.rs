use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::SystemService;
use crate::models::{ApiResponse, AppStartTime, system::responses::SystemInfoResponse};

/// 运行时长（秒），时钟回拨时记为 0
fn uptime_seconds(
    started_at: chrono::DateTime<chrono::Utc>,
    now: chrono::DateTime<chrono::Utc>,
) -> i64 {
    (now - started_at).num_seconds().max(0)
}

/// 获取系统名称、版本与运行时长
pub async fn get_info(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    let now = chrono::Utc::now();
    let started_at = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|t| t.start_datetime)
        .unwrap_or(now);

    let response = SystemInfoResponse {
        system_name: config.app.system_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: config.app.environment.clone(),
        currency: config.treasury.currency.clone(),
        started_at,
        uptime_seconds: uptime_seconds(started_at, now),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "System info retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uptime_seconds() {
        let start = chrono::Utc::now();
        assert_eq!(uptime_seconds(start, start + chrono::Duration::seconds(90)), 90);
        assert_eq!(uptime_seconds(start, start - chrono::Duration::seconds(5)), 0);
    }
}
