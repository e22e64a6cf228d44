/*!
 * 速率限制中间件
 *
 * 固定窗口计数：键由端点前缀、调用方标识与窗口序号组成，窗口切换后计数自然归零。
 *
 * ```rust,ignore
 * web::scope("/api/v1/auth")
 *     .service(web::resource("/login").wrap(RateLimit::login()).route(web::post().to(login)))
 * ```
 *
 * - 已认证请求按用户 ID 计数，否则按客户端 IP
 * - 超过限制返回 429 并带 `Retry-After`
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

// 最长窗口为 1 小时，条目存活时间与之对齐
static RATE_LIMIT_CACHE: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: &'static str,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64, key_prefix: &'static str) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, 3600),
            key_prefix,
        }
    }

    /// 登录：5 次/分钟
    pub fn login() -> Self {
        Self::new(5, 60, "login")
    }

    /// 刷新令牌：10 次/分钟
    pub fn refresh_token() -> Self {
        Self::new(10, 60, "refresh")
    }

    /// 资金写操作：30 次/分钟/用户
    pub fn treasury_write() -> Self {
        Self::new(30, 60, "treasury")
    }

    /// 备份：2 次/10 分钟
    pub fn backup() -> Self {
        Self::new(2, 600, "backup")
    }
}

/// 计数键：前缀 + 标识 + 窗口序号
fn rate_key(prefix: &str, identifier: &str, now_secs: u64, window_secs: u64) -> String {
    format!("{prefix}:{identifier}:{}", now_secs / window_secs)
}

/// 当前窗口剩余秒数
fn seconds_until_reset(now_secs: u64, window_secs: u64) -> u64 {
    window_secs - now_secs % window_secs
}

fn client_identifier(req: &ServiceRequest) -> String {
    if let Some(user) = req.extensions().get::<User>() {
        return format!("user:{}", user.id);
    }

    let ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string())
        .filter(|ip| ip.parse::<std::net::IpAddr>().is_ok())
        .unwrap_or_else(|| "unknown".to_string());
    format!("ip:{ip}")
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please retry later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            config: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    config: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let config = self.config.clone();

        Box::pin(async move {
            let now = chrono::Utc::now().timestamp().max(0) as u64;
            let key = rate_key(
                config.key_prefix,
                &client_identifier(&req),
                now,
                config.window_secs,
            );

            let count = RATE_LIMIT_CACHE.get(&key).await.unwrap_or(0);
            if count >= config.max_requests {
                warn!(
                    "Rate limit exceeded for {} ({}/{})",
                    key, count, config.max_requests
                );
                let retry_after = seconds_until_reset(now, config.window_secs);
                return Ok(req.into_response(
                    create_rate_limit_response(retry_after).map_into_right_body(),
                ));
            }

            RATE_LIMIT_CACHE.insert(key, count + 1).await;

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        assert_eq!(RateLimit::backup().window_secs, 600);
        assert_eq!(RateLimit::new(1, 0, "x").window_secs, 1);
    }

    #[test]
    fn test_rate_key_changes_with_window() {
        let a = rate_key("login", "ip:1.2.3.4", 120, 60);
        let b = rate_key("login", "ip:1.2.3.4", 179, 60);
        let c = rate_key("login", "ip:1.2.3.4", 180, 60);
        assert_eq!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, rate_key("refresh", "ip:1.2.3.4", 120, 60));
    }

    #[test]
    fn test_seconds_until_reset() {
        assert_eq!(seconds_until_reset(120, 60), 60);
        assert_eq!(seconds_until_reset(179, 60), 1);
    }
}
