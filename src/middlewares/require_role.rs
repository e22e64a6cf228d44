/*!
 * 基于角色的访问控制中间件，必须套在 RequireJWT 之内使用。
 *
 * ```rust,ignore
 * web::scope("/treasury")
 *     .wrap(RequireRole::new_any(UserRole::finance_roles()))
 *     .route("/balances", web::get().to(get_balances))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<[UserRole]>,
}

impl RequireRole {
    pub fn new(role: &UserRole) -> Self {
        Self::new_any(&[role])
    }

    /// 持有任一角色即可通过
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }
}

fn is_allowed(role: &UserRole, allowed: &[UserRole]) -> bool {
    allowed.contains(role)
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let allowed = self.allowed.clone();

        Box::pin(async move {
            // RequireJWT 已把用户放入 extensions
            let user = req
                .extensions()
                .get::<User>()
                .map(|u| (u.id, u.role.clone()));

            let denied = match user {
                Some((_, ref role)) if is_allowed(role, &allowed) => None,
                Some((user_id, role)) => {
                    info!(
                        "User {} with role {} denied on {} (allowed: {:?})",
                        user_id,
                        role,
                        req.path(),
                        allowed
                    );
                    Some((
                        StatusCode::FORBIDDEN,
                        ErrorCode::Forbidden,
                        "Access denied for this role",
                    ))
                }
                None => {
                    info!("No authenticated user on request to {}", req.path());
                    Some((
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    ))
                }
            };

            match denied {
                None => Ok(srv.call(req).await?.map_into_left_body()),
                Some((status, code, message)) => Ok(req.into_response(
                    create_error_response(status, code, message).map_into_right_body(),
                )),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_allowed() {
        let finance: Vec<UserRole> = UserRole::finance_roles()
            .iter()
            .map(|r| (*r).clone())
            .collect();
        assert!(is_allowed(&UserRole::Accountant, &finance));
        assert!(is_allowed(&UserRole::Admin, &finance));
        assert!(!is_allowed(&UserRole::Teacher, &finance));
    }
}
