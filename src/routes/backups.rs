use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::BackupService;

static BACKUP_SERVICE: Lazy<BackupService> = Lazy::new(BackupService::new_lazy);

pub async fn create_backup(req: HttpRequest) -> ActixResult<HttpResponse> {
    BACKUP_SERVICE.create_backup(&req).await
}

pub async fn list_backups() -> ActixResult<HttpResponse> {
    BACKUP_SERVICE.list_backups().await
}

// 配置路由
pub fn configure_backup_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/backups")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_backups))
                    .route(
                        web::post()
                            .to(create_backup)
                            .wrap(middlewares::RateLimit::backup()),
                    ),
            ),
    );
}
