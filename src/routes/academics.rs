use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::academics::requests::{CreateAcademicYearRequest, CreateTrimesterRequest};
use crate::models::users::entities::UserRole;
use crate::services::AcademicService;
use crate::utils::SafeIDI64;

static ACADEMIC_SERVICE: Lazy<AcademicService> = Lazy::new(AcademicService::new_lazy);

pub async fn list_years(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_years(&req).await
}

pub async fn create_year(
    req: HttpRequest,
    body: web::Json<CreateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.create_year(body.into_inner(), &req).await
}

pub async fn get_year(req: HttpRequest, year_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_year(year_id.0, &req).await
}

pub async fn set_current_year(req: HttpRequest, year_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.set_current_year(year_id.0, &req).await
}

pub async fn list_trimesters(req: HttpRequest, year_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_trimesters(year_id.0, &req).await
}

pub async fn create_trimester(
    req: HttpRequest,
    year_id: SafeIDI64,
    body: web::Json<CreateTrimesterRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .create_trimester(year_id.0, body.into_inner(), &req)
        .await
}

pub async fn get_active_trimester(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_active_trimester(&req).await
}

pub async fn activate_trimester(
    req: HttpRequest,
    trimester_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.activate_trimester(trimester_id.0, &req).await
}

pub async fn close_trimester(req: HttpRequest, trimester_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.close_trimester(trimester_id.0, &req).await
}

// 配置路由
pub fn configure_academic_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/academic-years")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_years))
                    .route(
                        web::post()
                            .to(create_year)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .route("/{id}", web::get().to(get_year))
            .route(
                "/{id}/current",
                web::post()
                    .to(set_current_year)
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/{id}/trimesters")
                    .route(web::get().to(list_trimesters))
                    .route(
                        web::post()
                            .to(create_trimester)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );

    cfg.service(
        web::scope("/api/v1/trimesters")
            .wrap(middlewares::RequireJWT)
            .route("/active", web::get().to(get_active_trimester))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/{id}/activate", web::post().to(activate_trimester))
                    .route("/{id}/close", web::post().to(close_trimester)),
            ),
    );
}
