use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::schedule::requests::{
    CreateRoomRequest, CreateSlotRequest, SlotQueryParams, UpdateRoomRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ScheduleService;
use crate::utils::SafeIDI64;

static SCHEDULE_SERVICE: Lazy<ScheduleService> = Lazy::new(ScheduleService::new_lazy);

pub async fn list_rooms(req: HttpRequest) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.list_rooms(&req).await
}

pub async fn create_room(
    req: HttpRequest,
    body: web::Json<CreateRoomRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.create_room(body.into_inner(), &req).await
}

pub async fn update_room(
    req: HttpRequest,
    room_id: SafeIDI64,
    body: web::Json<UpdateRoomRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .update_room(room_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_room(req: HttpRequest, room_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.delete_room(room_id.0, &req).await
}

pub async fn list_slots(
    req: HttpRequest,
    query: web::Query<SlotQueryParams>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.list_slots(query.into_inner(), &req).await
}

pub async fn create_slot(
    req: HttpRequest,
    body: web::Json<CreateSlotRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.create_slot(body.into_inner(), &req).await
}

pub async fn delete_slot(req: HttpRequest, slot_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.delete_slot(slot_id.0, &req).await
}

// 配置路由
pub fn configure_schedule_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/rooms")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_rooms)).route(
                    web::post()
                        .to(create_room)
                        .wrap(middlewares::RequireRole::new_any(UserRole::registrar_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::registrar_roles()))
                    .route(web::put().to(update_room))
                    .route(web::delete().to(delete_room)),
            ),
    );

    cfg.service(
        web::scope("/api/v1/slots")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_slots)).route(
                    web::post()
                        .to(create_slot)
                        .wrap(middlewares::RequireRole::new_any(UserRole::registrar_roles())),
                ),
            )
            .route(
                "/{id}",
                web::delete()
                    .to(delete_slot)
                    .wrap(middlewares::RequireRole::new_any(UserRole::registrar_roles())),
            ),
    );
}
