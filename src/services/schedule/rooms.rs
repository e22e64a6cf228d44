use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ScheduleService;
use crate::models::schedule::requests::{CreateRoomRequest, UpdateRoomRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, current_user_id, internal_error, not_found};
use crate::utils::validate::validate_label;

fn check_capacity(capacity: i32) -> Result<(), &'static str> {
    if capacity < 1 {
        return Err("Room capacity must be at least 1");
    }
    Ok(())
}

pub async fn create_room(
    service: &ScheduleService,
    mut req: CreateRoomRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    req.name = req.name.trim().to_string();
    if let Err(msg) = validate_label(&req.name, 50) {
        return Ok(bad_request(ErrorCode::ValidationFailed, format!("Name: {msg}")));
    }
    if let Err(msg) = check_capacity(req.capacity) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    match storage.get_room_by_name(&req.name).await {
        Ok(Some(_)) => {
            return Ok(conflict(ErrorCode::Conflict, "A room with this name already exists"));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Failed to check room name", &e)),
    }

    match storage.create_room(req).await {
        Ok(room) => {
            info!("Room '{}' created by user {}", room.name, uid);
            Ok(HttpResponse::Created().json(ApiResponse::success(room, "Room created successfully")))
        }
        Err(e) => Ok(internal_error("Failed to create room", &e)),
    }
}

pub async fn list_rooms(service: &ScheduleService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    match service.get_storage(request).list_rooms().await {
        Ok(rooms) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            rooms,
            "Rooms retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list rooms", &e)),
    }
}

pub async fn update_room(
    service: &ScheduleService,
    room_id: i64,
    mut req: UpdateRoomRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(name) = req.name.as_mut() {
        *name = name.trim().to_string();
        if let Err(msg) = validate_label(name, 50) {
            return Ok(bad_request(ErrorCode::ValidationFailed, format!("Name: {msg}")));
        }
        match storage.get_room_by_name(name).await {
            Ok(Some(other)) if other.id != room_id => {
                return Ok(conflict(ErrorCode::Conflict, "A room with this name already exists"));
            }
            Ok(_) => {}
            Err(e) => return Ok(internal_error("Failed to check room name", &e)),
        }
    }
    if let Some(capacity) = req.capacity
        && let Err(msg) = check_capacity(capacity)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    match storage.update_room(room_id, req).await {
        Ok(Some(room)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            room,
            "Room updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::RoomNotFound, "Room not found")),
        Err(e) => Ok(internal_error("Failed to update room", &e)),
    }
}

pub async fn delete_room(
    service: &ScheduleService,
    room_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.count_room_slots(room_id).await {
        Ok(0) => {}
        Ok(count) => {
            return Ok(conflict(
                ErrorCode::Conflict,
                format!("Room is used by {count} schedule slot(s)"),
            ));
        }
        Err(e) => return Ok(internal_error("Failed to count slots", &e)),
    }

    match storage.delete_room(room_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Room deleted successfully"))),
        Ok(false) => Ok(not_found(ErrorCode::RoomNotFound, "Room not found")),
        Err(e) => Ok(internal_error("Failed to delete room", &e)),
    }
}
