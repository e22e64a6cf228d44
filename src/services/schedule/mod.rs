pub mod conflict;
pub mod rooms;
pub mod slots;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::schedule::requests::{
    CreateRoomRequest, CreateSlotRequest, SlotQueryParams, UpdateRoomRequest,
};

lazy_storage_service!(ScheduleService);

impl ScheduleService {
    pub async fn create_room(
        &self,
        req: CreateRoomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        rooms::create_room(self, req, request).await
    }

    pub async fn list_rooms(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        rooms::list_rooms(self, request).await
    }

    pub async fn update_room(
        &self,
        room_id: i64,
        req: UpdateRoomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        rooms::update_room(self, room_id, req, request).await
    }

    pub async fn delete_room(&self, room_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        rooms::delete_room(self, room_id, request).await
    }

    pub async fn create_slot(
        &self,
        req: CreateSlotRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        slots::create_slot(self, req, request).await
    }

    pub async fn list_slots(
        &self,
        query: SlotQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        slots::list_slots(self, query, request).await
    }

    pub async fn delete_slot(&self, slot_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        slots::delete_slot(self, slot_id, request).await
    }
}
