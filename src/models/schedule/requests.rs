use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct CreateRoomRequest {
    pub name: String,
    pub capacity: i32,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct UpdateRoomRequest {
    pub name: Option<String>,
    pub capacity: Option<i32>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct CreateSlotRequest {
    pub class_id: i64,
    pub subject_id: i64,
    pub room_id: i64,
    pub teacher_id: Option<i64>,
    pub weekday: i32,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct SlotQueryParams {
    pub class_id: Option<i64>,
    pub room_id: Option<i64>,
    pub teacher_id: Option<i64>,
}
