use super::entities::Class;
use serde::Serialize;
use ts_rs::TS;

// 班级详情（含当前在读人数）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub active_enrollments: i64,
    pub seats_left: i64,
}
