use super::entities::{AcademicYear, Trimester};
use serde::Serialize;
use ts_rs::TS;

// 学年详情（含学期）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct AcademicYearDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub year: AcademicYear,
    pub trimesters: Vec<Trimester>,
}
