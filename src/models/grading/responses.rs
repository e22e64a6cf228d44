use super::entities::{AnnualResult, Mention, SubjectAverage, TrimesterResult};
use crate::models::attendance::responses::AttendanceSummary;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct ComputeResultsResponse {
    /// 为 false 表示结果已存在，本次直接返回
    pub computed: bool,
    pub results: Vec<TrimesterResult>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct AnnualResultsResponse {
    pub class_id: i64,
    pub academic_year_id: i64,
    pub results: Vec<AnnualResult>,
}

/// 成绩单（由前端渲染为 PDF）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct ReportCard {
    pub school_name: String,
    pub academic_year: String,
    pub trimester: String,
    pub student_id: i64,
    pub student_name: String,
    pub matricule: String,
    pub class_name: String,
    pub subjects: Vec<SubjectAverage>,
    pub total_coefficients: i32,
    pub total_points: f64,
    pub general_average: Option<f64>,
    pub rank: Option<i32>,
    pub class_size: i64,
    pub class_average: Option<f64>,
    pub mention: Option<Mention>,
    pub attendance: AttendanceSummary,
}
