use super::entities::EvaluationKind;
use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct CreateSubjectRequest {
    pub class_id: i64,
    pub name: String,
    pub coefficient: i32,
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub coefficient: Option<i32>,
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct SubjectQueryParams {
    pub class_id: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct CreateEvaluationRequest {
    pub subject_id: i64,
    pub trimester_id: i64,
    pub kind: EvaluationKind,
    pub title: String,
    pub evaluation_date: Option<NaiveDate>,
    pub max_score: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct EvaluationQueryParams {
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub trimester_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeEntry {
    pub student_id: i64,
    pub score: Option<f64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct RecordGradesRequest {
    pub grades: Vec<GradeEntry>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct ComputeResultsRequest {
    pub class_id: i64,
    pub trimester_id: i64,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct ResultsQueryParams {
    pub class_id: i64,
    pub trimester_id: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct AnnualResultsQueryParams {
    pub class_id: i64,
    pub academic_year_id: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct ReportCardQueryParams {
    pub student_id: i64,
    pub trimester_id: i64,
}
