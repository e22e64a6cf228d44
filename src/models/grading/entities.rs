use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 评估类型：随堂测验、课后作业、期末考试
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub enum EvaluationKind {
    Interrogation,
    Devoir,
    Composition,
}

string_enum!(EvaluationKind {
    Interrogation => "interrogation",
    Devoir => "devoir",
    Composition => "composition",
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub enum Mention {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Warning,
    Insufficient,
}

string_enum!(Mention {
    Excellent => "excellent",
    VeryGood => "very_good",
    Good => "good",
    Fair => "fair",
    Warning => "warning",
    Insufficient => "insufficient",
});

/// 年终决定：升级、留级、退学
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub enum AnnualDecision {
    Promoted,
    Repeat,
    Dismissed,
}

string_enum!(AnnualDecision {
    Promoted => "promoted",
    Repeat => "repeat",
    Dismissed => "dismissed",
});

// 科目，系数参与总平均计算
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct Subject {
    pub id: i64,
    pub class_id: i64,
    pub name: String,
    pub coefficient: i32,
    pub teacher_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct Evaluation {
    pub id: i64,
    pub subject_id: i64,
    pub trimester_id: i64,
    pub kind: EvaluationKind,
    pub title: String,
    pub evaluation_date: Option<NaiveDate>,
    pub max_score: f64,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 成绩，score 为空表示缺考
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct Grade {
    pub id: i64,
    pub evaluation_id: i64,
    pub student_id: i64,
    pub score: Option<f64>,
    pub recorded_by: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 单科平均（各分项已换算为 20 分制）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct SubjectAverage {
    pub subject_id: i64,
    pub subject_name: String,
    pub coefficient: i32,
    pub interrogation_average: Option<f64>,
    pub devoir_average: Option<f64>,
    pub composition: Option<f64>,
    pub average: Option<f64>,
    pub points: Option<f64>,
}

/// 学期结果
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct TrimesterResult {
    pub id: i64,
    pub class_id: i64,
    pub trimester_id: i64,
    pub student_id: i64,
    pub average: Option<f64>,
    pub rank: Option<i32>,
    pub mention: Option<Mention>,
    pub subjects: Vec<SubjectAverage>,
    pub computed_at: chrono::DateTime<chrono::Utc>,
}

/// 待写入的学期结果
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrimesterResult {
    pub student_id: i64,
    pub average: Option<f64>,
    pub rank: Option<i32>,
    pub mention: Option<Mention>,
    pub subjects: Vec<SubjectAverage>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct AnnualResult {
    pub student_id: i64,
    pub student_name: String,
    pub trimester_averages: Vec<Option<f64>>,
    pub annual_average: Option<f64>,
    pub rank: Option<i32>,
    pub decision: Option<AnnualDecision>,
}
