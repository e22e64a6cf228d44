//! 学期结果实体，科目明细以 JSON 文本存储

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trimester_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub trimester_id: i64,
    pub student_id: i64,
    pub average: Option<f64>,
    pub rank: Option<i32>,
    pub mention: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub details: String,
    pub computed_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_trimester_result(self) -> crate::models::grading::entities::TrimesterResult {
        use crate::models::grading::entities::{Mention, TrimesterResult};

        let subjects = serde_json::from_str(&self.details).unwrap_or_else(|e| {
            tracing::warn!("Invalid result details for student {}: {}", self.student_id, e);
            Vec::new()
        });

        TrimesterResult {
            id: self.id,
            class_id: self.class_id,
            trimester_id: self.trimester_id,
            student_id: self.student_id,
            average: self.average,
            rank: self.rank,
            mention: self.mention.and_then(|m| m.parse::<Mention>().ok()),
            subjects,
            computed_at: super::to_datetime(self.computed_at),
        }
    }
}
