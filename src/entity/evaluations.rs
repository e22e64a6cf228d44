//! 评估实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub subject_id: i64,
    pub trimester_id: i64,
    pub kind: String,
    pub title: String,
    pub evaluation_date: Option<chrono::NaiveDate>,
    pub max_score: f64,
    pub created_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
    #[sea_orm(has_many = "super::grades::Entity")]
    Grades,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grades.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_evaluation(self) -> crate::models::grading::entities::Evaluation {
        use crate::models::grading::entities::{Evaluation, EvaluationKind};

        Evaluation {
            id: self.id,
            subject_id: self.subject_id,
            trimester_id: self.trimester_id,
            kind: self
                .kind
                .parse::<EvaluationKind>()
                .unwrap_or(EvaluationKind::Interrogation),
            title: self.title,
            evaluation_date: self.evaluation_date,
            max_score: self.max_score,
            created_by: self.created_by,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
