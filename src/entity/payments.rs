//! 缴费实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub enrollment_id: i64,
    #[sea_orm(unique)]
    pub receipt_number: String,
    pub amount: i64,
    pub method: String,
    pub account: String,
    pub status: String,
    pub note: Option<String>,
    pub cancel_reason: Option<String>,
    pub paid_at: i64,
    pub recorded_by: i64,
    pub created_at: i64,
    pub cancelled_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollments::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollments::Column::Id"
    )]
    Enrollment,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(self) -> crate::models::payments::entities::Payment {
        use crate::models::payments::entities::{Payment, PaymentMethod, PaymentState};

        let method = self
            .method
            .parse::<PaymentMethod>()
            .unwrap_or(PaymentMethod::Cash);
        Payment {
            id: self.id,
            enrollment_id: self.enrollment_id,
            receipt_number: self.receipt_number,
            amount: self.amount,
            account: self.account.parse().unwrap_or_else(|_| method.account()),
            method,
            status: self
                .status
                .parse::<PaymentState>()
                .unwrap_or(PaymentState::Valid),
            note: self.note,
            cancel_reason: self.cancel_reason,
            paid_at: super::to_datetime(self.paid_at),
            recorded_by: self.recorded_by,
            created_at: super::to_datetime(self.created_at),
            cancelled_at: self.cancelled_at.map(super::to_datetime),
        }
    }
}
