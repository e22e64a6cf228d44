//! 资金流水实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "treasury_movements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub kind: String,
    pub from_account: Option<String>,
    pub to_account: Option<String>,
    pub amount: i64,
    pub payment_id: Option<i64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_movement(self) -> crate::models::treasury::entities::Movement {
        use crate::models::treasury::entities::{AccountKind, Movement, MovementKind};

        let account = |value: Option<String>| value.and_then(|v| v.parse::<AccountKind>().ok());
        Movement {
            id: self.id,
            kind: self
                .kind
                .parse::<MovementKind>()
                .unwrap_or(MovementKind::Adjustment),
            from_account: account(self.from_account),
            to_account: account(self.to_account),
            amount: self.amount,
            payment_id: self.payment_id,
            category: self.category,
            description: self.description,
            created_by: self.created_by,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
