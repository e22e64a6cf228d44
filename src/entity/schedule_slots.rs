//! 课表时段实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule_slots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub room_id: i64,
    pub teacher_id: Option<i64>,
    pub weekday: i32,
    pub start_minute: i32,
    pub end_minute: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rooms::Entity",
        from = "Column::RoomId",
        to = "super::rooms::Column::Id"
    )]
    Room,
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_slot(self) -> crate::models::schedule::entities::ScheduleSlot {
        crate::models::schedule::entities::ScheduleSlot {
            id: self.id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            room_id: self.room_id,
            teacher_id: self.teacher_id,
            weekday: self.weekday,
            start_minute: self.start_minute,
            end_minute: self.end_minute,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
