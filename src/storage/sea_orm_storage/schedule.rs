//! 教室与课表存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::rooms::{ActiveModel as RoomActiveModel, Column as RoomColumn, Entity as Rooms};
use crate::entity::schedule_slots::{ActiveModel, Column, Entity as ScheduleSlots};
use crate::errors::Result;
use crate::models::schedule::{
    entities::{NewScheduleSlot, Room, ScheduleSlot},
    requests::{CreateRoomRequest, SlotQueryParams, UpdateRoomRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_room_impl(&self, req: CreateRoomRequest) -> Result<Room> {
        let now = chrono::Utc::now().timestamp();

        let model = RoomActiveModel {
            name: Set(req.name),
            capacity: Set(req.capacity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("创建教室失败"))?;

        Ok(result.into_room())
    }

    pub async fn get_room_impl(&self, id: i64) -> Result<Option<Room>> {
        let result = Rooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询教室失败"))?;

        Ok(result.map(|m| m.into_room()))
    }

    pub async fn get_room_by_name_impl(&self, name: &str) -> Result<Option<Room>> {
        let result = Rooms::find()
            .filter(RoomColumn::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err("查询教室失败"))?;

        Ok(result.map(|m| m.into_room()))
    }

    pub async fn list_rooms_impl(&self) -> Result<Vec<Room>> {
        let rooms = Rooms::find()
            .order_by_asc(RoomColumn::Name)
            .all(&self.db)
            .await
            .map_err(db_err("查询教室列表失败"))?;

        Ok(rooms.into_iter().map(|m| m.into_room()).collect())
    }

    pub async fn update_room_impl(&self, id: i64, update: UpdateRoomRequest) -> Result<Option<Room>> {
        if self.get_room_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = RoomActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(capacity) = update.capacity {
            model.capacity = Set(capacity);
        }

        model
            .update(&self.db)
            .await
            .map_err(db_err("更新教室失败"))?;

        self.get_room_impl(id).await
    }

    pub async fn delete_room_impl(&self, id: i64) -> Result<bool> {
        let result = Rooms::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除教室失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_room_slots_impl(&self, room_id: i64) -> Result<u64> {
        ScheduleSlots::find()
            .filter(Column::RoomId.eq(room_id))
            .count(&self.db)
            .await
            .map_err(db_err("统计教室课时失败"))
    }

    pub async fn create_slot_impl(&self, slot: NewScheduleSlot) -> Result<ScheduleSlot> {
        let model = ActiveModel {
            class_id: Set(slot.class_id),
            subject_id: Set(slot.subject_id),
            room_id: Set(slot.room_id),
            teacher_id: Set(slot.teacher_id),
            weekday: Set(slot.weekday),
            start_minute: Set(slot.start_minute),
            end_minute: Set(slot.end_minute),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("创建课时失败"))?;

        Ok(result.into_slot())
    }

    pub async fn list_slots_impl(&self, query: SlotQueryParams) -> Result<Vec<ScheduleSlot>> {
        let mut select = ScheduleSlots::find();

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(room_id) = query.room_id {
            select = select.filter(Column::RoomId.eq(room_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        let slots = select
            .order_by_asc(Column::Weekday)
            .order_by_asc(Column::StartMinute)
            .all(&self.db)
            .await
            .map_err(db_err("查询课表失败"))?;

        Ok(slots.into_iter().map(|m| m.into_slot()).collect())
    }

    /// 某天的全部课时，用于冲突检测
    pub async fn list_slots_on_weekday_impl(&self, weekday: i32) -> Result<Vec<ScheduleSlot>> {
        let slots = ScheduleSlots::find()
            .filter(Column::Weekday.eq(weekday))
            .order_by_asc(Column::StartMinute)
            .all(&self.db)
            .await
            .map_err(db_err("查询课表失败"))?;

        Ok(slots.into_iter().map(|m| m.into_slot()).collect())
    }

    pub async fn delete_slot_impl(&self, id: i64) -> Result<bool> {
        let result = ScheduleSlots::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除课时失败"))?;

        Ok(result.rows_affected > 0)
    }
}
