//! 考勤存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::attendances::{ActiveModel, Column, Entity as Attendances};
use crate::errors::Result;
use crate::models::attendance::{entities::Attendance, requests::AttendanceEntry};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 批量点名，同一学生同一天只保留一条
    pub async fn upsert_attendance_impl(
        &self,
        class_id: i64,
        date: NaiveDate,
        entries: Vec<AttendanceEntry>,
        recorded_by: i64,
    ) -> Result<Vec<Attendance>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;
        let mut saved = Vec::with_capacity(entries.len());

        for entry in entries {
            let existing = Attendances::find()
                .filter(Column::StudentId.eq(entry.student_id))
                .filter(Column::Date.eq(date))
                .one(&txn)
                .await
                .map_err(db_err("查询考勤失败"))?;

            let model = match existing {
                Some(record) => ActiveModel {
                    id: Set(record.id),
                    class_id: Set(class_id),
                    status: Set(entry.status.to_string()),
                    note: Set(entry.note),
                    recorded_by: Set(recorded_by),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .update(&txn)
                .await
                .map_err(db_err("更新考勤失败"))?,
                None => ActiveModel {
                    student_id: Set(entry.student_id),
                    class_id: Set(class_id),
                    date: Set(date),
                    status: Set(entry.status.to_string()),
                    note: Set(entry.note),
                    recorded_by: Set(recorded_by),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(db_err("写入考勤失败"))?,
            };

            saved.push(model.into_attendance());
        }

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(saved)
    }

    pub async fn list_attendance_impl(
        &self,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Attendance>> {
        let records = Attendances::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Date.eq(date))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(db_err("查询考勤失败"))?;

        Ok(records.into_iter().map(|m| m.into_attendance()).collect())
    }

    /// 学生考勤记录，日期闭区间
    pub async fn list_student_attendance_impl(
        &self,
        student_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Attendance>> {
        let mut select = Attendances::find().filter(Column::StudentId.eq(student_id));

        if let Some(from) = from {
            select = select.filter(Column::Date.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(Column::Date.lte(to));
        }

        let records = select
            .order_by_asc(Column::Date)
            .all(&self.db)
            .await
            .map_err(db_err("查询学生考勤失败"))?;

        Ok(records.into_iter().map(|m| m.into_attendance()).collect())
    }
}
