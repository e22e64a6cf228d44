//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod academic_years;
pub mod attendances;
pub mod classes;
pub mod enrollments;
pub mod evaluations;
pub mod grades;
pub mod payments;
pub mod rooms;
pub mod schedule_slots;
pub mod students;
pub mod subjects;
pub mod treasury_accounts;
pub mod treasury_movements;
pub mod trimester_results;
pub mod trimesters;
pub mod users;

use chrono::{DateTime, Utc};

/// Unix 秒转换为 UTC 时间
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
