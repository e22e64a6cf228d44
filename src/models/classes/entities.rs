use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 所属学年
    pub academic_year_id: i64,
    // 班级名称（学年内唯一）
    pub name: String,
    // 年级，例如 "6e"、"Tle"
    pub level: String,
    // 学费
    pub tuition_fee: i64,
    // 注册费
    pub registration_fee: i64,
    // 容量
    pub capacity: i32,
    // 班主任
    pub head_teacher_id: Option<i64>,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Class {
    /// 报名时的总应缴金额（未扣减优惠）
    pub fn total_fee(&self) -> i64 {
        self.tuition_fee.saturating_add(self.registration_fee)
    }
}
