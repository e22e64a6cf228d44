use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 班级查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub academic_year_id: Option<i64>,
    pub level: Option<String>,
    pub search: Option<String>,
}

// 创建班级请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub academic_year_id: i64,
    pub name: String,
    pub level: String,
    pub tuition_fee: i64,
    #[serde(default)]
    pub registration_fee: i64,
    pub capacity: i32,
    pub head_teacher_id: Option<i64>,
}

// 更新班级请求
//
// 费用变更只影响之后的报名，已有报名保留当时的费用快照
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub level: Option<String>,
    pub tuition_fee: Option<i64>,
    pub registration_fee: Option<i64>,
    pub capacity: Option<i32>,
    pub head_teacher_id: Option<i64>,
}

// 班级列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub academic_year_id: Option<i64>,
    pub level: Option<String>,
    pub search: Option<String>,
}

impl From<ClassQueryParams> for ClassListQuery {
    fn from(params: ClassQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            academic_year_id: params.academic_year_id,
            level: params.level,
            search: params.search,
        }
    }
}
