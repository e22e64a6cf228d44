//! 班级存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
    },
    common::pagination::normalize_page,
    enrollments::entities::EnrollmentStatus,
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            academic_year_id: Set(req.academic_year_id),
            name: Set(req.name),
            level: Set(req.level),
            tuition_fee: Set(req.tuition_fee),
            registration_fee: Set(req.registration_fee),
            capacity: Set(req.capacity),
            head_teacher_id: Set(req.head_teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("创建班级失败"))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询班级失败"))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 学年内按名称查找班级
    pub async fn get_class_by_name_impl(
        &self,
        academic_year_id: i64,
        name: &str,
    ) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::AcademicYearId.eq(academic_year_id))
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err("查询班级失败"))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Classes::find();

        // 学年筛选
        if let Some(academic_year_id) = query.academic_year_id {
            select = select.filter(Column::AcademicYearId.eq(academic_year_id));
        }

        // 年级筛选
        if let Some(ref level) = query.level
            && !level.trim().is_empty()
        {
            select = select.filter(Column::Level.eq(level.trim()));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.contains(&escaped));
        }

        select = select
            .order_by_asc(Column::Level)
            .order_by_asc(Column::Name);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询班级总数失败"))?;

        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询班级列表失败"))?;

        Ok(PaginatedResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新班级信息
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        // 先检查班级是否存在
        let existing = self.get_class_by_id_impl(class_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(class_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(level) = update.level {
            model.level = Set(level);
        }

        if let Some(tuition_fee) = update.tuition_fee {
            model.tuition_fee = Set(tuition_fee);
        }

        if let Some(registration_fee) = update.registration_fee {
            model.registration_fee = Set(registration_fee);
        }

        if let Some(capacity) = update.capacity {
            model.capacity = Set(capacity);
        }

        if let Some(head_teacher_id) = update.head_teacher_id {
            model.head_teacher_id = Set(Some(head_teacher_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(db_err("更新班级失败"))?;

        self.get_class_by_id_impl(class_id).await
    }

    /// 删除班级
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除班级失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 班级在读人数
    pub async fn count_active_enrollments_impl(&self, class_id: i64) -> Result<i64> {
        let count = Enrollments::find()
            .filter(EnrollmentColumn::ClassId.eq(class_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err("统计班级人数失败"))?;

        Ok(count as i64)
    }
}
