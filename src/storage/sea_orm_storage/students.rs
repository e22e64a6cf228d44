//! 学生存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::payments::{Column as PaymentColumn, Entity as Payments};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    common::pagination::normalize_page,
    enrollments::entities::EnrollmentStatus,
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建学生，学号由服务层确定
    pub async fn create_student_impl(
        &self,
        matricule: String,
        req: CreateStudentRequest,
    ) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            matricule: Set(matricule),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            birth_date: Set(req.birth_date),
            gender: Set(req.gender.to_string()),
            guardian_name: Set(req.guardian_name),
            guardian_phone: Set(req.guardian_phone),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("创建学生失败"))?;

        Ok(result.into_student())
    }

    pub async fn get_student_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询学生失败"))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_matricule_impl(&self, matricule: &str) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::Matricule.eq(matricule))
            .one(&self.db)
            .await
            .map_err(db_err("查询学生失败"))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 班级内有效报名的学生 ID
    async fn active_student_ids_in_class(&self, class_id: i64) -> Result<Vec<i64>> {
        Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::StudentId)
            .filter(EnrollmentColumn::ClassId.eq(class_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.as_str()))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(db_err("查询班级学生失败"))
    }

    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Students::find();

        // 班级筛选（按当前有效报名）
        if let Some(class_id) = query.class_id {
            let ids = self.active_student_ids_in_class(class_id).await?;
            select = select.filter(Column::Id.is_in(ids));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Matricule.contains(&escaped))
                    .add(Column::FirstName.contains(&escaped))
                    .add(Column::LastName.contains(&escaped))
                    .add(Column::GuardianName.contains(&escaped)),
            );
        }

        select = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询学生总数失败"))?;

        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询学生列表失败"))?;

        Ok(PaginatedResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新学生信息
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(birth_date) = update.birth_date {
            model.birth_date = Set(Some(birth_date));
        }
        if let Some(gender) = update.gender {
            model.gender = Set(gender.to_string());
        }
        if let Some(guardian_name) = update.guardian_name {
            model.guardian_name = Set(Some(guardian_name));
        }
        if let Some(guardian_phone) = update.guardian_phone {
            model.guardian_phone = Set(Some(guardian_phone));
        }

        model
            .update(&self.db)
            .await
            .map_err(db_err("更新学生失败"))?;

        self.get_student_impl(id).await
    }

    /// 删除学生及其报名记录（调用方需确认无缴费）
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        Enrollments::delete_many()
            .filter(EnrollmentColumn::StudentId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err("删除学生报名失败"))?;

        let result = Students::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err("删除学生失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计学生的缴费记录（含已作废）
    pub async fn count_student_payments_impl(&self, student_id: i64) -> Result<u64> {
        let enrollment_ids: Vec<i64> = Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::Id)
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(db_err("查询学生报名失败"))?;

        if enrollment_ids.is_empty() {
            return Ok(0);
        }

        Payments::find()
            .filter(PaymentColumn::EnrollmentId.is_in(enrollment_ids))
            .count(&self.db)
            .await
            .map_err(db_err("统计学生缴费失败"))
    }

    /// 班级在读学生
    pub async fn list_active_students_in_class_impl(&self, class_id: i64) -> Result<Vec<Student>> {
        let ids = self.active_student_ids_in_class(class_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let students = Students::find()
            .filter(Column::Id.is_in(ids))
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .all(&self.db)
            .await
            .map_err(db_err("查询班级学生失败"))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    /// 导出学生
    pub async fn export_students_impl(&self, limit: u64) -> Result<Vec<Student>> {
        let students = Students::find()
            .order_by_asc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err("导出学生失败"))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }
}
