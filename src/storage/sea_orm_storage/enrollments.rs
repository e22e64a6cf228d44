//! 报名存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, db_err};
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments, Model};
use crate::entity::payments::{Column as PaymentColumn, Entity as Payments};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    common::pagination::normalize_page,
    enrollments::{
        entities::{Enrollment, EnrollmentStatus, NewEnrollment},
        requests::EnrollmentListQuery,
        responses::EnrollmentDetail,
    },
    payments::entities::PaymentState,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建报名
    pub async fn create_enrollment_impl(&self, enrollment: NewEnrollment) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(enrollment.student_id),
            class_id: Set(enrollment.class_id),
            academic_year_id: Set(enrollment.academic_year_id),
            amount_due: Set(enrollment.amount_due),
            discount: Set(enrollment.discount),
            status: Set(EnrollmentStatus::Active.to_string()),
            enrolled_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("创建报名失败"))?;

        Ok(result.into_enrollment())
    }

    pub async fn get_enrollment_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询报名失败"))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn get_enrollment_detail_impl(&self, id: i64) -> Result<Option<EnrollmentDetail>> {
        let Some(model) = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询报名失败"))?
        else {
            return Ok(None);
        };

        Ok(self.build_details(vec![model]).await?.into_iter().next())
    }

    pub async fn find_enrollment_for_year_impl(
        &self,
        student_id: i64,
        academic_year_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::AcademicYearId.eq(academic_year_id))
            .one(&self.db)
            .await
            .map_err(db_err("查询报名失败"))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn find_active_enrollment_in_class_impl(
        &self,
        student_id: i64,
        class_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Status.eq(EnrollmentStatus::Active.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err("查询报名失败"))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 分页列出报名
    ///
    /// 缴费状态由缴费记录推导，按缴费状态筛选时在内存中分页。
    pub async fn list_enrollments_with_pagination_impl(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<PaginatedResponse<EnrollmentDetail>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Enrollments::find();

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(academic_year_id) = query.academic_year_id {
            select = select.filter(Column::AcademicYearId.eq(academic_year_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        select = select.order_by_desc(Column::EnrolledAt);

        if let Some(payment_status) = query.payment_status {
            let models = select
                .all(&self.db)
                .await
                .map_err(db_err("查询报名列表失败"))?;
            let matching: Vec<EnrollmentDetail> = self
                .build_details(models)
                .await?
                .into_iter()
                .filter(|d| d.payment_status == payment_status)
                .collect();
            let total = matching.len() as u64;
            let items = matching
                .into_iter()
                .skip(((page - 1) * size) as usize)
                .take(size as usize)
                .collect();

            return Ok(PaginatedResponse {
                items,
                pagination: PaginationInfo::new(page, size, total),
            });
        }

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询报名总数失败"))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询报名列表失败"))?;

        Ok(PaginatedResponse {
            items: self.build_details(models).await?,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 批量补全学生、班级与已缴金额
    async fn build_details(&self, models: Vec<Model>) -> Result<Vec<EnrollmentDetail>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = models.iter().map(|m| m.student_id).collect();
        let class_ids: Vec<i64> = models.iter().map(|m| m.class_id).collect();
        let enrollment_ids: Vec<i64> = models.iter().map(|m| m.id).collect();

        let students: HashMap<i64, (String, String)> = Students::find()
            .filter(StudentColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(db_err("查询学生失败"))?
            .into_iter()
            .map(|s| {
                let student = s.into_student();
                (student.id, (student.full_name(), student.matricule))
            })
            .collect();

        let classes: HashMap<i64, String> = Classes::find()
            .filter(ClassColumn::Id.is_in(class_ids))
            .all(&self.db)
            .await
            .map_err(db_err("查询班级失败"))?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let payments: Vec<(i64, i64)> = Payments::find()
            .select_only()
            .column(PaymentColumn::EnrollmentId)
            .column(PaymentColumn::Amount)
            .filter(PaymentColumn::EnrollmentId.is_in(enrollment_ids))
            .filter(PaymentColumn::Status.eq(PaymentState::Valid.as_str()))
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(db_err("查询缴费失败"))?;

        let mut paid: HashMap<i64, i64> = HashMap::new();
        for (enrollment_id, amount) in payments {
            *paid.entry(enrollment_id).or_default() += amount;
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let (student_name, matricule) =
                    students.get(&m.student_id).cloned().unwrap_or_default();
                let class_name = classes.get(&m.class_id).cloned().unwrap_or_default();
                let amount_paid = paid.get(&m.id).copied().unwrap_or(0);
                EnrollmentDetail::new(
                    m.into_enrollment(),
                    student_name,
                    matricule,
                    class_name,
                    amount_paid,
                )
            })
            .collect())
    }

    pub async fn update_enrollment_status_impl(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        if self.get_enrollment_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            status: Set(status.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(db_err("更新报名状态失败"))?;

        Ok(Some(result.into_enrollment()))
    }

    /// 转班：更新班级并重算应缴快照
    pub async fn transfer_enrollment_impl(
        &self,
        id: i64,
        class_id: i64,
        amount_due: i64,
    ) -> Result<Option<Enrollment>> {
        if self.get_enrollment_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            class_id: Set(class_id),
            amount_due: Set(amount_due),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(db_err("转班失败"))?;

        Ok(Some(result.into_enrollment()))
    }

    /// 有效缴费合计
    pub async fn sum_valid_payments_impl(&self, enrollment_id: i64) -> Result<i64> {
        let amounts: Vec<i64> = Payments::find()
            .select_only()
            .column(PaymentColumn::Amount)
            .filter(PaymentColumn::EnrollmentId.eq(enrollment_id))
            .filter(PaymentColumn::Status.eq(PaymentState::Valid.as_str()))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(db_err("统计已缴金额失败"))?;

        Ok(amounts.into_iter().sum())
    }

    /// 导出报名
    pub async fn export_enrollments_impl(&self, limit: u64) -> Result<Vec<Enrollment>> {
        let enrollments = Enrollments::find()
            .order_by_asc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err("导出报名失败"))?;

        Ok(enrollments.into_iter().map(|m| m.into_enrollment()).collect())
    }
}
