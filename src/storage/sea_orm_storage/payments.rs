//! 缴费存储操作

use super::treasury::apply_movement_on;
use super::{SeaOrmStorage, day_end_exclusive, day_start, db_err};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::payments::{ActiveModel, Column, Entity as Payments};
use crate::errors::{Result, SchoolSysError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    common::pagination::normalize_page,
    enrollments::entities::EnrollmentStatus,
    payments::{
        entities::{NewPayment, Payment, PaymentState},
        requests::PaymentListQuery,
    },
    treasury::entities::NewMovement,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 登记缴费
    ///
    /// 同一事务内：复核剩余应缴、写入缴费、贷记对应账户、追加流水。
    pub async fn record_payment_impl(&self, payment: NewPayment) -> Result<Payment> {
        let now = chrono::Utc::now().timestamp();
        let account = payment.method.account();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let enrollment = Enrollments::find_by_id(payment.enrollment_id)
            .one(&txn)
            .await
            .map_err(db_err("查询报名失败"))?
            .ok_or_else(|| SchoolSysError::not_found("Enrollment not found"))?;

        if enrollment.status != EnrollmentStatus::Active.as_str() {
            return Err(SchoolSysError::conflict("Enrollment is not active"));
        }

        let paid: i64 = Payments::find()
            .select_only()
            .column(Column::Amount)
            .filter(Column::EnrollmentId.eq(payment.enrollment_id))
            .filter(Column::Status.eq(PaymentState::Valid.as_str()))
            .into_tuple::<i64>()
            .all(&txn)
            .await
            .map_err(db_err("统计已缴金额失败"))?
            .into_iter()
            .sum();

        if payment.amount > enrollment.amount_due - paid {
            return Err(SchoolSysError::conflict(format!(
                "Payment exceeds the remaining balance {}",
                enrollment.amount_due - paid
            )));
        }

        let model = ActiveModel {
            enrollment_id: Set(payment.enrollment_id),
            receipt_number: Set(payment.receipt_number),
            amount: Set(payment.amount),
            method: Set(payment.method.to_string()),
            account: Set(account.to_string()),
            status: Set(PaymentState::Valid.to_string()),
            note: Set(payment.note),
            cancel_reason: Set(None),
            paid_at: Set(payment.paid_at.timestamp()),
            recorded_by: Set(payment.recorded_by),
            created_at: Set(now),
            cancelled_at: Set(None),
            ..Default::default()
        };

        let inserted = model
            .insert(&txn)
            .await
            .map_err(db_err("写入缴费失败"))?;

        apply_movement_on(
            &txn,
            NewMovement::payment(account, inserted.amount, inserted.id, payment.recorded_by),
        )
        .await?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(inserted.into_payment())
    }

    /// 作废缴费
    ///
    /// 同一事务内：标记作废、从入账账户借记、追加冲正流水。账户余额不足时整体回滚。
    pub async fn cancel_payment_impl(
        &self,
        id: i64,
        reason: String,
        cancelled_by: i64,
    ) -> Result<Payment> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let existing = Payments::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err("查询缴费失败"))?
            .ok_or_else(|| SchoolSysError::not_found("Payment not found"))?
            .into_payment();

        // 条件更新防止并发重复作废
        let result = Payments::update_many()
            .col_expr(
                Column::Status,
                sea_orm::sea_query::Expr::value(PaymentState::Cancelled.as_str()),
            )
            .col_expr(
                Column::CancelReason,
                sea_orm::sea_query::Expr::value(reason.clone()),
            )
            .col_expr(Column::CancelledAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(PaymentState::Valid.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err("作废缴费失败"))?;

        if result.rows_affected == 0 {
            return Err(SchoolSysError::conflict("Payment is already cancelled"));
        }

        apply_movement_on(
            &txn,
            NewMovement::payment_reversal(
                existing.account,
                existing.amount,
                existing.id,
                reason,
                cancelled_by,
            ),
        )
        .await?;

        let updated = Payments::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err("查询缴费失败"))?
            .ok_or_else(|| SchoolSysError::not_found("Payment not found"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(updated.into_payment())
    }

    pub async fn get_payment_impl(&self, id: i64) -> Result<Option<Payment>> {
        let result = Payments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询缴费失败"))?;

        Ok(result.map(|m| m.into_payment()))
    }

    /// 分页列出缴费
    pub async fn list_payments_with_pagination_impl(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaginatedResponse<Payment>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Payments::find();

        if let Some(enrollment_id) = query.enrollment_id {
            select = select.filter(Column::EnrollmentId.eq(enrollment_id));
        }
        if let Some(student_id) = query.student_id {
            let enrollment_ids: Vec<i64> = Enrollments::find()
                .select_only()
                .column(EnrollmentColumn::Id)
                .filter(EnrollmentColumn::StudentId.eq(student_id))
                .into_tuple::<i64>()
                .all(&self.db)
                .await
                .map_err(db_err("查询学生报名失败"))?;
            select = select.filter(Column::EnrollmentId.is_in(enrollment_ids));
        }
        if let Some(method) = query.method {
            select = select.filter(Column::Method.eq(method.as_str()));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(from) = query.from {
            select = select.filter(Column::PaidAt.gte(day_start(from)));
        }
        if let Some(to) = query.to {
            select = select.filter(Column::PaidAt.lt(day_end_exclusive(to)));
        }

        select = select.order_by_desc(Column::PaidAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询缴费总数失败"))?;

        let payments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询缴费列表失败"))?;

        Ok(PaginatedResponse {
            items: payments.into_iter().map(|m| m.into_payment()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 导出缴费
    pub async fn export_payments_impl(&self, limit: u64) -> Result<Vec<Payment>> {
        let payments = Payments::find()
            .order_by_asc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err("导出缴费失败"))?;

        Ok(payments.into_iter().map(|m| m.into_payment()).collect())
    }
}
