//! 学年与学期存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::academic_years::{
    ActiveModel as YearActiveModel, Column as YearColumn, Entity as AcademicYears,
};
use crate::entity::trimesters::{ActiveModel, Column, Entity as Trimesters};
use crate::errors::Result;
use crate::models::academics::{
    entities::{AcademicYear, Trimester},
    requests::{CreateAcademicYearRequest, CreateTrimesterRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建学年
    pub async fn create_academic_year_impl(
        &self,
        req: CreateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        let now = chrono::Utc::now().timestamp();

        let model = YearActiveModel {
            name: Set(req.name),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            is_current: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("创建学年失败"))?;

        Ok(result.into_academic_year())
    }

    pub async fn get_academic_year_impl(&self, id: i64) -> Result<Option<AcademicYear>> {
        let result = AcademicYears::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询学年失败"))?;

        Ok(result.map(|m| m.into_academic_year()))
    }

    pub async fn list_academic_years_impl(&self) -> Result<Vec<AcademicYear>> {
        let years = AcademicYears::find()
            .order_by_desc(YearColumn::StartDate)
            .all(&self.db)
            .await
            .map_err(db_err("查询学年列表失败"))?;

        Ok(years.into_iter().map(|m| m.into_academic_year()).collect())
    }

    pub async fn get_current_academic_year_impl(&self) -> Result<Option<AcademicYear>> {
        let result = AcademicYears::find()
            .filter(YearColumn::IsCurrent.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err("查询当前学年失败"))?;

        Ok(result.map(|m| m.into_academic_year()))
    }

    /// 设置当前学年，其余学年同时取消标记
    pub async fn set_current_academic_year_impl(&self, id: i64) -> Result<Option<AcademicYear>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        if AcademicYears::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err("查询学年失败"))?
            .is_none()
        {
            return Ok(None);
        }

        AcademicYears::update_many()
            .col_expr(YearColumn::IsCurrent, Expr::value(false))
            .col_expr(YearColumn::UpdatedAt, Expr::value(now))
            .filter(YearColumn::IsCurrent.eq(true))
            .filter(YearColumn::Id.ne(id))
            .exec(&txn)
            .await
            .map_err(db_err("更新学年失败"))?;

        AcademicYears::update_many()
            .col_expr(YearColumn::IsCurrent, Expr::value(true))
            .col_expr(YearColumn::UpdatedAt, Expr::value(now))
            .filter(YearColumn::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err("更新学年失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        self.get_academic_year_impl(id).await
    }

    /// 创建学期
    pub async fn create_trimester_impl(
        &self,
        academic_year_id: i64,
        req: CreateTrimesterRequest,
    ) -> Result<Trimester> {
        let now = chrono::Utc::now().timestamp();
        let name = req
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| Trimester::default_name(req.number));

        let model = ActiveModel {
            academic_year_id: Set(academic_year_id),
            number: Set(req.number),
            name: Set(name),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            is_active: Set(false),
            is_closed: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("创建学期失败"))?;

        Ok(result.into_trimester())
    }

    pub async fn get_trimester_impl(&self, id: i64) -> Result<Option<Trimester>> {
        let result = Trimesters::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询学期失败"))?;

        Ok(result.map(|m| m.into_trimester()))
    }

    pub async fn list_trimesters_impl(&self, academic_year_id: i64) -> Result<Vec<Trimester>> {
        let trimesters = Trimesters::find()
            .filter(Column::AcademicYearId.eq(academic_year_id))
            .order_by_asc(Column::Number)
            .all(&self.db)
            .await
            .map_err(db_err("查询学期列表失败"))?;

        Ok(trimesters.into_iter().map(|m| m.into_trimester()).collect())
    }

    pub async fn get_active_trimester_impl(&self) -> Result<Option<Trimester>> {
        let result = Trimesters::find()
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err("查询当前学期失败"))?;

        Ok(result.map(|m| m.into_trimester()))
    }

    /// 激活学期：同一事务内先停用全部，再激活目标学期
    pub async fn activate_trimester_impl(&self, id: i64) -> Result<Option<Trimester>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        if Trimesters::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err("查询学期失败"))?
            .is_none()
        {
            return Ok(None);
        }

        Trimesters::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::IsActive.eq(true))
            .exec(&txn)
            .await
            .map_err(db_err("停用学期失败"))?;

        Trimesters::update_many()
            .col_expr(Column::IsActive, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err("激活学期失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        self.get_trimester_impl(id).await
    }

    /// 关闭学期，关闭后同时取消激活
    pub async fn close_trimester_impl(&self, id: i64) -> Result<Option<Trimester>> {
        let now = chrono::Utc::now().timestamp();

        let result = Trimesters::update_many()
            .col_expr(Column::IsClosed, Expr::value(true))
            .col_expr(Column::IsActive, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err("关闭学期失败"))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_trimester_impl(id).await
    }
}
