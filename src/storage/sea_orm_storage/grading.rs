//! 科目、评估、成绩与学期结果存储操作

use std::collections::HashSet;

use super::{SeaOrmStorage, db_err};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::evaluations::{
    ActiveModel as EvaluationActiveModel, Column as EvaluationColumn, Entity as Evaluations,
};
use crate::entity::grades::{ActiveModel as GradeActiveModel, Column as GradeColumn, Entity as Grades};
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::entity::trimester_results::{
    ActiveModel as ResultActiveModel, Column as ResultColumn, Entity as TrimesterResults,
};
use crate::errors::{Result, SchoolSysError};
use crate::models::enrollments::entities::EnrollmentStatus;
use crate::models::grading::{
    entities::{
        Evaluation, EvaluationKind, Grade, NewTrimesterResult, Subject, TrimesterResult,
    },
    requests::{
        CreateEvaluationRequest, CreateSubjectRequest, EvaluationQueryParams, GradeEntry,
        UpdateSubjectRequest,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    // ---------- 科目 ----------

    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(req.class_id),
            name: Set(req.name),
            coefficient: Set(req.coefficient),
            teacher_id: Set(req.teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("创建科目失败"))?;

        Ok(result.into_subject())
    }

    pub async fn get_subject_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询科目失败"))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn get_subject_by_name_impl(&self, class_id: i64, name: &str) -> Result<Option<Subject>> {
        let result = Subjects::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err("查询科目失败"))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn list_subjects_impl(&self, class_id: i64) -> Result<Vec<Subject>> {
        let subjects = Subjects::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err("查询科目列表失败"))?;

        Ok(subjects.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn update_subject_impl(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        if self.get_subject_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(coefficient) = update.coefficient {
            model.coefficient = Set(coefficient);
        }
        if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(Some(teacher_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(db_err("更新科目失败"))?;

        self.get_subject_impl(id).await
    }

    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除科目失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_subject_evaluations_impl(&self, subject_id: i64) -> Result<u64> {
        Evaluations::find()
            .filter(EvaluationColumn::SubjectId.eq(subject_id))
            .count(&self.db)
            .await
            .map_err(db_err("统计科目评估失败"))
    }

    // ---------- 评估 ----------

    pub async fn create_evaluation_impl(
        &self,
        req: CreateEvaluationRequest,
        max_score: f64,
        created_by: i64,
    ) -> Result<Evaluation> {
        let model = EvaluationActiveModel {
            subject_id: Set(req.subject_id),
            trimester_id: Set(req.trimester_id),
            kind: Set(req.kind.to_string()),
            title: Set(req.title),
            evaluation_date: Set(req.evaluation_date),
            max_score: Set(max_score),
            created_by: Set(created_by),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("创建评估失败"))?;

        Ok(result.into_evaluation())
    }

    pub async fn get_evaluation_impl(&self, id: i64) -> Result<Option<Evaluation>> {
        let result = Evaluations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询评估失败"))?;

        Ok(result.map(|m| m.into_evaluation()))
    }

    /// 列出评估，班级筛选经由科目
    pub async fn list_evaluations_impl(
        &self,
        query: EvaluationQueryParams,
    ) -> Result<Vec<Evaluation>> {
        let mut select = Evaluations::find();

        if let Some(class_id) = query.class_id {
            let subject_ids: Vec<i64> = Subjects::find()
                .select_only()
                .column(Column::Id)
                .filter(Column::ClassId.eq(class_id))
                .into_tuple::<i64>()
                .all(&self.db)
                .await
                .map_err(db_err("查询班级科目失败"))?;
            select = select.filter(EvaluationColumn::SubjectId.is_in(subject_ids));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(EvaluationColumn::SubjectId.eq(subject_id));
        }
        if let Some(trimester_id) = query.trimester_id {
            select = select.filter(EvaluationColumn::TrimesterId.eq(trimester_id));
        }

        let evaluations = select
            .order_by_asc(EvaluationColumn::SubjectId)
            .order_by_asc(EvaluationColumn::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询评估列表失败"))?;

        Ok(evaluations.into_iter().map(|m| m.into_evaluation()).collect())
    }

    pub async fn delete_evaluation_impl(&self, id: i64) -> Result<bool> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        Grades::delete_many()
            .filter(GradeColumn::EvaluationId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err("删除评估成绩失败"))?;

        let result = Evaluations::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err("删除评估失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 科目在该学期是否已有期末考试
    pub async fn has_composition_impl(&self, subject_id: i64, trimester_id: i64) -> Result<bool> {
        let count = Evaluations::find()
            .filter(EvaluationColumn::SubjectId.eq(subject_id))
            .filter(EvaluationColumn::TrimesterId.eq(trimester_id))
            .filter(EvaluationColumn::Kind.eq(EvaluationKind::Composition.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err("查询期末考试失败"))?;

        Ok(count > 0)
    }

    // ---------- 成绩 ----------

    /// 批量录入成绩，已存在的 (evaluation, student) 直接覆盖
    pub async fn upsert_grades_impl(
        &self,
        evaluation_id: i64,
        entries: Vec<GradeEntry>,
        recorded_by: i64,
    ) -> Result<Vec<Grade>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;
        let mut saved = Vec::with_capacity(entries.len());

        for entry in entries {
            let existing = Grades::find()
                .filter(GradeColumn::EvaluationId.eq(evaluation_id))
                .filter(GradeColumn::StudentId.eq(entry.student_id))
                .one(&txn)
                .await
                .map_err(db_err("查询成绩失败"))?;

            let model = match existing {
                Some(grade) => GradeActiveModel {
                    id: Set(grade.id),
                    score: Set(entry.score),
                    recorded_by: Set(recorded_by),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .update(&txn)
                .await
                .map_err(db_err("更新成绩失败"))?,
                None => GradeActiveModel {
                    evaluation_id: Set(evaluation_id),
                    student_id: Set(entry.student_id),
                    score: Set(entry.score),
                    recorded_by: Set(recorded_by),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(db_err("写入成绩失败"))?,
            };

            saved.push(model.into_grade());
        }

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(saved)
    }

    pub async fn list_grades_impl(&self, evaluation_id: i64) -> Result<Vec<Grade>> {
        let grades = Grades::find()
            .filter(GradeColumn::EvaluationId.eq(evaluation_id))
            .order_by_asc(GradeColumn::StudentId)
            .all(&self.db)
            .await
            .map_err(db_err("查询成绩失败"))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }

    pub async fn list_grades_for_evaluations_impl(
        &self,
        evaluation_ids: Vec<i64>,
    ) -> Result<Vec<Grade>> {
        if evaluation_ids.is_empty() {
            return Ok(Vec::new());
        }

        let grades = Grades::find()
            .filter(GradeColumn::EvaluationId.is_in(evaluation_ids))
            .all(&self.db)
            .await
            .map_err(db_err("查询成绩失败"))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }

    // ---------- 学期结果 ----------

    pub async fn has_trimester_results_impl(&self, class_id: i64, trimester_id: i64) -> Result<bool> {
        let count = TrimesterResults::find()
            .filter(ResultColumn::ClassId.eq(class_id))
            .filter(ResultColumn::TrimesterId.eq(trimester_id))
            .count(&self.db)
            .await
            .map_err(db_err("查询学期结果失败"))?;

        Ok(count > 0)
    }

    /// 删除旧结果后写入新结果
    pub async fn replace_trimester_results_impl(
        &self,
        class_id: i64,
        trimester_id: i64,
        results: Vec<NewTrimesterResult>,
    ) -> Result<Vec<TrimesterResult>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        TrimesterResults::delete_many()
            .filter(ResultColumn::ClassId.eq(class_id))
            .filter(ResultColumn::TrimesterId.eq(trimester_id))
            .exec(&txn)
            .await
            .map_err(db_err("清除学期结果失败"))?;

        let mut saved = Vec::with_capacity(results.len());
        for result in results {
            let details = serde_json::to_string(&result.subjects).map_err(|e| {
                SchoolSysError::serialization(format!("Failed to encode result details: {e}"))
            })?;

            let model = ResultActiveModel {
                class_id: Set(class_id),
                trimester_id: Set(trimester_id),
                student_id: Set(result.student_id),
                average: Set(result.average),
                rank: Set(result.rank),
                mention: Set(result.mention.map(|m| m.to_string())),
                details: Set(details),
                computed_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err("写入学期结果失败"))?;

            saved.push(model.into_trimester_result());
        }

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(saved)
    }

    /// 班级学期结果，按名次排序，无名次者在后
    pub async fn list_trimester_results_impl(
        &self,
        class_id: i64,
        trimester_id: i64,
    ) -> Result<Vec<TrimesterResult>> {
        let results = TrimesterResults::find()
            .filter(ResultColumn::ClassId.eq(class_id))
            .filter(ResultColumn::TrimesterId.eq(trimester_id))
            .order_by_asc(ResultColumn::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询学期结果失败"))?;

        let mut results: Vec<TrimesterResult> =
            results.into_iter().map(|m| m.into_trimester_result()).collect();
        results.sort_by_key(|r| (r.rank.is_none(), r.rank));

        Ok(results)
    }

    pub async fn get_student_trimester_result_impl(
        &self,
        student_id: i64,
        class_id: i64,
        trimester_id: i64,
    ) -> Result<Option<TrimesterResult>> {
        // 学期中转班的学生在两个班级都可能有结果
        let result = TrimesterResults::find()
            .filter(ResultColumn::StudentId.eq(student_id))
            .filter(ResultColumn::ClassId.eq(class_id))
            .filter(ResultColumn::TrimesterId.eq(trimester_id))
            .one(&self.db)
            .await
            .map_err(db_err("查询学期结果失败"))?;

        Ok(result.map(|m| m.into_trimester_result()))
    }

    /// 学期内有评估、仍有在读学生、但尚无结果的班级
    ///
    /// 学生全部退学的班级算不出任何结果，不阻止关闭学期。
    pub async fn list_classes_missing_results_impl(&self, trimester_id: i64) -> Result<Vec<i64>> {
        let subject_ids: Vec<i64> = Evaluations::find()
            .select_only()
            .column(EvaluationColumn::SubjectId)
            .filter(EvaluationColumn::TrimesterId.eq(trimester_id))
            .distinct()
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(db_err("查询学期评估失败"))?;

        if subject_ids.is_empty() {
            return Ok(Vec::new());
        }

        let class_ids: HashSet<i64> = Subjects::find()
            .select_only()
            .column(Column::ClassId)
            .filter(Column::Id.is_in(subject_ids))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(db_err("查询科目班级失败"))?
            .into_iter()
            .collect();

        let class_ids: HashSet<i64> = Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::ClassId)
            .filter(EnrollmentColumn::ClassId.is_in(class_ids))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.as_str()))
            .distinct()
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(db_err("查询在读班级失败"))?
            .into_iter()
            .collect();

        let computed: HashSet<i64> = TrimesterResults::find()
            .select_only()
            .column(ResultColumn::ClassId)
            .filter(ResultColumn::TrimesterId.eq(trimester_id))
            .distinct()
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(db_err("查询学期结果失败"))?
            .into_iter()
            .collect();

        let mut missing: Vec<i64> = class_ids.difference(&computed).copied().collect();
        missing.sort_unstable();

        Ok(missing)
    }
}
