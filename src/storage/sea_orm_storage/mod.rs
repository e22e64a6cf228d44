//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod academics;
mod attendance;
mod classes;
mod enrollments;
mod grading;
mod payments;
mod schedule;
mod students;
mod treasury;
mod users;

#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{SchoolSysError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolSysError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolSysError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolSysError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolSysError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 将数据库错误包装为带操作说明的 DatabaseOperation
pub(crate) fn db_err(action: &'static str) -> impl Fn(sea_orm::DbErr) -> SchoolSysError {
    move |e| SchoolSysError::database_operation(format!("{action}: {e}"))
}

/// 日期对应的 UTC 零点时间戳
pub(crate) fn day_start(date: chrono::NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

/// 次日零点时间戳，用作区间的开区间上界
pub(crate) fn day_end_exclusive(date: chrono::NaiveDate) -> i64 {
    day_start(date) + 86_400
}

// Storage trait 实现
use crate::models::{
    PaginatedResponse,
    academics::{
        entities::{AcademicYear, Trimester},
        requests::{CreateAcademicYearRequest, CreateTrimesterRequest},
    },
    attendance::{entities::Attendance, requests::AttendanceEntry},
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
    },
    enrollments::{
        entities::{Enrollment, EnrollmentStatus, NewEnrollment},
        requests::EnrollmentListQuery,
        responses::EnrollmentDetail,
    },
    grading::{
        entities::{Evaluation, Grade, NewTrimesterResult, Subject, TrimesterResult},
        requests::{
            CreateEvaluationRequest, CreateSubjectRequest, EvaluationQueryParams, GradeEntry,
            UpdateSubjectRequest,
        },
    },
    payments::{
        entities::{NewPayment, Payment},
        requests::PaymentListQuery,
    },
    schedule::{
        entities::{NewScheduleSlot, Room, ScheduleSlot},
        requests::{CreateRoomRequest, SlotQueryParams, UpdateRoomRequest},
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    },
    treasury::{
        entities::{Movement, NewMovement},
        ledger::LedgerBalances,
        requests::MovementListQuery,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 学年与学期模块
    async fn create_academic_year(&self, req: CreateAcademicYearRequest) -> Result<AcademicYear> {
        self.create_academic_year_impl(req).await
    }

    async fn get_academic_year(&self, id: i64) -> Result<Option<AcademicYear>> {
        self.get_academic_year_impl(id).await
    }

    async fn list_academic_years(&self) -> Result<Vec<AcademicYear>> {
        self.list_academic_years_impl().await
    }

    async fn get_current_academic_year(&self) -> Result<Option<AcademicYear>> {
        self.get_current_academic_year_impl().await
    }

    async fn set_current_academic_year(&self, id: i64) -> Result<Option<AcademicYear>> {
        self.set_current_academic_year_impl(id).await
    }

    async fn create_trimester(
        &self,
        academic_year_id: i64,
        req: CreateTrimesterRequest,
    ) -> Result<Trimester> {
        self.create_trimester_impl(academic_year_id, req).await
    }

    async fn get_trimester(&self, id: i64) -> Result<Option<Trimester>> {
        self.get_trimester_impl(id).await
    }

    async fn list_trimesters(&self, academic_year_id: i64) -> Result<Vec<Trimester>> {
        self.list_trimesters_impl(academic_year_id).await
    }

    async fn get_active_trimester(&self) -> Result<Option<Trimester>> {
        self.get_active_trimester_impl().await
    }

    async fn activate_trimester(&self, id: i64) -> Result<Option<Trimester>> {
        self.activate_trimester_impl(id).await
    }

    async fn close_trimester(&self, id: i64) -> Result<Option<Trimester>> {
        self.close_trimester_impl(id).await
    }

    // 班级模块
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_by_name(
        &self,
        academic_year_id: i64,
        name: &str,
    ) -> Result<Option<Class>> {
        self.get_class_by_name_impl(academic_year_id, name).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    async fn count_active_enrollments(&self, class_id: i64) -> Result<i64> {
        self.count_active_enrollments_impl(class_id).await
    }

    // 学生模块
    async fn create_student(
        &self,
        matricule: String,
        req: CreateStudentRequest,
    ) -> Result<Student> {
        self.create_student_impl(matricule, req).await
    }

    async fn get_student(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_impl(id).await
    }

    async fn get_student_by_matricule(&self, matricule: &str) -> Result<Option<Student>> {
        self.get_student_by_matricule_impl(matricule).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    async fn count_student_payments(&self, student_id: i64) -> Result<u64> {
        self.count_student_payments_impl(student_id).await
    }

    async fn list_active_students_in_class(&self, class_id: i64) -> Result<Vec<Student>> {
        self.list_active_students_in_class_impl(class_id).await
    }

    // 报名模块
    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment> {
        self.create_enrollment_impl(enrollment).await
    }

    async fn get_enrollment(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(id).await
    }

    async fn get_enrollment_detail(&self, id: i64) -> Result<Option<EnrollmentDetail>> {
        self.get_enrollment_detail_impl(id).await
    }

    async fn find_enrollment_for_year(
        &self,
        student_id: i64,
        academic_year_id: i64,
    ) -> Result<Option<Enrollment>> {
        self.find_enrollment_for_year_impl(student_id, academic_year_id)
            .await
    }

    async fn find_active_enrollment_in_class(
        &self,
        student_id: i64,
        class_id: i64,
    ) -> Result<Option<Enrollment>> {
        self.find_active_enrollment_in_class_impl(student_id, class_id)
            .await
    }

    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<PaginatedResponse<EnrollmentDetail>> {
        self.list_enrollments_with_pagination_impl(query).await
    }

    async fn update_enrollment_status(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        self.update_enrollment_status_impl(id, status).await
    }

    async fn transfer_enrollment(
        &self,
        id: i64,
        class_id: i64,
        amount_due: i64,
    ) -> Result<Option<Enrollment>> {
        self.transfer_enrollment_impl(id, class_id, amount_due).await
    }

    async fn sum_valid_payments(&self, enrollment_id: i64) -> Result<i64> {
        self.sum_valid_payments_impl(enrollment_id).await
    }

    // 缴费模块
    async fn record_payment(&self, payment: NewPayment) -> Result<Payment> {
        self.record_payment_impl(payment).await
    }

    async fn cancel_payment(&self, id: i64, reason: String, cancelled_by: i64) -> Result<Payment> {
        self.cancel_payment_impl(id, reason, cancelled_by).await
    }

    async fn get_payment(&self, id: i64) -> Result<Option<Payment>> {
        self.get_payment_impl(id).await
    }

    async fn list_payments_with_pagination(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaginatedResponse<Payment>> {
        self.list_payments_with_pagination_impl(query).await
    }

    // 资金模块
    async fn get_treasury_balances(&self) -> Result<LedgerBalances> {
        self.get_treasury_balances_impl().await
    }

    async fn ensure_treasury_accounts(&self) -> Result<()> {
        self.ensure_treasury_accounts_impl().await
    }

    async fn apply_movement(&self, movement: NewMovement) -> Result<Movement> {
        self.apply_movement_impl(movement).await
    }

    async fn list_movements_with_pagination(
        &self,
        query: MovementListQuery,
    ) -> Result<PaginatedResponse<Movement>> {
        self.list_movements_with_pagination_impl(query).await
    }

    async fn list_all_movements(&self) -> Result<Vec<Movement>> {
        self.list_all_movements_impl().await
    }

    // 成绩模块
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(req).await
    }

    async fn get_subject(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_impl(id).await
    }

    async fn get_subject_by_name(&self, class_id: i64, name: &str) -> Result<Option<Subject>> {
        self.get_subject_by_name_impl(class_id, name).await
    }

    async fn list_subjects(&self, class_id: i64) -> Result<Vec<Subject>> {
        self.list_subjects_impl(class_id).await
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    async fn count_subject_evaluations(&self, subject_id: i64) -> Result<u64> {
        self.count_subject_evaluations_impl(subject_id).await
    }

    async fn create_evaluation(
        &self,
        req: CreateEvaluationRequest,
        max_score: f64,
        created_by: i64,
    ) -> Result<Evaluation> {
        self.create_evaluation_impl(req, max_score, created_by).await
    }

    async fn get_evaluation(&self, id: i64) -> Result<Option<Evaluation>> {
        self.get_evaluation_impl(id).await
    }

    async fn list_evaluations(&self, query: EvaluationQueryParams) -> Result<Vec<Evaluation>> {
        self.list_evaluations_impl(query).await
    }

    async fn delete_evaluation(&self, id: i64) -> Result<bool> {
        self.delete_evaluation_impl(id).await
    }

    async fn has_composition(&self, subject_id: i64, trimester_id: i64) -> Result<bool> {
        self.has_composition_impl(subject_id, trimester_id).await
    }

    async fn upsert_grades(
        &self,
        evaluation_id: i64,
        entries: Vec<GradeEntry>,
        recorded_by: i64,
    ) -> Result<Vec<Grade>> {
        self.upsert_grades_impl(evaluation_id, entries, recorded_by)
            .await
    }

    async fn list_grades(&self, evaluation_id: i64) -> Result<Vec<Grade>> {
        self.list_grades_impl(evaluation_id).await
    }

    async fn list_grades_for_evaluations(&self, evaluation_ids: Vec<i64>) -> Result<Vec<Grade>> {
        self.list_grades_for_evaluations_impl(evaluation_ids).await
    }

    async fn has_trimester_results(&self, class_id: i64, trimester_id: i64) -> Result<bool> {
        self.has_trimester_results_impl(class_id, trimester_id).await
    }

    async fn replace_trimester_results(
        &self,
        class_id: i64,
        trimester_id: i64,
        results: Vec<NewTrimesterResult>,
    ) -> Result<Vec<TrimesterResult>> {
        self.replace_trimester_results_impl(class_id, trimester_id, results)
            .await
    }

    async fn list_trimester_results(
        &self,
        class_id: i64,
        trimester_id: i64,
    ) -> Result<Vec<TrimesterResult>> {
        self.list_trimester_results_impl(class_id, trimester_id).await
    }

    async fn get_student_trimester_result(
        &self,
        student_id: i64,
        class_id: i64,
        trimester_id: i64,
    ) -> Result<Option<TrimesterResult>> {
        self.get_student_trimester_result_impl(student_id, class_id, trimester_id)
            .await
    }

    async fn list_classes_missing_results(&self, trimester_id: i64) -> Result<Vec<i64>> {
        self.list_classes_missing_results_impl(trimester_id).await
    }

    // 考勤模块
    async fn upsert_attendance(
        &self,
        class_id: i64,
        date: NaiveDate,
        entries: Vec<AttendanceEntry>,
        recorded_by: i64,
    ) -> Result<Vec<Attendance>> {
        self.upsert_attendance_impl(class_id, date, entries, recorded_by)
            .await
    }

    async fn list_attendance(&self, class_id: i64, date: NaiveDate) -> Result<Vec<Attendance>> {
        self.list_attendance_impl(class_id, date).await
    }

    async fn list_student_attendance(
        &self,
        student_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Attendance>> {
        self.list_student_attendance_impl(student_id, from, to).await
    }

    // 排课模块
    async fn create_room(&self, req: CreateRoomRequest) -> Result<Room> {
        self.create_room_impl(req).await
    }

    async fn get_room(&self, id: i64) -> Result<Option<Room>> {
        self.get_room_impl(id).await
    }

    async fn get_room_by_name(&self, name: &str) -> Result<Option<Room>> {
        self.get_room_by_name_impl(name).await
    }

    async fn list_rooms(&self) -> Result<Vec<Room>> {
        self.list_rooms_impl().await
    }

    async fn update_room(&self, id: i64, update: UpdateRoomRequest) -> Result<Option<Room>> {
        self.update_room_impl(id, update).await
    }

    async fn delete_room(&self, id: i64) -> Result<bool> {
        self.delete_room_impl(id).await
    }

    async fn count_room_slots(&self, room_id: i64) -> Result<u64> {
        self.count_room_slots_impl(room_id).await
    }

    async fn create_slot(&self, slot: NewScheduleSlot) -> Result<ScheduleSlot> {
        self.create_slot_impl(slot).await
    }

    async fn list_slots(&self, query: SlotQueryParams) -> Result<Vec<ScheduleSlot>> {
        self.list_slots_impl(query).await
    }

    async fn list_slots_on_weekday(&self, weekday: i32) -> Result<Vec<ScheduleSlot>> {
        self.list_slots_on_weekday_impl(weekday).await
    }

    async fn delete_slot(&self, id: i64) -> Result<bool> {
        self.delete_slot_impl(id).await
    }

    // 备份导出
    async fn export_students(&self, limit: u64) -> Result<Vec<Student>> {
        self.export_students_impl(limit).await
    }

    async fn export_enrollments(&self, limit: u64) -> Result<Vec<Enrollment>> {
        self.export_enrollments_impl(limit).await
    }

    async fn export_payments(&self, limit: u64) -> Result<Vec<Payment>> {
        self.export_payments_impl(limit).await
    }
}
