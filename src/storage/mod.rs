use std::sync::Arc;

use chrono::NaiveDate;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段已是哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 学年与学期
    async fn create_academic_year(&self, req: CreateAcademicYearRequest) -> Result<AcademicYear>;
    async fn get_academic_year(&self, id: i64) -> Result<Option<AcademicYear>>;
    async fn list_academic_years(&self) -> Result<Vec<AcademicYear>>;
    async fn get_current_academic_year(&self) -> Result<Option<AcademicYear>>;
    // 在事务中取消其他学年的当前标记
    async fn set_current_academic_year(&self, id: i64) -> Result<Option<AcademicYear>>;
    async fn create_trimester(
        &self,
        academic_year_id: i64,
        req: CreateTrimesterRequest,
    ) -> Result<Trimester>;
    async fn get_trimester(&self, id: i64) -> Result<Option<Trimester>>;
    async fn list_trimesters(&self, academic_year_id: i64) -> Result<Vec<Trimester>>;
    async fn get_active_trimester(&self) -> Result<Option<Trimester>>;
    // 在事务中停用其他学期并激活该学期
    async fn activate_trimester(&self, id: i64) -> Result<Option<Trimester>>;
    async fn close_trimester(&self, id: i64) -> Result<Option<Trimester>>;

    /// 班级管理方法
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn get_class_by_name(&self, academic_year_id: i64, name: &str)
    -> Result<Option<Class>>;
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>>;
    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>>;
    async fn delete_class(&self, class_id: i64) -> Result<bool>;
    // 班级当前在读人数
    async fn count_active_enrollments(&self, class_id: i64) -> Result<i64>;

    /// 学生管理方法
    async fn create_student(&self, matricule: String, req: CreateStudentRequest)
    -> Result<Student>;
    async fn get_student(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_matricule(&self, matricule: &str) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn delete_student(&self, id: i64) -> Result<bool>;
    async fn count_student_payments(&self, student_id: i64) -> Result<u64>;
    // 班级在读学生（按姓名排序）
    async fn list_active_students_in_class(&self, class_id: i64) -> Result<Vec<Student>>;

    /// 报名管理方法
    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment>;
    async fn get_enrollment(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn get_enrollment_detail(&self, id: i64) -> Result<Option<EnrollmentDetail>>;
    async fn find_enrollment_for_year(
        &self,
        student_id: i64,
        academic_year_id: i64,
    ) -> Result<Option<Enrollment>>;
    // 学生在某班级的有效报名
    async fn find_active_enrollment_in_class(
        &self,
        student_id: i64,
        class_id: i64,
    ) -> Result<Option<Enrollment>>;
    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<PaginatedResponse<EnrollmentDetail>>;
    async fn update_enrollment_status(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>>;
    async fn transfer_enrollment(
        &self,
        id: i64,
        class_id: i64,
        amount_due: i64,
    ) -> Result<Option<Enrollment>>;
    // 有效缴费合计
    async fn sum_valid_payments(&self, enrollment_id: i64) -> Result<i64>;

    /// 缴费管理方法
    // 在一个事务内写入缴费、入账并追加流水
    async fn record_payment(&self, payment: NewPayment) -> Result<Payment>;
    // 在一个事务内作废缴费、出账并追加冲正流水
    async fn cancel_payment(&self, id: i64, reason: String, cancelled_by: i64) -> Result<Payment>;
    async fn get_payment(&self, id: i64) -> Result<Option<Payment>>;
    async fn list_payments_with_pagination(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaginatedResponse<Payment>>;

    /// 资金管理方法
    async fn get_treasury_balances(&self) -> Result<LedgerBalances>;
    // 确保三个账户存在
    async fn ensure_treasury_accounts(&self) -> Result<()>;
    // 在一个事务内更新余额并写入流水，余额不足时返回 InsufficientFunds
    async fn apply_movement(&self, movement: NewMovement) -> Result<Movement>;
    async fn list_movements_with_pagination(
        &self,
        query: MovementListQuery,
    ) -> Result<PaginatedResponse<Movement>>;
    // 全部流水，按写入顺序
    async fn list_all_movements(&self) -> Result<Vec<Movement>>;

    /// 科目、评估与成绩
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject(&self, id: i64) -> Result<Option<Subject>>;
    async fn get_subject_by_name(&self, class_id: i64, name: &str) -> Result<Option<Subject>>;
    async fn list_subjects(&self, class_id: i64) -> Result<Vec<Subject>>;
    async fn update_subject(&self, id: i64, update: UpdateSubjectRequest)
    -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;
    async fn count_subject_evaluations(&self, subject_id: i64) -> Result<u64>;
    async fn create_evaluation(
        &self,
        req: CreateEvaluationRequest,
        max_score: f64,
        created_by: i64,
    ) -> Result<Evaluation>;
    async fn get_evaluation(&self, id: i64) -> Result<Option<Evaluation>>;
    async fn list_evaluations(&self, query: EvaluationQueryParams) -> Result<Vec<Evaluation>>;
    // 删除评估及其成绩
    async fn delete_evaluation(&self, id: i64) -> Result<bool>;
    async fn has_composition(&self, subject_id: i64, trimester_id: i64) -> Result<bool>;
    // 在一个事务内按 (evaluation, student) 写入或覆盖成绩
    async fn upsert_grades(
        &self,
        evaluation_id: i64,
        entries: Vec<GradeEntry>,
        recorded_by: i64,
    ) -> Result<Vec<Grade>>;
    async fn list_grades(&self, evaluation_id: i64) -> Result<Vec<Grade>>;
    async fn list_grades_for_evaluations(&self, evaluation_ids: Vec<i64>) -> Result<Vec<Grade>>;

    /// 学期结果
    async fn has_trimester_results(&self, class_id: i64, trimester_id: i64) -> Result<bool>;
    // 在一个事务内替换班级的学期结果
    async fn replace_trimester_results(
        &self,
        class_id: i64,
        trimester_id: i64,
        results: Vec<NewTrimesterResult>,
    ) -> Result<Vec<TrimesterResult>>;
    async fn list_trimester_results(
        &self,
        class_id: i64,
        trimester_id: i64,
    ) -> Result<Vec<TrimesterResult>>;
    // 限定在学生当前所在班级
    async fn get_student_trimester_result(
        &self,
        student_id: i64,
        class_id: i64,
        trimester_id: i64,
    ) -> Result<Option<TrimesterResult>>;
    // 有评估但尚未计算结果的班级
    async fn list_classes_missing_results(&self, trimester_id: i64) -> Result<Vec<i64>>;

    /// 考勤
    // 在一个事务内按 (student, date) 写入或覆盖考勤
    async fn upsert_attendance(
        &self,
        class_id: i64,
        date: NaiveDate,
        entries: Vec<AttendanceEntry>,
        recorded_by: i64,
    ) -> Result<Vec<Attendance>>;
    async fn list_attendance(&self, class_id: i64, date: NaiveDate) -> Result<Vec<Attendance>>;
    async fn list_student_attendance(
        &self,
        student_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Attendance>>;

    /// 教室与课表
    async fn create_room(&self, req: CreateRoomRequest) -> Result<Room>;
    async fn get_room(&self, id: i64) -> Result<Option<Room>>;
    async fn get_room_by_name(&self, name: &str) -> Result<Option<Room>>;
    async fn list_rooms(&self) -> Result<Vec<Room>>;
    async fn update_room(&self, id: i64, update: UpdateRoomRequest) -> Result<Option<Room>>;
    async fn delete_room(&self, id: i64) -> Result<bool>;
    async fn count_room_slots(&self, room_id: i64) -> Result<u64>;
    async fn create_slot(&self, slot: NewScheduleSlot) -> Result<ScheduleSlot>;
    async fn list_slots(&self, query: SlotQueryParams) -> Result<Vec<ScheduleSlot>>;
    async fn list_slots_on_weekday(&self, weekday: i32) -> Result<Vec<ScheduleSlot>>;
    async fn delete_slot(&self, id: i64) -> Result<bool>;

    /// 备份导出
    async fn export_students(&self, limit: u64) -> Result<Vec<Student>>;
    async fn export_enrollments(&self, limit: u64) -> Result<Vec<Enrollment>>;
    async fn export_payments(&self, limit: u64) -> Result<Vec<Payment>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
