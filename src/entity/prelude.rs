//! 预导入模块，方便使用

pub use super::academic_years::{
    ActiveModel as AcademicYearActiveModel, Entity as AcademicYears, Model as AcademicYearModel,
};
pub use super::attendances::{
    ActiveModel as AttendanceActiveModel, Entity as Attendances, Model as AttendanceModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::evaluations::{
    ActiveModel as EvaluationActiveModel, Entity as Evaluations, Model as EvaluationModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::payments::{
    ActiveModel as PaymentActiveModel, Entity as Payments, Model as PaymentModel,
};
pub use super::rooms::{ActiveModel as RoomActiveModel, Entity as Rooms, Model as RoomModel};
pub use super::schedule_slots::{
    ActiveModel as ScheduleSlotActiveModel, Entity as ScheduleSlots, Model as ScheduleSlotModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::treasury_accounts::{
    ActiveModel as TreasuryAccountActiveModel, Entity as TreasuryAccounts,
    Model as TreasuryAccountModel,
};
pub use super::treasury_movements::{
    ActiveModel as TreasuryMovementActiveModel, Entity as TreasuryMovements,
    Model as TreasuryMovementModel,
};
pub use super::trimester_results::{
    ActiveModel as TrimesterResultActiveModel, Entity as TrimesterResults,
    Model as TrimesterResultModel,
};
pub use super::trimesters::{
    ActiveModel as TrimesterActiveModel, Entity as Trimesters, Model as TrimesterModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
