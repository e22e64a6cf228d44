/// 为以字符串存储的枚举生成 `as_str`、`Display` 与 `FromStr`
macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {s}", stringify!($name))),
                }
            }
        }
    };
}

pub mod academics;
pub mod attendance;
pub mod auth;
pub mod backups;
pub mod classes;
pub mod common;
pub mod enrollments;
pub mod grading;
pub mod payments;
pub mod schedule;
pub mod students;
pub mod system;
pub mod treasury;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间，用于计算运行时长
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务错误码
///
/// 按模块分段：1xxx 通用，2xxx 用户与认证，3xxx 教务，4xxx 财务，5xxx 成绩，6xxx 排课，7xxx 备份。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 用户与认证
    AuthFailed = 2000,
    UserNotFound = 2001,
    UserAlreadyExists = 2002,
    UserNameInvalid = 2003,
    UserEmailInvalid = 2004,
    UserPasswordInvalid = 2005,
    UserCreationFailed = 2006,
    UserUpdateFailed = 2007,
    UserDeleteFailed = 2008,
    CanNotDeleteCurrentUser = 2009,

    // 学年与学期
    AcademicYearNotFound = 3000,
    TrimesterNotFound = 3001,
    TrimesterClosed = 3002,
    NoActiveTrimester = 3003,

    // 班级
    ClassNotFound = 3100,
    ClassAlreadyExists = 3101,
    ClassHasEnrollments = 3102,

    // 学生
    StudentNotFound = 3200,
    StudentHasPayments = 3201,

    // 注册
    EnrollmentNotFound = 3300,
    AlreadyEnrolled = 3301,
    ClassFull = 3302,
    EnrollmentInactive = 3303,

    // 缴费与资金
    PaymentNotFound = 4000,
    Overpayment = 4001,
    PaymentAlreadyCancelled = 4002,
    InsufficientFunds = 4100,

    // 成绩
    SubjectNotFound = 5000,
    EvaluationNotFound = 5001,
    InvalidScore = 5002,
    ResultsNotComputed = 5003,

    // 排课
    RoomNotFound = 6000,
    ScheduleConflict = 6001,
    RoomTooSmall = 6002,

    // 备份
    BackupFailed = 7000,
}
