pub mod academics;

pub mod attendance;

pub mod auth;

pub mod backups;

pub mod classes;

pub mod enrollments;

pub mod grading;

pub mod payments;

pub mod schedule;

pub mod students;

pub mod system;

pub mod treasury;

pub mod users;

pub use academics::configure_academic_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use backups::configure_backup_routes;
pub use classes::configure_classes_routes;
pub use enrollments::configure_enrollment_routes;
pub use grading::configure_grading_routes;
pub use payments::configure_payment_routes;
pub use schedule::configure_schedule_routes;
pub use students::configure_student_routes;
pub use system::configure_system_routes;
pub use treasury::configure_treasury_routes;
pub use users::configure_user_routes;
