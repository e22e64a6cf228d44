//! 基于临时 SQLite 文件的存储层测试

use super::SeaOrmStorage;
use crate::errors::SchoolSysError;
use crate::models::{
    academics::requests::{CreateAcademicYearRequest, CreateTrimesterRequest},
    classes::requests::CreateClassRequest,
    enrollments::entities::{EnrollmentStatus, NewEnrollment},
    grading::{
        entities::{EvaluationKind, NewTrimesterResult},
        requests::{CreateEvaluationRequest, CreateSubjectRequest},
    },
    payments::entities::{NewPayment, PaymentMethod, PaymentState},
    students::{entities::Gender, requests::CreateStudentRequest},
    treasury::{
        entities::{AccountKind, NewMovement},
        ledger,
    },
    users::{entities::UserRole, requests::CreateUserRequest},
};
use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

struct Fixture {
    storage: SeaOrmStorage,
    admin_id: i64,
    year_id: i64,
}

async fn setup() -> Fixture {
    let path = std::env::temp_dir().join(format!("schoolsys-{}.db", uuid::Uuid::new_v4()));
    let db = Database::connect(format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");

    let storage = SeaOrmStorage { db };
    storage.ensure_treasury_accounts_impl().await.expect("treasury accounts");

    let admin = storage
        .create_user_impl(CreateUserRequest {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "hash".to_string(),
            role: UserRole::Admin,
            display_name: None,
            phone: None,
        })
        .await
        .expect("create admin");

    let year = storage
        .create_academic_year_impl(CreateAcademicYearRequest {
            name: "2025-2026".to_string(),
            start_date: date(2025, 9, 15),
            end_date: date(2026, 7, 15),
        })
        .await
        .expect("create year");

    Fixture {
        storage,
        admin_id: admin.id,
        year_id: year.id,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

impl Fixture {
    async fn assert_ledger_consistent(&self) {
        let balances = self.storage.get_treasury_balances_impl().await.unwrap();
        let movements = self.storage.list_all_movements_impl().await.unwrap();
        let report = ledger::verify(balances, &movements);
        assert!(report.consistent, "ledger drifted: {:?}", report.lines);
    }

    async fn balance(&self, account: AccountKind) -> i64 {
        self.storage
            .get_treasury_balances_impl()
            .await
            .unwrap()
            .get(account)
    }

    async fn trimester(&self, number: i32) -> i64 {
        self.storage
            .create_trimester_impl(
                self.year_id,
                CreateTrimesterRequest {
                    number,
                    name: None,
                    start_date: date(2025, 9, 15),
                    end_date: date(2025, 12, 20),
                },
            )
            .await
            .unwrap()
            .id
    }

    async fn class(&self, name: &str) -> i64 {
        self.storage
            .create_class_impl(CreateClassRequest {
                academic_year_id: self.year_id,
                name: name.to_string(),
                level: "6e".to_string(),
                tuition_fee: 45_000,
                registration_fee: 5_000,
                capacity: 40,
                head_teacher_id: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn student(&self, matricule: &str) -> i64 {
        self.storage
            .create_student_impl(
                matricule.to_string(),
                CreateStudentRequest {
                    matricule: None,
                    first_name: "Awa".to_string(),
                    last_name: "Koné".to_string(),
                    birth_date: None,
                    gender: Gender::Female,
                    guardian_name: None,
                    guardian_phone: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    async fn enroll(&self, student_id: i64, class_id: i64, amount_due: i64) -> i64 {
        self.storage
            .create_enrollment_impl(NewEnrollment {
                student_id,
                class_id,
                academic_year_id: self.year_id,
                amount_due,
                discount: 0,
            })
            .await
            .unwrap()
            .id
    }

    async fn evaluated_subject(&self, class_id: i64, trimester_id: i64) {
        let subject = self
            .storage
            .create_subject_impl(CreateSubjectRequest {
                class_id,
                name: "Mathématiques".to_string(),
                coefficient: 4,
                teacher_id: None,
            })
            .await
            .unwrap();
        self.storage
            .create_evaluation_impl(
                CreateEvaluationRequest {
                    subject_id: subject.id,
                    trimester_id,
                    kind: EvaluationKind::Composition,
                    title: "Composition 1".to_string(),
                    evaluation_date: None,
                    max_score: None,
                },
                20.0,
                self.admin_id,
            )
            .await
            .unwrap();
    }

    fn payment(&self, enrollment_id: i64, receipt: &str, amount: i64) -> NewPayment {
        NewPayment {
            enrollment_id,
            receipt_number: receipt.to_string(),
            amount,
            method: PaymentMethod::Cash,
            note: None,
            paid_at: chrono::Utc::now(),
            recorded_by: self.admin_id,
        }
    }
}

fn result_for(student_id: i64, average: f64) -> NewTrimesterResult {
    NewTrimesterResult {
        student_id,
        average: Some(average),
        rank: Some(1),
        mention: None,
        subjects: Vec::new(),
    }
}

#[actix_web::test]
async fn test_overdraft_is_refused_without_side_effects() {
    let fx = setup().await;
    let by = fx.admin_id;

    fx.storage
        .apply_movement_impl(NewMovement::income(AccountKind::Safe, 10_000, None, by))
        .await
        .unwrap();
    fx.assert_ledger_consistent().await;

    let err = fx
        .storage
        .apply_movement_impl(NewMovement::transfer(
            AccountKind::Safe,
            AccountKind::Bank,
            20_000,
            None,
            by,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolSysError::InsufficientFunds(_)));

    let err = fx
        .storage
        .apply_movement_impl(NewMovement::expense(
            AccountKind::Registry,
            1,
            "fournitures".to_string(),
            None,
            by,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolSysError::InsufficientFunds(_)));

    assert_eq!(fx.balance(AccountKind::Safe).await, 10_000);
    assert_eq!(fx.balance(AccountKind::Bank).await, 0);
    assert_eq!(fx.balance(AccountKind::Registry).await, 0);
    assert_eq!(fx.storage.list_all_movements_impl().await.unwrap().len(), 1);
    fx.assert_ledger_consistent().await;

    fx.storage
        .apply_movement_impl(NewMovement::transfer(
            AccountKind::Safe,
            AccountKind::Bank,
            10_000,
            None,
            by,
        ))
        .await
        .unwrap();
    assert_eq!(fx.balance(AccountKind::Safe).await, 0);
    assert_eq!(fx.balance(AccountKind::Bank).await, 10_000);
    fx.assert_ledger_consistent().await;
}

#[actix_web::test]
async fn test_overpayment_is_refused_inside_transaction() {
    let fx = setup().await;
    let class_id = fx.class("6e A").await;
    let student_id = fx.student("S-0001").await;
    let enrollment_id = fx.enroll(student_id, class_id, 50_000).await;

    let payment = fx
        .storage
        .record_payment_impl(fx.payment(enrollment_id, "R-0001", 30_000))
        .await
        .unwrap();
    assert_eq!(payment.account, AccountKind::Registry);
    assert_eq!(fx.balance(AccountKind::Registry).await, 30_000);
    fx.assert_ledger_consistent().await;

    let err = fx
        .storage
        .record_payment_impl(fx.payment(enrollment_id, "R-0002", 25_000))
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolSysError::Conflict(_)));

    assert_eq!(fx.storage.export_payments_impl(100).await.unwrap().len(), 1);
    assert_eq!(fx.storage.list_all_movements_impl().await.unwrap().len(), 1);
    assert_eq!(fx.balance(AccountKind::Registry).await, 30_000);
    fx.assert_ledger_consistent().await;

    // 恰好结清
    fx.storage
        .record_payment_impl(fx.payment(enrollment_id, "R-0003", 20_000))
        .await
        .unwrap();
    assert_eq!(fx.storage.sum_valid_payments_impl(enrollment_id).await.unwrap(), 50_000);
    fx.assert_ledger_consistent().await;
}

#[actix_web::test]
async fn test_cancel_rolls_back_when_account_cannot_cover() {
    let fx = setup().await;
    let by = fx.admin_id;
    let class_id = fx.class("5e B").await;
    let student_id = fx.student("S-0002").await;
    let enrollment_id = fx.enroll(student_id, class_id, 50_000).await;

    let payment = fx
        .storage
        .record_payment_impl(fx.payment(enrollment_id, "R-0100", 30_000))
        .await
        .unwrap();

    // 收银台的钱已移入保险柜
    fx.storage
        .apply_movement_impl(NewMovement::transfer(
            AccountKind::Registry,
            AccountKind::Safe,
            30_000,
            None,
            by,
        ))
        .await
        .unwrap();
    fx.assert_ledger_consistent().await;

    let err = fx
        .storage
        .cancel_payment_impl(payment.id, "erreur de saisie".to_string(), by)
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolSysError::InsufficientFunds(_)));

    let unchanged = fx.storage.get_payment_impl(payment.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, PaymentState::Valid);
    assert!(unchanged.cancel_reason.is_none());
    assert_eq!(fx.balance(AccountKind::Registry).await, 0);
    assert_eq!(fx.balance(AccountKind::Safe).await, 30_000);
    assert_eq!(fx.storage.list_all_movements_impl().await.unwrap().len(), 2);
    fx.assert_ledger_consistent().await;

    fx.storage
        .apply_movement_impl(NewMovement::transfer(
            AccountKind::Safe,
            AccountKind::Registry,
            30_000,
            None,
            by,
        ))
        .await
        .unwrap();
    let cancelled = fx
        .storage
        .cancel_payment_impl(payment.id, "erreur de saisie".to_string(), by)
        .await
        .unwrap();
    assert_eq!(cancelled.status, PaymentState::Cancelled);
    assert_eq!(fx.balance(AccountKind::Registry).await, 0);
    fx.assert_ledger_consistent().await;

    let err = fx
        .storage
        .cancel_payment_impl(payment.id, "encore".to_string(), by)
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolSysError::Conflict(_)));
    fx.assert_ledger_consistent().await;
}

#[actix_web::test]
async fn test_only_one_trimester_is_active() {
    let fx = setup().await;
    let first = fx.trimester(1).await;
    let second = fx.trimester(2).await;

    let activated = fx.storage.activate_trimester_impl(first).await.unwrap().unwrap();
    assert!(activated.is_active);

    fx.storage.activate_trimester_impl(second).await.unwrap().unwrap();
    let active: Vec<i64> = fx
        .storage
        .list_trimesters_impl(fx.year_id)
        .await
        .unwrap()
        .into_iter()
        .filter(|t| t.is_active)
        .map(|t| t.id)
        .collect();
    assert_eq!(active, vec![second]);

    let current = fx.storage.get_active_trimester_impl().await.unwrap().unwrap();
    assert_eq!(current.id, second);

    assert!(fx.storage.activate_trimester_impl(9_999).await.unwrap().is_none());
    let current = fx.storage.get_active_trimester_impl().await.unwrap().unwrap();
    assert_eq!(current.id, second);
}

#[actix_web::test]
async fn test_classes_without_active_students_do_not_block_close() {
    let fx = setup().await;
    let trimester_id = fx.trimester(1).await;

    let attended = fx.class("4e A").await;
    let emptied = fx.class("4e B").await;
    fx.evaluated_subject(attended, trimester_id).await;
    fx.evaluated_subject(emptied, trimester_id).await;

    let present = fx.student("S-0010").await;
    fx.enroll(present, attended, 50_000).await;
    let leaver = fx.student("S-0011").await;
    let leaver_enrollment = fx.enroll(leaver, emptied, 50_000).await;
    fx.storage
        .update_enrollment_status_impl(leaver_enrollment, EnrollmentStatus::Withdrawn)
        .await
        .unwrap();

    let missing = fx
        .storage
        .list_classes_missing_results_impl(trimester_id)
        .await
        .unwrap();
    assert_eq!(missing, vec![attended]);

    fx.storage
        .replace_trimester_results_impl(attended, trimester_id, vec![result_for(present, 12.5)])
        .await
        .unwrap();
    let missing = fx
        .storage
        .list_classes_missing_results_impl(trimester_id)
        .await
        .unwrap();
    assert!(missing.is_empty());
}

#[actix_web::test]
async fn test_student_result_is_scoped_to_class() {
    let fx = setup().await;
    let trimester_id = fx.trimester(1).await;
    let before = fx.class("3e A").await;
    let after = fx.class("3e B").await;
    let student_id = fx.student("S-0020").await;

    // 学期中转班，两个班级各算过一次
    fx.storage
        .replace_trimester_results_impl(before, trimester_id, vec![result_for(student_id, 9.0)])
        .await
        .unwrap();
    fx.storage
        .replace_trimester_results_impl(after, trimester_id, vec![result_for(student_id, 14.0)])
        .await
        .unwrap();

    let result = fx
        .storage
        .get_student_trimester_result_impl(student_id, after, trimester_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.class_id, after);
    assert_eq!(result.average, Some(14.0));

    let result = fx
        .storage
        .get_student_trimester_result_impl(student_id, before, trimester_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.class_id, before);
    assert_eq!(result.average, Some(9.0));
}
