//! 备份用 CSV 渲染，返回文件内容与数据行数

use crate::errors::{Result, SchoolSysError};
use crate::models::enrollments::entities::Enrollment;
use crate::models::payments::entities::Payment;
use crate::models::students::entities::Student;
use crate::models::treasury::entities::Movement;

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    wtr.into_inner()
        .map_err(|e| SchoolSysError::serialization(format!("CSV flush failed: {e}")))
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn students_csv(students: &[Student]) -> Result<(Vec<u8>, i64)> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "id",
        "matricule",
        "last_name",
        "first_name",
        "birth_date",
        "gender",
        "guardian_name",
        "guardian_phone",
        "created_at",
    ])?;
    for s in students {
        wtr.write_record([
            s.id.to_string(),
            s.matricule.clone(),
            s.last_name.clone(),
            s.first_name.clone(),
            opt(s.birth_date),
            s.gender.to_string(),
            s.guardian_name.clone().unwrap_or_default(),
            s.guardian_phone.clone().unwrap_or_default(),
            s.created_at.to_rfc3339(),
        ])?;
    }
    Ok((finish(wtr)?, students.len() as i64))
}

pub fn enrollments_csv(enrollments: &[Enrollment]) -> Result<(Vec<u8>, i64)> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "id",
        "student_id",
        "class_id",
        "academic_year_id",
        "amount_due",
        "discount",
        "status",
        "enrolled_at",
    ])?;
    for e in enrollments {
        wtr.write_record([
            e.id.to_string(),
            e.student_id.to_string(),
            e.class_id.to_string(),
            e.academic_year_id.to_string(),
            e.amount_due.to_string(),
            e.discount.to_string(),
            e.status.to_string(),
            e.enrolled_at.to_rfc3339(),
        ])?;
    }
    Ok((finish(wtr)?, enrollments.len() as i64))
}

pub fn payments_csv(payments: &[Payment]) -> Result<(Vec<u8>, i64)> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "id",
        "receipt_number",
        "enrollment_id",
        "amount",
        "method",
        "account",
        "status",
        "paid_at",
        "recorded_by",
        "note",
        "cancel_reason",
        "cancelled_at",
    ])?;
    for p in payments {
        wtr.write_record([
            p.id.to_string(),
            p.receipt_number.clone(),
            p.enrollment_id.to_string(),
            p.amount.to_string(),
            p.method.to_string(),
            p.account.to_string(),
            p.status.to_string(),
            p.paid_at.to_rfc3339(),
            p.recorded_by.to_string(),
            p.note.clone().unwrap_or_default(),
            p.cancel_reason.clone().unwrap_or_default(),
            opt(p.cancelled_at.map(|t| t.to_rfc3339())),
        ])?;
    }
    Ok((finish(wtr)?, payments.len() as i64))
}

pub fn movements_csv(movements: &[Movement]) -> Result<(Vec<u8>, i64)> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "id",
        "kind",
        "from_account",
        "to_account",
        "amount",
        "payment_id",
        "category",
        "description",
        "created_by",
        "created_at",
    ])?;
    for m in movements {
        wtr.write_record([
            m.id.to_string(),
            m.kind.to_string(),
            opt(m.from_account),
            opt(m.to_account),
            m.amount.to_string(),
            opt(m.payment_id),
            m.category.clone().unwrap_or_default(),
            m.description.clone().unwrap_or_default(),
            m.created_by.to_string(),
            m.created_at.to_rfc3339(),
        ])?;
    }
    Ok((finish(wtr)?, movements.len() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::entities::Gender;
    use crate::models::treasury::entities::{AccountKind, MovementKind};

    fn student() -> Student {
        Student {
            id: 3,
            matricule: "2024A1B2C3".to_string(),
            first_name: "Awa".to_string(),
            last_name: "Kone".to_string(),
            birth_date: chrono::NaiveDate::from_ymd_opt(2012, 3, 14),
            gender: Gender::Female,
            guardian_name: Some("Kone, Ibrahim".to_string()),
            guardian_phone: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_students_csv_quotes_and_counts() {
        let (data, rows) = students_csv(&[student()]).unwrap();
        assert_eq!(rows, 1);
        let text = String::from_utf8(data).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("id,matricule,last_name"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("3,2024A1B2C3,Kone,Awa,2012-03-14,female,\"Kone, Ibrahim\",,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_movements_csv_blank_optional_accounts() {
        let movement = Movement {
            id: 9,
            kind: MovementKind::Expense,
            from_account: Some(AccountKind::Safe),
            to_account: None,
            amount: 15_000,
            payment_id: None,
            category: Some("fournitures".to_string()),
            description: None,
            created_by: 1,
            created_at: chrono::Utc::now(),
        };
        let (data, rows) = movements_csv(&[movement]).unwrap();
        assert_eq!(rows, 1);
        let text = String::from_utf8(data).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("9,expense,safe,,15000,,fournitures,,1,"));
    }

    #[test]
    fn test_empty_tables_keep_header() {
        let (data, rows) = payments_csv(&[]).unwrap();
        assert_eq!(rows, 0);
        assert_eq!(String::from_utf8(data).unwrap().lines().count(), 1);
    }
}
