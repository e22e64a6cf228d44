use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Datelike;
use tracing::info;

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode, students::requests::CreateStudentRequest};
use crate::services::{bad_request, conflict, internal_error};
use crate::utils::random_code::generate_digits;
use crate::utils::validate::{validate_label, validate_phone};

const MATRICULE_ATTEMPTS: usize = 5;

/// 学号：入学年份 + 6 位随机数字
fn format_matricule(year: i32, digits: &str) -> String {
    format!("{year}{digits}")
}

fn validate_matricule(matricule: &str) -> Result<(), &'static str> {
    if !(4..=20).contains(&matricule.len()) {
        return Err("Matricule must be between 4 and 20 characters");
    }
    if !matricule.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Matricule may only contain letters and digits");
    }
    Ok(())
}

pub(super) fn validate_student_fields(
    first_name: Option<&str>,
    last_name: Option<&str>,
    guardian_phone: Option<&str>,
) -> Result<(), String> {
    if let Some(first_name) = first_name {
        validate_label(first_name, 64)?;
    }
    if let Some(last_name) = last_name {
        validate_label(last_name, 64)?;
    }
    if let Some(phone) = guardian_phone {
        validate_phone(phone)?;
    }
    Ok(())
}

pub async fn create_student(
    service: &StudentService,
    mut req: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    req.first_name = req.first_name.trim().to_string();
    req.last_name = req.last_name.trim().to_string();
    if let Err(msg) = validate_student_fields(
        Some(&req.first_name),
        Some(&req.last_name),
        req.guardian_phone.as_deref(),
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);

    let matricule = match req.matricule.take().map(|m| m.trim().to_uppercase()) {
        Some(matricule) => {
            if let Err(msg) = validate_matricule(&matricule) {
                return Ok(bad_request(ErrorCode::ValidationFailed, msg));
            }
            match storage.get_student_by_matricule(&matricule).await {
                Ok(Some(_)) => {
                    return Ok(conflict(
                        ErrorCode::Conflict,
                        format!("Matricule {matricule} is already used"),
                    ));
                }
                Ok(None) => matricule,
                Err(e) => return Ok(internal_error("Failed to check matricule", &e)),
            }
        }
        None => {
            // 以当前学年的起始年份为前缀，没有当前学年时取自然年
            let year = match storage.get_current_academic_year().await {
                Ok(Some(current)) => current.start_date.year(),
                Ok(None) => chrono::Utc::now().year(),
                Err(e) => return Ok(internal_error("Failed to get current academic year", &e)),
            };

            let mut generated = None;
            for _ in 0..MATRICULE_ATTEMPTS {
                let candidate = format_matricule(year, &generate_digits(6));
                match storage.get_student_by_matricule(&candidate).await {
                    Ok(None) => {
                        generated = Some(candidate);
                        break;
                    }
                    Ok(Some(_)) => continue,
                    Err(e) => return Ok(internal_error("Failed to check matricule", &e)),
                }
            }
            match generated {
                Some(matricule) => matricule,
                None => {
                    return Ok(conflict(
                        ErrorCode::Conflict,
                        "Unable to allocate a unique matricule, please retry",
                    ));
                }
            }
        }
    };

    match storage.create_student(matricule, req).await {
        Ok(student) => {
            info!("Student {} registered", student.matricule);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                student,
                "Student created successfully",
            )))
        }
        Err(e) => Ok(internal_error("Student creation failed", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_matricule() {
        assert_eq!(format_matricule(2024, "004217"), "2024004217");
        let generated = format_matricule(2025, &generate_digits(6));
        assert_eq!(generated.len(), 10);
        assert!(validate_matricule(&generated).is_ok());
    }

    #[test]
    fn test_validate_matricule() {
        assert!(validate_matricule("A12B").is_ok());
        assert!(validate_matricule("AB1").is_err());
        assert!(validate_matricule("2024-0001").is_err());
        assert!(validate_matricule(&"9".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_student_fields() {
        assert!(validate_student_fields(Some("Awa"), Some("Diallo"), Some("+221 77 123 45 67")).is_ok());
        assert!(validate_student_fields(Some(""), None, None).is_err());
        assert!(validate_student_fields(None, None, Some("call me")).is_err());
    }
}
