use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::info;

use super::AttendanceService;
use crate::models::attendance::requests::{
    AttendanceEntry, AttendanceQueryParams, RecordAttendanceRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user_id, internal_error, not_found};

fn check_request(
    date: NaiveDate,
    today: NaiveDate,
    entries: &[AttendanceEntry],
) -> Result<(), String> {
    if date > today {
        return Err("Attendance cannot be recorded for a future date".to_string());
    }
    if entries.is_empty() {
        return Err("At least one entry is required".to_string());
    }
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.student_id) {
            return Err(format!("Student {} appears more than once", entry.student_id));
        }
        if entry.note.as_ref().is_some_and(|n| n.chars().count() > 255) {
            return Err("Note must be at most 255 characters".to_string());
        }
    }
    Ok(())
}

pub async fn record_attendance(
    service: &AttendanceService,
    req: RecordAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    let today = chrono::Local::now().date_naive();
    if let Err(msg) = check_request(req.date, today, &req.entries) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    match storage.get_class_by_id(req.class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Ok(internal_error("Failed to get class", &e)),
    }

    let enrolled: HashSet<i64> = match storage.list_active_students_in_class(req.class_id).await {
        Ok(students) => students.into_iter().map(|s| s.id).collect(),
        Err(e) => return Ok(internal_error("Failed to list students", &e)),
    };
    if let Some(entry) = req.entries.iter().find(|e| !enrolled.contains(&e.student_id)) {
        return Ok(bad_request(
            ErrorCode::EnrollmentInactive,
            format!(
                "Student {} is not actively enrolled in the class",
                entry.student_id
            ),
        ));
    }

    match storage
        .upsert_attendance(req.class_id, req.date, req.entries, uid)
        .await
    {
        Ok(records) => {
            info!(
                "Attendance for class {} on {} recorded by user {} ({} entries)",
                req.class_id,
                req.date,
                uid,
                records.len()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                records,
                "Attendance recorded successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to record attendance", &e)),
    }
}

pub async fn list_attendance(
    service: &AttendanceService,
    query: AttendanceQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service
        .get_storage(request)
        .list_attendance(query.class_id, query.date)
        .await
    {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            records,
            "Attendance retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list attendance", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::AttendanceStatus;

    fn entry(student_id: i64) -> AttendanceEntry {
        AttendanceEntry {
            student_id,
            status: AttendanceStatus::Present,
            note: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
    }

    #[test]
    fn test_check_request() {
        assert!(check_request(day(4), day(4), &[entry(1), entry(2)]).is_ok());
        assert!(check_request(day(5), day(4), &[entry(1)]).is_err());
        assert!(check_request(day(4), day(4), &[]).is_err());
        assert!(check_request(day(4), day(4), &[entry(1), entry(1)]).is_err());
    }
}
