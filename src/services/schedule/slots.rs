use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ScheduleService;
use super::conflict::find_conflict;
use crate::models::schedule::entities::{NewScheduleSlot, format_hhmm, parse_hhmm};
use crate::models::schedule::requests::{CreateSlotRequest, SlotQueryParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, current_user_id, internal_error, not_found};

/// 解析并校验星期与时间
fn parse_times(weekday: i32, start: &str, end: &str) -> Result<(i32, i32), String> {
    if !(1..=7).contains(&weekday) {
        return Err("Weekday must be between 1 (Monday) and 7 (Sunday)".to_string());
    }
    let start_minute = parse_hhmm(start)?;
    let end_minute = parse_hhmm(end)?;
    if start_minute >= end_minute {
        return Err("Start time must be before end time".to_string());
    }
    Ok((start_minute, end_minute))
}

pub async fn create_slot(
    service: &ScheduleService,
    req: CreateSlotRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    let (start_minute, end_minute) = match parse_times(req.weekday, &req.start, &req.end) {
        Ok(times) => times,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request);
    let class = match storage.get_class_by_id(req.class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Ok(internal_error("Failed to get class", &e)),
    };
    let subject = match storage.get_subject(req.subject_id).await {
        Ok(Some(subject)) => subject,
        Ok(None) => return Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => return Ok(internal_error("Failed to get subject", &e)),
    };
    if subject.class_id != class.id {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Subject does not belong to the class",
        ));
    }
    let room = match storage.get_room(req.room_id).await {
        Ok(Some(room)) => room,
        Ok(None) => return Ok(not_found(ErrorCode::RoomNotFound, "Room not found")),
        Err(e) => return Ok(internal_error("Failed to get room", &e)),
    };

    match storage.count_active_enrollments(class.id).await {
        Ok(students) if students > room.capacity as i64 => {
            return Ok(conflict(
                ErrorCode::RoomTooSmall,
                format!(
                    "Room {} seats {} but class {} has {} students",
                    room.name, room.capacity, class.name, students
                ),
            ));
        }
        Ok(_) => {}
        Err(e) => return Ok(internal_error("Failed to count enrollments", &e)),
    }

    // 未指定教师时沿用科目教师
    let candidate = NewScheduleSlot {
        class_id: class.id,
        subject_id: subject.id,
        room_id: room.id,
        teacher_id: req.teacher_id.or(subject.teacher_id),
        weekday: req.weekday,
        start_minute,
        end_minute,
    };

    let same_day = match storage.list_slots_on_weekday(candidate.weekday).await {
        Ok(slots) => slots,
        Err(e) => return Ok(internal_error("Failed to list slots", &e)),
    };
    if let Some((existing, kind)) = find_conflict(&candidate, &same_day) {
        return Ok(conflict(
            ErrorCode::ScheduleConflict,
            format!(
                "Schedule conflict: {} ({}-{}, slot {})",
                kind.describe(),
                format_hhmm(existing.start_minute),
                format_hhmm(existing.end_minute),
                existing.id
            ),
        ));
    }

    match storage.create_slot(candidate).await {
        Ok(slot) => {
            info!(
                "Slot {} created for class {} (day {}, {}-{}) by user {}",
                slot.id,
                slot.class_id,
                slot.weekday,
                format_hhmm(slot.start_minute),
                format_hhmm(slot.end_minute),
                uid
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(slot, "Slot created successfully")))
        }
        Err(e) => Ok(internal_error("Failed to create slot", &e)),
    }
}

pub async fn list_slots(
    service: &ScheduleService,
    query: SlotQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).list_slots(query).await {
        Ok(slots) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            slots,
            "Slots retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list slots", &e)),
    }
}

pub async fn delete_slot(
    service: &ScheduleService,
    slot_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).delete_slot(slot_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Slot deleted successfully"))),
        Ok(false) => Ok(not_found(ErrorCode::NotFound, "Slot not found")),
        Err(e) => Ok(internal_error("Failed to delete slot", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_times() {
        assert_eq!(parse_times(1, "07:30", "09:30"), Ok((450, 570)));
        assert!(parse_times(0, "07:30", "09:30").is_err());
        assert!(parse_times(8, "07:30", "09:30").is_err());
        assert!(parse_times(3, "10:00", "10:00").is_err());
        assert!(parse_times(3, "11:00", "10:00").is_err());
        assert!(parse_times(3, "7h", "10:00").is_err());
    }
}
