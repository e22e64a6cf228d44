//! 课表冲突检测
//!
//! 时段为半开区间 `[start, end)`，前一节的结束时刻可以等于后一节的开始时刻。

use crate::models::schedule::entities::{NewScheduleSlot, ScheduleSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    Room,
    Class,
    Teacher,
}

impl ConflictKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ConflictKind::Room => "room is already booked",
            ConflictKind::Class => "class already has a lesson",
            ConflictKind::Teacher => "teacher is already teaching",
        }
    }
}

pub fn overlaps(a_start: i32, a_end: i32, b_start: i32, b_end: i32) -> bool {
    a_start < b_end && b_start < a_end
}

/// 返回第一个冲突的已有时段及冲突类型
///
/// `existing` 应为同一星期几的时段。
pub fn find_conflict<'a>(
    candidate: &NewScheduleSlot,
    existing: &'a [ScheduleSlot],
) -> Option<(&'a ScheduleSlot, ConflictKind)> {
    existing
        .iter()
        .filter(|slot| slot.weekday == candidate.weekday)
        .filter(|slot| {
            overlaps(
                candidate.start_minute,
                candidate.end_minute,
                slot.start_minute,
                slot.end_minute,
            )
        })
        .find_map(|slot| {
            if slot.room_id == candidate.room_id {
                Some((slot, ConflictKind::Room))
            } else if slot.class_id == candidate.class_id {
                Some((slot, ConflictKind::Class))
            } else if candidate.teacher_id.is_some() && slot.teacher_id == candidate.teacher_id {
                Some((slot, ConflictKind::Teacher))
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: i64, class_id: i64, room_id: i64, teacher_id: Option<i64>, start: i32, end: i32) -> ScheduleSlot {
        ScheduleSlot {
            id,
            class_id,
            subject_id: 1,
            room_id,
            teacher_id,
            weekday: 2,
            start_minute: start,
            end_minute: end,
            created_at: chrono::Utc::now(),
        }
    }

    fn candidate(class_id: i64, room_id: i64, teacher_id: Option<i64>, start: i32, end: i32) -> NewScheduleSlot {
        NewScheduleSlot {
            class_id,
            subject_id: 9,
            room_id,
            teacher_id,
            weekday: 2,
            start_minute: start,
            end_minute: end,
        }
    }

    #[test]
    fn test_overlaps_is_half_open() {
        assert!(overlaps(480, 540, 500, 560));
        assert!(overlaps(480, 600, 500, 520));
        assert!(!overlaps(480, 540, 540, 600));
        assert!(!overlaps(540, 600, 480, 540));
    }

    #[test]
    fn test_room_conflict() {
        let existing = vec![slot(1, 10, 100, Some(7), 480, 600)];
        let found = find_conflict(&candidate(11, 100, Some(8), 540, 660), &existing);
        assert_eq!(found.map(|(s, k)| (s.id, k)), Some((1, ConflictKind::Room)));
    }

    #[test]
    fn test_class_and_teacher_conflicts() {
        let existing = vec![slot(1, 10, 100, Some(7), 480, 600)];
        let class = find_conflict(&candidate(10, 101, None, 500, 560), &existing);
        assert_eq!(class.map(|(_, k)| k), Some(ConflictKind::Class));

        let teacher = find_conflict(&candidate(11, 101, Some(7), 500, 560), &existing);
        assert_eq!(teacher.map(|(_, k)| k), Some(ConflictKind::Teacher));
    }

    #[test]
    fn test_no_conflict_when_adjacent_or_other_day() {
        let existing = vec![slot(1, 10, 100, Some(7), 480, 600)];
        assert!(find_conflict(&candidate(10, 100, Some(7), 600, 660), &existing).is_none());

        let mut other_day = candidate(10, 100, Some(7), 480, 600);
        other_day.weekday = 3;
        assert!(find_conflict(&other_day, &existing).is_none());
    }

    #[test]
    fn test_missing_teacher_never_conflicts_on_teacher() {
        let existing = vec![slot(1, 10, 100, None, 480, 600)];
        assert!(find_conflict(&candidate(11, 101, None, 500, 560), &existing).is_none());
    }
}
