use super::entities::{Attendance, AttendanceStatus};
use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

/// 出勤统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummary {
    pub student_id: i64,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub total: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub excused: i64,
    /// (present + late) / total，无记录时为 0
    pub rate: f64,
}

impl AttendanceSummary {
    pub fn from_records(
        student_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        records: &[Attendance],
    ) -> Self {
        let count = |status: AttendanceStatus| {
            records.iter().filter(|r| r.status == status).count() as i64
        };
        let present = count(AttendanceStatus::Present);
        let absent = count(AttendanceStatus::Absent);
        let late = count(AttendanceStatus::Late);
        let excused = count(AttendanceStatus::Excused);
        let total = records.len() as i64;
        let rate = if total == 0 {
            0.0
        } else {
            ((present + late) as f64 / total as f64 * 10_000.0).round() / 10_000.0
        };

        Self {
            student_id,
            from,
            to,
            total,
            present,
            absent,
            late,
            excused,
            rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, status: AttendanceStatus) -> Attendance {
        Attendance {
            id: day as i64,
            student_id: 7,
            class_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 10, day).unwrap(),
            status,
            note: None,
            recorded_by: 1,
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_summary_counts_and_rate() {
        let records = vec![
            record(1, AttendanceStatus::Present),
            record(2, AttendanceStatus::Late),
            record(3, AttendanceStatus::Absent),
            record(4, AttendanceStatus::Excused),
        ];
        let summary = AttendanceSummary::from_records(7, None, None, &records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.late, 1);
        assert_eq!(summary.absent, 1);
        assert_eq!(summary.excused, 1);
        assert_eq!(summary.rate, 0.5);
    }

    #[test]
    fn test_summary_without_records() {
        let summary = AttendanceSummary::from_records(7, None, None, &[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.rate, 0.0);
    }
}
