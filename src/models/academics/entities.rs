use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 学年
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct AcademicYear {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl AcademicYear {
    /// 日期区间是否完全落在本学年内
    pub fn contains_range(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start >= self.start_date && end <= self.end_date
    }
}

/// 学期（每学年三个）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct Trimester {
    pub id: i64,
    pub academic_year_id: i64,
    pub number: i32,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub is_closed: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Trimester {
    pub const MIN_NUMBER: i32 = 1;
    pub const MAX_NUMBER: i32 = 3;

    pub fn default_name(number: i32) -> String {
        match number {
            1 => "1er trimestre".to_string(),
            n => format!("{n}e trimestre"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year() -> AcademicYear {
        AcademicYear {
            id: 1,
            name: "2024-2025".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 9, 16).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
            is_current: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_contains_range() {
        let y = year();
        let d = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
        assert!(y.contains_range(d(9, 16), d(12, 20)));
        assert!(!y.contains_range(d(9, 1), d(12, 20)));
        assert!(!y.contains_range(
            d(10, 1),
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
        ));
    }

    #[test]
    fn test_default_trimester_name() {
        assert_eq!(Trimester::default_name(1), "1er trimestre");
        assert_eq!(Trimester::default_name(3), "3e trimestre");
    }
}
