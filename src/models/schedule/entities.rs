use serde::{Deserialize, Serialize, Serializer};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub capacity: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 课表时段，时间以当天分钟数存储，对外输出 "HH:MM"
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleSlot {
    pub id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub room_id: i64,
    pub teacher_id: Option<i64>,
    /// 1 = 周一 ... 7 = 周日
    pub weekday: i32,
    #[serde(rename = "start", serialize_with = "serialize_minutes")]
    #[ts(type = "string")]
    pub start_minute: i32,
    #[serde(rename = "end", serialize_with = "serialize_minutes")]
    #[ts(type = "string")]
    pub end_minute: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 待写入的课表时段
#[derive(Debug, Clone, PartialEq)]
pub struct NewScheduleSlot {
    pub class_id: i64,
    pub subject_id: i64,
    pub room_id: i64,
    pub teacher_id: Option<i64>,
    pub weekday: i32,
    pub start_minute: i32,
    pub end_minute: i32,
}

fn two_digits(part: &str) -> Option<i32> {
    if part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit()) {
        part.parse().ok()
    } else {
        None
    }
}

/// 将 "HH:MM" 解析为当天分钟数，时和分都必须是两位数字
pub fn parse_hhmm(value: &str) -> Result<i32, String> {
    let invalid = || format!("Invalid time '{value}', expected HH:MM");
    let (h, m) = value.trim().split_once(':').ok_or_else(invalid)?;
    let hours = two_digits(h).filter(|h| (0..24).contains(h)).ok_or_else(invalid)?;
    let minutes = two_digits(m).filter(|m| (0..60).contains(m)).ok_or_else(invalid)?;
    Ok(hours * 60 + minutes)
}

pub fn format_hhmm(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn serialize_minutes<S: Serializer>(minutes: &i32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_hhmm(*minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("07:30"), Ok(450));
        assert_eq!(parse_hhmm("00:00"), Ok(0));
        assert_eq!(parse_hhmm(" 23:59 "), Ok(1439));
        assert!(parse_hhmm("24:00").is_err());
        assert!(parse_hhmm("7h30").is_err());
        assert!(parse_hhmm("07:5").is_err());
        assert!(parse_hhmm("07:60").is_err());
    }

    #[test]
    fn test_parse_hhmm_rejects_signs_and_short_hours() {
        assert!(parse_hhmm("-0:30").is_err());
        assert!(parse_hhmm("+7:30").is_err());
        assert!(parse_hhmm("7:30").is_err());
        assert!(parse_hhmm("07:+5").is_err());
        assert!(parse_hhmm("007:30").is_err());
    }

    #[test]
    fn test_slot_serializes_times() {
        let slot = ScheduleSlot {
            id: 1,
            class_id: 2,
            subject_id: 3,
            room_id: 4,
            teacher_id: None,
            weekday: 1,
            start_minute: 450,
            end_minute: 570,
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["start"], "07:30");
        assert_eq!(json["end"], "09:30");
        assert!(json.get("start_minute").is_none());
    }
}
