use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::{Result, TrackademyError};
use crate::models::common::enums::AttendanceStatus;
use crate::models::common::query::flexible;
use crate::utils::validate::{FieldErrors, Validate, parse_date};

const INVALID_DATE: &str = "Validation failed: date: must be a date in YYYY-MM-DD format";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecordInput {
    pub student_id: i64,
    pub status: AttendanceStatus,
}

// 某课程某天的整批考勤，会替换当天已有记录
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAttendanceRequest {
    pub course_id: i64,
    pub date: String,
    pub records: Vec<AttendanceRecordInput>,
}

impl Validate for BulkAttendanceRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.positive_id("courseId", self.course_id);
        errors.date("date", &self.date);
        errors.check(
            !self.records.is_empty(),
            "records",
            "must contain at least one record",
        );
        let mut seen = HashSet::new();
        for record in &self.records {
            errors.positive_id("records.studentId", record.student_id);
            if !seen.insert(record.student_id) {
                errors.add(
                    "records.studentId",
                    format!("student {} appears more than once", record.student_id),
                );
            }
        }
        errors.into_result()
    }
}

impl BulkAttendanceRequest {
    /// 解析后的上课日期，`2025-1-15` 与 `2025-01-15` 视为同一天
    pub fn lecture_date(&self) -> Result<NaiveDate> {
        parse_date(&self.date).ok_or_else(|| TrackademyError::validation(INVALID_DATE))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceRequest {
    pub status: AttendanceStatus,
}

impl Validate for UpdateAttendanceRequest {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub course_id: Option<i64>,
    pub date: Option<String>,
    #[serde(default, deserialize_with = "flexible")]
    pub semester_id: Option<i64>,
}

impl Validate for AttendanceQuery {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if let Some(date) = &self.date {
            errors.date("date", date);
        }
        errors.into_result()
    }
}

impl AttendanceQuery {
    pub fn lecture_date(&self) -> Result<Option<NaiveDate>> {
        self.date
            .as_deref()
            .map(|d| parse_date(d).ok_or_else(|| TrackademyError::validation(INVALID_DATE)))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_payload_shape() {
        let request = BulkAttendanceRequest {
            course_id: 3,
            date: "2025-13-01".into(),
            records: vec![],
        };
        let message = request.validate().unwrap_err().message().to_string();
        assert!(message.contains("date: must be a date in YYYY-MM-DD format"));
        assert!(message.contains("records: must contain at least one record"));
    }

    #[test]
    fn test_duplicate_students_rejected() {
        let present = || AttendanceRecordInput {
            student_id: 7,
            status: AttendanceStatus::Present,
        };
        let request = BulkAttendanceRequest {
            course_id: 3,
            date: "2025-01-15".into(),
            records: vec![present(), present()],
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.code(), "E001");
        assert!(err.message().contains("student 7 appears more than once"));
    }

    #[test]
    fn test_unpadded_date_is_the_same_day() {
        let request = BulkAttendanceRequest {
            course_id: 3,
            date: "2025-1-5".into(),
            records: vec![],
        };
        assert_eq!(
            request.lecture_date().unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
        );
    }
}
