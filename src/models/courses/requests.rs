use serde::Deserialize;

use crate::errors::Result;
use super::entities::Course;
use crate::models::common::enums::LectureType;
use crate::models::common::query::flexible;
use crate::utils::validate::{FieldErrors, Validate};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub subject_id: i64,
    pub faculty_id: i64,
    pub semester_id: i64,
    pub division_id: i64,
    pub lecture_type: LectureType,
    pub batch: Option<String>,
}

impl Validate for CreateCourseRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.positive_id("subjectId", self.subject_id);
        errors.positive_id("facultyId", self.faculty_id);
        errors.positive_id("semesterId", self.semester_id);
        errors.positive_id("divisionId", self.division_id);
        match self.lecture_type {
            LectureType::Practical => {
                errors.require_text("batch", self.batch.as_deref().unwrap_or_default(), 20)
            }
            LectureType::Theory => errors.check(
                self.batch.is_none(),
                "batch",
                "only practical courses have a batch",
            ),
        }
        errors.into_result()
    }
}

/// 未给出的字段沿用原分配
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCourseRequest {
    pub subject_id: Option<i64>,
    pub faculty_id: Option<i64>,
    pub semester_id: Option<i64>,
    pub division_id: Option<i64>,
    pub lecture_type: Option<LectureType>,
    pub batch: Option<String>,
}

impl UpdateCourseRequest {
    /// 与现有分配合并；改成理论课且未给批次时去掉批次
    pub fn merge_into(self, current: &Course) -> CreateCourseRequest {
        let lecture_type = self.lecture_type.unwrap_or(current.lecture_type);
        let batch = match (self.batch, lecture_type) {
            (Some(batch), _) => Some(batch),
            (None, LectureType::Theory) => None,
            (None, LectureType::Practical) => current.batch.clone(),
        };
        CreateCourseRequest {
            subject_id: self.subject_id.unwrap_or(current.subject_id),
            faculty_id: self.faculty_id.unwrap_or(current.faculty_id),
            semester_id: self.semester_id.unwrap_or(current.semester_id),
            division_id: self.division_id.unwrap_or(current.division_id),
            lecture_type,
            batch,
        }
    }
}

impl Validate for UpdateCourseRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        let ids = [
            ("subjectId", self.subject_id),
            ("facultyId", self.faculty_id),
            ("semesterId", self.semester_id),
            ("divisionId", self.division_id),
        ];
        if ids.iter().all(|(_, id)| id.is_none())
            && self.lecture_type.is_none()
            && self.batch.is_none()
        {
            errors.add("body", "At least one field must be provided for update.");
        }
        for (field, id) in ids {
            if let Some(id) = id {
                errors.positive_id(field, id);
            }
        }
        errors.optional_text("batch", self.batch.as_deref(), 20);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub faculty_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub semester_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub division_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub include_deleted: Option<bool>,
}

impl Validate for CourseListQuery {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollStudentsRequest {
    pub student_ids: Vec<i64>,
}

impl Validate for EnrollStudentsRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(
            !self.student_ids.is_empty(),
            "studentIds",
            "must contain at least one student",
        );
        errors.check(
            self.student_ids.iter().all(|id| *id > 0),
            "studentIds",
            "must contain valid ids",
        );
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(lecture_type: LectureType, batch: Option<&str>) -> CreateCourseRequest {
        CreateCourseRequest {
            subject_id: 1,
            faculty_id: 1,
            semester_id: 1,
            division_id: 1,
            lecture_type,
            batch: batch.map(str::to_string),
        }
    }

    #[test]
    fn test_batch_rules() {
        assert!(request(LectureType::Theory, None).validate().is_ok());
        assert!(request(LectureType::Practical, Some("A1")).validate().is_ok());
        assert!(request(LectureType::Practical, None).validate().is_err());
        assert!(request(LectureType::Theory, Some("A1")).validate().is_err());
    }

    #[test]
    fn test_switching_to_theory_drops_batch() {
        let now = chrono::Utc::now();
        let current = Course {
            id: 7,
            subject_id: 1,
            faculty_id: 2,
            semester_id: 3,
            division_id: 4,
            lecture_type: LectureType::Practical,
            batch: Some("B1".into()),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        let merged = UpdateCourseRequest {
            lecture_type: Some(LectureType::Theory),
            ..Default::default()
        }
        .merge_into(&current);
        assert_eq!(merged.batch, None);
        assert!(merged.validate().is_ok());

        let merged = UpdateCourseRequest {
            faculty_id: Some(9),
            ..Default::default()
        }
        .merge_into(&current);
        assert_eq!(merged.faculty_id, 9);
        assert_eq!(merged.batch.as_deref(), Some("B1"));

        assert!(UpdateCourseRequest::default().validate().is_err());
    }
}
