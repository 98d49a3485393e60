use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::errors::Result;
use crate::models::common::enums::ExamType;
use crate::models::common::query::flexible;
use crate::utils::validate::{FieldErrors, Validate};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExamRequest {
    pub name: String,
    pub exam_type: ExamType,
    pub semester_id: i64,
    pub description: Option<String>,
    pub max_marks: Option<f64>,
    pub passing_marks: Option<f64>,
    pub exam_date: Option<DateTime<Utc>>,
    pub duration: Option<i32>,
    #[serde(default)]
    pub is_published: bool,
}

// 分数字段的共用规则
fn check_marks(errors: &mut FieldErrors, max_marks: Option<f64>, passing_marks: Option<f64>) {
    if let Some(max) = max_marks {
        errors.check(max > 0.0, "maxMarks", "must be greater than 0");
    }
    if let Some(passing) = passing_marks {
        errors.check(passing > 0.0, "passingMarks", "must be greater than 0");
    }
    if let (Some(max), Some(passing)) = (max_marks, passing_marks) {
        errors.check(
            passing <= max,
            "passingMarks",
            "cannot be greater than max marks",
        );
    }
}

impl Validate for CreateExamRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, 255);
        errors.positive_id("semesterId", self.semester_id);
        errors.optional_text("description", self.description.as_deref(), 1000);
        check_marks(&mut errors, self.max_marks, self.passing_marks);
        if let Some(duration) = self.duration {
            errors.check(duration > 0, "duration", "must be greater than 0");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateExamRequest {
    pub name: Option<String>,
    pub exam_type: Option<ExamType>,
    pub semester_id: Option<i64>,
    pub description: Option<String>,
    pub max_marks: Option<f64>,
    pub passing_marks: Option<f64>,
    pub exam_date: Option<DateTime<Utc>>,
    pub duration: Option<i32>,
    pub is_published: Option<bool>,
}

impl Validate for UpdateExamRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.optional_text("name", self.name.as_deref(), 255);
        errors.optional_text("description", self.description.as_deref(), 1000);
        check_marks(&mut errors, self.max_marks, self.passing_marks);
        if let Some(duration) = self.duration {
            errors.check(duration > 0, "duration", "must be greater than 0");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamListQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub semester_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub department_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub academic_year_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub exam_type: Option<ExamType>,
    #[serde(default, deserialize_with = "flexible")]
    pub is_published: Option<bool>,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "flexible")]
    pub include_deleted: Option<bool>,
}

impl Validate for ExamListQuery {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default, deserialize_with = "flexible")]
    pub semester_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub limit: Option<u64>,
}

impl Validate for ExamSearchQuery {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(!self.q.trim().is_empty(), "q", "Search query is required");
        errors.limit(self.limit);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exam() -> CreateExamRequest {
        CreateExamRequest {
            name: "Mid Semester".into(),
            exam_type: ExamType::Midterm,
            semester_id: 1,
            description: None,
            max_marks: Some(50.0),
            passing_marks: Some(20.0),
            exam_date: None,
            duration: Some(90),
            is_published: false,
        }
    }

    #[test]
    fn test_valid_exam() {
        assert!(exam().validate().is_ok());
    }

    #[test]
    fn test_passing_marks_bounded_by_max() {
        let request = CreateExamRequest {
            passing_marks: Some(60.0),
            ..exam()
        };
        let message = request.validate().unwrap_err().message().to_string();
        assert!(message.contains("passingMarks: cannot be greater than max marks"));
    }

    #[test]
    fn test_description_limit() {
        let request = CreateExamRequest {
            description: Some("d".repeat(1001)),
            ..exam()
        };
        assert!(request.validate().is_err());
    }
}
