use serde::Deserialize;

use crate::errors::Result;
use crate::models::common::enums::ResultStatus;
use crate::models::common::query::flexible;
use crate::utils::validate::{FieldErrors, Validate};

const GRADE_POINT_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResultInput {
    pub subject_id: i64,
    pub grade: String,
    pub credits: i32,
}

fn check_subject_results(errors: &mut FieldErrors, items: &[SubjectResultInput]) {
    for item in items {
        errors.positive_id("results.subjectId", item.subject_id);
        errors.require_text("results.grade", &item.grade, 5);
        errors.check(item.credits >= 0, "results.credits", "must not be negative");
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExamResultRequest {
    pub exam_id: i64,
    pub student_id: Option<i64>,
    pub student_enrollment_number: String,
    pub spi: f64,
    pub cpi: f64,
    pub status: ResultStatus,
    #[serde(default)]
    pub results: Vec<SubjectResultInput>,
}

impl Validate for CreateExamResultRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.positive_id("examId", self.exam_id);
        if let Some(id) = self.student_id {
            errors.positive_id("studentId", id);
        }
        errors.require_text("studentEnrollmentNumber", &self.student_enrollment_number, 50);
        errors.check(
            GRADE_POINT_RANGE.contains(&self.spi),
            "spi",
            "must be between 0 and 10",
        );
        errors.check(
            GRADE_POINT_RANGE.contains(&self.cpi),
            "cpi",
            "must be between 0 and 10",
        );
        check_subject_results(&mut errors, &self.results);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateExamResultRequest {
    pub student_id: Option<i64>,
    pub spi: Option<f64>,
    pub cpi: Option<f64>,
    pub status: Option<ResultStatus>,
    /// 提供时整体替换单科成绩
    pub results: Option<Vec<SubjectResultInput>>,
}

impl Validate for UpdateExamResultRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if let Some(spi) = self.spi {
            errors.check(GRADE_POINT_RANGE.contains(&spi), "spi", "must be between 0 and 10");
        }
        if let Some(cpi) = self.cpi {
            errors.check(GRADE_POINT_RANGE.contains(&cpi), "cpi", "must be between 0 and 10");
        }
        if let Some(items) = &self.results {
            check_subject_results(&mut errors, items);
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResultListQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub exam_id: Option<i64>,
}

impl Validate for ExamResultListQuery {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// 成绩检索条件，同时用于统计
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResultFilter {
    #[serde(default, deserialize_with = "flexible")]
    pub exam_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub student_id: Option<i64>,
    pub enrollment_number: Option<String>,
    #[serde(default, deserialize_with = "flexible")]
    pub status: Option<ResultStatus>,
    #[serde(default, deserialize_with = "flexible")]
    pub semester_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub department_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub academic_year_id: Option<i64>,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "flexible")]
    pub min_spi: Option<f64>,
    #[serde(default, deserialize_with = "flexible")]
    pub max_spi: Option<f64>,
    #[serde(default, deserialize_with = "flexible")]
    pub min_cpi: Option<f64>,
    #[serde(default, deserialize_with = "flexible")]
    pub max_cpi: Option<f64>,
}

impl Validate for ExamResultFilter {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        for (field, value) in [
            ("minSpi", self.min_spi),
            ("maxSpi", self.max_spi),
            ("minCpi", self.min_cpi),
            ("maxCpi", self.max_cpi),
        ] {
            if let Some(v) = value {
                errors.check(GRADE_POINT_RANGE.contains(&v), field, "must be between 0 and 10");
            }
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankField {
    #[default]
    Spi,
    Cpi,
}

impl std::str::FromStr for RankField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "spi" => Ok(RankField::Spi),
            "cpi" => Ok(RankField::Cpi),
            _ => Err(format!("Invalid byField: '{s}'. Expected one of: spi, cpi")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPerformersQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub exam_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub limit: Option<u64>,
    #[serde(default, deserialize_with = "flexible")]
    pub by_field: Option<RankField>,
}

impl Validate for TopPerformersQuery {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.limit(self.limit);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_points_range() {
        let request = CreateExamResultRequest {
            exam_id: 1,
            student_id: None,
            student_enrollment_number: "22CE001".into(),
            spi: 10.5,
            cpi: -1.0,
            status: ResultStatus::Pass,
            results: vec![],
        };
        let message = request.validate().unwrap_err().message().to_string();
        assert!(message.contains("spi: must be between 0 and 10"));
        assert!(message.contains("cpi: must be between 0 and 10"));
    }

    #[test]
    fn test_rank_field_parsing() {
        assert_eq!("cpi".parse::<RankField>(), Ok(RankField::Cpi));
        assert!("gpa".parse::<RankField>().is_err());
        assert_eq!(RankField::default(), RankField::Spi);
    }
}
