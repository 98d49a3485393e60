use serde::Deserialize;

use crate::errors::Result;
use crate::models::common::enums::SemesterType;
use crate::models::common::query::flexible;
use crate::utils::validate::{FieldErrors, Validate};

const SEMESTER_RANGE: std::ops::RangeInclusive<i32> = 1..=12;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSemesterRequest {
    pub semester_number: i32,
    pub semester_type: SemesterType,
    pub department_id: i64,
    pub academic_year_id: i64,
}

impl Validate for CreateSemesterRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(
            SEMESTER_RANGE.contains(&self.semester_number),
            "semesterNumber",
            "must be between 1 and 12",
        );
        errors.positive_id("departmentId", self.department_id);
        errors.positive_id("academicYearId", self.academic_year_id);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSemesterRequest {
    pub semester_number: Option<i32>,
    pub semester_type: Option<SemesterType>,
    pub department_id: Option<i64>,
    pub academic_year_id: Option<i64>,
}

impl Validate for UpdateSemesterRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if let Some(number) = self.semester_number {
            errors.check(
                SEMESTER_RANGE.contains(&number),
                "semesterNumber",
                "must be between 1 and 12",
            );
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterListQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub department_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub academic_year_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub semester_type: Option<SemesterType>,
    #[serde(default, deserialize_with = "flexible")]
    pub include_deleted: Option<bool>,
}

impl Validate for SemesterListQuery {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
