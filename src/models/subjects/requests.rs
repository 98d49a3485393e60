use serde::Deserialize;

use crate::errors::Result;
use crate::models::common::enums::SubjectType;
use crate::models::common::query::flexible;
use crate::utils::validate::{FieldErrors, Validate};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectRequest {
    pub name: String,
    pub abbreviation: Option<String>,
    pub code: String,
    #[serde(rename = "type", alias = "subjectType")]
    pub subject_type: SubjectType,
    pub department_id: i64,
    pub semester_id: i64,
}

impl Validate for CreateSubjectRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, 255);
        errors.optional_text("abbreviation", self.abbreviation.as_deref(), 50);
        errors.require_text("code", &self.code, 50);
        errors.positive_id("departmentId", self.department_id);
        errors.positive_id("semesterId", self.semester_id);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "type", alias = "subjectType")]
    pub subject_type: Option<SubjectType>,
    pub department_id: Option<i64>,
    pub semester_id: Option<i64>,
}

impl Validate for UpdateSubjectRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.optional_text("name", self.name.as_deref(), 255);
        errors.optional_text("abbreviation", self.abbreviation.as_deref(), 50);
        errors.optional_text("code", self.code.as_deref(), 50);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectListQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub department_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub semester_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible", alias = "type")]
    pub subject_type: Option<SubjectType>,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "flexible")]
    pub include_deleted: Option<bool>,
}

impl Validate for SubjectListQuery {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
