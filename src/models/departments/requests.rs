use serde::Deserialize;

use crate::errors::Result;
use crate::models::common::query::flexible;
use crate::utils::validate::{FieldErrors, Validate};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub abbreviation: String,
    pub college_id: i64,
}

impl Validate for CreateDepartmentRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, 255);
        errors.require_text("abbreviation", &self.abbreviation, 50);
        errors.positive_id("collegeId", self.college_id);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateDepartmentRequest {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub college_id: Option<i64>,
}

impl Validate for UpdateDepartmentRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.optional_text("name", self.name.as_deref(), 255);
        errors.optional_text("abbreviation", self.abbreviation.as_deref(), 50);
        if let Some(id) = self.college_id {
            errors.positive_id("collegeId", id);
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentListQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub college_id: Option<i64>,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "flexible")]
    pub include_deleted: Option<bool>,
}

impl Validate for DepartmentListQuery {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
