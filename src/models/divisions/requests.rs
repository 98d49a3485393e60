use serde::Deserialize;

use crate::errors::Result;
use crate::models::common::query::flexible;
use crate::utils::validate::{FieldErrors, Validate};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDivisionRequest {
    pub name: String,
    pub semester_id: i64,
}

impl Validate for CreateDivisionRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, 50);
        errors.positive_id("semesterId", self.semester_id);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateDivisionRequest {
    pub name: Option<String>,
}

impl Validate for UpdateDivisionRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        match &self.name {
            Some(name) => errors.require_text("name", name, 50),
            None => errors.add("body", "At least one field must be provided for update."),
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionListQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub semester_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub include_deleted: Option<bool>,
}

impl Validate for DivisionListQuery {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
