use serde::Deserialize;

use crate::errors::Result;
use crate::models::common::query::flexible;
use crate::utils::validate::{FieldErrors, Validate, validate_email};

// 同时创建 FACULTY 账号和教师档案
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacultyRequest {
    pub email: String,
    pub full_name: String,
    pub designation: Option<String>,
    pub department_id: i64,
}

impl Validate for CreateFacultyRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if let Err(msg) = validate_email(&self.email) {
            errors.add("email", msg);
        }
        errors.require_text("fullName", &self.full_name, 255);
        errors.optional_text("designation", self.designation.as_deref(), 100);
        errors.positive_id("departmentId", self.department_id);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateFacultyRequest {
    pub full_name: Option<String>,
    pub designation: Option<String>,
    pub department_id: Option<i64>,
}

impl Validate for UpdateFacultyRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.full_name.is_none() && self.designation.is_none() && self.department_id.is_none()
        {
            errors.add("body", "At least one field must be provided for update.");
        }
        errors.optional_text("fullName", self.full_name.as_deref(), 255);
        errors.optional_text("designation", self.designation.as_deref(), 100);
        if let Some(id) = self.department_id {
            errors.positive_id("departmentId", id);
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyListQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub department_id: Option<i64>,
    pub search: Option<String>,
}

impl Validate for FacultyListQuery {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
