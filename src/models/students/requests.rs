use serde::Deserialize;

use crate::errors::Result;
use crate::models::common::query::flexible;
use crate::utils::validate::{FieldErrors, Validate, validate_email};

// 同时创建 STUDENT 账号和学生档案
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub email: String,
    pub full_name: String,
    pub enrollment_number: String,
    pub department_id: i64,
    pub semester_id: i64,
    pub division_id: i64,
    pub batch: Option<String>,
}

impl Validate for CreateStudentRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if let Err(msg) = validate_email(&self.email) {
            errors.add("email", msg);
        }
        errors.require_text("fullName", &self.full_name, 255);
        errors.require_text("enrollmentNumber", &self.enrollment_number, 50);
        errors.positive_id("departmentId", self.department_id);
        errors.positive_id("semesterId", self.semester_id);
        errors.positive_id("divisionId", self.division_id);
        errors.optional_text("batch", self.batch.as_deref(), 20);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateStudentRequest {
    pub full_name: Option<String>,
    pub batch: Option<String>,
    pub department_id: Option<i64>,
    pub semester_id: Option<i64>,
    pub division_id: Option<i64>,
}

impl UpdateStudentRequest {
    fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.batch.is_none()
            && self.department_id.is_none()
            && self.semester_id.is_none()
            && self.division_id.is_none()
    }
}

impl Validate for UpdateStudentRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.is_empty() {
            errors.add("body", "At least one field must be provided for update.");
        }
        errors.optional_text("fullName", self.full_name.as_deref(), 255);
        errors.optional_text("batch", self.batch.as_deref(), 20);
        for (field, id) in [
            ("departmentId", self.department_id),
            ("semesterId", self.semester_id),
            ("divisionId", self.division_id),
        ] {
            if let Some(id) = id {
                errors.positive_id(field, id);
            }
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentListQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub department_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub semester_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub division_id: Option<i64>,
    pub search: Option<String>,
}

impl Validate for StudentListQuery {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_rejected() {
        let message = UpdateStudentRequest::default()
            .validate()
            .unwrap_err()
            .message()
            .to_string();
        assert!(message.contains("At least one field must be provided for update."));

        let req = UpdateStudentRequest {
            division_id: Some(0),
            ..Default::default()
        };
        let message = req.validate().unwrap_err().message().to_string();
        assert!(message.contains("divisionId: must be a valid id"));
    }
}
