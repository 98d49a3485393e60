use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::errors::Result;
use crate::models::common::query::flexible;
use crate::utils::validate::{FieldErrors, Validate};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub total_marks: f64,
}

impl Validate for CreateAssignmentRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.positive_id("courseId", self.course_id);
        errors.require_text("title", &self.title, 255);
        errors.optional_text("description", self.description.as_deref(), 5000);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub total_marks: Option<f64>,
}

impl Validate for UpdateAssignmentRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.optional_text("title", self.title.as_deref(), 255);
        errors.optional_text("description", self.description.as_deref(), 5000);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentListQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub course_id: Option<i64>,
}

impl Validate for AssignmentListQuery {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// 按角色收窄后的作业查询条件
#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    pub course_id: Option<i64>,
    /// `None` 表示不限课程（管理员）
    pub course_ids: Option<Vec<i64>>,
}
