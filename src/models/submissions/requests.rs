use serde::Deserialize;

use crate::errors::Result;
use crate::models::common::enums::SubmissionStatus;
use crate::models::common::query::flexible;
use crate::utils::validate::{FieldErrors, Validate};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    pub assignment_id: i64,
    pub content: Option<String>,
    /// 上传接口写入的对象存储键
    #[serde(skip)]
    pub file_path: Option<String>,
}

impl Validate for CreateSubmissionRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.positive_id("assignmentId", self.assignment_id);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSubmissionRequest {
    pub content: Option<String>,
    pub file_path: Option<String>,
}

impl Validate for UpdateSubmissionRequest {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSubmissionRequest {
    pub marks_awarded: f64,
    pub feedback: Option<String>,
}

impl Validate for GradeSubmissionRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(
            self.marks_awarded.is_finite(),
            "marksAwarded",
            "must be a number",
        );
        errors.optional_text("feedback", self.feedback.as_deref(), 5000);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionListQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub assignment_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub status: Option<SubmissionStatus>,
}

impl Validate for SubmissionListQuery {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// 按角色收窄后的提交查询条件
#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
    pub assignment_id: Option<i64>,
    pub status: Option<SubmissionStatus>,
    /// 学生只能看自己的提交
    pub student_id: Option<i64>,
    /// 教师只能看自己课程下的提交
    pub course_ids: Option<Vec<i64>>,
}
