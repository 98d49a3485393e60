pub mod create;
pub mod query;

use std::sync::Arc;

use tracing::info;

use crate::errors::{Result, TrackademyError};
use crate::models::exam_results::{
    entities::ExamResult,
    requests::{
        CreateExamResultRequest, ExamResultFilter, ExamResultListQuery, TopPerformersQuery,
        UpdateExamResultRequest,
    },
    responses::ExamResultStatistics,
};
use crate::models::users::entities::Identity;
use crate::storage::Storage;

pub const EXAM_RESULT_NOT_FOUND: &str = "Exam result not found.";

/// 考试成绩
///
/// 管理员录入与修改；教师按考试查看；学生只能看到自己的成绩。
pub struct ExamResultService {
    storage: Arc<dyn Storage>,
}

impl ExamResultService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub async fn list_results(
        &self,
        identity: Identity,
        query: ExamResultListQuery,
    ) -> Result<Vec<ExamResult>> {
        query::list_results(self, identity, query).await
    }

    pub async fn create_result(&self, req: CreateExamResultRequest) -> Result<ExamResult> {
        create::create_result(self, req).await
    }

    pub async fn statistics(&self, filter: ExamResultFilter) -> Result<ExamResultStatistics> {
        self.storage.exam_result_statistics(filter).await
    }

    pub async fn top_performers(&self, query: TopPerformersQuery) -> Result<Vec<ExamResult>> {
        query::top_performers(self, query).await
    }

    pub async fn search_results(&self, filter: ExamResultFilter) -> Result<Vec<ExamResult>> {
        self.storage.list_exam_results(filter).await
    }

    pub async fn get_result(&self, identity: Identity, id: i64) -> Result<ExamResult> {
        query::get_result(self, identity, id).await
    }

    pub async fn update_result(&self, id: i64, req: UpdateExamResultRequest) -> Result<ExamResult> {
        if let Some(student_id) = req.student_id
            && self.storage.get_student(student_id).await?.is_none()
        {
            return Err(TrackademyError::bad_request("Student not found."));
        }

        let result = self
            .storage
            .update_exam_result(id, req)
            .await?
            .ok_or_else(|| TrackademyError::not_found(EXAM_RESULT_NOT_FOUND))?;
        info!("Exam result {} updated", id);
        Ok(result)
    }

    // 成绩没有软删除
    pub async fn delete_result(&self, id: i64) -> Result<()> {
        if !self.storage.delete_exam_result(id).await? {
            return Err(TrackademyError::not_found(EXAM_RESULT_NOT_FOUND));
        }
        info!("Exam result {} deleted", id);
        Ok(())
    }
}
