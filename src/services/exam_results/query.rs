use super::{EXAM_RESULT_NOT_FOUND, ExamResultService};
use crate::errors::{Result, TrackademyError};
use crate::models::exam_results::{
    entities::ExamResult,
    requests::{ExamResultFilter, ExamResultListQuery, TopPerformersQuery},
};
use crate::models::users::entities::Identity;
use crate::services::profiles::student_profile;

const DEFAULT_TOP_PERFORMERS: u64 = 10;

pub async fn list_results(
    service: &ExamResultService,
    identity: Identity,
    query: ExamResultListQuery,
) -> Result<Vec<ExamResult>> {
    let storage = service.storage();
    let filter = if identity.is_student() {
        let student = student_profile(storage, &identity).await?;
        ExamResultFilter {
            student_id: Some(student.id),
            ..Default::default()
        }
    } else {
        let exam_id = query
            .exam_id
            .ok_or_else(|| TrackademyError::bad_request("Exam ID is required for this role."))?;
        ExamResultFilter {
            exam_id: Some(exam_id),
            ..Default::default()
        }
    };

    storage.list_exam_results(filter).await
}

pub async fn get_result(
    service: &ExamResultService,
    identity: Identity,
    id: i64,
) -> Result<ExamResult> {
    let storage = service.storage();
    let result = storage
        .get_exam_result(id)
        .await?
        .ok_or_else(|| TrackademyError::not_found(EXAM_RESULT_NOT_FOUND))?;

    if identity.is_student() {
        let student = student_profile(storage, &identity).await?;
        if result.student_id != Some(student.id) {
            return Err(TrackademyError::forbidden(
                "You are not authorized to view this result.",
            ));
        }
    }
    Ok(result)
}

pub async fn top_performers(
    service: &ExamResultService,
    query: TopPerformersQuery,
) -> Result<Vec<ExamResult>> {
    service
        .storage()
        .top_performers(
            query.exam_id,
            query.limit.unwrap_or(DEFAULT_TOP_PERFORMERS),
            query.by_field.unwrap_or_default(),
        )
        .await
}
