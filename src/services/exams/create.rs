use tracing::info;

use super::{ExamService, type_taken};
use crate::errors::{Result, TrackademyError};
use crate::models::exams::{entities::Exam, requests::CreateExamRequest};

pub async fn create_exam(service: &ExamService, req: CreateExamRequest) -> Result<Exam> {
    let storage = service.storage();

    if storage.get_semester(req.semester_id, false).await?.is_none() {
        return Err(TrackademyError::bad_request("Semester not found."));
    }
    // 每个学期每种考试类型只能有一场
    if let Some(existing) = storage
        .find_exam_by_type(req.semester_id, req.exam_type.as_str())
        .await?
        && !existing.is_deleted
    {
        return Err(type_taken(req.exam_type));
    }

    let exam = storage.create_exam(req).await?;
    info!(
        "Exam '{}' ({}) created for semester {}",
        exam.name, exam.exam_type, exam.semester_id
    );
    Ok(exam)
}
