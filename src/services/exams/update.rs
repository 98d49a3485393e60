use tracing::info;

use super::{EXAM_NOT_FOUND, ExamService, type_taken};
use crate::errors::{Result, TrackademyError};
use crate::models::exams::{entities::Exam, requests::UpdateExamRequest};

pub async fn update_exam(service: &ExamService, id: i64, req: UpdateExamRequest) -> Result<Exam> {
    let storage = service.storage();
    let current = storage
        .get_exam(id, false)
        .await?
        .ok_or_else(|| TrackademyError::not_found(EXAM_NOT_FOUND))?;

    let semester_id = req.semester_id.unwrap_or(current.semester_id);
    let exam_type = req.exam_type.unwrap_or(current.exam_type);
    if semester_id != current.semester_id
        && storage.get_semester(semester_id, false).await?.is_none()
    {
        return Err(TrackademyError::bad_request("Semester not found."));
    }
    // 已软删除的记录仍占用唯一键
    if let Some(other) = storage
        .find_exam_by_type(semester_id, exam_type.as_str())
        .await?
        && other.id != id
    {
        return Err(type_taken(exam_type));
    }

    // 合并后再比较及格线与满分
    if let (Some(max), Some(passing)) = (
        req.max_marks.or(current.max_marks),
        req.passing_marks.or(current.passing_marks),
    ) && passing > max
    {
        return Err(TrackademyError::validation(
            "Validation failed: passingMarks: cannot be greater than max marks",
        ));
    }

    let exam = storage
        .update_exam(id, req)
        .await?
        .ok_or_else(|| TrackademyError::not_found(EXAM_NOT_FOUND))?;
    info!("Exam {} updated", exam.id);
    Ok(exam)
}

pub async fn set_published(service: &ExamService, id: i64, published: bool) -> Result<Exam> {
    let exam = service
        .storage()
        .set_exam_published(id, published)
        .await?
        .ok_or_else(|| TrackademyError::not_found(EXAM_NOT_FOUND))?;
    info!(
        "Exam {} {}",
        id,
        if published { "published" } else { "unpublished" }
    );
    Ok(exam)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExamType;
    use crate::models::exams::requests::CreateExamRequest;
    use crate::testing::Fixture;

    fn midterm(semester_id: i64) -> CreateExamRequest {
        CreateExamRequest {
            name: "Mid Semester".into(),
            exam_type: ExamType::Midterm,
            semester_id,
            description: None,
            max_marks: Some(30.0),
            passing_marks: Some(12.0),
            exam_date: None,
            duration: None,
            is_published: false,
        }
    }

    #[tokio::test]
    async fn test_publish_cycle() {
        let fx = Fixture::new().await;
        let service = ExamService::new(fx.shared());
        let exam = service.create_exam(midterm(fx.semester.id)).await.unwrap();

        assert!(service.published_exams().await.unwrap().is_empty());
        assert!(service.set_published(exam.id, true).await.unwrap().is_published);
        assert_eq!(service.published_exams().await.unwrap().len(), 1);
        assert!(!service.set_published(exam.id, false).await.unwrap().is_published);
    }

    #[tokio::test]
    async fn test_passing_marks_checked_against_stored_max() {
        let fx = Fixture::new().await;
        let service = ExamService::new(fx.shared());
        let exam = service.create_exam(midterm(fx.semester.id)).await.unwrap();

        let err = service
            .update_exam(
                exam.id,
                UpdateExamRequest {
                    passing_marks: Some(40.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E001");

        let updated = service
            .update_exam(
                exam.id,
                UpdateExamRequest {
                    name: Some("Mid Semester (revised)".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Mid Semester (revised)");
        assert_eq!(updated.max_marks, Some(30.0));
    }

    #[tokio::test]
    async fn test_soft_deleted_exam_still_holds_its_type() {
        let fx = Fixture::new().await;
        let service = ExamService::new(fx.shared());
        let old = service.create_exam(midterm(fx.semester.id)).await.unwrap();
        service.delete_exam(old.id).await.unwrap();

        let mut end_sem = midterm(fx.semester.id);
        end_sem.name = "End Semester".into();
        end_sem.exam_type = ExamType::Final;
        let end_sem = service.create_exam(end_sem).await.unwrap();

        let err = service
            .update_exam(
                end_sem.id,
                UpdateExamRequest {
                    exam_type: Some(ExamType::Midterm),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
        assert_eq!(err.message(), type_taken(ExamType::Midterm).message());
    }
}
