use tracing::info;

use super::{EXAM_NOT_FOUND, ExamService};
use crate::errors::{Result, TrackademyError};

pub async fn delete_exam(service: &ExamService, id: i64) -> Result<()> {
    let storage = service.storage();
    if storage.get_exam(id, false).await?.is_none() {
        return Err(TrackademyError::not_found(EXAM_NOT_FOUND));
    }
    storage.set_exam_deleted(id, true).await?;
    info!("Exam {} soft-deleted", id);
    Ok(())
}

pub async fn hard_delete_exam(service: &ExamService, id: i64) -> Result<()> {
    let storage = service.storage();
    if storage.get_exam(id, true).await?.is_none() {
        return Err(TrackademyError::not_found(EXAM_NOT_FOUND));
    }
    if storage.count_exam_results(id).await? > 0 {
        return Err(TrackademyError::state_violation(
            "Cannot delete exam with associated exam results.",
        ));
    }

    storage.hard_delete_exam(id).await?;
    info!("Exam {} permanently deleted", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExamType;
    use crate::models::exams::requests::{CreateExamRequest, ExamListQuery};
    use crate::testing::Fixture;

    #[tokio::test]
    async fn test_soft_delete_restore_and_hard_delete() {
        let fx = Fixture::new().await;
        let service = ExamService::new(fx.shared());
        let exam = service
            .create_exam(CreateExamRequest {
                name: "Remedial".into(),
                exam_type: ExamType::Remedial,
                semester_id: fx.semester.id,
                description: None,
                max_marks: None,
                passing_marks: None,
                exam_date: None,
                duration: None,
                is_published: false,
            })
            .await
            .unwrap();

        service.delete_exam(exam.id).await.unwrap();
        assert_eq!(service.count_exams(ExamListQuery::default()).await.unwrap(), 0);
        assert_eq!(
            service
                .count_exams(ExamListQuery {
                    include_deleted: Some(true),
                    ..Default::default()
                })
                .await
                .unwrap(),
            1
        );

        let restored = service.restore_exam(exam.id).await.unwrap();
        assert!(!restored.is_deleted);
        let detail = service.get_exam(exam.id, true).await.unwrap();
        assert_eq!(detail.semester.map(|s| s.id), Some(fx.semester.id));

        service.hard_delete_exam(exam.id).await.unwrap();
        assert_eq!(service.hard_delete_exam(exam.id).await.unwrap_err().code(), "E004");
    }
}
