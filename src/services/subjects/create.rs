use tracing::info;

use super::{CODE_TAKEN, SubjectService};
use crate::errors::{Result, TrackademyError};
use crate::models::subjects::{entities::Subject, requests::CreateSubjectRequest};

pub async fn create_subject(service: &SubjectService, req: CreateSubjectRequest) -> Result<Subject> {
    let storage = service.storage();

    if storage.get_department(req.department_id, false).await?.is_none() {
        return Err(TrackademyError::bad_request("Department not found."));
    }
    if storage.get_semester(req.semester_id, false).await?.is_none() {
        return Err(TrackademyError::bad_request("Semester not found."));
    }
    if let Some(existing) = storage
        .find_subject_by_code(&req.code, req.department_id, req.semester_id)
        .await?
        && !existing.is_deleted
    {
        return Err(TrackademyError::conflict(CODE_TAKEN));
    }

    let subject = storage.create_subject(req).await?;
    info!("Subject {} ({}) created", subject.code, subject.name);
    Ok(subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SemesterType, SubjectType};
    use crate::models::semesters::requests::CreateSemesterRequest;
    use crate::testing::Fixture;

    fn request(department_id: i64, semester_id: i64) -> CreateSubjectRequest {
        CreateSubjectRequest {
            name: "Operating Systems".into(),
            abbreviation: Some("OS".into()),
            code: "3140702".into(),
            subject_type: SubjectType::Mandatory,
            department_id,
            semester_id,
        }
    }

    #[tokio::test]
    async fn test_code_unique_per_department_and_semester() {
        let fx = Fixture::new().await;
        let service = SubjectService::new(fx.shared());

        service
            .create_subject(request(fx.department.id, fx.semester.id))
            .await
            .unwrap();
        let err = service
            .create_subject(request(fx.department.id, fx.semester.id))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
        assert_eq!(err.message(), CODE_TAKEN);

        // 换一个学期则允许
        let next = fx
            .storage
            .create_semester(CreateSemesterRequest {
                semester_number: 2,
                semester_type: SemesterType::Even,
                department_id: fx.department.id,
                academic_year_id: fx.academic_year.id,
            })
            .await
            .unwrap();
        service
            .create_subject(request(fx.department.id, next.id))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_deleted_subject_can_be_recreated() {
        let fx = Fixture::new().await;
        let service = SubjectService::new(fx.shared());
        let first = service
            .create_subject(request(fx.department.id, fx.semester.id))
            .await
            .unwrap();
        service.delete_subject(first.id).await.unwrap();

        let again = service
            .create_subject(request(fx.department.id, fx.semester.id))
            .await
            .unwrap();
        assert_eq!(again.id, first.id);
        assert!(!again.is_deleted);
    }
}
