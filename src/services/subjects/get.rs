use super::{SUBJECT_NOT_FOUND, SubjectService};
use crate::errors::{Result, TrackademyError};
use crate::models::subjects::responses::SubjectDetail;

pub async fn get_subject(
    service: &SubjectService,
    id: i64,
    with_relations: bool,
) -> Result<SubjectDetail> {
    let storage = service.storage();
    let subject = storage
        .get_subject(id, false)
        .await?
        .ok_or_else(|| TrackademyError::not_found(SUBJECT_NOT_FOUND))?;

    let (department, semester) = if with_relations {
        (
            storage.get_department(subject.department_id, true).await?,
            storage.get_semester(subject.semester_id, true).await?,
        )
    } else {
        (None, None)
    };

    Ok(SubjectDetail {
        subject,
        department,
        semester,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::subjects::requests::SubjectListQuery;
    use crate::testing::{Fixture, subject};

    #[tokio::test]
    async fn test_get_and_count() {
        let fx = Fixture::new().await;
        let service = SubjectService::new(fx.shared());
        let s = subject(&fx, "3140705").await;
        subject(&fx, "3140707").await;

        let detail = service.get_subject(s.id, true).await.unwrap();
        assert_eq!(detail.department.map(|d| d.id), Some(fx.department.id));
        assert_eq!(detail.semester.map(|d| d.id), Some(fx.semester.id));

        let count = service
            .count_subjects(SubjectListQuery {
                search: Some("3140705".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(count, 1);

        service.delete_subject(s.id).await.unwrap();
        assert_eq!(
            service.get_subject(s.id, false).await.unwrap_err().message(),
            SUBJECT_NOT_FOUND
        );
    }
}
