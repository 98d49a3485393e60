use super::{ACADEMIC_YEAR_NOT_FOUND, AcademicYearService};
use crate::errors::{Result, TrackademyError};
use crate::models::academic_years::{entities::AcademicYear, responses::AcademicYearDetail};
use crate::models::semesters::requests::SemesterListQuery;

pub async fn get_academic_year(
    service: &AcademicYearService,
    id: i64,
    with_relations: bool,
) -> Result<AcademicYearDetail> {
    let storage = service.storage();
    let academic_year = storage
        .get_academic_year(id, false)
        .await?
        .ok_or_else(|| TrackademyError::not_found(ACADEMIC_YEAR_NOT_FOUND))?;

    if !with_relations {
        return Ok(AcademicYearDetail {
            academic_year,
            college: None,
            semesters: None,
        });
    }

    let college = storage.get_college(academic_year.college_id, true).await?;
    let mut semesters = storage
        .list_semesters(SemesterListQuery {
            academic_year_id: Some(id),
            ..Default::default()
        })
        .await?;
    semesters.sort_by_key(|s| s.semester_number);

    Ok(AcademicYearDetail {
        academic_year,
        college,
        semesters: Some(semesters),
    })
}

pub async fn active_academic_year(
    service: &AcademicYearService,
    college_id: i64,
) -> Result<AcademicYear> {
    service
        .storage()
        .get_active_academic_year(college_id)
        .await?
        .ok_or_else(|| {
            TrackademyError::not_found("No active academic year found for this college.")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    #[tokio::test]
    async fn test_detail_lists_semesters() {
        let fx = Fixture::new().await;
        let service = AcademicYearService::new(fx.shared());

        let detail = service
            .get_academic_year(fx.academic_year.id, true)
            .await
            .unwrap();
        assert_eq!(detail.college.map(|c| c.id), Some(fx.college.id));
        let semesters = detail.semesters.unwrap_or_default();
        assert_eq!(semesters.len(), 1);
        assert_eq!(semesters[0].id, fx.semester.id);

        let plain = service
            .get_academic_year(fx.academic_year.id, false)
            .await
            .unwrap();
        assert!(plain.semesters.is_none());
    }

    #[tokio::test]
    async fn test_active_year_lookup() {
        let fx = Fixture::new().await;
        let service = AcademicYearService::new(fx.shared());

        let active = service.active_academic_year(fx.college.id).await.unwrap();
        assert_eq!(active.id, fx.academic_year.id);

        service.set_active(fx.academic_year.id, false).await.unwrap();
        let err = service.active_academic_year(fx.college.id).await.unwrap_err();
        assert_eq!(err.code(), "E004");
    }
}
