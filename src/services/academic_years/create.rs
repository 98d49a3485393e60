use tracing::info;

use super::{AcademicYearService, year_taken};
use crate::errors::{Result, TrackademyError};
use crate::models::academic_years::{entities::AcademicYear, requests::CreateAcademicYearRequest};

pub async fn create_academic_year(
    service: &AcademicYearService,
    req: CreateAcademicYearRequest,
) -> Result<AcademicYear> {
    let storage = service.storage();

    if storage.get_college(req.college_id, false).await?.is_none() {
        return Err(TrackademyError::bad_request("College not found."));
    }
    if let Some(existing) = storage.find_academic_year_by_label(&req.year).await?
        && !existing.is_deleted
    {
        return Err(year_taken(&req.year));
    }

    let year = storage.create_academic_year(req).await?;
    info!(
        "Academic year {} created for college {} (active: {})",
        year.year, year.college_id, year.is_active
    );
    Ok(year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::academic_years::requests::AcademicYearListQuery;
    use crate::testing::Fixture;

    fn request(fx: &Fixture, year: &str, is_active: bool) -> CreateAcademicYearRequest {
        CreateAcademicYearRequest {
            year: year.into(),
            college_id: fx.college.id,
            is_active,
        }
    }

    #[tokio::test]
    async fn test_latest_active_year_wins() {
        let fx = Fixture::new().await;
        let service = AcademicYearService::new(fx.shared());

        service
            .create_academic_year(request(&fx, "2025-2026", true))
            .await
            .unwrap();
        service
            .create_academic_year(request(&fx, "2026-2027", true))
            .await
            .unwrap();

        let active = service
            .list_academic_years(AcademicYearListQuery {
                college_id: Some(fx.college.id),
                is_active: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].year, "2026-2027");
    }

    #[tokio::test]
    async fn test_duplicate_and_unknown_college() {
        let fx = Fixture::new().await;
        let service = AcademicYearService::new(fx.shared());

        let err = service
            .create_academic_year(request(&fx, &fx.academic_year.year, false))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
        assert_eq!(err.message(), "Academic year '2024-2025' already exists.");

        let mut req = request(&fx, "2030-2031", false);
        req.college_id = 555;
        let err = service.create_academic_year(req).await.unwrap_err();
        assert_eq!(err.code(), "E007");
        assert_eq!(err.message(), "College not found.");
    }
}
