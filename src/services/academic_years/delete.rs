use tracing::info;

use super::{ACADEMIC_YEAR_NOT_FOUND, AcademicYearService};
use crate::errors::{Result, TrackademyError};
use crate::models::academic_years::entities::AcademicYear;

pub async fn delete_academic_year(
    service: &AcademicYearService,
    id: i64,
    force: bool,
) -> Result<()> {
    let storage = service.storage();

    // 硬删除允许作用于已软删除的学年
    if storage.get_academic_year(id, force).await?.is_none() {
        return Err(TrackademyError::not_found(ACADEMIC_YEAR_NOT_FOUND));
    }

    if !force {
        storage.set_academic_year_deleted(id, true).await?;
        info!("Academic year {} soft-deleted", id);
        return Ok(());
    }

    if storage.count_academic_year_semesters(id).await? > 0 {
        return Err(TrackademyError::state_violation(
            "Cannot delete academic year with associated semesters.",
        ));
    }
    storage.hard_delete_academic_year(id).await?;
    info!("Academic year {} permanently deleted", id);
    Ok(())
}

pub async fn restore_academic_year(service: &AcademicYearService, id: i64) -> Result<AcademicYear> {
    service
        .storage()
        .set_academic_year_deleted(id, false)
        .await?
        .ok_or_else(|| TrackademyError::not_found(ACADEMIC_YEAR_NOT_FOUND))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::academic_years::requests::{
        AcademicYearListQuery, CreateAcademicYearRequest,
    };
    use crate::testing::Fixture;

    #[tokio::test]
    async fn test_soft_delete_hides_and_deactivates() {
        let fx = Fixture::new().await;
        let service = AcademicYearService::new(fx.shared());

        service
            .delete_academic_year(fx.academic_year.id, false)
            .await
            .unwrap();
        assert_eq!(
            service
                .get_academic_year(fx.academic_year.id, false)
                .await
                .unwrap_err()
                .code(),
            "E004"
        );
        let all = service
            .list_academic_years(AcademicYearListQuery {
                include_deleted: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        let deleted = all.iter().find(|y| y.id == fx.academic_year.id).unwrap();
        assert!(!deleted.is_active);

        let restored = service.restore_academic_year(fx.academic_year.id).await.unwrap();
        let again = service.restore_academic_year(fx.academic_year.id).await.unwrap();
        assert_eq!(restored.updated_at, again.updated_at);
    }

    #[tokio::test]
    async fn test_hard_delete_guard() {
        let fx = Fixture::new().await;
        let service = AcademicYearService::new(fx.shared());

        let err = service
            .delete_academic_year(fx.academic_year.id, true)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Cannot delete academic year with associated semesters.");

        let empty = service
            .create_academic_year(CreateAcademicYearRequest {
                year: "2031-2032".into(),
                college_id: fx.college.id,
                is_active: false,
            })
            .await
            .unwrap();
        service.delete_academic_year(empty.id, true).await.unwrap();
        assert_eq!(
            service.restore_academic_year(empty.id).await.unwrap_err().code(),
            "E004"
        );
    }
}
