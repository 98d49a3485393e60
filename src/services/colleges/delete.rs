use tracing::info;

use super::{COLLEGE_NOT_FOUND, CollegeService};
use crate::errors::{Result, TrackademyError};
use crate::models::colleges::entities::College;

pub async fn delete_college(service: &CollegeService, id: i64) -> Result<()> {
    let storage = service.storage();
    if storage.get_college(id, false).await?.is_none() {
        return Err(TrackademyError::not_found(COLLEGE_NOT_FOUND));
    }
    if storage.count_college_departments(id).await? > 0 {
        return Err(TrackademyError::state_violation(
            "Cannot delete college with associated departments.",
        ));
    }

    storage.set_college_deleted(id, true).await?;
    info!("College {} soft-deleted", id);
    Ok(())
}

// 对未删除的记录恢复是空操作
pub async fn restore_college(service: &CollegeService, id: i64) -> Result<College> {
    let college = service
        .storage()
        .set_college_deleted(id, false)
        .await?
        .ok_or_else(|| TrackademyError::not_found(COLLEGE_NOT_FOUND))?;
    info!("College {} restored", id);
    Ok(college)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::colleges::requests::{CollegeListQuery, CreateCollegeRequest};
    use crate::testing::Fixture;

    #[tokio::test]
    async fn test_soft_delete_and_restore() {
        let fx = Fixture::new().await;
        let service = CollegeService::new(fx.shared());
        let college = service
            .create_college(CreateCollegeRequest {
                name: "Government Engineering College".into(),
                abbreviation: "GEC".into(),
                website: None,
                address: None,
            })
            .await
            .unwrap();

        service.delete_college(college.id).await.unwrap();
        assert_eq!(
            service.get_college(college.id).await.unwrap_err().code(),
            "E004"
        );
        let visible = service.list_colleges(CollegeListQuery::default()).await.unwrap();
        assert!(visible.iter().all(|c| c.id != college.id));
        let all = service
            .list_colleges(CollegeListQuery {
                include_deleted: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(all.iter().any(|c| c.id == college.id));

        let restored = service.restore_college(college.id).await.unwrap();
        assert!(!restored.is_deleted);
        let again = service.restore_college(college.id).await.unwrap();
        assert_eq!(again.updated_at, restored.updated_at);
    }

    #[tokio::test]
    async fn test_delete_blocked_by_departments() {
        let fx = Fixture::new().await;
        let service = CollegeService::new(fx.shared());

        let err = service.delete_college(fx.college.id).await.unwrap_err();
        assert_eq!(err.code(), "E006");
        assert_eq!(service.delete_college(404).await.unwrap_err().code(), "E004");
    }
}
