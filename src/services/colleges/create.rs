use tracing::info;

use super::CollegeService;
use crate::errors::{Result, TrackademyError};
use crate::models::colleges::{entities::College, requests::CreateCollegeRequest};

pub(super) const NAME_TAKEN: &str =
    "A college with this name already exists. Please use a different name.";
pub(super) const ABBREVIATION_TAKEN: &str =
    "A college with this abbreviation already exists. Please use a different abbreviation.";

pub async fn create_college(service: &CollegeService, req: CreateCollegeRequest) -> Result<College> {
    let storage = service.storage();

    // 已删除的同名学院会在存储层复活，这里只拦截仍在用的
    if let Some(existing) = storage.find_college_by_name(&req.name).await?
        && !existing.is_deleted
    {
        return Err(TrackademyError::conflict(NAME_TAKEN));
    }
    if let Some(existing) = storage.find_college_by_abbreviation(&req.abbreviation).await?
        && !existing.is_deleted
        && existing.name != req.name
    {
        return Err(TrackademyError::conflict(ABBREVIATION_TAKEN));
    }

    let college = storage.create_college(req).await?;
    info!("College '{}' created (id {})", college.name, college.id);
    Ok(college)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    fn request(name: &str, abbreviation: &str) -> CreateCollegeRequest {
        CreateCollegeRequest {
            name: name.into(),
            abbreviation: abbreviation.into(),
            website: Some("https://vgec.ac.in".into()),
            address: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates() {
        let fx = Fixture::new().await;
        let service = CollegeService::new(fx.shared());

        let created = service
            .create_college(request("Vishwakarma Government Engineering College", "VGEC"))
            .await
            .unwrap();
        assert_eq!(created.abbreviation, "VGEC");

        let err = service
            .create_college(request("Vishwakarma Government Engineering College", "VG"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), NAME_TAKEN);

        let err = service
            .create_college(request("Another College", "VGEC"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
        assert_eq!(err.message(), ABBREVIATION_TAKEN);
    }

    #[tokio::test]
    async fn test_create_revives_deleted_college() {
        let fx = Fixture::new().await;
        let service = CollegeService::new(fx.shared());
        let first = service
            .create_college(request("Nirma University", "NU"))
            .await
            .unwrap();
        service.delete_college(first.id).await.unwrap();

        let revived = service
            .create_college(request("Nirma University", "NIRMA"))
            .await
            .unwrap();
        assert_eq!(revived.id, first.id);
        assert_eq!(revived.abbreviation, "NIRMA");
        assert!(!revived.is_deleted);
    }
}
