use tracing::info;

use super::{COLLEGE_NOT_FOUND, CollegeService};
use super::create::{ABBREVIATION_TAKEN, NAME_TAKEN};
use crate::errors::{Result, TrackademyError};
use crate::models::colleges::{entities::College, requests::UpdateCollegeRequest};

pub async fn update_college(
    service: &CollegeService,
    id: i64,
    req: UpdateCollegeRequest,
) -> Result<College> {
    let storage = service.storage();
    let current = storage
        .get_college(id, false)
        .await?
        .ok_or_else(|| TrackademyError::not_found(COLLEGE_NOT_FOUND))?;

    // 唯一性检查排除自身
    if let Some(name) = req.name.as_deref().filter(|n| *n != current.name)
        && let Some(other) = storage.find_college_by_name(name).await?
        && other.id != id
    {
        return Err(TrackademyError::conflict(NAME_TAKEN));
    }
    if let Some(abbr) = req
        .abbreviation
        .as_deref()
        .filter(|a| *a != current.abbreviation)
        && let Some(other) = storage.find_college_by_abbreviation(abbr).await?
        && other.id != id
    {
        return Err(TrackademyError::conflict(ABBREVIATION_TAKEN));
    }

    let college = storage
        .update_college(id, req)
        .await?
        .ok_or_else(|| TrackademyError::not_found(COLLEGE_NOT_FOUND))?;
    info!("College {} updated", college.id);
    Ok(college)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    #[tokio::test]
    async fn test_partial_update() {
        let fx = Fixture::new().await;
        let service = CollegeService::new(fx.shared());

        let updated = service
            .update_college(
                fx.college.id,
                UpdateCollegeRequest {
                    website: Some("https://ldce.ac.in".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, fx.college.name);
        assert_eq!(updated.website.as_deref(), Some("https://ldce.ac.in"));

        // 名称不变时不触发冲突
        service
            .update_college(
                fx.college.id,
                UpdateCollegeRequest {
                    name: Some(fx.college.name.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = service
            .update_college(999, UpdateCollegeRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.message(), COLLEGE_NOT_FOUND);
    }
}
