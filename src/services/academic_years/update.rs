use tracing::info;

use super::{ACADEMIC_YEAR_NOT_FOUND, AcademicYearService, year_taken};
use crate::errors::{Result, TrackademyError};
use crate::models::academic_years::{entities::AcademicYear, requests::UpdateAcademicYearRequest};

pub async fn update_academic_year(
    service: &AcademicYearService,
    id: i64,
    req: UpdateAcademicYearRequest,
) -> Result<AcademicYear> {
    let storage = service.storage();
    let current = storage
        .get_academic_year(id, false)
        .await?
        .ok_or_else(|| TrackademyError::not_found(ACADEMIC_YEAR_NOT_FOUND))?;

    if let Some(year) = req.year.as_deref().filter(|y| *y != current.year)
        && let Some(other) = storage.find_academic_year_by_label(year).await?
        && other.id != id
    {
        return Err(year_taken(year));
    }
    if let Some(college_id) = req.college_id.filter(|c| *c != current.college_id)
        && storage.get_college(college_id, false).await?.is_none()
    {
        return Err(TrackademyError::bad_request("College not found."));
    }

    let updated = storage
        .update_academic_year(id, req)
        .await?
        .ok_or_else(|| TrackademyError::not_found(ACADEMIC_YEAR_NOT_FOUND))?;
    info!("Academic year {} updated", updated.id);
    Ok(updated)
}

/// activate / deactivate
pub async fn set_active(
    service: &AcademicYearService,
    id: i64,
    active: bool,
) -> Result<AcademicYear> {
    let updated = service
        .storage()
        .set_academic_year_active(id, active)
        .await?
        .ok_or_else(|| TrackademyError::not_found(ACADEMIC_YEAR_NOT_FOUND))?;
    info!(
        "Academic year {} {}",
        id,
        if active { "activated" } else { "deactivated" }
    );
    Ok(updated)
}
