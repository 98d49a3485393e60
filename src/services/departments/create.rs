use tracing::info;

use super::{DepartmentService, NAME_TAKEN};
use crate::errors::{Result, TrackademyError};
use crate::models::departments::{entities::Department, requests::CreateDepartmentRequest};

pub async fn create_department(
    service: &DepartmentService,
    req: CreateDepartmentRequest,
) -> Result<Department> {
    let storage = service.storage();

    if storage.get_college(req.college_id, false).await?.is_none() {
        return Err(TrackademyError::bad_request("College not found."));
    }
    if let Some(existing) = storage
        .find_department_by_name(req.college_id, &req.name)
        .await?
        && !existing.is_deleted
    {
        return Err(TrackademyError::conflict(NAME_TAKEN));
    }

    let department = storage.create_department(req).await?;
    info!(
        "Department '{}' created in college {}",
        department.name, department.college_id
    );
    Ok(department)
}
