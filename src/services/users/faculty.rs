use tracing::info;

use super::{EMAIL_TAKEN, UserService};
use crate::errors::{Result, TrackademyError};
use crate::models::faculty::{
    entities::Faculty,
    requests::{CreateFacultyRequest, UpdateFacultyRequest},
};

pub const FACULTY_NOT_FOUND: &str = "Faculty not found.";

pub async fn create_faculty(service: &UserService, req: CreateFacultyRequest) -> Result<Faculty> {
    let storage = service.storage();

    if storage.get_user_by_email(&req.email).await?.is_some() {
        return Err(TrackademyError::conflict(EMAIL_TAKEN));
    }
    if storage.get_department(req.department_id, false).await?.is_none() {
        return Err(TrackademyError::bad_request("Department not found."));
    }

    let faculty = storage.create_faculty(req).await?;
    info!("Faculty {} created", faculty.full_name);
    Ok(faculty)
}

pub async fn get_faculty(service: &UserService, id: i64) -> Result<Faculty> {
    service
        .storage()
        .get_faculty(id)
        .await?
        .ok_or_else(|| TrackademyError::not_found(FACULTY_NOT_FOUND))
}

pub async fn update_faculty(
    service: &UserService,
    id: i64,
    req: UpdateFacultyRequest,
) -> Result<Faculty> {
    let storage = service.storage();
    get_faculty(service, id).await?;
    if let Some(department_id) = req.department_id
        && storage.get_department(department_id, false).await?.is_none()
    {
        return Err(TrackademyError::bad_request("Department not found."));
    }

    let faculty = storage
        .update_faculty(id, req)
        .await?
        .ok_or_else(|| TrackademyError::not_found(FACULTY_NOT_FOUND))?;
    info!("Faculty {} updated", faculty.full_name);
    Ok(faculty)
}

pub async fn delete_faculty(service: &UserService, id: i64) -> Result<()> {
    get_faculty(service, id).await?;
    service.storage().set_faculty_deleted(id, true).await?;
    info!("Faculty {} deleted", id);
    Ok(())
}

pub async fn restore_faculty(service: &UserService, id: i64) -> Result<Faculty> {
    let faculty = service
        .storage()
        .set_faculty_deleted(id, false)
        .await?
        .ok_or_else(|| TrackademyError::not_found(FACULTY_NOT_FOUND))?;
    info!("Faculty {} restored", id);
    Ok(faculty)
}
