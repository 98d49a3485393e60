use super::{DEPARTMENT_NOT_FOUND, DepartmentService};
use crate::errors::{Result, TrackademyError};
use crate::models::departments::responses::DepartmentDetail;

pub async fn get_department(
    service: &DepartmentService,
    id: i64,
    with_relations: bool,
) -> Result<DepartmentDetail> {
    let storage = service.storage();
    let department = storage
        .get_department(id, false)
        .await?
        .ok_or_else(|| TrackademyError::not_found(DEPARTMENT_NOT_FOUND))?;

    let college = if with_relations {
        storage.get_college(department.college_id, true).await?
    } else {
        None
    };

    Ok(DepartmentDetail {
        department,
        college,
    })
}
