use tracing::info;

use super::{DEPARTMENT_NOT_FOUND, DepartmentService, NAME_TAKEN};
use crate::errors::{Result, TrackademyError};
use crate::models::departments::{entities::Department, requests::UpdateDepartmentRequest};

pub async fn update_department(
    service: &DepartmentService,
    id: i64,
    req: UpdateDepartmentRequest,
) -> Result<Department> {
    let storage = service.storage();
    let current = storage
        .get_department(id, false)
        .await?
        .ok_or_else(|| TrackademyError::not_found(DEPARTMENT_NOT_FOUND))?;

    let college_id = req.college_id.unwrap_or(current.college_id);
    if college_id != current.college_id && storage.get_college(college_id, false).await?.is_none()
    {
        return Err(TrackademyError::bad_request("College not found."));
    }

    let name = req.name.as_deref().unwrap_or(&current.name);
    // 已软删除的记录仍占用唯一键
    if let Some(other) = storage.find_department_by_name(college_id, name).await?
        && other.id != id
    {
        return Err(TrackademyError::conflict(NAME_TAKEN));
    }

    let department = storage
        .update_department(id, req)
        .await?
        .ok_or_else(|| TrackademyError::not_found(DEPARTMENT_NOT_FOUND))?;
    info!("Department {} updated", department.id);
    Ok(department)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::departments::requests::CreateDepartmentRequest;
    use crate::testing::Fixture;

    #[tokio::test]
    async fn test_rename_conflict_excludes_self() {
        let fx = Fixture::new().await;
        let service = DepartmentService::new(fx.shared());
        let it = service
            .create_department(CreateDepartmentRequest {
                name: "Information Technology".into(),
                abbreviation: "IT".into(),
                college_id: fx.college.id,
            })
            .await
            .unwrap();

        let same = service
            .update_department(
                it.id,
                UpdateDepartmentRequest {
                    name: Some("Information Technology".into()),
                    abbreviation: Some("INFT".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.abbreviation, "INFT");

        let err = service
            .update_department(
                it.id,
                UpdateDepartmentRequest {
                    name: Some(fx.department.name.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), NAME_TAKEN);
    }

    #[tokio::test]
    async fn test_soft_deleted_department_still_holds_its_name() {
        let fx = Fixture::new().await;
        let service = DepartmentService::new(fx.shared());
        let civil = service
            .create_department(CreateDepartmentRequest {
                name: "Civil Engineering".into(),
                abbreviation: "CL".into(),
                college_id: fx.college.id,
            })
            .await
            .unwrap();
        service.delete_department(civil.id, false).await.unwrap();

        let mech = service
            .create_department(CreateDepartmentRequest {
                name: "Mechanical Engineering".into(),
                abbreviation: "ME".into(),
                college_id: fx.college.id,
            })
            .await
            .unwrap();
        let err = service
            .update_department(
                mech.id,
                UpdateDepartmentRequest {
                    name: Some("Civil Engineering".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
        assert_eq!(err.message(), NAME_TAKEN);
    }
}
