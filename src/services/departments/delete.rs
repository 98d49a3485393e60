use tracing::info;

use super::{DEPARTMENT_NOT_FOUND, DepartmentService};
use crate::errors::{Result, TrackademyError};
use crate::models::departments::entities::Department;

const HAS_DEPENDENTS: &str = "Cannot delete department. It has associated subjects, faculties, semesters, or students. Please remove or transfer them first.";

/// `force` 为真时物理删除，仍被引用的行由外键拦下
pub async fn delete_department(service: &DepartmentService, id: i64, force: bool) -> Result<()> {
    let storage = service.storage();
    if storage.get_department(id, false).await?.is_none() {
        return Err(TrackademyError::not_found(DEPARTMENT_NOT_FOUND));
    }

    if force {
        storage.hard_delete_department(id).await?;
        info!("Department {} permanently deleted", id);
        return Ok(());
    }

    if storage.count_department_dependents(id).await? > 0 {
        return Err(TrackademyError::state_violation(HAS_DEPENDENTS));
    }
    storage.set_department_deleted(id, true).await?;
    info!("Department {} soft-deleted", id);
    Ok(())
}

pub async fn restore_department(service: &DepartmentService, id: i64) -> Result<Department> {
    service
        .storage()
        .set_department_deleted(id, false)
        .await?
        .ok_or_else(|| TrackademyError::not_found(DEPARTMENT_NOT_FOUND))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::departments::requests::{CreateDepartmentRequest, DepartmentListQuery};
    use crate::testing::Fixture;

    #[tokio::test]
    async fn test_dependents_block_soft_delete() {
        let fx = Fixture::new().await;
        let service = DepartmentService::new(fx.shared());

        let err = service
            .delete_department(fx.department.id, false)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E006");
        assert_eq!(err.message(), HAS_DEPENDENTS);
    }

    #[tokio::test]
    async fn test_delete_restore_and_force() {
        let fx = Fixture::new().await;
        let service = DepartmentService::new(fx.shared());
        let dept = service
            .create_department(CreateDepartmentRequest {
                name: "Mechanical".into(),
                abbreviation: "ME".into(),
                college_id: fx.college.id,
            })
            .await
            .unwrap();

        service.delete_department(dept.id, false).await.unwrap();
        let query = DepartmentListQuery {
            college_id: Some(fx.college.id),
            ..Default::default()
        };
        assert_eq!(service.count_departments(query.clone()).await.unwrap(), 1);

        let restored = service.restore_department(dept.id).await.unwrap();
        assert!(!restored.is_deleted);
        assert_eq!(service.count_departments(query).await.unwrap(), 2);

        service.delete_department(dept.id, true).await.unwrap();
        assert_eq!(
            service.restore_department(dept.id).await.unwrap_err().code(),
            "E004"
        );
    }
}
