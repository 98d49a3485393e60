//! 学期的创建、修改与删除
//!
//! 自然键为 (院系, 学年, 学期序号)。

use tracing::info;

use super::{SEMESTER_NOT_FOUND, SemesterService};
use crate::errors::{Result, TrackademyError};
use crate::models::semesters::{
    entities::Semester,
    requests::{CreateSemesterRequest, UpdateSemesterRequest},
};
use crate::storage::Storage;

const SEMESTER_EXISTS: &str =
    "This semester instance already exists for the specified department and academic year.";

async fn check_parents(storage: &dyn Storage, department_id: i64, academic_year_id: i64) -> Result<()> {
    if storage.get_department(department_id, false).await?.is_none() {
        return Err(TrackademyError::bad_request("Department not found."));
    }
    if storage
        .get_academic_year(academic_year_id, false)
        .await?
        .is_none()
    {
        return Err(TrackademyError::bad_request("Academic year not found."));
    }
    Ok(())
}

pub async fn create_semester(service: &SemesterService, req: CreateSemesterRequest) -> Result<Semester> {
    let storage = service.storage();
    check_parents(storage, req.department_id, req.academic_year_id).await?;

    if let Some(existing) = storage
        .find_semester(req.department_id, req.academic_year_id, req.semester_number)
        .await?
        && !existing.is_deleted
    {
        return Err(TrackademyError::conflict(SEMESTER_EXISTS));
    }

    let semester = storage.create_semester(req).await?;
    info!(
        "Semester {} created for department {} (year {})",
        semester.semester_number, semester.department_id, semester.academic_year_id
    );
    Ok(semester)
}

pub async fn update_semester(
    service: &SemesterService,
    id: i64,
    req: UpdateSemesterRequest,
) -> Result<Semester> {
    let storage = service.storage();
    let current = storage
        .get_semester(id, false)
        .await?
        .ok_or_else(|| TrackademyError::not_found(SEMESTER_NOT_FOUND))?;

    let department_id = req.department_id.unwrap_or(current.department_id);
    let academic_year_id = req.academic_year_id.unwrap_or(current.academic_year_id);
    let number = req.semester_number.unwrap_or(current.semester_number);

    if department_id != current.department_id || academic_year_id != current.academic_year_id {
        check_parents(storage, department_id, academic_year_id).await?;
    }
    // 已软删除的记录仍占用唯一键
    if let Some(other) = storage
        .find_semester(department_id, academic_year_id, number)
        .await?
        && other.id != id
    {
        return Err(TrackademyError::conflict(SEMESTER_EXISTS));
    }

    storage
        .update_semester(id, req)
        .await?
        .ok_or_else(|| TrackademyError::not_found(SEMESTER_NOT_FOUND))
}

pub async fn delete_semester(service: &SemesterService, id: i64) -> Result<()> {
    let storage = service.storage();
    if storage.get_semester(id, false).await?.is_none() {
        return Err(TrackademyError::not_found(SEMESTER_NOT_FOUND));
    }
    if storage.count_semester_dependents(id).await? > 0 {
        return Err(TrackademyError::state_violation(
            "Cannot delete semester with associated data (divisions, courses, students, or exams).",
        ));
    }

    storage.set_semester_deleted(id, true).await?;
    info!("Semester {} soft-deleted", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SemesterType;
    use crate::models::semesters::requests::SemesterListQuery;
    use crate::testing::Fixture;

    fn request(fx: &Fixture, number: i32) -> CreateSemesterRequest {
        CreateSemesterRequest {
            semester_number: number,
            semester_type: if number % 2 == 0 {
                SemesterType::Even
            } else {
                SemesterType::Odd
            },
            department_id: fx.department.id,
            academic_year_id: fx.academic_year.id,
        }
    }

    #[tokio::test]
    async fn test_natural_key_conflicts() {
        let fx = Fixture::new().await;
        let service = SemesterService::new(fx.shared());

        let err = service.create_semester(request(&fx, 1)).await.unwrap_err();
        assert_eq!(err.code(), "E005");
        assert_eq!(err.message(), SEMESTER_EXISTS);

        let second = service.create_semester(request(&fx, 2)).await.unwrap();
        let err = service
            .update_semester(
                second.id,
                UpdateSemesterRequest {
                    semester_number: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");

        let mut orphan = request(&fx, 3);
        orphan.academic_year_id = 321;
        let err = service.create_semester(orphan).await.unwrap_err();
        assert_eq!(err.message(), "Academic year not found.");
    }

    #[tokio::test]
    async fn test_delete_guard_and_restore() {
        let fx = Fixture::new().await;
        let service = SemesterService::new(fx.shared());

        // 夹具中的学期下挂着分班
        let err = service.delete_semester(fx.semester.id).await.unwrap_err();
        assert_eq!(err.code(), "E006");

        let empty = service.create_semester(request(&fx, 4)).await.unwrap();
        service.delete_semester(empty.id).await.unwrap();
        let listed = service
            .list_semesters(SemesterListQuery {
                department_id: Some(fx.department.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(listed.iter().all(|s| s.id != empty.id));

        let restored = service.restore_semester(empty.id).await.unwrap();
        assert!(!restored.is_deleted);
        assert_eq!(service.get_semester(empty.id).await.unwrap().semester_number, 4);
    }

    #[tokio::test]
    async fn test_soft_deleted_semester_still_holds_its_number() {
        let fx = Fixture::new().await;
        let service = SemesterService::new(fx.shared());
        let fifth = service.create_semester(request(&fx, 5)).await.unwrap();
        service.delete_semester(fifth.id).await.unwrap();
        let sixth = service.create_semester(request(&fx, 6)).await.unwrap();

        let err = service
            .update_semester(
                sixth.id,
                UpdateSemesterRequest {
                    semester_number: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
        assert_eq!(err.message(), SEMESTER_EXISTS);
    }
}
