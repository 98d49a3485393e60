//! 分班
//!
//! 分班只有名称一个可改字段，所属学期创建后固定。

use std::sync::Arc;

use tracing::info;

use crate::errors::{Result, TrackademyError};
use crate::models::courses::requests::CourseListQuery;
use crate::models::divisions::{
    entities::Division,
    requests::{CreateDivisionRequest, DivisionListQuery, UpdateDivisionRequest},
};
use crate::models::students::requests::StudentListQuery;
use crate::storage::Storage;

pub const DIVISION_NOT_FOUND: &str = "Division not found.";
const NAME_TAKEN: &str = "A division with this name already exists in this semester.";

pub struct DivisionService {
    storage: Arc<dyn Storage>,
}

impl DivisionService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn create_division(&self, req: CreateDivisionRequest) -> Result<Division> {
        if self.storage.get_semester(req.semester_id, false).await?.is_none() {
            return Err(TrackademyError::bad_request("Semester not found."));
        }
        if let Some(existing) = self
            .storage
            .find_division_by_name(req.semester_id, &req.name)
            .await?
            && !existing.is_deleted
        {
            return Err(TrackademyError::conflict(NAME_TAKEN));
        }

        let division = self.storage.create_division(req).await?;
        info!(
            "Division {} created in semester {}",
            division.name, division.semester_id
        );
        Ok(division)
    }

    pub async fn list_divisions(&self, query: DivisionListQuery) -> Result<Vec<Division>> {
        self.storage.list_divisions(query).await
    }

    pub async fn get_division(&self, id: i64) -> Result<Division> {
        self.storage
            .get_division(id, false)
            .await?
            .ok_or_else(|| TrackademyError::not_found(DIVISION_NOT_FOUND))
    }

    pub async fn update_division(&self, id: i64, req: UpdateDivisionRequest) -> Result<Division> {
        let division = self.get_division(id).await?;
        let Some(name) = req.name else {
            return Ok(division);
        };

        // 已软删除的分班仍占用名称
        if let Some(other) = self
            .storage
            .find_division_by_name(division.semester_id, &name)
            .await?
            && other.id != id
        {
            return Err(TrackademyError::conflict(NAME_TAKEN));
        }

        let renamed = self
            .storage
            .rename_division(id, name)
            .await?
            .ok_or_else(|| TrackademyError::not_found(DIVISION_NOT_FOUND))?;
        info!("Division {} renamed to {}", id, renamed.name);
        Ok(renamed)
    }

    pub async fn delete_division(&self, id: i64) -> Result<()> {
        self.get_division(id).await?;

        // 仍有学生或开课时不允许删除
        let students = self
            .storage
            .list_students(StudentListQuery {
                division_id: Some(id),
                ..Default::default()
            })
            .await?;
        let courses = self
            .storage
            .list_courses(CourseListQuery {
                division_id: Some(id),
                ..Default::default()
            })
            .await?;
        if !students.is_empty() || !courses.is_empty() {
            return Err(TrackademyError::state_violation(
                "Cannot delete division with associated students or courses.",
            ));
        }

        self.storage.set_division_deleted(id, true).await?;
        info!("Division {} soft-deleted", id);
        Ok(())
    }

    pub async fn restore_division(&self, id: i64) -> Result<Division> {
        self.storage
            .set_division_deleted(id, false)
            .await?
            .ok_or_else(|| TrackademyError::not_found(DIVISION_NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, student};

    #[tokio::test]
    async fn test_division_lifecycle() {
        let fx = Fixture::new().await;
        let service = DivisionService::new(fx.shared());

        let err = service
            .create_division(CreateDivisionRequest {
                name: "A".into(),
                semester_id: fx.semester.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.message(), NAME_TAKEN);

        let b = service
            .create_division(CreateDivisionRequest {
                name: "B".into(),
                semester_id: fx.semester.id,
            })
            .await
            .unwrap();
        service.delete_division(b.id).await.unwrap();
        let visible = service
            .list_divisions(DivisionListQuery {
                semester_id: Some(fx.semester.id),
                include_deleted: None,
            })
            .await
            .unwrap();
        assert_eq!(visible.len(), 1);

        assert!(!service.restore_division(b.id).await.unwrap().is_deleted);
        assert_eq!(service.get_division(b.id).await.unwrap().name, "B");
    }

    #[tokio::test]
    async fn test_division_with_students_is_kept() {
        let fx = Fixture::new().await;
        let service = DivisionService::new(fx.shared());
        student(&fx, "CE201", "Nisha Rao").await;

        let err = service.delete_division(fx.division.id).await.unwrap_err();
        assert_eq!(err.code(), "E006");
    }

    #[tokio::test]
    async fn test_rename_checks_semester_names() {
        let fx = Fixture::new().await;
        let service = DivisionService::new(fx.shared());
        let b = service
            .create_division(CreateDivisionRequest {
                name: "B".into(),
                semester_id: fx.semester.id,
            })
            .await
            .unwrap();

        let err = service
            .update_division(
                b.id,
                UpdateDivisionRequest {
                    name: Some("A".into()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");

        let c = service
            .create_division(CreateDivisionRequest {
                name: "C".into(),
                semester_id: fx.semester.id,
            })
            .await
            .unwrap();
        service.delete_division(c.id).await.unwrap();
        let err = service
            .update_division(
                b.id,
                UpdateDivisionRequest {
                    name: Some("C".into()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), NAME_TAKEN);

        let renamed = service
            .update_division(
                b.id,
                UpdateDivisionRequest {
                    name: Some("B-Evening".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "B-Evening");
        assert_eq!(renamed.semester_id, fx.semester.id);

        let err = service
            .update_division(
                9999,
                UpdateDivisionRequest {
                    name: Some("Z".into()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), DIVISION_NOT_FOUND);
    }
}
