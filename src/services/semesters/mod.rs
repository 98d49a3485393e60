pub mod write;

use std::sync::Arc;

use crate::errors::{Result, TrackademyError};
use crate::models::semesters::{
    entities::Semester,
    requests::{CreateSemesterRequest, SemesterListQuery, UpdateSemesterRequest},
};
use crate::storage::Storage;

pub const SEMESTER_NOT_FOUND: &str = "Semester not found.";

pub struct SemesterService {
    storage: Arc<dyn Storage>,
}

impl SemesterService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub async fn create_semester(&self, req: CreateSemesterRequest) -> Result<Semester> {
        write::create_semester(self, req).await
    }

    pub async fn list_semesters(&self, query: SemesterListQuery) -> Result<Vec<Semester>> {
        self.storage.list_semesters(query).await
    }

    pub async fn get_semester(&self, id: i64) -> Result<Semester> {
        self.storage
            .get_semester(id, false)
            .await?
            .ok_or_else(|| TrackademyError::not_found(SEMESTER_NOT_FOUND))
    }

    pub async fn update_semester(&self, id: i64, req: UpdateSemesterRequest) -> Result<Semester> {
        write::update_semester(self, id, req).await
    }

    pub async fn delete_semester(&self, id: i64) -> Result<()> {
        write::delete_semester(self, id).await
    }

    pub async fn restore_semester(&self, id: i64) -> Result<Semester> {
        self.storage
            .set_semester_deleted(id, false)
            .await?
            .ok_or_else(|| TrackademyError::not_found(SEMESTER_NOT_FOUND))
    }
}
