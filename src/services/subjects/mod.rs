pub mod create;
pub mod get;
pub mod update;

use std::sync::Arc;

use tracing::info;

use crate::errors::{Result, TrackademyError};
use crate::models::subjects::{
    entities::Subject,
    requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
    responses::SubjectDetail,
};
use crate::storage::Storage;

pub const SUBJECT_NOT_FOUND: &str = "Subject not found.";
pub(crate) const CODE_TAKEN: &str = "A subject with this code already exists for this department.";

pub struct SubjectService {
    storage: Arc<dyn Storage>,
}

impl SubjectService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject> {
        create::create_subject(self, req).await
    }

    pub async fn list_subjects(&self, query: SubjectListQuery) -> Result<Vec<Subject>> {
        self.storage.list_subjects(query).await
    }

    pub async fn count_subjects(&self, query: SubjectListQuery) -> Result<u64> {
        self.storage.count_subjects(query).await
    }

    pub async fn get_subject(&self, id: i64, with_relations: bool) -> Result<SubjectDetail> {
        get::get_subject(self, id, with_relations).await
    }

    pub async fn update_subject(&self, id: i64, req: UpdateSubjectRequest) -> Result<Subject> {
        update::update_subject(self, id, req).await
    }

    pub async fn delete_subject(&self, id: i64) -> Result<()> {
        if self.storage.get_subject(id, false).await?.is_none() {
            return Err(TrackademyError::not_found(SUBJECT_NOT_FOUND));
        }
        self.storage.set_subject_deleted(id, true).await?;
        info!("Subject {} soft-deleted", id);
        Ok(())
    }

    pub async fn restore_subject(&self, id: i64) -> Result<Subject> {
        self.storage
            .set_subject_deleted(id, false)
            .await?
            .ok_or_else(|| TrackademyError::not_found(SUBJECT_NOT_FOUND))
    }
}
