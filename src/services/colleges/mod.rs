pub mod create;
pub mod delete;
pub mod update;

use std::sync::Arc;

use crate::errors::{Result, TrackademyError};
use crate::models::colleges::{
    entities::College,
    requests::{CollegeListQuery, CreateCollegeRequest, UpdateCollegeRequest},
};
use crate::storage::Storage;

pub const COLLEGE_NOT_FOUND: &str = "College not found.";

pub struct CollegeService {
    storage: Arc<dyn Storage>,
}

impl CollegeService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub async fn create_college(&self, req: CreateCollegeRequest) -> Result<College> {
        create::create_college(self, req).await
    }

    pub async fn list_colleges(&self, query: CollegeListQuery) -> Result<Vec<College>> {
        self.storage.list_colleges(query).await
    }

    pub async fn get_college(&self, id: i64) -> Result<College> {
        self.storage
            .get_college(id, false)
            .await?
            .ok_or_else(|| TrackademyError::not_found(COLLEGE_NOT_FOUND))
    }

    pub async fn update_college(&self, id: i64, req: UpdateCollegeRequest) -> Result<College> {
        update::update_college(self, id, req).await
    }

    // 软删除
    pub async fn delete_college(&self, id: i64) -> Result<()> {
        delete::delete_college(self, id).await
    }

    pub async fn restore_college(&self, id: i64) -> Result<College> {
        delete::restore_college(self, id).await
    }
}
