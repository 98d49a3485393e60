pub mod create;
pub mod delete;
pub mod get;
pub mod update;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::departments::{
    entities::Department,
    requests::{CreateDepartmentRequest, DepartmentListQuery, UpdateDepartmentRequest},
    responses::DepartmentDetail,
};
use crate::storage::Storage;

pub const DEPARTMENT_NOT_FOUND: &str = "Department not found.";
pub(crate) const NAME_TAKEN: &str = "A department with this name already exists in this college.";

pub struct DepartmentService {
    storage: Arc<dyn Storage>,
}

impl DepartmentService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub async fn create_department(&self, req: CreateDepartmentRequest) -> Result<Department> {
        create::create_department(self, req).await
    }

    pub async fn list_departments(&self, query: DepartmentListQuery) -> Result<Vec<Department>> {
        self.storage.list_departments(query).await
    }

    pub async fn count_departments(&self, query: DepartmentListQuery) -> Result<u64> {
        self.storage.count_departments(query).await
    }

    // with_relations 为真时附带学院
    pub async fn get_department(&self, id: i64, with_relations: bool) -> Result<DepartmentDetail> {
        get::get_department(self, id, with_relations).await
    }

    pub async fn update_department(
        &self,
        id: i64,
        req: UpdateDepartmentRequest,
    ) -> Result<Department> {
        update::update_department(self, id, req).await
    }

    pub async fn delete_department(&self, id: i64, force: bool) -> Result<()> {
        delete::delete_department(self, id, force).await
    }

    pub async fn restore_department(&self, id: i64) -> Result<Department> {
        delete::restore_department(self, id).await
    }
}
