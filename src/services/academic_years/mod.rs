pub mod create;
pub mod delete;
pub mod get;
pub mod update;

use std::sync::Arc;

use crate::errors::{Result, TrackademyError};
use crate::models::academic_years::{
    entities::AcademicYear,
    requests::{
        AcademicYearListQuery, AcademicYearSearchQuery, CreateAcademicYearRequest,
        UpdateAcademicYearRequest,
    },
    responses::AcademicYearDetail,
};
use crate::storage::Storage;

pub const ACADEMIC_YEAR_NOT_FOUND: &str = "Academic year not found.";

fn year_taken(year: &str) -> TrackademyError {
    TrackademyError::conflict(format!("Academic year '{year}' already exists."))
}

/// 学年管理
///
/// 同一学院任意时刻最多一个启用学年，停用其余学年与写入在存储层的同一事务中完成。
pub struct AcademicYearService {
    storage: Arc<dyn Storage>,
}

impl AcademicYearService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub async fn create_academic_year(
        &self,
        req: CreateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        create::create_academic_year(self, req).await
    }

    pub async fn list_academic_years(
        &self,
        query: AcademicYearListQuery,
    ) -> Result<Vec<AcademicYear>> {
        self.storage.list_academic_years(query).await
    }

    pub async fn count_academic_years(&self, query: AcademicYearListQuery) -> Result<u64> {
        self.storage.count_academic_years(query).await
    }

    pub async fn search_academic_years(
        &self,
        query: AcademicYearSearchQuery,
    ) -> Result<Vec<AcademicYear>> {
        self.storage.search_academic_years(query).await
    }

    pub async fn active_academic_year(&self, college_id: i64) -> Result<AcademicYear> {
        get::active_academic_year(self, college_id).await
    }

    pub async fn get_academic_year(
        &self,
        id: i64,
        with_relations: bool,
    ) -> Result<AcademicYearDetail> {
        get::get_academic_year(self, id, with_relations).await
    }

    pub async fn update_academic_year(
        &self,
        id: i64,
        req: UpdateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        update::update_academic_year(self, id, req).await
    }

    pub async fn set_active(&self, id: i64, active: bool) -> Result<AcademicYear> {
        update::set_active(self, id, active).await
    }

    pub async fn delete_academic_year(&self, id: i64, force: bool) -> Result<()> {
        delete::delete_academic_year(self, id, force).await
    }

    pub async fn restore_academic_year(&self, id: i64) -> Result<AcademicYear> {
        delete::restore_academic_year(self, id).await
    }
}
