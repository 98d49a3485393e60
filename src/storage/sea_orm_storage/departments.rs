//! 院系存储操作

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{SeaOrmStorage, now_ts};
use crate::entity::departments::{ActiveModel, Column, Entity as Departments};
use crate::entity::{faculties, semesters, students, subjects};
use crate::errors::Result;
use crate::models::departments::{
    entities::Department,
    requests::{CreateDepartmentRequest, DepartmentListQuery, UpdateDepartmentRequest},
};
use crate::storage::DepartmentStorage;
use crate::utils::sql::{contains_pattern, search_term};

/// 列表与计数共用的筛选条件
fn department_condition(query: &DepartmentListQuery) -> Condition {
    let mut condition = Condition::all();
    if !query.include_deleted.unwrap_or(false) {
        condition = condition.add(Column::IsDeleted.eq(false));
    }
    if let Some(college_id) = query.college_id {
        condition = condition.add(Column::CollegeId.eq(college_id));
    }
    if let Some(term) = search_term(query.search.as_deref()) {
        condition = condition.add(
            Condition::any()
                .add(Column::Name.like(contains_pattern(&term)))
                .add(Column::Abbreviation.like(contains_pattern(&term))),
        );
    }
    condition
}

#[async_trait]
impl DepartmentStorage for SeaOrmStorage {
    async fn create_department(&self, req: CreateDepartmentRequest) -> Result<Department> {
        let now = now_ts();
        let revived = Departments::find()
            .filter(Column::CollegeId.eq(req.college_id))
            .filter(Column::Name.eq(req.name.as_str()))
            .filter(Column::IsDeleted.eq(true))
            .one(&self.db)
            .await?;

        let is_revival = revived.is_some();
        let mut model = match revived {
            Some(existing) => ActiveModel::from(existing),
            None => ActiveModel {
                created_at: Set(now),
                ..Default::default()
            },
        };
        model.name = Set(req.name);
        model.abbreviation = Set(req.abbreviation);
        model.college_id = Set(req.college_id);
        model.is_deleted = Set(false);
        model.updated_at = Set(now);

        let saved = if is_revival {
            model.update(&self.db).await?
        } else {
            model.insert(&self.db).await?
        };
        Ok(saved.into_department())
    }

    async fn get_department(
        &self,
        id: i64,
        include_deleted: bool,
    ) -> Result<Option<Department>> {
        let model = self.find_live::<Departments>(id, include_deleted).await?;
        Ok(model.map(|m| m.into_department()))
    }

    async fn find_department_by_name(
        &self,
        college_id: i64,
        name: &str,
    ) -> Result<Option<Department>> {
        let model = Departments::find()
            .filter(Column::CollegeId.eq(college_id))
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_department()))
    }

    async fn list_departments(&self, query: DepartmentListQuery) -> Result<Vec<Department>> {
        let models = Departments::find()
            .filter(department_condition(&query))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_department()).collect())
    }

    async fn count_departments(&self, query: DepartmentListQuery) -> Result<u64> {
        Ok(Departments::find()
            .filter(department_condition(&query))
            .count(&self.db)
            .await?)
    }

    async fn update_department(
        &self,
        id: i64,
        req: UpdateDepartmentRequest,
    ) -> Result<Option<Department>> {
        let Some(existing) = self.find_live::<Departments>(id, false).await? else {
            return Ok(None);
        };

        let mut model = ActiveModel::from(existing);
        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(abbreviation) = req.abbreviation {
            model.abbreviation = Set(abbreviation);
        }
        if let Some(college_id) = req.college_id {
            model.college_id = Set(college_id);
        }
        model.updated_at = Set(now_ts());

        Ok(Some(model.update(&self.db).await?.into_department()))
    }

    async fn set_department_deleted(
        &self,
        id: i64,
        deleted: bool,
    ) -> Result<Option<Department>> {
        let model = self.set_deleted::<Departments>(id, deleted).await?;
        Ok(model.map(|m| m.into_department()))
    }

    async fn hard_delete_department(&self, id: i64) -> Result<bool> {
        self.hard_delete::<Departments>(id).await
    }

    async fn count_department_dependents(&self, id: i64) -> Result<u64> {
        let subjects = subjects::Entity::find()
            .filter(subjects::Column::DepartmentId.eq(id))
            .filter(subjects::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await?;
        let faculty = faculties::Entity::find()
            .filter(faculties::Column::DepartmentId.eq(id))
            .filter(faculties::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await?;
        let semesters = semesters::Entity::find()
            .filter(semesters::Column::DepartmentId.eq(id))
            .filter(semesters::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await?;
        let students = students::Entity::find()
            .filter(students::Column::DepartmentId.eq(id))
            .filter(students::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await?;
        Ok(subjects + faculty + semesters + students)
    }
}
