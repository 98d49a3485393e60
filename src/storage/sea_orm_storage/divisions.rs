//! 分班存储操作

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use super::soft_delete::SoftDeletable;
use super::{SeaOrmStorage, now_ts};
use crate::entity::divisions::{ActiveModel, Column, Entity as Divisions};
use crate::errors::Result;
use crate::models::divisions::{
    entities::Division,
    requests::{CreateDivisionRequest, DivisionListQuery},
};
use crate::storage::DivisionStorage;

#[async_trait]
impl DivisionStorage for SeaOrmStorage {
    async fn create_division(&self, req: CreateDivisionRequest) -> Result<Division> {
        let now = now_ts();
        let revived = Divisions::find()
            .filter(Column::SemesterId.eq(req.semester_id))
            .filter(Column::Name.eq(req.name.as_str()))
            .filter(Column::IsDeleted.eq(true))
            .one(&self.db)
            .await?;

        let saved = match revived {
            Some(existing) => {
                let mut model = ActiveModel::from(existing);
                model.is_deleted = Set(false);
                model.updated_at = Set(now);
                model.update(&self.db).await?
            }
            None => {
                ActiveModel {
                    name: Set(req.name),
                    semester_id: Set(req.semester_id),
                    is_deleted: Set(false),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?
            }
        };
        Ok(saved.into_division())
    }

    async fn get_division(&self, id: i64, include_deleted: bool) -> Result<Option<Division>> {
        let model = self.find_live::<Divisions>(id, include_deleted).await?;
        Ok(model.map(|m| m.into_division()))
    }

    async fn find_division_by_name(
        &self,
        semester_id: i64,
        name: &str,
    ) -> Result<Option<Division>> {
        let model = Divisions::find()
            .filter(Column::SemesterId.eq(semester_id))
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_division()))
    }

    async fn list_divisions(&self, query: DivisionListQuery) -> Result<Vec<Division>> {
        let mut select = Divisions::find_visible(query.include_deleted.unwrap_or(false));
        if let Some(semester_id) = query.semester_id {
            select = select.filter(Column::SemesterId.eq(semester_id));
        }
        let models = select.order_by_asc(Column::Name).all(&self.db).await?;
        Ok(models.into_iter().map(|m| m.into_division()).collect())
    }

    async fn rename_division(&self, id: i64, name: String) -> Result<Option<Division>> {
        let Some(existing) = self.find_live::<Divisions>(id, false).await? else {
            return Ok(None);
        };
        let mut model = ActiveModel::from(existing);
        model.name = Set(name);
        model.updated_at = Set(now_ts());
        Ok(Some(model.update(&self.db).await?.into_division()))
    }

    async fn set_division_deleted(&self, id: i64, deleted: bool) -> Result<Option<Division>> {
        let model = self.set_deleted::<Divisions>(id, deleted).await?;
        Ok(model.map(|m| m.into_division()))
    }
}
