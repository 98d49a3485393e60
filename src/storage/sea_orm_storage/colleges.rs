//! 学院存储操作

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{SeaOrmStorage, now_ts};
use crate::entity::colleges::{ActiveModel, Column, Entity as Colleges};
use crate::entity::departments;
use crate::errors::Result;
use crate::models::colleges::{
    entities::College,
    requests::{CollegeListQuery, CreateCollegeRequest, UpdateCollegeRequest},
};
use crate::storage::CollegeStorage;
use crate::utils::sql::{contains_pattern, search_term};

#[async_trait]
impl CollegeStorage for SeaOrmStorage {
    async fn create_college(&self, req: CreateCollegeRequest) -> Result<College> {
        let now = now_ts();

        // 同名的已删除学院直接复活
        let revived = Colleges::find()
            .filter(Column::Name.eq(req.name.as_str()))
            .filter(Column::IsDeleted.eq(true))
            .one(&self.db)
            .await?;

        let is_revival = revived.is_some();
        let mut model = match revived {
            Some(existing) => {
                let mut model: ActiveModel = existing.into();
                model.is_deleted = Set(false);
                model
            }
            None => ActiveModel {
                created_at: Set(now),
                is_deleted: Set(false),
                ..Default::default()
            },
        };
        model.name = Set(req.name);
        model.abbreviation = Set(req.abbreviation);
        model.website = Set(req.website);
        model.address = Set(req.address);
        model.updated_at = Set(now);

        let saved = if is_revival {
            model.update(&self.db).await?
        } else {
            model.insert(&self.db).await?
        };
        Ok(saved.into_college())
    }

    async fn get_college(&self, id: i64, include_deleted: bool) -> Result<Option<College>> {
        let model = self.find_live::<Colleges>(id, include_deleted).await?;
        Ok(model.map(|m| m.into_college()))
    }

    async fn find_college_by_name(&self, name: &str) -> Result<Option<College>> {
        let model = Colleges::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_college()))
    }

    async fn find_college_by_abbreviation(&self, abbreviation: &str) -> Result<Option<College>> {
        let model = Colleges::find()
            .filter(Column::Abbreviation.eq(abbreviation))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_college()))
    }

    async fn list_colleges(&self, query: CollegeListQuery) -> Result<Vec<College>> {
        let mut condition = Condition::all();
        if !query.include_deleted.unwrap_or(false) {
            condition = condition.add(Column::IsDeleted.eq(false));
        }
        if let Some(term) = search_term(query.search.as_deref()) {
            condition = condition.add(
                Condition::any()
                    .add(Column::Name.like(contains_pattern(&term)))
                    .add(Column::Abbreviation.like(contains_pattern(&term))),
            );
        }

        let models = Colleges::find()
            .filter(condition)
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_college()).collect())
    }

    async fn update_college(
        &self,
        id: i64,
        req: UpdateCollegeRequest,
    ) -> Result<Option<College>> {
        let Some(existing) = self.find_live::<Colleges>(id, false).await? else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(abbreviation) = req.abbreviation {
            model.abbreviation = Set(abbreviation);
        }
        if let Some(website) = req.website {
            model.website = Set(Some(website));
        }
        if let Some(address) = req.address {
            model.address = Set(Some(address));
        }
        model.updated_at = Set(now_ts());

        let updated = model.update(&self.db).await?;
        Ok(Some(updated.into_college()))
    }

    async fn set_college_deleted(&self, id: i64, deleted: bool) -> Result<Option<College>> {
        let model = self.set_deleted::<Colleges>(id, deleted).await?;
        Ok(model.map(|m| m.into_college()))
    }

    async fn count_college_departments(&self, college_id: i64) -> Result<u64> {
        Ok(departments::Entity::find()
            .filter(departments::Column::CollegeId.eq(college_id))
            .filter(departments::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await?)
    }
}
