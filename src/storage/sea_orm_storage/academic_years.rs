//! 学年存储操作
//!
//! 同一学院同一时间最多一个启用学年：启用操作在事务里先停用兄弟学年再启用目标。

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::soft_delete::mark_deleted;
use super::{SeaOrmStorage, now_ts};
use crate::entity::academic_years::{ActiveModel, Column, Entity as AcademicYears, Model};
use crate::entity::semesters;
use crate::errors::Result;
use crate::models::academic_years::{
    entities::AcademicYear,
    requests::{
        AcademicYearListQuery, AcademicYearSearchQuery, CreateAcademicYearRequest,
        UpdateAcademicYearRequest,
    },
};
use crate::storage::AcademicYearStorage;
use crate::utils::sql::{contains_pattern, search_term};

pub(crate) const DEFAULT_SEARCH_LIMIT: u64 = 20;

fn academic_year_condition(query: &AcademicYearListQuery) -> Condition {
    let mut condition = Condition::all();
    if !query.include_deleted.unwrap_or(false) {
        condition = condition.add(Column::IsDeleted.eq(false));
    }
    if let Some(college_id) = query.college_id {
        condition = condition.add(Column::CollegeId.eq(college_id));
    }
    if let Some(is_active) = query.is_active {
        condition = condition.add(Column::IsActive.eq(is_active));
    }
    if let Some(term) = search_term(query.search.as_deref()) {
        condition = condition.add(Column::Year.like(contains_pattern(&term)));
    }
    condition
}

/// 停用学院下除 `except` 之外的所有启用学年
async fn deactivate_siblings<C: ConnectionTrait>(
    db: &C,
    college_id: i64,
    except: Option<i64>,
) -> Result<()> {
    let mut update = AcademicYears::update_many()
        .col_expr(Column::IsActive, Expr::value(false))
        .col_expr(Column::UpdatedAt, Expr::value(now_ts()))
        .filter(Column::CollegeId.eq(college_id))
        .filter(Column::IsActive.eq(true));
    if let Some(id) = except {
        update = update.filter(Column::Id.ne(id));
    }
    update.exec(db).await?;
    Ok(())
}

impl SeaOrmStorage {
    /// 在写事务中保存学年；若结果为启用状态，先停用同学院其他学年
    async fn save_academic_year(&self, model: ActiveModel, is_new: bool) -> Result<Model> {
        let college_id = *model.college_id.as_ref();
        let activating = *model.is_active.as_ref();
        let id = (!is_new).then(|| *model.id.as_ref());

        let txn = self.begin_write().await?;
        if activating {
            deactivate_siblings(&txn, college_id, id).await?;
        }
        let saved = if is_new {
            model.insert(&txn).await?
        } else {
            model.update(&txn).await?
        };
        txn.commit().await?;
        Ok(saved)
    }
}

#[async_trait]
impl AcademicYearStorage for SeaOrmStorage {
    async fn create_academic_year(&self, req: CreateAcademicYearRequest) -> Result<AcademicYear> {
        let now = now_ts();
        let revived = AcademicYears::find()
            .filter(Column::Year.eq(req.year.as_str()))
            .filter(Column::IsDeleted.eq(true))
            .one(&self.db)
            .await?;

        let is_new = revived.is_none();
        let mut model = match revived {
            Some(existing) => ActiveModel::from(existing),
            None => ActiveModel {
                created_at: Set(now),
                ..Default::default()
            },
        };
        model.year = Set(req.year);
        model.college_id = Set(req.college_id);
        model.is_active = Set(req.is_active);
        model.is_deleted = Set(false);
        model.updated_at = Set(now);

        let saved = self.save_academic_year(model, is_new).await?;
        Ok(saved.into_academic_year())
    }

    async fn get_academic_year(
        &self,
        id: i64,
        include_deleted: bool,
    ) -> Result<Option<AcademicYear>> {
        let model = self.find_live::<AcademicYears>(id, include_deleted).await?;
        Ok(model.map(|m| m.into_academic_year()))
    }

    async fn find_academic_year_by_label(&self, year: &str) -> Result<Option<AcademicYear>> {
        let model = AcademicYears::find()
            .filter(Column::Year.eq(year))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_academic_year()))
    }

    async fn list_academic_years(
        &self,
        query: AcademicYearListQuery,
    ) -> Result<Vec<AcademicYear>> {
        let models = AcademicYears::find()
            .filter(academic_year_condition(&query))
            .order_by_desc(Column::Year)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_academic_year()).collect())
    }

    async fn count_academic_years(&self, query: AcademicYearListQuery) -> Result<u64> {
        Ok(AcademicYears::find()
            .filter(academic_year_condition(&query))
            .count(&self.db)
            .await?)
    }

    async fn get_active_academic_year(&self, college_id: i64) -> Result<Option<AcademicYear>> {
        let model = AcademicYears::find()
            .filter(Column::CollegeId.eq(college_id))
            .filter(Column::IsActive.eq(true))
            .filter(Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_academic_year()))
    }

    async fn search_academic_years(
        &self,
        query: AcademicYearSearchQuery,
    ) -> Result<Vec<AcademicYear>> {
        let mut select = AcademicYears::find().filter(Column::IsDeleted.eq(false));
        if let Some(term) = search_term(Some(&query.q)) {
            select = select.filter(Column::Year.like(contains_pattern(&term)));
        }
        if let Some(college_id) = query.college_id {
            select = select.filter(Column::CollegeId.eq(college_id));
        }
        let models = select
            .order_by_desc(Column::Year)
            .limit(query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_academic_year()).collect())
    }

    async fn update_academic_year(
        &self,
        id: i64,
        req: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>> {
        let Some(existing) = self.find_live::<AcademicYears>(id, false).await? else {
            return Ok(None);
        };

        let mut model = ActiveModel::from(existing);
        if let Some(year) = req.year {
            model.year = Set(year);
        }
        if let Some(college_id) = req.college_id {
            model.college_id = Set(college_id);
        }
        if let Some(is_active) = req.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(now_ts());

        let saved = self.save_academic_year(model, false).await?;
        Ok(Some(saved.into_academic_year()))
    }

    async fn set_academic_year_active(
        &self,
        id: i64,
        active: bool,
    ) -> Result<Option<AcademicYear>> {
        let Some(existing) = self.find_live::<AcademicYears>(id, false).await? else {
            return Ok(None);
        };

        let mut model = ActiveModel::from(existing);
        model.is_active = Set(active);
        model.updated_at = Set(now_ts());

        let saved = self.save_academic_year(model, false).await?;
        Ok(Some(saved.into_academic_year()))
    }

    async fn set_academic_year_deleted(
        &self,
        id: i64,
        deleted: bool,
    ) -> Result<Option<AcademicYear>> {
        let txn = self.begin_write().await?;
        if deleted {
            // 已删除的学年不能保持启用
            AcademicYears::update_many()
                .col_expr(Column::IsActive, Expr::value(false))
                .filter(Column::Id.eq(id))
                .exec(&txn)
                .await?;
        }
        mark_deleted::<AcademicYears, _>(&txn, id, deleted).await?;
        let model = AcademicYears::find_by_id(id).one(&txn).await?;
        txn.commit().await?;
        Ok(model.map(|m| m.into_academic_year()))
    }

    async fn hard_delete_academic_year(&self, id: i64) -> Result<bool> {
        self.hard_delete::<AcademicYears>(id).await
    }

    async fn count_academic_year_semesters(&self, id: i64) -> Result<u64> {
        Ok(semesters::Entity::find()
            .filter(semesters::Column::AcademicYearId.eq(id))
            .count(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    fn year(label: &str, college_id: i64, is_active: bool) -> CreateAcademicYearRequest {
        CreateAcademicYearRequest {
            year: label.into(),
            college_id,
            is_active,
        }
    }

    async fn active_years(fx: &Fixture) -> Vec<AcademicYear> {
        fx.storage
            .list_academic_years(AcademicYearListQuery {
                college_id: Some(fx.college.id),
                is_active: Some(true),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_single_active_year_per_college() {
        let fx = Fixture::new().await;
        let first = fx
            .storage
            .create_academic_year(year("2030-2031", fx.college.id, true))
            .await
            .unwrap();
        let second = fx
            .storage
            .create_academic_year(year("2031-2032", fx.college.id, true))
            .await
            .unwrap();

        let active = active_years(&fx).await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);

        fx.storage
            .set_academic_year_active(first.id, true)
            .await
            .unwrap();
        let active = active_years(&fx).await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, first.id);

        fx.storage
            .update_academic_year(
                second.id,
                UpdateAcademicYearRequest {
                    is_active: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let active = active_years(&fx).await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);
    }

    #[tokio::test]
    async fn test_soft_deleted_year_is_revived() {
        let fx = Fixture::new().await;
        let created = fx
            .storage
            .create_academic_year(year("2040-2041", fx.college.id, true))
            .await
            .unwrap();
        let deleted = fx
            .storage
            .set_academic_year_deleted(created.id, true)
            .await
            .unwrap()
            .unwrap();
        assert!(deleted.is_deleted);
        assert!(!deleted.is_active);

        let revived = fx
            .storage
            .create_academic_year(year("2040-2041", fx.college.id, false))
            .await
            .unwrap();
        assert_eq!(revived.id, created.id);
        assert!(!revived.is_deleted);
    }

    #[tokio::test]
    async fn test_delete_deactivates_and_restore_keeps_inactive() {
        let fx = Fixture::new().await;
        let created = fx
            .storage
            .create_academic_year(year("2045-2046", fx.college.id, true))
            .await
            .unwrap();
        fx.storage
            .set_academic_year_deleted(created.id, true)
            .await
            .unwrap();
        assert!(
            active_years(&fx)
                .await
                .iter()
                .all(|y| y.id != created.id)
        );

        let restored = fx
            .storage
            .set_academic_year_deleted(created.id, false)
            .await
            .unwrap()
            .unwrap();
        assert!(!restored.is_deleted);
        assert!(!restored.is_active);

        assert!(
            fx.storage
                .set_academic_year_deleted(created.id + 1000, true)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_search_limit() {
        let fx = Fixture::new().await;
        for start in 2050..2055 {
            fx.storage
                .create_academic_year(year(
                    &format!("{start}-{}", start + 1),
                    fx.college.id,
                    false,
                ))
                .await
                .unwrap();
        }
        let found = fx
            .storage
            .search_academic_years(AcademicYearSearchQuery {
                q: "205".into(),
                college_id: Some(fx.college.id),
                limit: Some(3),
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].year, "2054-2055");
    }
}
