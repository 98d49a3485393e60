//! 作业存储操作

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use super::soft_delete::SoftDeletable;
use super::{SeaOrmStorage, now_ts};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::Result;
use crate::models::assignments::{
    entities::Assignment,
    requests::{AssignmentFilter, CreateAssignmentRequest, UpdateAssignmentRequest},
};
use crate::storage::AssignmentStorage;

#[async_trait]
impl AssignmentStorage for SeaOrmStorage {
    async fn create_assignment(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        let now = now_ts();
        let model = ActiveModel {
            course_id: Set(req.course_id),
            title: Set(req.title),
            description: Set(req.description),
            due_date: Set(req.due_date.timestamp()),
            total_marks: Set(req.total_marks),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?.into_assignment())
    }

    async fn get_assignment(&self, id: i64) -> Result<Option<Assignment>> {
        let model = self.find_live::<Assignments>(id, false).await?;
        Ok(model.map(|m| m.into_assignment()))
    }

    async fn list_assignments(&self, filter: AssignmentFilter) -> Result<Vec<Assignment>> {
        let mut select = Assignments::find_visible(false);
        if let Some(course_id) = filter.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if let Some(course_ids) = filter.course_ids {
            if course_ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(Column::CourseId.is_in(course_ids));
        }

        let models = select.order_by_asc(Column::DueDate).all(&self.db).await?;
        Ok(models.into_iter().map(|m| m.into_assignment()).collect())
    }

    async fn update_assignment(
        &self,
        id: i64,
        req: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let Some(existing) = self.find_live::<Assignments>(id, false).await? else {
            return Ok(None);
        };

        let mut model = ActiveModel::from(existing);
        if let Some(title) = req.title {
            model.title = Set(title);
        }
        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }
        if let Some(due_date) = req.due_date {
            model.due_date = Set(due_date.timestamp());
        }
        if let Some(total_marks) = req.total_marks {
            model.total_marks = Set(total_marks);
        }
        model.updated_at = Set(now_ts());

        Ok(Some(model.update(&self.db).await?.into_assignment()))
    }

    async fn set_assignment_deleted(
        &self,
        id: i64,
        deleted: bool,
    ) -> Result<Option<Assignment>> {
        let model = self.set_deleted::<Assignments>(id, deleted).await?;
        Ok(model.map(|m| m.into_assignment()))
    }
}
