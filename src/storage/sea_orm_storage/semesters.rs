//! 学期存储操作

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{SeaOrmStorage, now_ts};
use crate::entity::semesters::{ActiveModel, Column, Entity as Semesters};
use crate::entity::{courses, divisions, exams, students};
use crate::errors::Result;
use crate::models::semesters::{
    entities::Semester,
    requests::{CreateSemesterRequest, SemesterListQuery, UpdateSemesterRequest},
};
use crate::storage::SemesterStorage;

#[async_trait]
impl SemesterStorage for SeaOrmStorage {
    async fn create_semester(&self, req: CreateSemesterRequest) -> Result<Semester> {
        let now = now_ts();
        let revived = Semesters::find()
            .filter(Column::DepartmentId.eq(req.department_id))
            .filter(Column::AcademicYearId.eq(req.academic_year_id))
            .filter(Column::SemesterNumber.eq(req.semester_number))
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
        model.semester_number = Set(req.semester_number);
        model.semester_type = Set(req.semester_type.as_str().to_string());
        model.department_id = Set(req.department_id);
        model.academic_year_id = Set(req.academic_year_id);
        model.is_deleted = Set(false);
        model.updated_at = Set(now);

        let saved = if is_revival {
            model.update(&self.db).await?
        } else {
            model.insert(&self.db).await?
        };
        Ok(saved.into_semester())
    }

    async fn get_semester(&self, id: i64, include_deleted: bool) -> Result<Option<Semester>> {
        let model = self.find_live::<Semesters>(id, include_deleted).await?;
        Ok(model.map(|m| m.into_semester()))
    }

    async fn find_semester(
        &self,
        department_id: i64,
        academic_year_id: i64,
        semester_number: i32,
    ) -> Result<Option<Semester>> {
        let model = Semesters::find()
            .filter(Column::DepartmentId.eq(department_id))
            .filter(Column::AcademicYearId.eq(academic_year_id))
            .filter(Column::SemesterNumber.eq(semester_number))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_semester()))
    }

    async fn list_semesters(&self, query: SemesterListQuery) -> Result<Vec<Semester>> {
        let mut condition = Condition::all();
        if !query.include_deleted.unwrap_or(false) {
            condition = condition.add(Column::IsDeleted.eq(false));
        }
        if let Some(department_id) = query.department_id {
            condition = condition.add(Column::DepartmentId.eq(department_id));
        }
        if let Some(academic_year_id) = query.academic_year_id {
            condition = condition.add(Column::AcademicYearId.eq(academic_year_id));
        }
        if let Some(semester_type) = query.semester_type {
            condition = condition.add(Column::SemesterType.eq(semester_type.as_str()));
        }

        let models = Semesters::find()
            .filter(condition)
            .order_by_asc(Column::SemesterNumber)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_semester()).collect())
    }

    async fn update_semester(
        &self,
        id: i64,
        req: UpdateSemesterRequest,
    ) -> Result<Option<Semester>> {
        let Some(existing) = self.find_live::<Semesters>(id, false).await? else {
            return Ok(None);
        };

        let mut model = ActiveModel::from(existing);
        if let Some(number) = req.semester_number {
            model.semester_number = Set(number);
        }
        if let Some(semester_type) = req.semester_type {
            model.semester_type = Set(semester_type.as_str().to_string());
        }
        if let Some(department_id) = req.department_id {
            model.department_id = Set(department_id);
        }
        if let Some(academic_year_id) = req.academic_year_id {
            model.academic_year_id = Set(academic_year_id);
        }
        model.updated_at = Set(now_ts());

        Ok(Some(model.update(&self.db).await?.into_semester()))
    }

    async fn set_semester_deleted(&self, id: i64, deleted: bool) -> Result<Option<Semester>> {
        let model = self.set_deleted::<Semesters>(id, deleted).await?;
        Ok(model.map(|m| m.into_semester()))
    }

    async fn count_semester_dependents(&self, id: i64) -> Result<u64> {
        let divisions = divisions::Entity::find()
            .filter(divisions::Column::SemesterId.eq(id))
            .filter(divisions::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await?;
        let courses = courses::Entity::find()
            .filter(courses::Column::SemesterId.eq(id))
            .filter(courses::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await?;
        let students = students::Entity::find()
            .filter(students::Column::SemesterId.eq(id))
            .filter(students::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await?;
        let exams = exams::Entity::find()
            .filter(exams::Column::SemesterId.eq(id))
            .filter(exams::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await?;
        Ok(divisions + courses + students + exams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SemesterType;
    use crate::testing::Fixture;

    #[tokio::test]
    async fn test_dependents_block_and_revival() {
        let fx = Fixture::new().await;
        // fixture 的学期下已有一个分班
        assert_eq!(
            fx.storage
                .count_semester_dependents(fx.semester.id)
                .await
                .unwrap(),
            1
        );

        let request = CreateSemesterRequest {
            semester_number: 2,
            semester_type: SemesterType::Even,
            department_id: fx.department.id,
            academic_year_id: fx.academic_year.id,
        };
        let created = fx.storage.create_semester(request.clone()).await.unwrap();
        fx.storage
            .set_semester_deleted(created.id, true)
            .await
            .unwrap();
        assert!(
            fx.storage
                .get_semester(created.id, false)
                .await
                .unwrap()
                .is_none()
        );

        let revived = fx.storage.create_semester(request).await.unwrap();
        assert_eq!(revived.id, created.id);
        assert!(!revived.is_deleted);
    }
}
