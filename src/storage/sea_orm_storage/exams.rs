//! 考试存储操作

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::academic_years::DEFAULT_SEARCH_LIMIT;
use super::{SeaOrmStorage, now_ts};
use crate::entity::exams::{ActiveModel, Column, Entity as Exams};
use crate::entity::{exam_results, semesters};
use crate::errors::Result;
use crate::models::exams::{
    entities::Exam,
    requests::{CreateExamRequest, ExamListQuery, ExamSearchQuery, UpdateExamRequest},
};
use crate::storage::ExamStorage;
use crate::utils::sql::{contains_pattern, search_term};

impl SeaOrmStorage {
    /// 按院系/学年圈定的学期 ID；两者都未指定时返回 `None`
    pub(crate) async fn scoped_semester_ids(
        &self,
        department_id: Option<i64>,
        academic_year_id: Option<i64>,
    ) -> Result<Option<Vec<i64>>> {
        if department_id.is_none() && academic_year_id.is_none() {
            return Ok(None);
        }
        let mut select = semesters::Entity::find()
            .select_only()
            .column(semesters::Column::Id);
        if let Some(department_id) = department_id {
            select = select.filter(semesters::Column::DepartmentId.eq(department_id));
        }
        if let Some(academic_year_id) = academic_year_id {
            select = select.filter(semesters::Column::AcademicYearId.eq(academic_year_id));
        }
        Ok(Some(select.into_tuple::<i64>().all(&self.db).await?))
    }

    async fn exam_condition(&self, query: &ExamListQuery) -> Result<Condition> {
        let mut condition = Condition::all();
        if !query.include_deleted.unwrap_or(false) {
            condition = condition.add(Column::IsDeleted.eq(false));
        }
        if let Some(semester_id) = query.semester_id {
            condition = condition.add(Column::SemesterId.eq(semester_id));
        }
        if let Some(ids) = self
            .scoped_semester_ids(query.department_id, query.academic_year_id)
            .await?
        {
            condition = condition.add(Column::SemesterId.is_in(ids));
        }
        if let Some(exam_type) = query.exam_type {
            condition = condition.add(Column::ExamType.eq(exam_type.as_str()));
        }
        if let Some(is_published) = query.is_published {
            condition = condition.add(Column::IsPublished.eq(is_published));
        }
        if let Some(term) = search_term(query.search.as_deref()) {
            condition = condition.add(
                Condition::any()
                    .add(Column::Name.like(contains_pattern(&term)))
                    .add(Column::Description.like(contains_pattern(&term))),
            );
        }
        Ok(condition)
    }
}

#[async_trait]
impl ExamStorage for SeaOrmStorage {
    async fn create_exam(&self, req: CreateExamRequest) -> Result<Exam> {
        let now = now_ts();
        let revived = Exams::find()
            .filter(Column::SemesterId.eq(req.semester_id))
            .filter(Column::ExamType.eq(req.exam_type.as_str()))
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
        model.exam_type = Set(req.exam_type.as_str().to_string());
        model.semester_id = Set(req.semester_id);
        model.description = Set(req.description);
        model.max_marks = Set(req.max_marks);
        model.passing_marks = Set(req.passing_marks);
        model.exam_date = Set(req.exam_date.map(|d| d.timestamp()));
        model.duration = Set(req.duration);
        model.is_published = Set(req.is_published);
        model.is_deleted = Set(false);
        model.updated_at = Set(now);

        let saved = if is_revival {
            model.update(&self.db).await?
        } else {
            model.insert(&self.db).await?
        };
        Ok(saved.into_exam())
    }

    async fn get_exam(&self, id: i64, include_deleted: bool) -> Result<Option<Exam>> {
        let model = self.find_live::<Exams>(id, include_deleted).await?;
        Ok(model.map(|m| m.into_exam()))
    }

    async fn find_exam_by_type(&self, semester_id: i64, exam_type: &str) -> Result<Option<Exam>> {
        let model = Exams::find()
            .filter(Column::SemesterId.eq(semester_id))
            .filter(Column::ExamType.eq(exam_type))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_exam()))
    }

    async fn list_exams(&self, query: ExamListQuery) -> Result<Vec<Exam>> {
        let models = Exams::find()
            .filter(self.exam_condition(&query).await?)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_exam()).collect())
    }

    async fn count_exams(&self, query: ExamListQuery) -> Result<u64> {
        Ok(Exams::find()
            .filter(self.exam_condition(&query).await?)
            .count(&self.db)
            .await?)
    }

    async fn search_exams(&self, query: ExamSearchQuery) -> Result<Vec<Exam>> {
        let mut select = Exams::find().filter(Column::IsDeleted.eq(false));
        if let Some(term) = search_term(Some(&query.q)) {
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(contains_pattern(&term)))
                    .add(Column::Description.like(contains_pattern(&term))),
            );
        }
        if let Some(semester_id) = query.semester_id {
            select = select.filter(Column::SemesterId.eq(semester_id));
        }
        let models = select
            .order_by_desc(Column::CreatedAt)
            .limit(query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_exam()).collect())
    }

    async fn update_exam(&self, id: i64, req: UpdateExamRequest) -> Result<Option<Exam>> {
        let Some(existing) = self.find_live::<Exams>(id, false).await? else {
            return Ok(None);
        };

        let mut model = ActiveModel::from(existing);
        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(exam_type) = req.exam_type {
            model.exam_type = Set(exam_type.as_str().to_string());
        }
        if let Some(semester_id) = req.semester_id {
            model.semester_id = Set(semester_id);
        }
        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }
        if let Some(max_marks) = req.max_marks {
            model.max_marks = Set(Some(max_marks));
        }
        if let Some(passing_marks) = req.passing_marks {
            model.passing_marks = Set(Some(passing_marks));
        }
        if let Some(exam_date) = req.exam_date {
            model.exam_date = Set(Some(exam_date.timestamp()));
        }
        if let Some(duration) = req.duration {
            model.duration = Set(Some(duration));
        }
        if let Some(is_published) = req.is_published {
            model.is_published = Set(is_published);
        }
        model.updated_at = Set(now_ts());

        Ok(Some(model.update(&self.db).await?.into_exam()))
    }

    async fn set_exam_published(&self, id: i64, published: bool) -> Result<Option<Exam>> {
        let Some(existing) = self.find_live::<Exams>(id, false).await? else {
            return Ok(None);
        };

        let mut model = ActiveModel::from(existing);
        model.is_published = Set(published);
        model.updated_at = Set(now_ts());
        Ok(Some(model.update(&self.db).await?.into_exam()))
    }

    async fn set_exam_deleted(&self, id: i64, deleted: bool) -> Result<Option<Exam>> {
        let model = self.set_deleted::<Exams>(id, deleted).await?;
        Ok(model.map(|m| m.into_exam()))
    }

    async fn hard_delete_exam(&self, id: i64) -> Result<bool> {
        self.hard_delete::<Exams>(id).await
    }

    async fn count_exam_results(&self, exam_id: i64) -> Result<u64> {
        Ok(exam_results::Entity::find()
            .filter(exam_results::Column::ExamId.eq(exam_id))
            .count(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExamType;
    use crate::testing::Fixture;

    fn exam(fx: &Fixture, name: &str, exam_type: ExamType) -> CreateExamRequest {
        CreateExamRequest {
            name: name.into(),
            exam_type,
            semester_id: fx.semester.id,
            description: None,
            max_marks: Some(70.0),
            passing_marks: Some(23.0),
            exam_date: None,
            duration: None,
            is_published: false,
        }
    }

    #[tokio::test]
    async fn test_one_exam_per_type_and_semester() {
        let fx = Fixture::new().await;
        fx.storage
            .create_exam(exam(&fx, "Winter 2024", ExamType::Final))
            .await
            .unwrap();
        let err = fx
            .storage
            .create_exam(exam(&fx, "Winter 2024 (repeat)", ExamType::Final))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
    }

    #[tokio::test]
    async fn test_department_scope_and_publish() {
        let fx = Fixture::new().await;
        let midterm = fx
            .storage
            .create_exam(exam(&fx, "Mid Semester", ExamType::Midterm))
            .await
            .unwrap();

        let in_department = ExamListQuery {
            department_id: Some(fx.department.id),
            ..Default::default()
        };
        assert_eq!(fx.storage.count_exams(in_department).await.unwrap(), 1);
        let elsewhere = ExamListQuery {
            department_id: Some(fx.department.id + 100),
            ..Default::default()
        };
        assert_eq!(fx.storage.count_exams(elsewhere).await.unwrap(), 0);

        let published = fx
            .storage
            .set_exam_published(midterm.id, true)
            .await
            .unwrap()
            .unwrap();
        assert!(published.is_published);
        let query = ExamListQuery {
            is_published: Some(true),
            ..Default::default()
        };
        assert_eq!(fx.storage.list_exams(query).await.unwrap().len(), 1);
    }
}
