//! 科目存储操作
//!
//! (code, department, semester) 唯一，删除后再次创建会复活原记录。

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{SeaOrmStorage, now_ts};
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::Result;
use crate::models::subjects::{
    entities::Subject,
    requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
};
use crate::storage::SubjectStorage;
use crate::utils::sql::{contains_pattern, search_term};

fn subject_condition(query: &SubjectListQuery) -> Condition {
    let mut condition = Condition::all();
    if !query.include_deleted.unwrap_or(false) {
        condition = condition.add(Column::IsDeleted.eq(false));
    }
    if let Some(department_id) = query.department_id {
        condition = condition.add(Column::DepartmentId.eq(department_id));
    }
    if let Some(semester_id) = query.semester_id {
        condition = condition.add(Column::SemesterId.eq(semester_id));
    }
    if let Some(subject_type) = &query.subject_type {
        condition = condition.add(Column::SubjectType.eq(subject_type.as_str()));
    }
    if let Some(term) = search_term(query.search.as_deref()) {
        condition = condition.add(
            Condition::any()
                .add(Column::Name.like(contains_pattern(&term)))
                .add(Column::Code.like(contains_pattern(&term)))
                .add(Column::Abbreviation.like(contains_pattern(&term))),
        );
    }
    condition
}

#[async_trait]
impl SubjectStorage for SeaOrmStorage {
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let now = now_ts();
        let revived = Subjects::find()
            .filter(Column::Code.eq(req.code.as_str()))
            .filter(Column::DepartmentId.eq(req.department_id))
            .filter(Column::SemesterId.eq(req.semester_id))
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
        model.code = Set(req.code);
        model.subject_type = Set(req.subject_type.as_str().to_string());
        model.department_id = Set(req.department_id);
        model.semester_id = Set(req.semester_id);
        model.is_deleted = Set(false);
        model.updated_at = Set(now);

        let saved = if is_revival {
            model.update(&self.db).await?
        } else {
            model.insert(&self.db).await?
        };
        Ok(saved.into_subject())
    }

    async fn get_subject(&self, id: i64, include_deleted: bool) -> Result<Option<Subject>> {
        let model = self.find_live::<Subjects>(id, include_deleted).await?;
        Ok(model.map(|m| m.into_subject()))
    }

    async fn find_subject_by_code(
        &self,
        code: &str,
        department_id: i64,
        semester_id: i64,
    ) -> Result<Option<Subject>> {
        let model = Subjects::find()
            .filter(Column::Code.eq(code))
            .filter(Column::DepartmentId.eq(department_id))
            .filter(Column::SemesterId.eq(semester_id))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_subject()))
    }

    async fn list_subjects(&self, query: SubjectListQuery) -> Result<Vec<Subject>> {
        let models = Subjects::find()
            .filter(subject_condition(&query))
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_subject()).collect())
    }

    async fn count_subjects(&self, query: SubjectListQuery) -> Result<u64> {
        Ok(Subjects::find()
            .filter(subject_condition(&query))
            .count(&self.db)
            .await?)
    }

    async fn update_subject(
        &self,
        id: i64,
        req: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        let Some(existing) = self.find_live::<Subjects>(id, false).await? else {
            return Ok(None);
        };

        let mut model = ActiveModel::from(existing);
        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(abbreviation) = req.abbreviation {
            model.abbreviation = Set(Some(abbreviation));
        }
        if let Some(code) = req.code {
            model.code = Set(code);
        }
        if let Some(subject_type) = req.subject_type {
            model.subject_type = Set(subject_type.as_str().to_string());
        }
        if let Some(department_id) = req.department_id {
            model.department_id = Set(department_id);
        }
        if let Some(semester_id) = req.semester_id {
            model.semester_id = Set(semester_id);
        }
        model.updated_at = Set(now_ts());

        Ok(Some(model.update(&self.db).await?.into_subject()))
    }

    async fn set_subject_deleted(&self, id: i64, deleted: bool) -> Result<Option<Subject>> {
        let model = self.set_deleted::<Subjects>(id, deleted).await?;
        Ok(model.map(|m| m.into_subject()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubjectType;
    use crate::testing::Fixture;

    fn request(fx: &Fixture, code: &str, name: &str) -> CreateSubjectRequest {
        CreateSubjectRequest {
            name: name.into(),
            abbreviation: None,
            code: code.into(),
            subject_type: SubjectType::Mandatory,
            department_id: fx.department.id,
            semester_id: fx.semester.id,
        }
    }

    #[tokio::test]
    async fn test_code_is_unique_per_department_and_semester() {
        let fx = Fixture::new().await;
        fx.storage
            .create_subject(request(&fx, "3140702", "Operating System"))
            .await
            .unwrap();
        let err = fx
            .storage
            .create_subject(request(&fx, "3140702", "Operating Systems"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
    }

    #[tokio::test]
    async fn test_count_and_search() {
        let fx = Fixture::new().await;
        fx.storage
            .create_subject(request(&fx, "3140702", "Operating System"))
            .await
            .unwrap();
        let dbms = fx
            .storage
            .create_subject(request(&fx, "3130703", "Database Management"))
            .await
            .unwrap();
        fx.storage.set_subject_deleted(dbms.id, true).await.unwrap();

        let query = SubjectListQuery {
            semester_id: Some(fx.semester.id),
            ..Default::default()
        };
        assert_eq!(fx.storage.count_subjects(query.clone()).await.unwrap(), 1);
        assert_eq!(
            fx.storage
                .count_subjects(SubjectListQuery {
                    include_deleted: Some(true),
                    ..query
                })
                .await
                .unwrap(),
            2
        );

        let found = fx
            .storage
            .list_subjects(SubjectListQuery {
                search: Some("operating".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "3140702");
    }
}
