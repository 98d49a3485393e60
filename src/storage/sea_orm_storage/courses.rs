//! 开课与选课存储操作

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{SeaOrmStorage, now_ts};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses, NO_BATCH};
use crate::entity::{course_enrollments, faculties, students, subjects};
use crate::errors::Result;
use crate::models::{
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest},
        responses::CourseOverview,
    },
    students::entities::Student,
};
use crate::storage::CourseStorage;

fn stored_batch(batch: Option<&str>) -> String {
    batch.unwrap_or(NO_BATCH).to_string()
}

/// 分配的自然键：科目、教师、学期、分班、课型、批次
fn allocation_condition(req: &CreateCourseRequest) -> Condition {
    Condition::all()
        .add(Column::SubjectId.eq(req.subject_id))
        .add(Column::FacultyId.eq(req.faculty_id))
        .add(Column::SemesterId.eq(req.semester_id))
        .add(Column::DivisionId.eq(req.division_id))
        .add(Column::LectureType.eq(req.lecture_type.as_str()))
        .add(Column::Batch.eq(stored_batch(req.batch.as_deref())))
}

#[async_trait]
impl CourseStorage for SeaOrmStorage {
    async fn create_course(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = now_ts();
        let revived = Courses::find()
            .filter(allocation_condition(&req))
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
                    subject_id: Set(req.subject_id),
                    faculty_id: Set(req.faculty_id),
                    semester_id: Set(req.semester_id),
                    division_id: Set(req.division_id),
                    lecture_type: Set(req.lecture_type.as_str().to_string()),
                    batch: Set(stored_batch(req.batch.as_deref())),
                    is_deleted: Set(false),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?
            }
        };
        Ok(saved.into_course())
    }

    async fn get_course(&self, id: i64, include_deleted: bool) -> Result<Option<Course>> {
        let model = self.find_live::<Courses>(id, include_deleted).await?;
        Ok(model.map(|m| m.into_course()))
    }

    async fn find_course_allocation(&self, req: &CreateCourseRequest) -> Result<Option<Course>> {
        let model = Courses::find()
            .filter(allocation_condition(req))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_course()))
    }

    async fn update_course(
        &self,
        id: i64,
        allocation: CreateCourseRequest,
    ) -> Result<Option<Course>> {
        let Some(existing) = self.find_live::<Courses>(id, false).await? else {
            return Ok(None);
        };
        let mut model = ActiveModel::from(existing);
        model.subject_id = Set(allocation.subject_id);
        model.faculty_id = Set(allocation.faculty_id);
        model.semester_id = Set(allocation.semester_id);
        model.division_id = Set(allocation.division_id);
        model.lecture_type = Set(allocation.lecture_type.as_str().to_string());
        model.batch = Set(stored_batch(allocation.batch.as_deref()));
        model.updated_at = Set(now_ts());
        Ok(Some(model.update(&self.db).await?.into_course()))
    }

    async fn list_courses(&self, query: CourseListQuery) -> Result<Vec<Course>> {
        let mut condition = Condition::all();
        if !query.include_deleted.unwrap_or(false) {
            condition = condition.add(Column::IsDeleted.eq(false));
        }
        if let Some(faculty_id) = query.faculty_id {
            condition = condition.add(Column::FacultyId.eq(faculty_id));
        }
        if let Some(semester_id) = query.semester_id {
            condition = condition.add(Column::SemesterId.eq(semester_id));
        }
        if let Some(division_id) = query.division_id {
            condition = condition.add(Column::DivisionId.eq(division_id));
        }
        if let Some(subject_id) = query.subject_id {
            condition = condition.add(Column::SubjectId.eq(subject_id));
        }

        let models = Courses::find()
            .filter(condition)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_course()).collect())
    }

    async fn set_course_deleted(&self, id: i64, deleted: bool) -> Result<Option<Course>> {
        let model = self.set_deleted::<Courses>(id, deleted).await?;
        Ok(model.map(|m| m.into_course()))
    }

    async fn enroll_students(&self, course_id: i64, student_ids: Vec<i64>) -> Result<u64> {
        let txn = self.db.begin().await?;

        let existing: HashSet<i64> = course_enrollments::Entity::find()
            .select_only()
            .column(course_enrollments::Column::StudentId)
            .filter(course_enrollments::Column::CourseId.eq(course_id))
            .into_tuple::<i64>()
            .all(&txn)
            .await?
            .into_iter()
            .collect();

        let now = now_ts();
        let mut seen = existing;
        let mut enrolled = 0;
        for student_id in student_ids {
            if !seen.insert(student_id) {
                continue;
            }
            course_enrollments::ActiveModel {
                student_id: Set(student_id),
                course_id: Set(course_id),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            enrolled += 1;
        }

        txn.commit().await?;
        Ok(enrolled)
    }

    async fn list_course_students(&self, course_id: i64) -> Result<Vec<Student>> {
        let student_ids: Vec<i64> = course_enrollments::Entity::find()
            .select_only()
            .column(course_enrollments::Column::StudentId)
            .filter(course_enrollments::Column::CourseId.eq(course_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await?;
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = students::Entity::find()
            .filter(students::Column::Id.is_in(student_ids))
            .filter(students::Column::IsDeleted.eq(false))
            .order_by_asc(students::Column::EnrollmentNumber)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_student()).collect())
    }

    async fn is_student_enrolled(&self, student_id: i64, course_id: i64) -> Result<bool> {
        let count = course_enrollments::Entity::find()
            .filter(course_enrollments::Column::StudentId.eq(student_id))
            .filter(course_enrollments::Column::CourseId.eq(course_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn list_student_course_ids(&self, student_id: i64) -> Result<Vec<i64>> {
        Ok(course_enrollments::Entity::find()
            .select_only()
            .column(course_enrollments::Column::CourseId)
            .filter(course_enrollments::Column::StudentId.eq(student_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await?)
    }

    async fn list_faculty_course_overviews(
        &self,
        faculty_id: i64,
    ) -> Result<Vec<CourseOverview>> {
        let courses = Courses::find()
            .filter(Column::FacultyId.eq(faculty_id))
            .filter(Column::IsDeleted.eq(false))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        if courses.is_empty() {
            return Ok(Vec::new());
        }

        let subject_ids: Vec<i64> = courses.iter().map(|c| c.subject_id).collect();
        let subject_map: HashMap<i64, subjects::Model> = subjects::Entity::find()
            .filter(subjects::Column::Id.is_in(subject_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        let faculty_name = faculties::Entity::find_by_id(faculty_id)
            .one(&self.db)
            .await?
            .map(|f| f.full_name)
            .unwrap_or_default();

        Ok(courses
            .into_iter()
            .map(|course| {
                let (subject_name, subject_code) = subject_map
                    .get(&course.subject_id)
                    .map(|s| (s.name.clone(), s.code.clone()))
                    .unwrap_or_default();
                CourseOverview {
                    course: course.into_course(),
                    subject_name,
                    subject_code,
                    faculty_name: faculty_name.clone(),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LectureType;
    use crate::testing::{self, Fixture};

    #[tokio::test]
    async fn test_theory_course_stores_placeholder_batch() {
        let fx = Fixture::new().await;
        let subject = testing::subject(&fx, "3140702").await;
        let faculty = testing::faculty(&fx, "mehta@college.edu", "Prof. Mehta").await;
        let course = testing::course(&fx, subject.id, faculty.id).await;
        assert_eq!(course.lecture_type, LectureType::Theory);
        assert!(course.batch.is_none());

        let request = CreateCourseRequest {
            subject_id: subject.id,
            faculty_id: faculty.id,
            semester_id: fx.semester.id,
            division_id: fx.division.id,
            lecture_type: LectureType::Theory,
            batch: None,
        };
        let found = fx
            .storage
            .find_course_allocation(&request)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, course.id);

        let err = fx.storage.create_course(request).await.unwrap_err();
        assert_eq!(err.code(), "E005");
    }

    #[tokio::test]
    async fn test_enrollment_is_idempotent() {
        let fx = Fixture::new().await;
        let subject = testing::subject(&fx, "3140702").await;
        let faculty = testing::faculty(&fx, "mehta@college.edu", "Prof. Mehta").await;
        let course = testing::course(&fx, subject.id, faculty.id).await;
        let aarav = testing::student(&fx, "22CE001", "Aarav Patel").await;
        let diya = testing::student(&fx, "22CE002", "Diya Mehta").await;

        let added = fx
            .storage
            .enroll_students(course.id, vec![aarav.id, aarav.id])
            .await
            .unwrap();
        assert_eq!(added, 1);
        let added = fx
            .storage
            .enroll_students(course.id, vec![aarav.id, diya.id])
            .await
            .unwrap();
        assert_eq!(added, 1);

        let roster = fx.storage.list_course_students(course.id).await.unwrap();
        assert_eq!(roster.len(), 2);
        assert!(fx.storage.is_student_enrolled(diya.id, course.id).await.unwrap());
        assert_eq!(
            fx.storage.list_student_course_ids(aarav.id).await.unwrap(),
            vec![course.id]
        );

        let overviews = fx
            .storage
            .list_faculty_course_overviews(faculty.id)
            .await
            .unwrap();
        assert_eq!(overviews.len(), 1);
        assert_eq!(overviews[0].subject_code, "3140702");
        assert_eq!(overviews[0].faculty_name, "Prof. Mehta");
    }
}
