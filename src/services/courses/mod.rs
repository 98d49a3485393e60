pub mod create;
pub mod enrollments;
pub mod update;

use std::sync::Arc;

use tracing::info;

use crate::errors::{Result, TrackademyError};
use crate::models::courses::{
    entities::Course,
    requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
    responses::EnrollmentResult,
};
use crate::models::students::entities::Student;
use crate::storage::Storage;

pub const COURSE_NOT_FOUND: &str = "Course not found.";

/// 开课分配（科目 × 教师 × 学期 × 分班 × 授课类型 × 批次）及选课
pub struct CourseService {
    storage: Arc<dyn Storage>,
}

impl CourseService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub async fn create_course(&self, req: CreateCourseRequest) -> Result<Course> {
        create::create_course(self, req).await
    }

    pub async fn list_courses(&self, query: CourseListQuery) -> Result<Vec<Course>> {
        self.storage.list_courses(query).await
    }

    pub async fn get_course(&self, id: i64) -> Result<Course> {
        self.storage
            .get_course(id, false)
            .await?
            .ok_or_else(|| TrackademyError::not_found(COURSE_NOT_FOUND))
    }

    pub async fn update_course(&self, id: i64, req: UpdateCourseRequest) -> Result<Course> {
        update::update_course(self, id, req).await
    }

    pub async fn delete_course(&self, id: i64) -> Result<()> {
        self.get_course(id).await?;
        self.storage.set_course_deleted(id, true).await?;
        info!("Course {} soft-deleted", id);
        Ok(())
    }

    pub async fn restore_course(&self, id: i64) -> Result<Course> {
        self.storage
            .set_course_deleted(id, false)
            .await?
            .ok_or_else(|| TrackademyError::not_found(COURSE_NOT_FOUND))
    }

    pub async fn enroll_students(
        &self,
        course_id: i64,
        student_ids: Vec<i64>,
    ) -> Result<EnrollmentResult> {
        enrollments::enroll_students(self, course_id, student_ids).await
    }

    pub async fn course_students(&self, course_id: i64) -> Result<Vec<Student>> {
        self.get_course(course_id).await?;
        self.storage.list_course_students(course_id).await
    }
}
