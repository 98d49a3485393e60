pub mod write;

use std::sync::Arc;

use crate::errors::{Result, TrackademyError};
use crate::models::UserRole;
use crate::models::assignments::{
    entities::Assignment,
    requests::{
        AssignmentFilter, AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest,
    },
};
use crate::models::courses::requests::CourseListQuery;
use crate::models::users::entities::Identity;
use crate::services::profiles::{faculty_profile, student_profile};
use crate::storage::Storage;

pub const ASSIGNMENT_NOT_FOUND: &str = "Assignment not found.";

pub struct AssignmentService {
    storage: Arc<dyn Storage>,
}

/// 教师任教的课程 id
pub(crate) async fn faculty_course_ids(storage: &dyn Storage, faculty_id: i64) -> Result<Vec<i64>> {
    let courses = storage
        .list_courses(CourseListQuery {
            faculty_id: Some(faculty_id),
            ..Default::default()
        })
        .await?;
    Ok(courses.into_iter().map(|c| c.id).collect())
}

impl AssignmentService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// 教师只看自己的课程，学生只看已选课程
    pub async fn list_assignments(
        &self,
        identity: Identity,
        query: AssignmentListQuery,
    ) -> Result<Vec<Assignment>> {
        let storage = self.storage();
        let course_ids = match identity.role {
            UserRole::Admin => None,
            UserRole::Faculty => {
                let faculty = faculty_profile(storage, &identity).await?;
                Some(faculty_course_ids(storage, faculty.id).await?)
            }
            UserRole::Student => {
                let student = student_profile(storage, &identity).await?;
                Some(storage.list_student_course_ids(student.id).await?)
            }
        };

        storage
            .list_assignments(AssignmentFilter {
                course_id: query.course_id,
                course_ids,
            })
            .await
    }

    pub async fn get_assignment(&self, id: i64) -> Result<Assignment> {
        self.storage
            .get_assignment(id)
            .await?
            .ok_or_else(|| TrackademyError::not_found(ASSIGNMENT_NOT_FOUND))
    }

    pub async fn create_assignment(
        &self,
        identity: Identity,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        write::create_assignment(self, identity, req).await
    }

    pub async fn update_assignment(
        &self,
        identity: Identity,
        id: i64,
        req: UpdateAssignmentRequest,
    ) -> Result<Assignment> {
        write::update_assignment(self, identity, id, req).await
    }

    pub async fn delete_assignment(&self, identity: Identity, id: i64) -> Result<()> {
        write::delete_assignment(self, identity, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, assignment, course, faculty, identity, student, subject};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_listing_is_scoped_by_role() {
        let fx = Fixture::new().await;
        let service = AssignmentService::new(fx.shared());
        let os = subject(&fx, "OS").await;
        let dbms = subject(&fx, "DBMS").await;
        let f1 = faculty(&fx, "f1@college.edu", "Faculty One").await;
        let f2 = faculty(&fx, "f2@college.edu", "Faculty Two").await;
        let c1 = course(&fx, os.id, f1.id).await;
        let c2 = course(&fx, dbms.id, f2.id).await;
        let due = Utc::now() + Duration::days(7);
        assignment(&fx, c1.id, due, 10.0).await;
        assignment(&fx, c2.id, due, 20.0).await;

        let s = student(&fx, "CE401", "Isha Kapoor").await;
        fx.storage.enroll_students(c2.id, vec![s.id]).await.unwrap();

        let all = service
            .list_assignments(identity(1, UserRole::Admin), AssignmentListQuery::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let mine = service
            .list_assignments(
                identity(f1.user_id, UserRole::Faculty),
                AssignmentListQuery::default(),
            )
            .await
            .unwrap();
        assert_eq!(mine.iter().map(|a| a.course_id).collect::<Vec<_>>(), vec![c1.id]);

        let enrolled = service
            .list_assignments(
                identity(s.user_id, UserRole::Student),
                AssignmentListQuery::default(),
            )
            .await
            .unwrap();
        assert_eq!(enrolled.len(), 1);
        assert_eq!(enrolled[0].course_id, c2.id);
    }
}
