//! 作业提交
//!
//! 学生提交与修改、教师评分与统计。截止时间之后只允许评分。

pub mod grade;
pub mod write;

use std::sync::Arc;

use crate::errors::{Result, TrackademyError};
use crate::models::UserRole;
use crate::models::assignments::entities::Assignment;
use crate::models::submissions::{
    entities::Submission,
    requests::{
        CreateSubmissionRequest, GradeSubmissionRequest, SubmissionFilter, SubmissionListQuery,
        UpdateSubmissionRequest,
    },
    responses::SubmissionStatistics,
};
use crate::models::users::entities::Identity;
use crate::services::assignments::{ASSIGNMENT_NOT_FOUND, faculty_course_ids};
use crate::services::profiles::{faculty_profile, student_profile};
use crate::services::uploads::UploadForm;
use crate::storage::object_store::ObjectStore;
use crate::storage::Storage;

pub const SUBMISSION_NOT_FOUND: &str = "Submission not found.";
pub(crate) const DEADLINE_PASSED: &str = "Assignment submission deadline has passed.";
pub(crate) const CONTENT_REQUIRED: &str = "Submission must have either content or a file.";

pub struct SubmissionService {
    storage: Arc<dyn Storage>,
    object_store: Arc<dyn ObjectStore>,
}

impl SubmissionService {
    pub fn new(storage: Arc<dyn Storage>, object_store: Arc<dyn ObjectStore>) -> Self {
        Self {
            storage,
            object_store,
        }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub(crate) fn object_store(&self) -> &dyn ObjectStore {
        self.object_store.as_ref()
    }

    pub(crate) async fn assignment(&self, id: i64) -> Result<Assignment> {
        self.storage
            .get_assignment(id)
            .await?
            .ok_or_else(|| TrackademyError::not_found(ASSIGNMENT_NOT_FOUND))
    }

    pub(crate) async fn submission(&self, id: i64) -> Result<Submission> {
        self.storage
            .get_submission(id)
            .await?
            .ok_or_else(|| TrackademyError::not_found(SUBMISSION_NOT_FOUND))
    }

    // 教师必须任教该作业所属课程
    pub(crate) async fn ensure_assignment_faculty(
        &self,
        identity: &Identity,
        assignment: &Assignment,
        denied: &'static str,
    ) -> Result<()> {
        let faculty = faculty_profile(self.storage(), identity).await?;
        let owns = self
            .storage
            .get_course(assignment.course_id, true)
            .await?
            .is_some_and(|course| course.faculty_id == faculty.id);
        if !owns {
            return Err(TrackademyError::forbidden(denied));
        }
        Ok(())
    }

    /// 学生看自己的，教师看自己课程的，管理员不受限
    pub async fn list_submissions(
        &self,
        identity: Identity,
        query: SubmissionListQuery,
    ) -> Result<Vec<Submission>> {
        let storage = self.storage();
        let mut filter = SubmissionFilter {
            assignment_id: query.assignment_id,
            status: query.status,
            ..Default::default()
        };
        match identity.role {
            UserRole::Admin => {}
            UserRole::Faculty => {
                let faculty = faculty_profile(storage, &identity).await?;
                filter.course_ids = Some(faculty_course_ids(storage, faculty.id).await?);
            }
            UserRole::Student => {
                let student = student_profile(storage, &identity).await?;
                filter.student_id = Some(student.id);
            }
        }
        storage.list_submissions(filter).await
    }

    pub async fn get_submission(&self, identity: Identity, id: i64) -> Result<Submission> {
        let submission = self.submission(id).await?;
        let allowed = match identity.role {
            UserRole::Admin => true,
            UserRole::Student => {
                student_profile(self.storage(), &identity).await?.id == submission.student_id
            }
            UserRole::Faculty => {
                let assignment = self.assignment(submission.assignment_id).await?;
                self.ensure_assignment_faculty(&identity, &assignment, VIEW_DENIED)
                    .await
                    .is_ok()
            }
        };
        if !allowed {
            return Err(TrackademyError::forbidden(VIEW_DENIED));
        }
        Ok(submission)
    }

    pub async fn create_submission(
        &self,
        identity: Identity,
        req: CreateSubmissionRequest,
    ) -> Result<Submission> {
        write::create_submission(self, identity, req).await
    }

    pub async fn create_submission_upload(
        &self,
        identity: Identity,
        form: UploadForm,
    ) -> Result<Submission> {
        write::create_submission_upload(self, identity, form).await
    }

    pub async fn update_submission(
        &self,
        identity: Identity,
        id: i64,
        req: UpdateSubmissionRequest,
    ) -> Result<Submission> {
        write::update_submission(self, identity, id, req).await
    }

    pub async fn delete_submission(&self, identity: Identity, id: i64) -> Result<()> {
        write::delete_submission(self, identity, id).await
    }

    pub async fn grade_submission(
        &self,
        identity: Identity,
        id: i64,
        req: GradeSubmissionRequest,
    ) -> Result<Submission> {
        grade::grade_submission(self, identity, id, req).await
    }

    pub async fn assignment_submissions(
        &self,
        identity: Identity,
        assignment_id: i64,
        query: SubmissionListQuery,
    ) -> Result<Vec<Submission>> {
        grade::assignment_submissions(self, identity, assignment_id, query).await
    }

    pub async fn assignment_statistics(
        &self,
        identity: Identity,
        assignment_id: i64,
    ) -> Result<SubmissionStatistics> {
        grade::assignment_statistics(self, identity, assignment_id).await
    }
}

const VIEW_DENIED: &str = "You are not authorized to view this submission.";
